use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{availability, booked_dates, create_booking};
use crate::app_state::AppState;
use crate::middleware::rate_limit;

pub fn public_routes(state: AppState) -> Router<AppState> {
    let submit = Router::new()
        .route("/bookings", post(create_booking))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit::submit_guard,
        ));

    Router::new()
        .merge(submit)
        .route("/booked-dates", get(booked_dates))
        .route("/availability", get(availability))
}
