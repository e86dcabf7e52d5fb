use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_booking, delete_booking, get_booking, list_bookings, login, update_booking,
};
use crate::app_state::AppState;
use crate::middleware::{auth, rate_limit};

pub fn admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let login_route = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit::login_guard,
        ));

    protected.merge(login_route)
}
