use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::auth;
use crate::db::{Booking, BookingFilter, BookingRepository, NewBooking, UpdateBookingPayload};
use crate::domain::validation;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/admin/login: exchange the configured credentials for a
/// bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let auth_config = &state.env.auth;
    let valid = payload.username == auth_config.admin_username
        && payload.password == auth_config.admin_password.expose_secret();
    if !valid {
        warn!(username = %payload.username, "failed admin login attempt");
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = auth::generate_token(auth_config.jwt_secret.expose_secret(), &payload.username)
        .map_err(|err| AppError::Internal(err.to_string()))?;

    info!(username = %payload.username, "admin logged in");
    Ok(Json(LoginResponse { token }))
}

/// GET /api/admin/bookings?year=&month=&confirmed= with optional filters.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = BookingRepository::list(&state.db, &filter).await?;
    Ok(Json(bookings))
}

/// GET /api/admin/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {id} does not exist")))?;
    Ok(Json(booking))
}

/// POST /api/admin/bookings: a booking entered by the admin on behalf
/// of a caller; passes the same gate as the public form.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<NewBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let today = Local::now().date_naive();
    let draft = validation::validate_submission(&payload, today)?;
    let booking = BookingRepository::create_checked(&state.db, &draft).await?;
    info!(booking_id = booking.id, "booking created by admin");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// PUT /api/admin/bookings/{id}: partial edit with slot re-validation
/// when date, times, resource or confirmation change.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateBookingPayload>,
) -> AppResult<Json<Booking>> {
    let today = Local::now().date_naive();
    let booking = BookingRepository::update_checked(&state.db, id, &patch, today).await?;
    info!(booking_id = id, "booking updated");
    Ok(Json(booking))
}

/// DELETE /api/admin/bookings/{id}: hard delete.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let deleted = BookingRepository::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("booking {id} does not exist")));
    }
    info!(booking_id = id, "booking deleted");
    Ok(Json(json!({ "id": id, "deleted": true })))
}
