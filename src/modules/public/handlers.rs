use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::app_state::AppState;
use crate::db::{BookedDate, Booking, BookingRepository, NewBooking};
use crate::domain::policy::ResourceType;
use crate::domain::validation::{self, ValidationError};
use crate::error::{AppError, AppResult};

/// POST /api/bookings: a visitor requests a slot.
///
/// The submission runs the full check sequence; on success the booking is
/// stored unconfirmed and the admin is notified out of band.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<NewBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let today = Local::now().date_naive();
    let draft = validation::validate_submission(&payload, today)?;
    let booking = BookingRepository::create_checked(&state.db, &draft).await?;

    info!(
        booking_id = booking.id,
        resource = %booking.resource_type,
        date = %booking.booking_date,
        "booking request received"
    );

    if let Some(notifier) = &state.notifier {
        notifier.notify_created(&booking);
    }

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/booked-dates: confirmed (date, resource) pairs for the
/// public calendar.
pub async fn booked_dates(State(state): State<AppState>) -> AppResult<Json<Vec<BookedDate>>> {
    let dates = BookingRepository::booked_dates(&state.db).await?;
    Ok(Json(dates))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub resource_type: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub resource_type: ResourceType,
    pub date: NaiveDate,
    pub booked: Vec<SlotView>,
}

/// GET /api/availability?resourceType=sauna&date=2026-08-20 returns the
/// confirmed slots of one resource on one day, so the booking form can
/// offer free times.
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let resource: ResourceType = query
        .resource_type
        .parse()
        .map_err(|_| ValidationError::InvalidResource)?;
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("date must be YYYY-MM-DD".to_string()))?;

    let rows = BookingRepository::confirmed_slots(&state.db, resource, date).await?;
    let booked = rows
        .into_iter()
        .map(|booking| SlotView {
            start_time: booking.start_time,
            end_time: booking.end_time,
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        resource_type: resource,
        date,
        booked,
    }))
}

/// GET /health: liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "healthy",
        Err(err) => {
            tracing::warn!(error = %err, "database health check failed");
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
