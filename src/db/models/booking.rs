use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::policy::ResourceType;
use crate::i18n::SupportedLanguage;

/// A persisted reservation request for the sauna or the veranda.
///
/// `start_time`/`end_time` are kept in their stored `HH:MM` form; they are
/// parsed on demand when the conflict checker needs them, so one corrupted
/// row cannot make the whole table unreadable.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub resource_type: ResourceType,
    pub language: SupportedLanguage,
    pub message: Option<String>,
    pub confirmed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw public submission, exactly as posted by the booking form.
///
/// Every field is optional so that presence is checked by the validator
/// (with the `missing_fields` code) instead of failing at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub resource_type: Option<String>,
    pub language: Option<String>,
    pub message: Option<String>,
}

/// Partial admin edit. Slot-relevant fields trigger re-validation; pure
/// metadata edits do not.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub resource_type: Option<String>,
    pub language: Option<String>,
    pub message: Option<String>,
    pub confirmed: Option<bool>,
}

impl UpdateBookingPayload {
    /// Whether this patch requires the slot checks to run again: any edit
    /// to date, times or resource, or confirming a previously unconfirmed
    /// booking.
    pub fn touches_slot(&self, currently_confirmed: bool) -> bool {
        self.booking_date.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
            || self.resource_type.is_some()
            || (self.confirmed == Some(true) && !currently_confirmed)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.booking_date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.resource_type.is_none()
            && self.language.is_none()
            && self.message.is_none()
            && self.confirmed.is_none()
    }
}

/// Admin list filters, mirroring the dashboard's year/month/status
/// drop-downs.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BookingFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub confirmed: Option<bool>,
}

/// One confirmed calendar entry, enough for the public site to shade
/// taken days per resource.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedDate {
    pub booking_date: NaiveDate,
    pub resource_type: ResourceType,
}
