use chrono::NaiveDate;
use thiserror::Error;

use crate::db::NewBooking;
use crate::domain::clock_time::ClockTime;
use crate::domain::conflict::SlotRequest;
use crate::domain::policy::ResourceType;
use crate::i18n::SupportedLanguage;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 20;
pub const MESSAGE_MAX_CHARS: usize = 500;
pub const PHONE_MIN_CHARS: usize = 5;

/// A submission failure with a stable machine-readable code.
///
/// Codes are part of the client contract; the front-end maps them to
/// localized messages, so they must not change meaning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field is missing")]
    MissingFields(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number is not valid")]
    InvalidPhone,
    #[error("unknown resource type")]
    InvalidResource,
    #[error("time must be given as HH:MM")]
    InvalidTimeFormat(&'static str),
    #[error("start time must be before end time")]
    InvalidTimeRange,
    #[error("booking is shorter than the minimum duration for the {0}")]
    MinDuration(ResourceType),
    #[error("booking date is in the past")]
    PastDate,
    #[error("the requested slot conflicts with an existing booking")]
    TimeConflict,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "missing_fields",
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::InvalidPhone => "invalid_phone",
            ValidationError::InvalidResource => "invalid_resource",
            ValidationError::InvalidTimeFormat(_) => "invalid_time_format",
            ValidationError::InvalidTimeRange => "invalid_time_range",
            ValidationError::MinDuration(ResourceType::Sauna) => "min_duration_sauna",
            ValidationError::MinDuration(ResourceType::Veranda) => "min_duration_veranda",
            ValidationError::PastDate => "past_date",
            ValidationError::TimeConflict => "time_conflict",
        }
    }

    /// The offending request field, where one can be named.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingFields(field) => Some(field),
            ValidationError::InvalidEmail => Some("email"),
            ValidationError::InvalidPhone => Some("phone"),
            ValidationError::InvalidResource => Some("resourceType"),
            ValidationError::InvalidTimeFormat(field) => Some(field),
            ValidationError::PastDate => Some("bookingDate"),
            _ => None,
        }
    }
}

/// A submission that passed every field check and is ready for the
/// conflict check and persistence.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub booking_date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub resource_type: ResourceType,
    pub language: SupportedLanguage,
    pub message: Option<String>,
}

impl ValidatedBooking {
    pub fn slot_request(&self) -> SlotRequest {
        SlotRequest {
            resource: self.resource_type,
            start: self.start,
            end: self.end,
        }
    }
}

/// Date, time and resource checks shared by creation and admin edits.
#[derive(Debug, Clone, Copy)]
pub struct SlotDraft {
    pub resource_type: ResourceType,
    pub booking_date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl SlotDraft {
    pub fn request(&self) -> SlotRequest {
        SlotRequest {
            resource: self.resource_type,
            start: self.start,
            end: self.end,
        }
    }
}

/// Run the full ordered check sequence over a raw submission.
///
/// Field values are trimmed and truncated first; every subsequent check
/// fails fast with its own error code. The conflict check against stored
/// bookings is not part of this function; it runs inside the store
/// transaction with the day's confirmed rows in hand.
pub fn validate_submission(
    input: &NewBooking,
    today: NaiveDate,
) -> Result<ValidatedBooking, ValidationError> {
    let name = required(&input.name, "name")?;
    let email = required(&input.email, "email")?;
    let phone = required(&input.phone, "phone")?;
    let date_raw = required(&input.booking_date, "bookingDate")?;
    let start_raw = required(&input.start_time, "startTime")?;
    let end_raw = required(&input.end_time, "endTime")?;
    let resource_raw = required(&input.resource_type, "resourceType")?;

    let name = truncate(&name, NAME_MAX_CHARS);
    let email = normalize_email(&email)?;
    let phone = normalize_phone(&phone)?;
    let slot = validate_slot(&resource_raw, &date_raw, &start_raw, &end_raw, today)?;

    let language = input
        .language
        .as_deref()
        .map(|s| s.parse().unwrap_or_default())
        .unwrap_or_default();
    let message = input
        .message
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| truncate(s, MESSAGE_MAX_CHARS));

    Ok(ValidatedBooking {
        name,
        email,
        phone,
        booking_date: slot.booking_date,
        start: slot.start,
        end: slot.end,
        resource_type: slot.resource_type,
        language,
        message,
    })
}

/// Checks 4-8 of the sequence: resource, time format, time order, minimum
/// duration, date not in the past. Reused by the admin edit path whenever
/// a patch touches the slot.
pub fn validate_slot(
    resource: &str,
    date: &str,
    start: &str,
    end: &str,
    today: NaiveDate,
) -> Result<SlotDraft, ValidationError> {
    let resource_type: ResourceType = resource
        .parse()
        .map_err(|_| ValidationError::InvalidResource)?;

    let start_time = ClockTime::parse(start.trim())
        .ok_or(ValidationError::InvalidTimeFormat("startTime"))?;
    let end_time =
        ClockTime::parse(end.trim()).ok_or(ValidationError::InvalidTimeFormat("endTime"))?;

    if start_time >= end_time {
        return Err(ValidationError::InvalidTimeRange);
    }

    let policy = resource_type.policy();
    if start_time.duration_until(end_time) < policy.min_duration_min {
        return Err(ValidationError::MinDuration(resource_type));
    }

    let booking_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::MissingFields("bookingDate"))?;
    if booking_date < today {
        return Err(ValidationError::PastDate);
    }

    Ok(SlotDraft {
        resource_type,
        booking_date,
        start: start_time,
        end: end_time,
    })
}

/// Trim, bound and shape-check an email value.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = truncate(raw.trim(), EMAIL_MAX_CHARS);
    if email_shape_ok(&email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Trim, bound and shape-check a phone value.
pub fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = truncate(raw.trim(), PHONE_MAX_CHARS);
    if phone.chars().count() >= PHONE_MIN_CHARS && phone.chars().any(|c| c.is_ascii_digit()) {
        Ok(phone)
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingFields(field)),
    }
}

// `local@domain.tld` with a non-empty local part, a dotted domain and no
// whitespace anywhere; deliberately far short of full RFC 5322.
fn email_shape_ok(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn submission() -> NewBooking {
        NewBooking {
            name: Some("Maria Rusu".into()),
            email: Some("maria@example.com".into()),
            phone: Some("+373 60 123 456".into()),
            booking_date: Some("2026-08-20".into()),
            start_time: Some("10:00".into()),
            end_time: Some("14:00".into()),
            resource_type: Some("sauna".into()),
            language: Some("ro".into()),
            message: Some("Ziua de nastere".into()),
        }
    }

    fn code_of(input: &NewBooking) -> &'static str {
        validate_submission(input, today()).unwrap_err().code()
    }

    #[test]
    fn accepts_a_well_formed_submission() {
        let booking = validate_submission(&submission(), today()).unwrap();
        assert_eq!(booking.resource_type, ResourceType::Sauna);
        assert_eq!(booking.start.to_string(), "10:00");
        assert_eq!(booking.end.to_string(), "14:00");
        assert_eq!(booking.language, SupportedLanguage::Romanian);
        assert_eq!(booking.message.as_deref(), Some("Ziua de nastere"));
    }

    #[test]
    fn missing_fields_fire_before_anything_else() {
        let mut input = submission();
        input.name = None;
        input.email = Some("not-an-email".into());
        let err = validate_submission(&input, today()).unwrap_err();
        assert_eq!(err.code(), "missing_fields");
        assert_eq!(err.field(), Some("name"));

        let mut input = submission();
        input.start_time = Some("   ".into());
        assert_eq!(code_of(&input), "missing_fields");
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in [
            "plainaddress",
            "no domain@x",
            "a@b",
            "a@.com",
            "a@b.",
            "@example.com",
            "two words@example.com",
        ] {
            let mut input = submission();
            input.email = Some(bad.into());
            assert_eq!(code_of(&input), "invalid_email", "email: {bad:?}");
        }
    }

    #[test]
    fn rejects_short_or_digitless_phones() {
        for bad in ["123", "call me", "+-()"] {
            let mut input = submission();
            input.phone = Some(bad.into());
            assert_eq!(code_of(&input), "invalid_phone", "phone: {bad:?}");
        }
    }

    #[test]
    fn rejects_unknown_resources() {
        let mut input = submission();
        input.resource_type = Some("pool".into());
        assert_eq!(code_of(&input), "invalid_resource");
    }

    #[test]
    fn rejects_bad_time_formats() {
        let mut input = submission();
        input.start_time = Some("9:00".into());
        let err = validate_submission(&input, today()).unwrap_err();
        assert_eq!(err.code(), "invalid_time_format");
        assert_eq!(err.field(), Some("startTime"));

        let mut input = submission();
        input.end_time = Some("24:00".into());
        let err = validate_submission(&input, today()).unwrap_err();
        assert_eq!(err.code(), "invalid_time_format");
        assert_eq!(err.field(), Some("endTime"));
    }

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        for (start, end) in [("14:00", "14:00"), ("15:00", "14:00")] {
            let mut input = submission();
            input.start_time = Some(start.into());
            input.end_time = Some(end.into());
            assert_eq!(code_of(&input), "invalid_time_range");
        }
    }

    #[test]
    fn enforces_sauna_minimum_of_four_hours() {
        let mut input = submission();
        input.start_time = Some("09:00".into());
        input.end_time = Some("12:00".into());
        assert_eq!(code_of(&input), "min_duration_sauna");

        input.end_time = Some("13:00".into());
        assert!(validate_submission(&input, today()).is_ok());
    }

    #[test]
    fn enforces_veranda_minimum_of_two_hours() {
        let mut input = submission();
        input.resource_type = Some("veranda".into());
        input.start_time = Some("10:00".into());
        input.end_time = Some("11:30".into());
        assert_eq!(code_of(&input), "min_duration_veranda");

        input.end_time = Some("12:00".into());
        assert!(validate_submission(&input, today()).is_ok());
    }

    #[test]
    fn rejects_past_dates_with_valid_times() {
        let mut input = submission();
        input.booking_date = Some("2026-08-05".into());
        assert_eq!(code_of(&input), "past_date");
    }

    #[test]
    fn accepts_today() {
        let mut input = submission();
        input.booking_date = Some("2026-08-06".into());
        assert!(validate_submission(&input, today()).is_ok());
    }

    #[test]
    fn truncates_long_fields_at_the_boundary() {
        let mut input = submission();
        input.name = Some("x".repeat(250));
        input.message = Some("y".repeat(800));
        let booking = validate_submission(&input, today()).unwrap();
        assert_eq!(booking.name.chars().count(), NAME_MAX_CHARS);
        assert_eq!(
            booking.message.unwrap().chars().count(),
            MESSAGE_MAX_CHARS
        );
    }

    #[test]
    fn unknown_language_falls_back_to_russian() {
        let mut input = submission();
        input.language = Some("de".into());
        let booking = validate_submission(&input, today()).unwrap();
        assert_eq!(booking.language, SupportedLanguage::Russian);

        let mut input = submission();
        input.language = None;
        let booking = validate_submission(&input, today()).unwrap();
        assert_eq!(booking.language, SupportedLanguage::Russian);
    }
}
