use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::models::{BookedDate, Booking, BookingFilter, UpdateBookingPayload};
use crate::db::DatabaseError;
use crate::domain::conflict;
use crate::domain::policy::ResourceType;
use crate::domain::validation::{self, ValidatedBooking, ValidationError};
use crate::error::AppError;
use crate::i18n::SupportedLanguage;

pub struct BookingRepository;

impl BookingRepository {
    /// Insert a validated submission, conflict-checking it against the
    /// day's confirmed bookings inside the same transaction.
    ///
    /// Reading the confirmed set and inserting on one connection closes
    /// the race where two overlapping submissions both pass the check
    /// against the same pre-insert state.
    pub async fn create_checked(
        pool: &SqlitePool,
        draft: &ValidatedBooking,
    ) -> Result<Booking, AppError> {
        let mut tx = pool.begin().await.map_err(DatabaseError::from)?;

        let neighbors = Self::confirmed_for_slot(
            &mut *tx,
            draft.resource_type,
            draft.booking_date,
            None,
        )
        .await?;
        let slots = conflict::booked_slots(&neighbors);
        if conflict::find_conflict(&draft.slot_request(), &slots).is_some() {
            return Err(ValidationError::TimeConflict.into());
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (name, email, phone, booking_date, start_time, end_time,
                 resource_type, language, message, confirmed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            RETURNING *
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(draft.booking_date)
        .bind(draft.start.to_string())
        .bind(draft.end.to_string())
        .bind(draft.resource_type)
        .bind(draft.language)
        .bind(&draft.message)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(booking)
    }

    /// Apply a partial admin edit.
    ///
    /// Metadata edits go straight through; a patch that touches the slot
    /// (date, times, resource, or confirming the booking) re-runs the
    /// slot checks and the conflict check, excluding the booking itself
    /// from its own neighbor set. Everything happens inside one
    /// transaction, as with creation.
    pub async fn update_checked(
        pool: &SqlitePool,
        id: i64,
        patch: &UpdateBookingPayload,
        today: NaiveDate,
    ) -> Result<Booking, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("no fields to update".into()));
        }

        let name = patch
            .name
            .as_deref()
            .map(str::trim)
            .map(|s| validation::truncate(s, validation::NAME_MAX_CHARS));
        let email = patch
            .email
            .as_deref()
            .map(validation::normalize_email)
            .transpose()?;
        let phone = patch
            .phone
            .as_deref()
            .map(validation::normalize_phone)
            .transpose()?;
        let message = patch
            .message
            .as_deref()
            .map(str::trim)
            .map(|s| validation::truncate(s, validation::MESSAGE_MAX_CHARS));
        let language = patch
            .language
            .as_deref()
            .map(|s| s.parse::<SupportedLanguage>().unwrap_or_default());

        let mut tx = pool.begin().await.map_err(DatabaseError::from)?;

        let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DatabaseError::from)?
            .ok_or(DatabaseError::NotFound)?;

        let slot = if patch.touches_slot(current.confirmed) {
            let resource = patch
                .resource_type
                .clone()
                .unwrap_or_else(|| current.resource_type.as_str().to_string());
            let date = patch
                .booking_date
                .clone()
                .unwrap_or_else(|| current.booking_date.format("%Y-%m-%d").to_string());
            let start = patch
                .start_time
                .clone()
                .unwrap_or_else(|| current.start_time.clone());
            let end = patch
                .end_time
                .clone()
                .unwrap_or_else(|| current.end_time.clone());

            let slot = validation::validate_slot(&resource, &date, &start, &end, today)?;

            let neighbors = Self::confirmed_for_slot(
                &mut *tx,
                slot.resource_type,
                slot.booking_date,
                Some(id),
            )
            .await?;
            let slots = conflict::booked_slots(&neighbors);
            if conflict::find_conflict(&slot.request(), &slots).is_some() {
                return Err(ValidationError::TimeConflict.into());
            }
            Some(slot)
        } else {
            None
        };

        let (date_bind, start_bind, end_bind, resource_bind) = match &slot {
            Some(s) => (
                Some(s.booking_date),
                Some(s.start.to_string()),
                Some(s.end.to_string()),
                Some(s.resource_type),
            ),
            None => (None, None, None, None),
        };

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                booking_date = COALESCE(?, booking_date),
                start_time = COALESCE(?, start_time),
                end_time = COALESCE(?, end_time),
                resource_type = COALESCE(?, resource_type),
                language = COALESCE(?, language),
                message = COALESCE(?, message),
                confirmed = COALESCE(?, confirmed),
                updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(date_bind)
        .bind(start_bind)
        .bind(end_bind)
        .bind(resource_bind)
        .bind(language)
        .bind(message)
        .bind(patch.confirmed)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(booking)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Booking>, DatabaseError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(booking)
    }

    /// Filtered listing for the admin dashboard, newest dates first.
    pub async fn list(
        pool: &SqlitePool,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, DatabaseError> {
        let mut sql = String::from("SELECT * FROM bookings WHERE 1=1");
        if filter.year.is_some() {
            sql.push_str(" AND strftime('%Y', booking_date) = ?");
        }
        if filter.month.is_some() {
            sql.push_str(" AND strftime('%m', booking_date) = ?");
        }
        if filter.confirmed.is_some() {
            sql.push_str(" AND confirmed = ?");
        }
        sql.push_str(" ORDER BY booking_date DESC, start_time DESC");

        let mut query = sqlx::query_as::<_, Booking>(&sql);
        if let Some(year) = filter.year {
            query = query.bind(format!("{year:04}"));
        }
        if let Some(month) = filter.month {
            query = query.bind(format!("{month:02}"));
        }
        if let Some(confirmed) = filter.confirmed {
            query = query.bind(confirmed);
        }

        Ok(query.fetch_all(pool).await?)
    }

    /// All confirmed `(date, resource)` pairs, for the public calendar.
    pub async fn booked_dates(pool: &SqlitePool) -> Result<Vec<BookedDate>, DatabaseError> {
        let dates = sqlx::query_as::<_, BookedDate>(
            r#"
            SELECT booking_date, resource_type FROM bookings
            WHERE confirmed = 1
            ORDER BY booking_date ASC, start_time ASC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(dates)
    }

    /// Confirmed bookings sharing one `(resource, date)`, the set every
    /// conflict check runs against. `exclude_id` drops the booking being
    /// edited from its own neighbor set.
    pub async fn confirmed_for_slot(
        conn: &mut SqliteConnection,
        resource: ResourceType,
        date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Vec<Booking>, DatabaseError> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE resource_type = ? AND booking_date = ? AND confirmed = 1
              AND (? IS NULL OR id <> ?)
            ORDER BY start_time ASC
            "#,
        )
        .bind(resource)
        .bind(date)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_all(conn)
        .await?;
        Ok(rows)
    }

    /// Pool-level convenience for read-only callers (availability view).
    pub async fn confirmed_slots(
        pool: &SqlitePool,
        resource: ResourceType,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, DatabaseError> {
        let mut conn = pool.acquire().await?;
        Self::confirmed_for_slot(&mut *conn, resource, date, None).await
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
