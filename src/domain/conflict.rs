use tracing::warn;

use crate::db::Booking;
use crate::domain::clock_time::ClockTime;
use crate::domain::policy::ResourceType;

/// A candidate slot being checked against the day's confirmed bookings.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest {
    pub resource: ResourceType,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// A confirmed booking with its stored times already parsed.
#[derive(Debug, Clone, Copy)]
pub struct BookedSlot {
    pub booking_id: i64,
    pub resource: ResourceType,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Parse the stored confirmed bookings into checkable slots.
///
/// A row whose persisted times no longer parse is skipped as non-blocking
/// rather than failing the whole check; the skip is logged so a corrupted
/// row is visible to the operator instead of silently freeing its slot.
pub fn booked_slots(rows: &[Booking]) -> Vec<BookedSlot> {
    rows.iter()
        .filter_map(|row| {
            match (
                ClockTime::parse(&row.start_time),
                ClockTime::parse(&row.end_time),
            ) {
                (Some(start), Some(end)) => Some(BookedSlot {
                    booking_id: row.id,
                    resource: row.resource_type,
                    start,
                    end,
                }),
                _ => {
                    warn!(
                        booking_id = row.id,
                        start_time = %row.start_time,
                        end_time = %row.end_time,
                        "skipping confirmed booking with unparsable stored times"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Whether the candidate can coexist with one confirmed booking.
///
/// The turnaround gap after the existing booking uses the existing
/// booking's resource policy; the gap ahead of it uses the candidate's.
/// Queries are scoped per resource so both are the same value today, but
/// the rule holds even if mixed-resource sets are ever compared.
pub fn is_compatible(candidate: &SlotRequest, existing: &BookedSlot) -> bool {
    let gap_after_existing = existing.resource.policy().turnaround_gap_min;
    let gap_after_candidate = candidate.resource.policy().turnaround_gap_min;

    existing.end.minutes() + gap_after_existing <= candidate.start.minutes()
        || candidate.end.minutes() + gap_after_candidate <= existing.start.minutes()
}

/// First confirmed booking the candidate cannot coexist with, if any.
///
/// An empty set always accepts; a single incompatible booking rejects the
/// whole candidate.
pub fn find_conflict<'a>(
    candidate: &SlotRequest,
    existing: &'a [BookedSlot],
) -> Option<&'a BookedSlot> {
    existing.iter().find(|slot| !is_compatible(candidate, slot))
}
