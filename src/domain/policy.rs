use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A bookable physical resource of the guesthouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Sauna,
    Veranda,
}

/// Booking rules for one resource type.
///
/// Kept in one table so a new resource only needs a row here, not edits to
/// the conflict algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePolicy {
    /// Shortest bookable duration, in minutes.
    pub min_duration_min: i64,
    /// Idle time required between two bookings of the same resource,
    /// in minutes.
    pub turnaround_gap_min: i64,
}

impl ResourceType {
    pub const ALL: [ResourceType; 2] = [ResourceType::Sauna, ResourceType::Veranda];

    pub fn policy(self) -> ResourcePolicy {
        match self {
            ResourceType::Sauna => ResourcePolicy {
                min_duration_min: 240,
                turnaround_gap_min: 120,
            },
            ResourceType::Veranda => ResourcePolicy {
                min_duration_min: 120,
                turnaround_gap_min: 60,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Sauna => "sauna",
            ResourceType::Veranda => "veranda",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sauna" => Ok(ResourceType::Sauna),
            "veranda" => Ok(ResourceType::Veranda),
            other => Err(format!("unknown resource type: {}", other)),
        }
    }
}
