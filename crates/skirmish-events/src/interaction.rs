//! Interaction Records
//!
//! A single directed event in which one participant acted upon another.
//!
//! # Example
//!
//! ```
//! use skirmish_events::{Interaction, InteractionTime, ParticipantId};
//!
//! let time: InteractionTime = "2025-12-20 18:04:11".parse().unwrap();
//! let hit = Interaction::new(
//!     ParticipantId::parse("bsims").unwrap(),
//!     ParticipantId::parse("Winnie").unwrap(),
//!     time,
//! );
//! assert_eq!(hit.time.to_string(), "2025-12-20T18:04:11");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::participant::ParticipantId;

/// Naive datetime formats accepted besides RFC 3339, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Error returned when a timestamp cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid timestamp: '{0}'")]
pub struct ParseTimeError(pub String);

/// When an interaction happened.
///
/// Stored without a timezone. RFC 3339 inputs carrying an offset are
/// converted to UTC first. Serializes as ISO 8601 `YYYY-MM-DDTHH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionTime(NaiveDateTime);

impl InteractionTime {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl FromStr for InteractionTime {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.naive_utc()));
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }

        // Bare dates are midnight
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| ParseTimeError(s.to_string()))
    }
}

impl fmt::Display for InteractionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl Serialize for InteractionTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InteractionTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One directed event: `subject` acted upon `object`.
///
/// Self-interactions are valid. Repeated interactions between the same pair
/// are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub subject: ParticipantId,
    pub object: ParticipantId,
    pub time: InteractionTime,
}

impl Interaction {
    pub fn new(subject: ParticipantId, object: ParticipantId, time: InteractionTime) -> Self {
        Self {
            subject,
            object,
            time,
        }
    }

    /// Returns true if the participant is either endpoint.
    pub fn involves(&self, id: &ParticipantId) -> bool {
        &self.subject == id || &self.object == id
    }
}
