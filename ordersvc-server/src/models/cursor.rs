//! Keyset pagination cursor.
//!
//! Encodes the last-seen `(created_at, id)` sort key as
//! `"<RFC3339 timestamp>_<id>"`. Rows tied on the timestamp are
//! disambiguated by id, so a walk never repeats or skips a row while new
//! orders land at the head of the listing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use super::ValidationError;

/// Resume point for a cursor-based listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: i64,
}

impl Cursor {
    /// Cursor pointing just past the given row.
    pub fn after(created_at: DateTime<Utc>, id: i64) -> Self {
        Self { created_at, id }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // microsecond precision so the value round-trips through
        // Postgres TIMESTAMPTZ losslessly
        write!(
            f,
            "{}_{}",
            self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.id
        )
    }
}

impl FromStr for Cursor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (timestamp, id) = s.split_once('_').ok_or(ValidationError::InvalidFormat {
            field: "cursor",
            reason: "expected '<timestamp>_<id>'",
        })?;

        let created_at = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "cursor",
                reason: "invalid timestamp",
            })?
            .with_timezone(&Utc);

        let id = id.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "cursor",
            reason: "invalid id",
        })?;

        Ok(Self { created_at, id })
    }
}
