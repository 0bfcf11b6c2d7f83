//! Occupant records held by car park bays.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in an occupant code.
pub const OCCUPANT_ID_LEN: usize = 6;

/// Number of leading uppercase letters in an occupant code.
pub const OCCUPANT_ID_LETTERS: usize = 3;

/// Rejected occupant code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid occupant id `{0}`: expected 3 uppercase letters followed by 3 digits")]
pub struct ParseOccupantIdError(pub String);

/// Registration code of a car, e.g. `ABC123`.
///
/// Always exactly three ASCII uppercase letters followed by three ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OccupantId(String);

impl OccupantId {
    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a code already known to be well formed.
    pub(crate) fn new_unchecked(code: String) -> Self {
        debug_assert!(Self::is_valid(&code), "malformed occupant id {code}");
        Self(code)
    }

    fn is_valid(code: &str) -> bool {
        let bytes = code.as_bytes();
        bytes.len() == OCCUPANT_ID_LEN
            && bytes[..OCCUPANT_ID_LETTERS].iter().all(u8::is_ascii_uppercase)
            && bytes[OCCUPANT_ID_LETTERS..].iter().all(u8::is_ascii_digit)
    }
}

impl FromStr for OccupantId {
    type Err = ParseOccupantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseOccupantIdError(s.to_owned()))
        }
    }
}

impl TryFrom<String> for OccupantId {
    type Error = ParseOccupantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(ParseOccupantIdError(value))
        }
    }
}

impl From<OccupantId> for String {
    fn from(id: OccupantId) -> Self {
        id.0
    }
}

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A car occupying (or about to occupy) a bay.
///
/// Immutable once created. The arrival instant is taken when the car turns up
/// at the gate, so any time spent waiting for a free bay counts as dwell time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    id: OccupantId,
    arrived_at: Instant,
}

impl Occupant {
    /// Create an occupant arriving now.
    #[must_use]
    pub fn new(id: OccupantId) -> Self {
        Self::with_arrival(id, Instant::now())
    }

    /// Create an occupant with an explicit arrival instant.
    #[must_use]
    pub const fn with_arrival(id: OccupantId, arrived_at: Instant) -> Self {
        Self { id, arrived_at }
    }

    /// Registration code.
    #[must_use]
    pub const fn id(&self) -> &OccupantId {
        &self.id
    }

    /// Instant the occupant arrived.
    #[must_use]
    pub const fn arrived_at(&self) -> Instant {
        self.arrived_at
    }

    /// Time spent in the car park as of `now`. Never negative.
    #[must_use]
    pub fn dwell_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.arrived_at)
    }

    /// Consume the record, keeping only the code.
    #[must_use]
    pub fn into_id(self) -> OccupantId {
        self.id
    }
}
