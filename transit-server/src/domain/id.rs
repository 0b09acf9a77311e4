//! Dense integer identifiers for stops and trips.
//!
//! All engine code works on dense `u32` indices. The mapping between feed
//! string identifiers and these indices lives at the ingestion boundary
//! (see [`crate::feed::ids`]); nothing past that boundary touches strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stop index in `[0, n_stops)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(u32);

impl StopId {
    /// Create a stop id from a dense index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The index as a `usize`, for direct array access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw index value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trip index in `[0, n_trips)`.
///
/// A trip groups the ordered connections that share one vehicle run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(u32);

impl TripId {
    /// Create a trip id from a dense index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The index as a `usize`, for direct array access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw index value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_index() {
        assert!(StopId::new(1) < StopId::new(2));
        assert!(TripId::new(9) > TripId::new(3));
    }

    #[test]
    fn display_is_bare_index() {
        assert_eq!(StopId::new(42).to_string(), "42");
        assert_eq!(format!("{:?}", TripId::new(7)), "TripId(7)");
    }
}
