//! The elementary timetable record.

use serde::{Deserialize, Serialize};

use super::{ServiceTime, StopId, TripId};

/// One vehicle movement between two consecutive stops of a trip.
///
/// The timetable is the sequence of all connections ordered by departure
/// time; a trip is the ordered subset sharing one `trip` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Stop the vehicle departs from.
    pub from: StopId,

    /// Stop the vehicle arrives at.
    pub to: StopId,

    /// Departure time at `from`.
    pub departs: ServiceTime,

    /// Arrival time at `to`. Never earlier than `departs`.
    pub arrives: ServiceTime,

    /// The vehicle run this movement belongs to.
    pub trip: TripId,
}

impl Connection {
    /// Ride duration in seconds.
    pub fn duration(&self) -> u32 {
        self.arrives.seconds() - self.departs.seconds()
    }
}
