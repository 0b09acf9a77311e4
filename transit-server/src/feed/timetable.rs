//! The immutable connection store.
//!
//! A [`Timetable`] holds every connection of the feed sorted by
//! non-decreasing departure time, which is the order the forward scan
//! consumes them in. It is built once per feed and read-only afterwards;
//! queries share it freely.

use crate::domain::{Connection, ServiceTime, StopId, TripId};

/// Error raised when timetable input is rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    /// The parallel input columns have differing lengths.
    #[error("timetable columns have mismatched lengths")]
    ColumnLengthMismatch,

    /// A connection references a stop outside `[0, n_stops)`.
    #[error("stop id {stop} out of range for {n_stops} stops")]
    StopOutOfRange { stop: u32, n_stops: usize },

    /// A connection arrives before it departs.
    #[error("connection departs {departs} but arrives {arrives}")]
    ArrivesBeforeDeparts {
        departs: ServiceTime,
        arrives: ServiceTime,
    },

    /// Connections of one trip overlap in time.
    #[error("trip {0} has non-monotone times")]
    NonMonotoneTrip(TripId),
}

/// All connections of a feed, sorted by departure time.
#[derive(Debug, Clone)]
pub struct Timetable {
    connections: Vec<Connection>,
    n_stops: usize,
    n_trips: usize,
}

impl Timetable {
    /// Build a timetable from connection records.
    ///
    /// Connections are sorted by departure time; input order is otherwise
    /// preserved (the sort is stable). Rejects out-of-range stop ids,
    /// connections that arrive before they depart, and trips whose
    /// connections overlap in time.
    pub fn new(n_stops: usize, mut connections: Vec<Connection>) -> Result<Self, TimetableError> {
        for c in &connections {
            for stop in [c.from, c.to] {
                if stop.index() >= n_stops {
                    return Err(TimetableError::StopOutOfRange {
                        stop: stop.value(),
                        n_stops,
                    });
                }
            }
            if c.arrives < c.departs {
                return Err(TimetableError::ArrivesBeforeDeparts {
                    departs: c.departs,
                    arrives: c.arrives,
                });
            }
        }

        connections.sort_by_key(|c| c.departs);
        check_trips_monotone(&connections)?;

        let n_trips = connections
            .iter()
            .map(|c| c.trip.index() + 1)
            .max()
            .unwrap_or(0);

        Ok(Self {
            connections,
            n_stops,
            n_trips,
        })
    }

    /// Build a timetable from five parallel columns, the exchange format
    /// produced by feed preprocessing.
    pub fn from_columns(
        n_stops: usize,
        from: Vec<u32>,
        to: Vec<u32>,
        departs: Vec<u32>,
        arrives: Vec<u32>,
        trips: Vec<u32>,
    ) -> Result<Self, TimetableError> {
        let n = from.len();
        if [to.len(), departs.len(), arrives.len(), trips.len()] != [n, n, n, n] {
            return Err(TimetableError::ColumnLengthMismatch);
        }

        let connections = (0..n)
            .map(|i| Connection {
                from: StopId::new(from[i]),
                to: StopId::new(to[i]),
                departs: ServiceTime::from_seconds(departs[i]),
                arrives: ServiceTime::from_seconds(arrives[i]),
                trip: TripId::new(trips[i]),
            })
            .collect();

        Self::new(n_stops, connections)
    }

    /// The connections, sorted by non-decreasing departure time.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of stops the connections index into.
    pub fn n_stops(&self) -> usize {
        self.n_stops
    }

    /// One past the highest trip index in use.
    pub fn n_trips(&self) -> usize {
        self.n_trips
    }

    /// True if the timetable holds no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Within one trip, a later departure must not precede an earlier arrival.
fn check_trips_monotone(sorted: &[Connection]) -> Result<(), TimetableError> {
    use std::collections::HashMap;

    let mut last_arrival: HashMap<TripId, ServiceTime> = HashMap::new();
    for c in sorted {
        if let Some(&prev) = last_arrival.get(&c.trip) {
            if c.departs < prev {
                return Err(TimetableError::NonMonotoneTrip(c.trip));
            }
        }
        last_arrival.insert(c.trip, c.arrives);
    }
    Ok(())
}
