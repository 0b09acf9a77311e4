//! Stop-time rows and their conversion into connections.
//!
//! A feed describes trips as ordered stop-time rows; the engine wants
//! connections. Each adjacent pair of rows belonging to one trip becomes a
//! single connection, departing at the earlier row's departure time and
//! arriving at the later row's arrival time.

use serde::{Deserialize, Serialize};

use crate::domain::{Connection, ServiceTime, StopId, TripId};

use super::ids::IdRegistry;
use super::timetable::{Timetable, TimetableError};

/// One row of the feed's stop-times table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTimeRow {
    /// Feed identifier of the trip this row belongs to.
    pub trip_id: String,

    /// Feed identifier of the stop.
    pub stop_id: String,

    /// Arrival time at the stop.
    pub arrives: ServiceTime,

    /// Departure time from the stop.
    pub departs: ServiceTime,

    /// Position of the stop within the trip.
    pub sequence: u32,
}

/// Identifier registries produced while building a timetable from rows.
#[derive(Debug, Default)]
pub struct FeedRegistries {
    /// Stop string id to dense index.
    pub stops: IdRegistry,

    /// Trip string id to dense index.
    pub trips: IdRegistry,
}

/// Build a timetable from stop-time rows.
///
/// Rows are grouped by trip and ordered by `sequence` first, so input
/// order does not matter. String identifiers are interned into dense
/// indices; the registries are returned alongside the timetable so results
/// can be mapped back to feed identifiers.
pub fn build_timetable(
    rows: &[StopTimeRow],
) -> Result<(Timetable, FeedRegistries), TimetableError> {
    let mut ordered: Vec<&StopTimeRow> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        a.trip_id
            .cmp(&b.trip_id)
            .then_with(|| a.sequence.cmp(&b.sequence))
    });

    let mut registries = FeedRegistries::default();
    let mut connections = Vec::new();

    for pair in ordered.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.trip_id != next.trip_id {
            continue;
        }
        let from = registries.stops.intern(&prev.stop_id);
        let to = registries.stops.intern(&next.stop_id);
        let trip = registries.trips.intern(&prev.trip_id);
        connections.push(Connection {
            from: StopId::new(from),
            to: StopId::new(to),
            departs: prev.departs,
            arrives: next.arrives,
            trip: TripId::new(trip),
        });
    }

    // Trips with a single row produce no connections, but their stops still
    // deserve indices so transfers can reference them.
    for row in rows {
        registries.stops.intern(&row.stop_id);
    }

    let n_stops = registries.stops.len();
    let timetable = Timetable::new(n_stops, connections)?;
    Ok((timetable, registries))
}
