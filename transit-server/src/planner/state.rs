//! Per-query search state.
//!
//! The forward scan records every useful way of reaching a stop as a
//! [`Label`]. Labels are never rewritten once pushed; the back-trace walks
//! over exactly what the scan appended. All of this is query-local and
//! dropped when the query returns — the timetable and transfer map stay
//! untouched.

use crate::domain::{ServiceTime, StopId, TripId};

/// One way a stop was reached.
///
/// Vehicle labels carry `trip: Some(..)`; walking labels carry `None`
/// (walking edges have no trip to continue on). `initial_depart` is the
/// departure at the origin that seeds this path, so
/// `arrives - initial_depart` is the journey duration this label
/// represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// The stop this path came from.
    pub prev: StopId,

    /// Departure time of the edge that produced this label.
    pub departs: ServiceTime,

    /// Arrival time at the labelled stop.
    pub arrives: ServiceTime,

    /// Vehicle trip ridden, or `None` for a walking edge.
    pub trip: Option<TripId>,

    /// Boardings minus one along this path.
    pub transfers: u32,

    /// Departure time at the origin stop seeding this path.
    pub initial_depart: ServiceTime,
}

impl Label {
    /// True if this label was produced by walking.
    pub fn is_transfer(&self) -> bool {
        self.trip.is_none()
    }

    /// Journey duration this label represents, in seconds.
    pub fn duration(&self) -> u32 {
        self.arrives.seconds() - self.initial_depart.seconds()
    }
}

/// Mutable state of one query: label vectors, earliest arrivals, and the
/// isochrone frontier flags.
#[derive(Debug)]
pub struct SearchState {
    labels: Vec<Vec<Label>>,
    earliest_arrival: Vec<Option<ServiceTime>>,
    frontier: Vec<bool>,
}

impl SearchState {
    /// Fresh state covering `n_stops` stops.
    pub fn new(n_stops: usize) -> Self {
        Self {
            labels: vec![Vec::new(); n_stops],
            earliest_arrival: vec![None; n_stops],
            frontier: vec![false; n_stops],
        }
    }

    /// Number of stops this state covers.
    pub fn n_stops(&self) -> usize {
        self.labels.len()
    }

    /// The labels recorded at `stop`, in creation order.
    pub fn labels(&self, stop: StopId) -> &[Label] {
        &self.labels[stop.index()]
    }

    /// Append a label, keeping `earliest_arrival` in sync.
    pub fn push(&mut self, stop: StopId, label: Label) {
        self.note_reached(stop, label.arrives);
        self.labels[stop.index()].push(label);
    }

    /// Earliest time any label arrives at `stop`, if reached.
    pub fn earliest_arrival(&self, stop: StopId) -> Option<ServiceTime> {
        self.earliest_arrival[stop.index()]
    }

    /// Record that `stop` is reachable by `at`, keeping the minimum.
    ///
    /// Used directly for origin stops, which carry no labels but must
    /// still gate transfer budgets and connection admission.
    pub fn note_reached(&mut self, stop: StopId, at: ServiceTime) {
        let slot = &mut self.earliest_arrival[stop.index()];
        *slot = Some(match *slot {
            Some(prev) if prev <= at => prev,
            _ => at,
        });
    }

    /// True if some label at `from` stepped there from `to`.
    ///
    /// Guards the scan against immediate back-and-forth: a connection
    /// `from -> to` is useless if `to` is already a predecessor of `from`.
    pub fn came_from(&self, from: StopId, to: StopId) -> bool {
        self.labels[from.index()].iter().any(|l| l.prev == to)
    }

    /// Flag `stop` as sitting on the isochrone boundary.
    pub fn mark_frontier(&mut self, stop: StopId) {
        self.frontier[stop.index()] = true;
    }

    /// Clear the boundary flag for `stop`.
    pub fn clear_frontier(&mut self, stop: StopId) {
        self.frontier[stop.index()] = false;
    }

    /// Stops currently flagged as boundary stops, in index order.
    pub fn frontier_stops(&self) -> Vec<StopId> {
        self.frontier
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| StopId::new(i as u32))
            .collect()
    }
}
