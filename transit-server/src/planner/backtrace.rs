//! Path reconstruction from the label graph.
//!
//! The forward scan leaves a label graph behind; reconstructing a journey
//! means walking it backwards from a terminal stop, repeatedly choosing
//! the best label that could have fed the edge just taken. The chooser is
//! the same same-trip-first comparator the forward scan uses, so the
//! reconstructed journey is consistent with how the labels were built.

use crate::domain::{Objective, ServiceTime, StopId, TripId};

use super::state::{Label, SearchState};

/// Fatal reconstruction failure.
///
/// The walk visits at most one label per stop, so exceeding the stop count
/// means the label graph contains a cycle — an engine bug, not a property
/// of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("back-trace exceeded {n_stops} stops; label graph is corrupt")]
pub struct BacktraceOverflow {
    pub n_stops: usize,
}

/// A reconstructed journey as three parallel sequences, running forward in
/// time. `times[i]` is the arrival at `stops[i]` (the departure, for the
/// origin row); `trips[i]` is the trip ridden into `stops[i]`, `None` for
/// a walking edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TracedPath {
    pub stops: Vec<StopId>,
    pub times: Vec<ServiceTime>,
    pub trips: Vec<Option<TripId>>,
}

impl TracedPath {
    /// Number of stops on the path.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// True if the path holds no stops at all.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The stop the journey ends at, if any.
    pub fn last_stop(&self) -> Option<StopId> {
        self.stops.last().copied()
    }
}

/// Reconstruct the journey ending at `end_stop`.
///
/// Returns `Ok(None)` when the stop holds no labels or the reconstruction
/// collapses to a single stop (no real journey).
pub fn trace_path(
    state: &SearchState,
    objective: Objective,
    end_stop: StopId,
) -> Result<Option<TracedPath>, BacktraceOverflow> {
    let Some(mut index) = seed_index(state.labels(end_stop)) else {
        return Ok(None);
    };

    let mut path = TracedPath::default();
    let mut stop = end_stop;
    let mut steps = 0usize;

    loop {
        let label = state.labels(stop)[index];
        path.stops.push(stop);
        path.trips.push(label.trip);
        path.times.push(label.arrives);

        match best_previous(state.labels(label.prev), label.departs, label.trip, objective) {
            Some(previous) => {
                stop = label.prev;
                index = previous;
            }
            None => {
                // No label feeds this edge: `label.prev` is an origin. The
                // origin row carries the journey's first departure.
                path.stops.push(label.prev);
                path.trips.push(label.trip);
                path.times.push(label.departs);
                break;
            }
        }

        steps += 1;
        if steps > state.n_stops() {
            return Err(BacktraceOverflow {
                n_stops: state.n_stops(),
            });
        }
    }

    path.stops.reverse();
    path.times.reverse();
    path.trips.reverse();

    // Journeys must end on a vehicle arrival, not mid-walk.
    while path.trips.last().is_some_and(Option::is_none) {
        path.stops.pop();
        path.times.pop();
        path.trips.pop();
    }

    if path.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(path))
}

/// The terminal label to start the walk from: shortest journey duration,
/// ties broken by fewer transfers.
fn seed_index(labels: &[Label]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, label) in labels.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => {
                let incumbent = &labels[b];
                label.duration() < incumbent.duration()
                    || (label.duration() == incumbent.duration()
                        && label.transfers < incumbent.transfers)
            }
        };
        if better {
            best = Some(i);
        }
    }
    best
}

/// The label at a stop that best feeds an edge departing at `departs` on
/// `trip`.
///
/// Candidates must arrive by the departure. A same-trip label is preferred
/// under exactly the rule the forward scan applies — it keeps the transfer
/// count and improves the initial departure — and a same-trip win ends the
/// search; otherwise the objective decides. Using the scan's own rule here
/// keeps the walk on the lineage that actually produced the label being
/// traced.
fn best_previous(
    labels: &[Label],
    departs: ServiceTime,
    trip: Option<TripId>,
    objective: Objective,
) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (i, label) in labels.iter().enumerate() {
        if label.arrives > departs {
            continue;
        }

        let same_trip = trip.is_some() && label.trip == trip;
        let take = match best {
            None => true,
            Some(b) => {
                let incumbent = &labels[b];
                if same_trip {
                    label.transfers <= incumbent.transfers
                        && label.initial_depart > incumbent.initial_depart
                } else {
                    objective.prefers(
                        label.initial_depart,
                        label.transfers,
                        incumbent.initial_depart,
                        incumbent.transfers,
                    )
                }
            }
        };
        if take {
            best = Some(i);
            if same_trip {
                break;
            }
        }
    }

    best
}
