//! The three query façades: earliest arrival, isochrone, travel times.
//!
//! Each query wires the same forward scan and back-trace together with a
//! different window, budget and result marshalling. Queries are pure:
//! they share the read-only timetable and transfer map and own all of
//! their mutable state, so a planner can serve any number of them.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::{Objective, ServiceTime, StopId};
use crate::feed::Timetable;
use crate::transfers::TransferMap;

use super::backtrace::{trace_path, BacktraceOverflow, TracedPath};
use super::config::PlannerConfig;
use super::scan::{ForwardScan, ScanWindow};

/// Error from a planner query.
///
/// An unreachable target is not an error — the earliest-arrival façade
/// returns an empty path for it. Errors are malformed queries and the
/// (fatal) back-trace overflow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// The query itself is malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The label graph was corrupt during reconstruction.
    #[error(transparent)]
    Backtrace(#[from] BacktraceOverflow),
}

/// Earliest-arrival query: the best journey from any origin to the best
/// reachable target.
#[derive(Debug, Clone)]
pub struct JourneyQuery {
    /// Stops the rider may start from.
    pub origins: Vec<StopId>,

    /// Stops the rider wants to reach.
    pub targets: Vec<StopId>,

    /// Earliest acceptable departure.
    pub start_time: ServiceTime,

    /// End of the departure window; the scan horizon derives from it.
    pub end_time: ServiceTime,

    /// Tie-breaking objective.
    pub objective: Objective,
}

/// Isochrone query: the frontier reachable within `end_time - start_time`.
#[derive(Debug, Clone)]
pub struct IsochroneQuery {
    pub origins: Vec<StopId>,
    pub start_time: ServiceTime,
    pub end_time: ServiceTime,
    pub objective: Objective,
}

/// Travel-time query: one row per stop for boardings within the window.
#[derive(Debug, Clone)]
pub struct TravelTimesQuery {
    pub origins: Vec<StopId>,

    /// Earliest allowed boarding at an origin.
    pub earliest_departure: ServiceTime,

    /// Latest allowed boarding at an origin.
    pub latest_departure: ServiceTime,

    /// Travel-time budget in seconds; the configured default applies when
    /// absent.
    pub max_traveltime_secs: Option<u32>,

    pub objective: Objective,
}

/// One row of the travel-time table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelTime {
    /// Departure at the origin that achieves this row.
    pub initial_depart: ServiceTime,

    /// Journey duration in seconds.
    pub duration_secs: u32,

    /// Boardings minus one.
    pub transfers: u32,
}

/// The journey planner: read-only schedule data plus configuration.
pub struct JourneyPlanner<'a> {
    timetable: &'a Timetable,
    transfers: &'a TransferMap,
    config: &'a PlannerConfig,
}

impl<'a> JourneyPlanner<'a> {
    /// Create a planner over a timetable and its transfer map.
    pub fn new(
        timetable: &'a Timetable,
        transfers: &'a TransferMap,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            timetable,
            transfers,
            config,
        }
    }

    /// Find the journey arriving earliest at any target.
    ///
    /// Returns an empty path when no target is reachable.
    #[instrument(skip(self, query), fields(
        origins = query.origins.len(),
        targets = query.targets.len(),
        objective = ?query.objective,
    ))]
    pub fn earliest_arrival(&self, query: &JourneyQuery) -> Result<TracedPath, PlannerError> {
        self.check_stops(&query.origins, "origin")?;
        self.check_stops(&query.targets, "target")?;
        check_window(query.start_time, query.end_time)?;

        let origin_set: HashSet<StopId> = query.origins.iter().copied().collect();
        let state = ForwardScan::new(
            self.timetable,
            self.transfers,
            &origin_set,
            query.objective,
            u32::MAX,
            false,
        )
        .run(ScanWindow::Horizon {
            start: query.start_time,
            end: query.end_time,
        });

        let best_target = query
            .targets
            .iter()
            .copied()
            .filter_map(|t| state.earliest_arrival(t).map(|at| (at, t)))
            .min()
            .map(|(_, t)| t);

        let Some(target) = best_target else {
            debug!("no target reachable");
            return Ok(TracedPath::default());
        };

        Ok(trace_path(&state, query.objective, target)?.unwrap_or_default())
    }

    /// Compute the isochrone frontier and the journey to each frontier
    /// stop.
    #[instrument(skip(self, query), fields(
        origins = query.origins.len(),
        objective = ?query.objective,
    ))]
    pub fn isochrone(&self, query: &IsochroneQuery) -> Result<Vec<TracedPath>, PlannerError> {
        self.check_stops(&query.origins, "origin")?;
        check_window(query.start_time, query.end_time)?;

        let budget = query.end_time.seconds() - query.start_time.seconds();
        let origin_set: HashSet<StopId> = query.origins.iter().copied().collect();
        let state = ForwardScan::new(
            self.timetable,
            self.transfers,
            &origin_set,
            query.objective,
            budget,
            true,
        )
        .run(ScanWindow::Horizon {
            start: query.start_time,
            end: query.end_time,
        });

        let mut paths = Vec::new();
        for stop in state.frontier_stops() {
            if origin_set.contains(&stop) {
                continue;
            }
            if let Some(path) = trace_path(&state, query.objective, stop)? {
                paths.push(path);
            }
        }

        debug!(frontier = paths.len(), "isochrone complete");
        Ok(paths)
    }

    /// Compute one `(initial departure, duration, transfers)` row per
    /// stop; `None` for stops out of reach.
    #[instrument(skip(self, query), fields(
        origins = query.origins.len(),
        objective = ?query.objective,
    ))]
    pub fn travel_times(
        &self,
        query: &TravelTimesQuery,
    ) -> Result<Vec<Option<TravelTime>>, PlannerError> {
        self.check_stops(&query.origins, "origin")?;
        check_window(query.earliest_departure, query.latest_departure)?;

        let budget = query
            .max_traveltime_secs
            .unwrap_or(self.config.default_max_traveltime_secs);
        let origin_set: HashSet<StopId> = query.origins.iter().copied().collect();
        let state = ForwardScan::new(
            self.timetable,
            self.transfers,
            &origin_set,
            query.objective,
            budget,
            false,
        )
        .run(ScanWindow::DepartureInterval {
            earliest: query.earliest_departure,
            latest: query.latest_departure,
        });

        let rows = (0..self.timetable.n_stops())
            .map(|i| {
                let stop = StopId::new(i as u32);
                let mut best: Option<TravelTime> = None;
                for label in state.labels(stop) {
                    // Walking labels never stand for a finished journey.
                    if label.is_transfer() {
                        continue;
                    }
                    let duration_secs = label.duration();
                    let update = match &best {
                        None => true,
                        Some(b) => match query.objective {
                            Objective::MinTransfers => label.transfers < b.transfers,
                            Objective::MinDuration => {
                                duration_secs < b.duration_secs
                                    || (duration_secs == b.duration_secs
                                        && label.transfers < b.transfers)
                            }
                        },
                    };
                    if update {
                        best = Some(TravelTime {
                            initial_depart: label.initial_depart,
                            duration_secs,
                            transfers: label.transfers,
                        });
                    }
                }
                best
            })
            .collect();

        Ok(rows)
    }

    fn check_stops(&self, stops: &[StopId], what: &str) -> Result<(), PlannerError> {
        if stops.is_empty() {
            return Err(PlannerError::InvalidQuery(format!("{what} set is empty")));
        }
        for stop in stops {
            if stop.index() >= self.timetable.n_stops() {
                return Err(PlannerError::InvalidQuery(format!(
                    "{what} stop {stop} out of range for {} stops",
                    self.timetable.n_stops()
                )));
            }
        }
        Ok(())
    }
}

fn check_window(start: ServiceTime, end: ServiceTime) -> Result<(), PlannerError> {
    if end < start {
        return Err(PlannerError::InvalidQuery(format!(
            "window end {end} precedes start {start}"
        )));
    }
    Ok(())
}
