//! The forward connection scan.
//!
//! One linear pass over the departure-ordered timetable. For every admitted
//! connection the scan picks the best existing label at the departure stop,
//! appends a new label at the arrival stop, and expands walking transfers
//! from the arrival. Order matters: because connections are consumed in
//! departure order, every label a connection could descend from already
//! exists when it is scanned — which is also why the pass is inherently
//! sequential.

use std::collections::HashSet;

use crate::domain::{Connection, Objective, ServiceTime, StopId};
use crate::feed::Timetable;
use crate::transfers::TransferMap;

use super::state::{Label, SearchState};

/// Departure window of one scan.
#[derive(Debug, Clone, Copy)]
pub enum ScanWindow {
    /// Earliest-arrival and isochrone queries: scan departures from
    /// `start` up to a horizon of twice the window length past the first
    /// origin departure, which leaves room for transfers at the boundary.
    Horizon { start: ServiceTime, end: ServiceTime },

    /// Travel-time queries: origins may only be boarded between `earliest`
    /// and `latest`; the scan itself runs to the end of the timetable.
    DepartureInterval {
        earliest: ServiceTime,
        latest: ServiceTime,
    },
}

/// One forward pass, configured for a query.
pub struct ForwardScan<'a> {
    timetable: &'a Timetable,
    transfers: &'a TransferMap,
    origins: &'a HashSet<StopId>,
    objective: Objective,
    max_traveltime: u32,
    track_frontier: bool,
}

/// The chosen predecessor for a label about to be created.
struct Predecessor {
    initial: ServiceTime,
    transfers: u32,
    same_trip: bool,
    via_transfer: bool,
}

impl<'a> ForwardScan<'a> {
    pub fn new(
        timetable: &'a Timetable,
        transfers: &'a TransferMap,
        origins: &'a HashSet<StopId>,
        objective: Objective,
        max_traveltime: u32,
        track_frontier: bool,
    ) -> Self {
        Self {
            timetable,
            transfers,
            origins,
            objective,
            max_traveltime,
            track_frontier,
        }
    }

    /// Run the pass and return the populated search state.
    pub fn run(&self, window: ScanWindow) -> SearchState {
        let mut state = SearchState::new(self.timetable.n_stops());

        let (scan_from, board_until, scan_until) = match window {
            ScanWindow::Horizon { start, end } => {
                // No departure from any origin within the window means
                // nothing is reachable at all.
                let Some(horizon) = self.horizon(start, end) else {
                    return state;
                };
                (start, None, Some(horizon))
            }
            ScanWindow::DepartureInterval { earliest, latest } => (earliest, Some(latest), None),
        };

        for conn in self.timetable.connections() {
            if conn.departs < scan_from {
                continue;
            }
            if scan_until.is_some_and(|h| conn.departs > h) {
                break;
            }

            // Connections into an origin are useless: origins are already
            // reached before anything departs, and labels there would
            // corrupt the origin seeding.
            if self.origins.contains(&conn.to) {
                continue;
            }

            let is_origin_departure = self.origins.contains(&conn.from);
            if is_origin_departure {
                if board_until.is_some_and(|latest| conn.departs > latest) {
                    continue;
                }
            } else {
                match state.earliest_arrival(conn.from) {
                    Some(reached) if reached <= conn.departs => {}
                    _ => continue, // unreached by departure time
                }
                // Suppress immediate back-and-forth: riding back to a stop
                // this path just came from cannot improve anything.
                if state.came_from(conn.from, conn.to) {
                    continue;
                }
            }

            if self.relax(&mut state, conn, is_origin_departure) {
                self.expand_transfers(&mut state, conn);
            }
        }

        state
    }

    /// The scan cut-off for window queries: twice the window length past
    /// the first departure from any origin at or after `start`.
    fn horizon(&self, start: ServiceTime, end: ServiceTime) -> Option<ServiceTime> {
        let first = self
            .timetable
            .connections()
            .iter()
            .find(|c| c.departs >= start && self.origins.contains(&c.from))?;
        let window = end.seconds().saturating_sub(start.seconds());
        Some(first.departs.plus_seconds(window.saturating_mul(2)))
    }

    /// Try to create a label at `conn.to`. Returns whether one was created.
    fn relax(&self, state: &mut SearchState, conn: &Connection, is_origin_departure: bool) -> bool {
        let predecessor = if is_origin_departure {
            // Boarding at an origin seeds a fresh path: the journey clock
            // starts at this departure.
            Some(Predecessor {
                initial: conn.departs,
                transfers: 0,
                same_trip: false,
                via_transfer: false,
            })
        } else {
            self.select_predecessor(state, conn)
        };

        let Some(predecessor) = predecessor else {
            return false;
        };

        // Staying on the same trip or continuing off a walking label is not
        // a new boarding; switching vehicles at the stop is.
        let transfers = if is_origin_departure || predecessor.same_trip || predecessor.via_transfer
        {
            predecessor.transfers
        } else {
            predecessor.transfers + 1
        };

        if is_origin_departure {
            state.note_reached(conn.from, conn.departs);
        }
        state.push(
            conn.to,
            Label {
                prev: conn.from,
                departs: conn.departs,
                arrives: conn.arrives,
                trip: Some(conn.trip),
                transfers,
                initial_depart: predecessor.initial,
            },
        );
        true
    }

    /// Pick the best label at `conn.from` to descend from, and maintain
    /// the isochrone frontier flags as a side effect.
    ///
    /// A label is viable if it arrives before the connection departs and
    /// the resulting journey stays within the travel-time budget. Among
    /// viable labels, one on the same trip is preferred whenever it keeps
    /// the transfer count and improves the initial departure (so
    /// through-running is never penalised), and a same-trip win ends the
    /// search; otherwise the active objective decides.
    fn select_predecessor(
        &self,
        state: &mut SearchState,
        conn: &Connection,
    ) -> Option<Predecessor> {
        let mut best: Option<Predecessor> = None;
        let mut reachable_within_budget = false;
        let mut boundary = false;

        for label in state.labels(conn.from) {
            let within_budget = conn
                .arrives
                .seconds()
                .saturating_sub(label.initial_depart.seconds())
                <= self.max_traveltime;
            let reachable = label.arrives <= conn.departs;

            if reachable && within_budget {
                reachable_within_budget = true;

                let same_trip = label.trip == Some(conn.trip);
                let take = match &best {
                    None => true,
                    Some(b) if same_trip => {
                        label.transfers <= b.transfers && label.initial_depart > b.initial
                    }
                    Some(b) => self.objective.prefers(
                        label.initial_depart,
                        label.transfers,
                        b.initial,
                        b.transfers,
                    ),
                };
                if take {
                    best = Some(Predecessor {
                        initial: label.initial_depart,
                        transfers: label.transfers,
                        same_trip,
                        via_transfer: label.is_transfer(),
                    });
                    // Only a same-trip label that actually won ends the
                    // search; a disqualified one must not hide later
                    // labels the objective would prefer.
                    if same_trip {
                        break;
                    }
                }
            } else if self.track_frontier && !reachable_within_budget {
                // The stop is reached and this departure is still inside
                // the budget, but the ride would overshoot it: a boundary
                // candidate unless some other label fills within budget.
                boundary = boundary
                    || conn
                        .departs
                        .seconds()
                        .saturating_sub(label.initial_depart.seconds())
                        <= self.max_traveltime;
            }
        }

        if self.track_frontier {
            if boundary && !reachable_within_budget {
                state.mark_frontier(conn.from);
            } else {
                state.clear_frontier(conn.from);
                state.clear_frontier(conn.to);
            }
        }

        best
    }

    /// Emit walking labels out of `conn.to` after a vehicle arrival.
    ///
    /// Transfers never cascade: they are only produced here, directly off a
    /// vehicle arrival, never off another walking label's arrival. Walking
    /// back to the stop the vehicle came from and walking into origins are
    /// both pointless and skipped.
    fn expand_transfers(&self, state: &mut SearchState, conn: &Connection) {
        for &(dest, walk_secs) in self.transfers.walkable_from(conn.to) {
            if dest == conn.from || self.origins.contains(&dest) {
                continue;
            }
            let walk_arrives = conn.arrives.plus_seconds(walk_secs);

            let mut best: Option<(ServiceTime, u32)> = None;
            for label in state.labels(conn.to) {
                if label.arrives > conn.arrives {
                    continue;
                }
                if walk_arrives
                    .seconds()
                    .saturating_sub(label.initial_depart.seconds())
                    > self.max_traveltime
                {
                    continue;
                }
                let take = match best {
                    None => true,
                    Some((initial, transfers)) => self.objective.prefers(
                        label.initial_depart,
                        label.transfers,
                        initial,
                        transfers,
                    ),
                };
                if take {
                    best = Some((label.initial_depart, label.transfers));
                }
            }

            let Some((initial, transfers)) = best else {
                continue;
            };

            state.push(
                dest,
                Label {
                    prev: conn.to,
                    departs: conn.arrives,
                    arrives: walk_arrives,
                    trip: None,
                    transfers: transfers + 1,
                    initial_depart: initial,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripId;

    fn conn(from: u32, to: u32, departs: u32, arrives: u32, trip: u32) -> Connection {
        Connection {
            from: StopId::new(from),
            to: StopId::new(to),
            departs: ServiceTime::from_seconds(departs),
            arrives: ServiceTime::from_seconds(arrives),
            trip: TripId::new(trip),
        }
    }

    fn timetable(n_stops: usize, connections: Vec<Connection>) -> Timetable {
        Timetable::new(n_stops, connections).unwrap()
    }

    fn origins(stops: &[u32]) -> HashSet<StopId> {
        stops.iter().copied().map(StopId::new).collect()
    }

    fn scan_all(
        tt: &Timetable,
        transfers: &TransferMap,
        origin_set: &HashSet<StopId>,
    ) -> SearchState {
        ForwardScan::new(
            tt,
            transfers,
            origin_set,
            Objective::MinDuration,
            u32::MAX,
            false,
        )
        .run(ScanWindow::Horizon {
            start: ServiceTime::MIDNIGHT,
            end: ServiceTime::from_seconds(1_000_000),
        })
    }

    #[test]
    fn origin_departure_seeds_a_label() {
        let tt = timetable(3, vec![conn(0, 1, 100, 200, 0)]);
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        let labels = state.labels(StopId::new(1));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].initial_depart.seconds(), 100);
        assert_eq!(labels[0].transfers, 0);
        assert_eq!(labels[0].trip, Some(TripId::new(0)));
        assert!(state.labels(StopId::new(0)).is_empty());
    }

    #[test]
    fn unreached_departure_stop_is_skipped() {
        // Nothing reaches stop 1 before its connection departs.
        let tt = timetable(
            3,
            vec![conn(1, 2, 100, 200, 0), conn(0, 1, 300, 400, 1)],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert!(state.labels(StopId::new(2)).is_empty());
        assert_eq!(state.labels(StopId::new(1)).len(), 1);
    }

    #[test]
    fn same_trip_rides_through_without_counting_a_transfer() {
        let tt = timetable(
            3,
            vec![conn(0, 1, 100, 200, 7), conn(1, 2, 210, 300, 7)],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        let at_two = state.labels(StopId::new(2));
        assert_eq!(at_two.len(), 1);
        assert_eq!(at_two[0].transfers, 0);
        assert_eq!(at_two[0].initial_depart.seconds(), 100);
    }

    #[test]
    fn disqualified_same_trip_does_not_stop_the_search() {
        // Stop 1 collects, in push order: a plain label off trip 1, a
        // same-trip label off trip 9 carrying an extra transfer, and a
        // later-departing label off trip 4 that the objective prefers.
        // Relaxing trip 9's next hop must not let the losing same-trip
        // label cut the search short of the trip-4 label.
        let tt = timetable(
            4,
            vec![
                conn(0, 3, 0, 10, 2),
                conn(0, 1, 5, 15, 1),
                conn(3, 1, 20, 30, 9),
                conn(0, 1, 40, 50, 4),
                conn(1, 2, 60, 70, 9),
            ],
        );
        let transfers = TransferMap::new(4);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        let at_two = state.labels(StopId::new(2));
        assert_eq!(at_two.len(), 1);
        assert_eq!(at_two[0].initial_depart.seconds(), 40);
        assert_eq!(at_two[0].transfers, 1);
    }

    #[test]
    fn switching_vehicles_counts_a_transfer() {
        let tt = timetable(
            3,
            vec![conn(0, 1, 100, 200, 7), conn(1, 2, 210, 300, 8)],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert_eq!(state.labels(StopId::new(2))[0].transfers, 1);
    }

    #[test]
    fn walking_label_is_emitted_after_vehicle_arrival() {
        let tt = timetable(3, vec![conn(0, 1, 100, 200, 0)]);
        let mut transfers = TransferMap::new(3);
        transfers.add(StopId::new(1), StopId::new(2), 60);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        let at_two = state.labels(StopId::new(2));
        assert_eq!(at_two.len(), 1);
        assert!(at_two[0].is_transfer());
        assert_eq!(at_two[0].departs.seconds(), 200);
        assert_eq!(at_two[0].arrives.seconds(), 260);
        assert_eq!(at_two[0].transfers, 1);
        assert_eq!(at_two[0].initial_depart.seconds(), 100);
    }

    #[test]
    fn transfers_are_never_walked_into_origins() {
        let tt = timetable(3, vec![conn(0, 1, 100, 200, 0)]);
        let mut transfers = TransferMap::new(3);
        transfers.add(StopId::new(1), StopId::new(2), 60);
        let origin_set = origins(&[0, 2]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert!(state.labels(StopId::new(2)).is_empty());
    }

    #[test]
    fn walking_back_to_the_previous_stop_is_suppressed() {
        let tt = timetable(2, vec![conn(0, 1, 100, 200, 0)]);
        let mut transfers = TransferMap::new(2);
        transfers.add(StopId::new(1), StopId::new(0), 30);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert!(state.labels(StopId::new(0)).is_empty());
    }

    #[test]
    fn riding_straight_back_is_suppressed() {
        // 1 -> 2 -> 1 ping-pong: the label at 2 remembers it came from 1,
        // so the return connection 2 -> 1 is skipped outright.
        let tt = timetable(
            3,
            vec![
                conn(0, 1, 100, 200, 0),
                conn(1, 2, 300, 400, 1),
                conn(2, 1, 500, 600, 2),
            ],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert_eq!(state.labels(StopId::new(1)).len(), 1);
        assert_eq!(state.labels(StopId::new(2)).len(), 1);
    }

    #[test]
    fn departure_interval_gates_origin_boardings_only() {
        let tt = timetable(
            3,
            vec![
                conn(0, 1, 100, 200, 0),
                conn(0, 1, 600, 700, 1), // past the boarding window
                conn(1, 2, 800, 900, 2), // mid-journey, still admitted
            ],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = ForwardScan::new(
            &tt,
            &transfers,
            &origin_set,
            Objective::MinDuration,
            u32::MAX,
            false,
        )
        .run(ScanWindow::DepartureInterval {
            earliest: ServiceTime::from_seconds(0),
            latest: ServiceTime::from_seconds(300),
        });

        assert_eq!(state.labels(StopId::new(1)).len(), 1);
        assert_eq!(state.labels(StopId::new(2)).len(), 1);
        assert_eq!(state.labels(StopId::new(2))[0].initial_depart.seconds(), 100);
    }

    #[test]
    fn budget_prunes_overlong_journeys() {
        let tt = timetable(
            3,
            vec![conn(0, 1, 0, 300, 0), conn(1, 2, 400, 2000, 1)],
        );
        let transfers = TransferMap::new(3);
        let origin_set = origins(&[0]);

        let state = ForwardScan::new(
            &tt,
            &transfers,
            &origin_set,
            Objective::MinDuration,
            900,
            false,
        )
        .run(ScanWindow::Horizon {
            start: ServiceTime::MIDNIGHT,
            end: ServiceTime::from_seconds(900),
        });

        assert_eq!(state.labels(StopId::new(1)).len(), 1);
        assert!(state.labels(StopId::new(2)).is_empty());
    }

    #[test]
    fn frontier_marks_the_last_stop_within_budget() {
        // Scenario: reachable chain 0 -> 1 -> 2, then a ride from 2 that
        // overshoots the budget. Stop 2 is the boundary.
        let tt = timetable(
            4,
            vec![
                conn(0, 1, 0, 300, 0),
                conn(1, 2, 360, 720, 0),
                conn(2, 3, 780, 1800, 0),
            ],
        );
        let transfers = TransferMap::new(4);
        let origin_set = origins(&[0]);

        let state = ForwardScan::new(
            &tt,
            &transfers,
            &origin_set,
            Objective::MinDuration,
            900,
            true,
        )
        .run(ScanWindow::Horizon {
            start: ServiceTime::MIDNIGHT,
            end: ServiceTime::from_seconds(900),
        });

        assert_eq!(state.frontier_stops(), vec![StopId::new(2)]);
    }

    #[test]
    fn no_origin_departure_means_empty_state() {
        let tt = timetable(2, vec![conn(0, 1, 100, 200, 0)]);
        let transfers = TransferMap::new(2);
        let origin_set = origins(&[1]);

        let state = scan_all(&tt, &transfers, &origin_set);

        assert!(state.labels(StopId::new(0)).is_empty());
        assert!(state.labels(StopId::new(1)).is_empty());
    }
}
