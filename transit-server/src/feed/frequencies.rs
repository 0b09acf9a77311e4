//! Frequency-based trip expansion.
//!
//! Some feeds describe repeating services as a base trip plus a frequency
//! entry `(start, end, headway)` instead of materialised stop-times. The
//! engine only understands explicit connections, so frequencies are
//! expanded into cloned stop-time rows before timetable construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ServiceTime;

use super::stop_times::StopTimeRow;

/// One frequency entry: run `trip_id`'s pattern every `headway_secs`
/// seconds from `start` through `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    /// Feed identifier of the base trip.
    pub trip_id: String,

    /// First departure of the repeated service.
    pub start: ServiceTime,

    /// Last allowed departure of the repeated service.
    pub end: ServiceTime,

    /// Interval between consecutive runs, in seconds.
    pub headway_secs: u32,
}

impl Frequency {
    /// Number of cloned runs this entry produces.
    ///
    /// Runs depart at `start + k * headway` for every `k` with
    /// `k * headway <= end - start`; the end boundary is inclusive.
    pub fn replications(&self) -> u32 {
        match self.end.duration_since(self.start) {
            Some(span) if self.headway_secs > 0 => span / self.headway_secs + 1,
            _ => 0,
        }
    }
}

/// Expand frequency entries over their base stop-time rows.
///
/// Returns only the exploded rows; the caller appends them to the rows of
/// trips that are not frequency-based. Each clone gets the base trip id
/// suffixed with `suffix` and a counter chosen so that ids are unique
/// across the whole expansion.
pub fn expand_frequencies(
    stop_times: &[StopTimeRow],
    frequencies: &[Frequency],
    suffix: &str,
) -> Vec<StopTimeRow> {
    let mut seen_trip_ids: HashSet<String> = HashSet::new();
    let mut expanded = Vec::new();

    for freq in frequencies {
        let mut base: Vec<&StopTimeRow> = stop_times
            .iter()
            .filter(|row| row.trip_id == freq.trip_id)
            .collect();
        base.sort_by_key(|row| row.sequence);

        if base.is_empty() {
            warn!(trip_id = %freq.trip_id, "frequency entry has no stop times");
            continue;
        }
        if freq.headway_secs == 0 {
            warn!(trip_id = %freq.trip_id, "frequency entry has zero headway");
            continue;
        }

        for k in 0..freq.replications() {
            let shift = freq.start.seconds() + k * freq.headway_secs;

            let mut counter = k;
            let mut clone_id = format!("{}{}{}", freq.trip_id, suffix, counter);
            while seen_trip_ids.contains(&clone_id) {
                counter += 1;
                clone_id = format!("{}{}{}", freq.trip_id, suffix, counter);
            }
            seen_trip_ids.insert(clone_id.clone());

            for row in &base {
                expanded.push(StopTimeRow {
                    trip_id: clone_id.clone(),
                    stop_id: row.stop_id.clone(),
                    arrives: row.arrives.plus_seconds(shift),
                    departs: row.departs.plus_seconds(shift),
                    sequence: row.sequence,
                });
            }
        }
    }

    expanded
}
