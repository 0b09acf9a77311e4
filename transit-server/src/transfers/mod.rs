//! Walking transfers between stops.
//!
//! Transfers are pedestrian edges joining nearby stops. They either come
//! straight from the feed's transfer table or are generated from stop
//! coordinates with a radius search. Self-loops are dropped at build time;
//! the engine never walks from a stop to itself.

use serde::{Deserialize, Serialize};

use crate::domain::StopId;

/// Error raised when transfer input is rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transfer references stop id {stop} out of range for {n_stops} stops")]
pub struct TransferOutOfRange {
    pub stop: u32,
    pub n_stops: usize,
}

/// One row of a transfer table: walk from one stop to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRow {
    pub from: u32,
    pub to: u32,
    pub walk_secs: u32,
}

/// Per-stop lookup of walking edges.
#[derive(Debug, Clone)]
pub struct TransferMap {
    by_stop: Vec<Vec<(StopId, u32)>>,
}

impl TransferMap {
    /// Create an empty map covering `n_stops` stops.
    pub fn new(n_stops: usize) -> Self {
        Self {
            by_stop: vec![Vec::new(); n_stops],
        }
    }

    /// Build from transfer rows. Rows with `from == to` are ignored.
    pub fn from_rows(n_stops: usize, rows: &[TransferRow]) -> Result<Self, TransferOutOfRange> {
        let mut map = Self::new(n_stops);
        for row in rows {
            for stop in [row.from, row.to] {
                if stop as usize >= n_stops {
                    return Err(TransferOutOfRange { stop, n_stops });
                }
            }
            map.add(StopId::new(row.from), StopId::new(row.to), row.walk_secs);
        }
        Ok(map)
    }

    /// Add a walking edge. Self-loops are ignored.
    pub fn add(&mut self, from: StopId, to: StopId, walk_secs: u32) {
        if from == to {
            return;
        }
        self.by_stop[from.index()].push((to, walk_secs));
    }

    /// All stops walkable from `stop`, with walk durations in seconds.
    pub fn walkable_from(&self, stop: StopId) -> &[(StopId, u32)] {
        &self.by_stop[stop.index()]
    }

    /// Total number of directed walking edges.
    pub fn len(&self) -> usize {
        self.by_stop.iter().map(Vec::len).sum()
    }

    /// True if no stop has any walking edge.
    pub fn is_empty(&self) -> bool {
        self.by_stop.iter().all(Vec::is_empty)
    }
}

/// A stop position for transfer generation, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Mean earth radius in metres, for haversine distances.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Generate transfers between all stop pairs within `radius_m` metres.
///
/// A plain O(n²) neighbour search: fine for feeds up to a few tens of
/// thousands of stops, which covers the intended use. Walk time is the
/// haversine distance at `walk_speed_mps`, rounded up, emitted in both
/// directions.
pub fn transfers_within_radius(
    stops: &[StopLocation],
    radius_m: f64,
    walk_speed_mps: f64,
) -> TransferMap {
    let mut map = TransferMap::new(stops.len());

    for (i, a) in stops.iter().enumerate() {
        for (j, b) in stops.iter().enumerate().skip(i + 1) {
            let dist = haversine_m(a, b);
            if dist <= radius_m {
                let walk_secs = (dist / walk_speed_mps).ceil() as u32;
                map.add(StopId::new(i as u32), StopId::new(j as u32), walk_secs);
                map.add(StopId::new(j as u32), StopId::new(i as u32), walk_secs);
            }
        }
    }

    map
}

/// Great-circle distance between two positions, in metres.
fn haversine_m(a: &StopLocation, b: &StopLocation) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
