//! Data transfer objects for web requests and responses.
//!
//! Times cross the wire as strings in the accepted schedule-time shapes
//! (`HH:MM:SS`, `HH:MM`, `"NN H MM M SS S"`); stops and trips as raw
//! indices. Journeys are three parallel arrays, matching the engine's
//! native output shape.

use serde::{Deserialize, Serialize};

use crate::domain::{Objective, StopId, TripId};
use crate::planner::{TracedPath, TravelTime};

/// Request for an earliest-arrival journey.
#[derive(Debug, Deserialize)]
pub struct JourneyRequest {
    /// Stops the rider may start from.
    pub origins: Vec<u32>,

    /// Stops the rider wants to reach.
    pub targets: Vec<u32>,

    /// Earliest departure, e.g. `"07:30:00"`.
    pub start_time: String,

    /// End of the departure window.
    pub end_time: String,

    /// Optimisation objective; minimum duration when absent.
    #[serde(default)]
    pub objective: Objective,
}

/// Request for an isochrone.
#[derive(Debug, Deserialize)]
pub struct IsochroneRequest {
    pub origins: Vec<u32>,

    /// Start of the travel-time budget.
    pub start_time: String,

    /// End of the budget; `end - start` is the isochrone duration.
    pub end_time: String,

    #[serde(default)]
    pub objective: Objective,
}

/// Request for one-to-all travel times.
#[derive(Debug, Deserialize)]
pub struct TravelTimesRequest {
    pub origins: Vec<u32>,

    /// Earliest allowed boarding at an origin.
    pub earliest_departure: String,

    /// Latest allowed boarding at an origin.
    pub latest_departure: String,

    /// Travel-time budget in seconds; server default when absent.
    #[serde(default)]
    pub max_traveltime_secs: Option<u32>,

    #[serde(default)]
    pub objective: Objective,
}

/// A journey as three parallel arrays. `times[i]` is the arrival at
/// `stops[i]` (the departure, for the first row); `trips[i]` is `null`
/// for a walking leg. All arrays are empty when no journey exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    pub stops: Vec<u32>,
    pub times: Vec<String>,
    pub trips: Vec<Option<u32>>,
}

impl PathResult {
    /// Convert an engine path.
    pub fn from_path(path: &TracedPath) -> Self {
        Self {
            stops: path.stops.iter().copied().map(StopId::value).collect(),
            times: path.times.iter().map(|t| t.to_string()).collect(),
            trips: path
                .trips
                .iter()
                .map(|t| t.map(TripId::value))
                .collect(),
        }
    }
}

/// Response for an isochrone query: one path per frontier stop.
#[derive(Debug, Serialize)]
pub struct IsochroneResponse {
    pub paths: Vec<PathResult>,
}

/// One row of the travel-time table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TravelTimeResult {
    pub initial_depart: String,
    pub duration_secs: u32,
    pub transfers: u32,
}

impl TravelTimeResult {
    /// Convert an engine row.
    pub fn from_travel_time(row: &TravelTime) -> Self {
        Self {
            initial_depart: row.initial_depart.to_string(),
            duration_secs: row.duration_secs,
            transfers: row.transfers,
        }
    }
}

/// Response for a travel-times query: one entry per stop, `null` where a
/// stop is out of reach.
#[derive(Debug, Serialize)]
pub struct TravelTimesResponse {
    pub rows: Vec<Option<TravelTimeResult>>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
