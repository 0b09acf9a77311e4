//! Web layer for the journey engine.
//!
//! Serves the three query families over a JSON HTTP API against a dataset
//! loaded once at startup.

mod dto;
mod routes;
mod state;

pub use dto::{
    ErrorResponse, IsochroneRequest, IsochroneResponse, JourneyRequest, PathResult,
    TravelTimeResult, TravelTimesRequest, TravelTimesResponse,
};
pub use routes::create_router;
pub use state::{AppState, Dataset, DatasetError};
