//! The journey engine.
//!
//! A single forward pass over the departure-ordered timetable builds a
//! label graph ([`scan`], [`state`]); walking that graph backwards
//! reconstructs journeys ([`backtrace`]); three query façades wire the two
//! together ([`queries`]). The engine is synchronous and single-threaded
//! per query — the scan is a sequential fold over a time-sorted stream —
//! but the timetable and transfer map are read-only and can back any
//! number of concurrent queries.

pub mod backtrace;
pub mod config;
pub mod queries;
pub mod scan;
pub mod state;

pub use backtrace::{trace_path, BacktraceOverflow, TracedPath};
pub use config::PlannerConfig;
pub use queries::{
    IsochroneQuery, JourneyPlanner, JourneyQuery, PlannerError, TravelTime, TravelTimesQuery,
};
pub use scan::{ForwardScan, ScanWindow};
pub use state::{Label, SearchState};
