//! Feed ingestion.
//!
//! Everything that turns feed tables into the engine's dense, validated
//! structures lives here: identifier interning, stop-time pairing,
//! frequency expansion, and the timetable store itself. Past this module
//! all identifiers are integers and all invariants hold.

pub mod frequencies;
pub mod ids;
pub mod stop_times;
pub mod timetable;

pub use frequencies::{expand_frequencies, Frequency};
pub use ids::IdRegistry;
pub use stop_times::{build_timetable, FeedRegistries, StopTimeRow};
pub use timetable::{Timetable, TimetableError};
