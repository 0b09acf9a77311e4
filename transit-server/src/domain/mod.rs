//! Domain types for the journey engine.
//!
//! Everything here is a small validated value type: dense stop and trip
//! indices, schedule times, the elementary connection record, and the query
//! objective. Invariants are enforced at construction, so code that
//! receives these types can trust them.

mod connection;
mod id;
mod objective;
mod time;

pub use connection::Connection;
pub use id::{StopId, TripId};
pub use objective::Objective;
pub use time::{ServiceTime, TimeError};
