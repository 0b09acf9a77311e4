//! Journey engine for static transit schedules.
//!
//! Given a timetable of connections and a table of walking transfers, the
//! engine answers three query families: earliest-arrival journeys between
//! stop sets, isochrones (the frontier reachable within a travel-time
//! budget, with the journey to each frontier stop), and one-to-all travel
//! times. All three run the same forward connection scan with multi-label
//! path reconstruction.

pub mod domain;
pub mod feed;
pub mod planner;
pub mod transfers;
pub mod web;
