//! Planner configuration.

/// Configuration parameters for the journey planner.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Travel-time budget applied to travel-time queries that do not carry
    /// their own, in seconds. Journeys longer than this are pruned during
    /// the scan.
    pub default_max_traveltime_secs: u32,
}

impl PlannerConfig {
    /// Create a configuration with an explicit default budget.
    pub fn new(default_max_traveltime_secs: u32) -> Self {
        Self {
            default_max_traveltime_secs,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_max_traveltime_secs: 4 * 3600, // 4 hours
        }
    }
}
