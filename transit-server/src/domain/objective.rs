//! Query objectives.
//!
//! Two objectives are supported: minimise total journey duration (the
//! default) or minimise the number of transfers. They differ only in the
//! tiebreaker used when choosing between candidate predecessor labels, so
//! both the forward scan and the back-trace share this single comparator.

use serde::{Deserialize, Serialize};

use super::ServiceTime;

/// What a query optimises for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Shortest journey duration; ties broken by fewer transfers.
    #[default]
    MinDuration,

    /// Fewest transfers; ties broken by shorter duration.
    MinTransfers,
}

impl Objective {
    /// Does a candidate with `(initial, transfers)` beat the incumbent?
    ///
    /// Arrival time is fixed when two labels compete (both describe ways of
    /// catching the same departure), so a later initial departure means a
    /// shorter journey.
    pub fn prefers(
        &self,
        candidate_initial: ServiceTime,
        candidate_transfers: u32,
        incumbent_initial: ServiceTime,
        incumbent_transfers: u32,
    ) -> bool {
        match self {
            Objective::MinDuration => {
                candidate_initial > incumbent_initial
                    || (candidate_initial == incumbent_initial
                        && candidate_transfers < incumbent_transfers)
            }
            Objective::MinTransfers => {
                candidate_transfers < incumbent_transfers
                    || (candidate_transfers == incumbent_transfers
                        && candidate_initial > incumbent_initial)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(seconds: u32) -> ServiceTime {
        ServiceTime::from_seconds(seconds)
    }

    #[test]
    fn min_duration_prefers_later_departure() {
        let obj = Objective::MinDuration;

        assert!(obj.prefers(t(200), 3, t(100), 0));
        assert!(!obj.prefers(t(100), 0, t(200), 3));
    }

    #[test]
    fn min_duration_breaks_ties_by_transfers() {
        let obj = Objective::MinDuration;

        assert!(obj.prefers(t(100), 1, t(100), 2));
        assert!(!obj.prefers(t(100), 2, t(100), 1));
        assert!(!obj.prefers(t(100), 2, t(100), 2));
    }

    #[test]
    fn min_transfers_prefers_fewer_transfers() {
        let obj = Objective::MinTransfers;

        assert!(obj.prefers(t(100), 0, t(200), 1));
        assert!(!obj.prefers(t(200), 1, t(100), 0));
    }

    #[test]
    fn min_transfers_breaks_ties_by_departure() {
        let obj = Objective::MinTransfers;

        assert!(obj.prefers(t(200), 1, t(100), 1));
        assert!(!obj.prefers(t(100), 1, t(200), 1));
    }

    #[test]
    fn default_is_min_duration() {
        assert_eq!(Objective::default(), Objective::MinDuration);
    }
}
