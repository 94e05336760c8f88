//! Time helpers for the hourly slot grid.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime, Timelike};

use crate::constants::SLOT_DURATION_MINUTES;
use crate::error::{DomainError, DomainResult};

/// Start time of the slot beginning at `hour`.
pub fn slot_start(hour: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0)
}

/// End time of a slot starting at `start`.
pub fn slot_end(start: NaiveTime) -> NaiveTime {
    start + Duration::minutes(SLOT_DURATION_MINUTES)
}

/// Check that a time lies on the hourly slot grid.
pub fn is_on_hour(time: NaiveTime) -> bool {
    time.minute() == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Check that sorted times form a gapless run of hours.
///
/// `times` must already be in ascending order.
pub fn is_contiguous(times: &[NaiveTime]) -> bool {
    let Some(first) = times.first() else {
        return true;
    };
    let base = first.hour();

    times
        .iter()
        .enumerate()
        .skip(1)
        .all(|(i, t)| t.hour() == base + i as u32)
}

/// Reject empty or duplicated requests before any slot is touched.
pub fn validate_requested_times(times: &[NaiveTime]) -> DomainResult<()> {
    if times.is_empty() {
        return Err(DomainError::invalid_times("at least one start time is required"));
    }

    let mut seen = BTreeSet::new();
    for time in times {
        if !seen.insert(*time) {
            return Err(DomainError::invalid_times(format!("duplicate start time {}", time)));
        }
    }

    Ok(())
}

/// Result of comparing the offered slot times against a requested set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSetDiff {
    /// Requested but not yet offered
    pub additions: BTreeSet<NaiveTime>,
    /// Offered and still requested
    pub unchanged: BTreeSet<NaiveTime>,
    /// Offered but no longer requested
    pub removed: BTreeSet<NaiveTime>,
}

impl TimeSetDiff {
    /// Check whether applying the diff changes anything
    pub fn is_noop(&self) -> bool {
        self.additions.is_empty() && self.removed.is_empty()
    }
}

/// Diff the current slot times against the requested ones.
pub fn compare(current: &BTreeSet<NaiveTime>, requested: &BTreeSet<NaiveTime>) -> TimeSetDiff {
    TimeSetDiff {
        additions: requested.difference(current).copied().collect(),
        unchanged: current.intersection(requested).copied().collect(),
        removed: current.difference(requested).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn set(hours: &[u32]) -> BTreeSet<NaiveTime> {
        hours.iter().map(|h| t(*h)).collect()
    }

    #[test]
    fn test_slot_end_is_fifty_minutes_later() {
        assert_eq!(slot_end(t(9)), NaiveTime::from_hms_opt(9, 50, 0).unwrap());
        assert_eq!(slot_end(t(23)), NaiveTime::from_hms_opt(23, 50, 0).unwrap());
    }

    #[test]
    fn test_contiguity() {
        assert!(is_contiguous(&[t(9), t(10), t(11)]));
        assert!(is_contiguous(&[t(14)]));
        assert!(!is_contiguous(&[t(9), t(11)]));
        assert!(!is_contiguous(&[t(9), t(10), t(12)]));
    }

    #[test]
    fn test_on_hour() {
        assert!(is_on_hour(t(10)));
        assert!(!is_on_hour(NaiveTime::from_hms_opt(10, 30, 0).unwrap()));
    }

    #[test]
    fn test_validate_requested_times() {
        assert!(validate_requested_times(&[t(9), t(10)]).is_ok());
        assert!(matches!(
            validate_requested_times(&[]),
            Err(DomainError::InvalidTimeList(_))
        ));
        assert!(matches!(
            validate_requested_times(&[t(9), t(9)]),
            Err(DomainError::InvalidTimeList(_))
        ));
    }

    #[test]
    fn test_compare_partitions() {
        let current = set(&[9, 10, 11, 12]);
        let requested = set(&[11, 12, 13]);

        let diff = compare(&current, &requested);

        assert_eq!(diff.additions, set(&[13]));
        assert_eq!(diff.unchanged, set(&[11, 12]));
        assert_eq!(diff.removed, set(&[9, 10]));
    }

    #[test]
    fn test_compare_set_identities() {
        let cases = [
            (set(&[]), set(&[])),
            (set(&[9, 10]), set(&[])),
            (set(&[]), set(&[15, 16])),
            (set(&[9, 10, 11]), set(&[9, 10, 11])),
            (set(&[9, 12, 15, 20]), set(&[10, 12, 20, 23])),
        ];

        for (current, requested) in cases {
            let diff = compare(&current, &requested);

            assert!(diff.additions.is_disjoint(&diff.removed));
            let expected_unchanged: BTreeSet<_> =
                current.intersection(&requested).copied().collect();
            assert_eq!(diff.unchanged, expected_unchanged);
            let rebuilt_requested: BTreeSet<_> =
                diff.additions.union(&diff.unchanged).copied().collect();
            assert_eq!(rebuilt_requested, requested);
            let rebuilt_current: BTreeSet<_> =
                diff.removed.union(&diff.unchanged).copied().collect();
            assert_eq!(rebuilt_current, current);
        }
    }

    #[test]
    fn test_compare_identical_sets_is_noop() {
        let diff = compare(&set(&[9, 10]), &set(&[9, 10]));
        assert!(diff.is_noop());
    }
}
