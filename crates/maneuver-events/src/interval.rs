//! Index intervals and the event interval builder
//!
//! Violations and event intervals are both half-open ranges of sample
//! indices. The builder turns the sparse, sorted violation list produced by
//! the [detector](crate::detector) into a gap-free partition of the whole
//! analysed domain:
//!
//! ```text
//! domain      [0 ............................................ 12)
//! violations           [3, 5)               [8, 9)
//! intervals   [0, 3)   [3, 5)   [5, 8)      [8, 9)   [9, 12)
//! ```

use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Half-open interval `[start, end)` of sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexInterval {
    pub start: usize,
    pub end: usize,
}

/// Index range where the signal breached its control limits at every index.
pub type Violation = IndexInterval;

/// One element of the partition of the analysed domain.
pub type EventInterval = IndexInterval;

impl IndexInterval {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for IndexInterval {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for IndexInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Partitions `domain` into event intervals bounded by `violations`.
///
/// Each violation becomes an interval of its own, and every non-empty
/// stretch before, between or after violations becomes another. No
/// violation yields a single interval spanning the domain; an empty domain
/// yields no intervals.
///
/// # Errors
///
/// [`Error::InvalidRange`] if a violation is empty, falls outside the
/// domain, or the violations are not sorted and non-overlapping.
///
/// # Example
///
/// ```
/// use maneuver_events::interval::{IndexInterval, build_event_intervals};
///
/// let intervals =
///     build_event_intervals(IndexInterval::new(0, 6), &[IndexInterval::new(0, 2)]).unwrap();
/// assert_eq!(intervals, vec![IndexInterval::new(0, 2), IndexInterval::new(2, 6)]);
/// ```
pub fn build_event_intervals(
    domain: IndexInterval,
    violations: &[Violation],
) -> Result<Vec<EventInterval>> {
    if domain.end < domain.start {
        return Err(Error::invalid_range(format!("domain {domain} is reversed")));
    }

    let mut intervals = Vec::with_capacity(2 * violations.len() + 1);
    let mut cursor = domain.start;
    for violation in violations {
        if violation.is_empty() {
            return Err(Error::invalid_range(format!(
                "violation {violation} is empty"
            )));
        }
        if violation.start < domain.start || violation.end > domain.end {
            return Err(Error::invalid_range(format!(
                "violation {violation} lies outside domain {domain}"
            )));
        }
        if violation.start < cursor {
            return Err(Error::invalid_range(format!(
                "violation {violation} overlaps or precedes index {cursor}"
            )));
        }
        if cursor < violation.start {
            intervals.push(IndexInterval::new(cursor, violation.start));
        }
        intervals.push(*violation);
        cursor = violation.end;
    }
    if cursor < domain.end {
        intervals.push(IndexInterval::new(cursor, domain.end));
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: usize, end: usize) -> IndexInterval {
        IndexInterval::new(start, end)
    }

    fn assert_partition(domain: IndexInterval, intervals: &[EventInterval]) {
        assert_eq!(intervals.first().unwrap().start, domain.start);
        assert_eq!(intervals.last().unwrap().end, domain.end);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(intervals.iter().all(|i| !i.is_empty()));
    }

    #[test]
    fn test_no_violations_spans_domain() {
        let intervals = build_event_intervals(iv(0, 10), &[]).unwrap();
        assert_eq!(intervals, vec![iv(0, 10)]);
    }

    #[test]
    fn test_empty_domain() {
        assert!(build_event_intervals(iv(0, 0), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_violations_in_the_middle() {
        let domain = iv(0, 12);
        let intervals = build_event_intervals(domain, &[iv(3, 5), iv(8, 9)]).unwrap();
        assert_eq!(intervals, vec![iv(0, 3), iv(3, 5), iv(5, 8), iv(8, 9), iv(9, 12)]);
        assert_partition(domain, &intervals);
    }

    #[test]
    fn test_violations_touching_bounds() {
        let domain = iv(0, 6);
        let intervals = build_event_intervals(domain, &[iv(0, 1), iv(5, 6)]).unwrap();
        assert_eq!(intervals, vec![iv(0, 1), iv(1, 5), iv(5, 6)]);
        assert_partition(domain, &intervals);
    }

    #[test]
    fn test_adjacent_violations() {
        let intervals = build_event_intervals(iv(0, 4), &[iv(1, 2), iv(2, 3)]).unwrap();
        assert_eq!(intervals, vec![iv(0, 1), iv(1, 2), iv(2, 3), iv(3, 4)]);
    }

    #[test]
    fn test_non_zero_domain_start() {
        let domain = iv(5, 9);
        let intervals = build_event_intervals(domain, &[iv(6, 7)]).unwrap();
        assert_eq!(intervals, vec![iv(5, 6), iv(6, 7), iv(7, 9)]);
    }

    #[test]
    fn test_rejects_malformed_violations() {
        let domain = iv(0, 10);
        for violations in [
            vec![iv(8, 11)],
            vec![iv(4, 4)],
            vec![iv(5, 7), iv(2, 3)],
            vec![iv(2, 5), iv(4, 6)],
        ] {
            assert!(
                matches!(
                    build_event_intervals(domain, &violations),
                    Err(Error::InvalidRange { .. })
                ),
                "{violations:?}"
            );
        }
        assert!(build_event_intervals(iv(3, 4), &[iv(1, 2)]).is_err());
    }

    #[test]
    fn test_display_and_contains() {
        let interval = IndexInterval::from(2..5);
        assert_eq!(interval.to_string(), "[2, 5)");
        assert_eq!(interval.len(), 3);
        assert!(interval.contains(2));
        assert!(!interval.contains(5));
    }
}
