//! Per-event feature aggregation.

use maneuver_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, interval::EventInterval};

/// Scalar summary of the values inside an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Mean of the values
    pub mean: f64,
    /// Sample variance of the values, zero for a single value
    pub variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub interval: EventInterval,
    pub feature: Feature,
}

impl Feature {
    /// Mean and variance of `values`, `None` when empty.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        DescriptiveStats::from_slice(values).map(|stats| Self {
            mean: stats.mean,
            variance: stats.variance,
        })
    }
}

/// Computes one [`Event`] per interval over `series`, keeping the order.
///
/// # Errors
///
/// [`Error::InvalidRange`] if an interval is empty or reaches past the end
/// of `series`.
///
/// # Example
///
/// ```
/// use maneuver_events::{aggregate::aggregate_events, interval::IndexInterval};
///
/// let series = [1.0, 3.0, 10.0];
/// let events =
///     aggregate_events(&[IndexInterval::new(0, 2), IndexInterval::new(2, 3)], &series).unwrap();
/// assert_eq!(events[0].feature.mean, 2.0);
/// assert_eq!(events[1].feature.variance, 0.0);
/// ```
pub fn aggregate_events(intervals: &[EventInterval], series: &[f64]) -> Result<Vec<Event>> {
    intervals
        .iter()
        .map(|&interval| {
            if interval.end > series.len() {
                return Err(Error::invalid_range(format!(
                    "event interval {interval} exceeds series of {} samples",
                    series.len()
                )));
            }
            if interval.is_empty() {
                return Err(Error::invalid_range(format!(
                    "event interval {interval} is empty"
                )));
            }
            let values = &series[interval.as_range()];
            let feature = Feature::from_values(values).ok_or_else(|| {
                Error::invalid_range(format!("event interval {interval} is empty"))
            })?;
            Ok(Event { interval, feature })
        })
        .collect()
}
