//! Secondary signals derived from a (possibly smoothed) signal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, signal::Signal};

/// Derives the series the event detector runs on.
pub trait FeatureExtractor: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn compute_feature(&self, signal: &Signal) -> Result<Signal>;
}

pub type BoxedFeatureExtractor = Box<dyn FeatureExtractor>;

/// Rate of change between adjacent samples.
///
/// `feature[i] = (y[i+1] - y[i]) / (x[i+1] - x[i])`, placed at `x[i]`. The
/// output has one sample less than the input and covers `[x_min, x_max)`.
///
/// ```
/// use maneuver_events::{feature::{FeatureExtractor, RateOfChange}, signal::Signal};
///
/// let signal = Signal::new(vec![0, 2, 3], vec![0.0, 4.0, 1.0]).unwrap();
/// let slope = RateOfChange.compute_feature(&signal).unwrap();
/// assert_eq!(slope.xs(), &[0, 2]);
/// assert_eq!(slope.ys(), &[2.0, -3.0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateOfChange;

impl FeatureExtractor for RateOfChange {
    fn name(&self) -> &'static str {
        "rate of change"
    }

    #[expect(clippy::cast_precision_loss)]
    fn compute_feature(&self, signal: &Signal) -> Result<Signal> {
        if signal.is_empty() {
            return Ok(Signal::default());
        }
        Error::ensure_len(self.name(), 2, signal.len())?;

        let (xs, ys) = (signal.xs(), signal.ys());
        let mut out_x = Vec::with_capacity(xs.len() - 1);
        let mut out_y = Vec::with_capacity(xs.len() - 1);
        for i in 0..xs.len() - 1 {
            let dx = xs[i + 1].checked_sub(xs[i]).ok_or_else(|| {
                Error::invalid_range(format!(
                    "index step at sample {i} overflows ({} to {})",
                    xs[i],
                    xs[i + 1]
                ))
            })?;
            out_x.push(xs[i]);
            out_y.push((ys[i + 1] - ys[i]) / dx as f64);
        }
        Signal::new(out_x, out_y)
    }
}

/// The signal itself, unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawValue;

impl FeatureExtractor for RawValue {
    fn name(&self) -> &'static str {
        "raw value"
    }

    fn compute_feature(&self, signal: &Signal) -> Result<Signal> {
        Ok(signal.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    #[default]
    RateOfChange,
    Raw,
}

impl FeatureKind {
    #[must_use]
    pub fn build(self) -> BoxedFeatureExtractor {
        match self {
            FeatureKind::RateOfChange => Box::new(RateOfChange),
            FeatureKind::Raw => Box::new(RawValue),
        }
    }

    /// Unit of the feature for a measurement in `unit` (e.g. `ft` → `ft/t`).
    #[must_use]
    pub fn unit(self, unit: &str) -> String {
        match self {
            FeatureKind::RateOfChange => format!("{unit}/t"),
            FeatureKind::Raw => unit.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_of_change_on_linear_signal() {
        let signal = Signal::new(vec![0, 1, 2, 3], vec![1.0, 3.0, 5.0, 7.0]).unwrap();
        let slope = RateOfChange.compute_feature(&signal).unwrap();
        assert_eq!(slope.len(), 3);
        assert_eq!(slope.ys(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_rate_of_change_uses_index_step() {
        let signal = Signal::new(vec![0, 10], vec![0.0, 5.0]).unwrap();
        let slope = RateOfChange.compute_feature(&signal).unwrap();
        assert_eq!(slope.ys(), &[0.5]);
    }

    #[test]
    fn test_rate_of_change_insufficient_data() {
        let signal = Signal::new(vec![0], vec![1.0]).unwrap();
        assert!(matches!(
            RateOfChange.compute_feature(&signal),
            Err(Error::InsufficientData {
                required: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_rate_of_change_rejects_overflowing_step() {
        let signal = Signal::new(vec![i64::MIN, i64::MAX], vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            RateOfChange.compute_feature(&signal),
            Err(Error::InvalidRange { .. })
        ));
        let signal = Signal::new(vec![i64::MIN, -1], vec![0.0, 1.0]).unwrap();
        assert_eq!(RateOfChange.compute_feature(&signal).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_signal_gives_empty_feature() {
        assert!(RateOfChange.compute_feature(&Signal::default()).unwrap().is_empty());
        assert!(RawValue.compute_feature(&Signal::default()).unwrap().is_empty());
    }

    #[test]
    fn test_feature_kind() {
        let signal = Signal::new(vec![0, 1], vec![2.0, 3.0]).unwrap();
        assert_eq!(FeatureKind::Raw.build().compute_feature(&signal).unwrap(), signal);
        assert_eq!(FeatureKind::RateOfChange.build().compute_feature(&signal).unwrap().len(), 1);
        assert_eq!(FeatureKind::RateOfChange.unit("ft"), "ft/t");
        assert_eq!(FeatureKind::Raw.unit("kts"), "kts");
    }
}
