//! Signal smoothing filters
//!
//! Filters are pure transforms: they produce one output value per input
//! sample and keep no state between calls.
//!
//! - [`EwmaFilter`]: exponentially weighted moving average
//! - [`RectangularFilter`]: unweighted centered moving average (boxcar)
//! - [`IdentityFilter`]: pass-through, used when smoothing is disabled

use std::fmt;

use maneuver_stats::{descriptive, window};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, signal::Signal};

/// A pure smoothing transform over a signal's values.
pub trait SmoothingFilter: fmt::Debug + Send + Sync {
    /// Returns the smoothed values, one per sample of `signal`.
    fn smoothen(&self, signal: &Signal) -> Vec<f64>;
}

pub type BoxedSmoothingFilter = Box<dyn SmoothingFilter>;

/// Exponentially weighted moving average.
///
/// `s[0] = y[0]` and `s[i] = α·y[i] + (1 - α)·s[i - 1]`.
///
/// ```
/// use maneuver_events::{signal::Signal, smoothing::{EwmaFilter, SmoothingFilter}};
///
/// let filter = EwmaFilter::new(3, 0.5).unwrap();
/// let signal = Signal::new(vec![0, 1, 2], vec![0.0, 4.0, 4.0]).unwrap();
/// assert_eq!(filter.smoothen(&signal), vec![0.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EwmaFilter {
    window: usize,
    alpha: f64,
}

impl EwmaFilter {
    pub const DEFAULT_ALPHA: f64 = 0.1;

    /// Creates a filter with decay `alpha ∈ (0, 1]`.
    ///
    /// `window` must be at least one; the recursion itself needs no
    /// warm-up, so it does not change the output.
    pub fn new(window: usize, alpha: f64) -> Result<Self> {
        validate_window("EWMA window", window)?;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::configuration(format!(
                "EWMA decay must be in (0, 1], got {alpha}"
            )));
        }
        Ok(Self { window, alpha })
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl SmoothingFilter for EwmaFilter {
    fn smoothen(&self, signal: &Signal) -> Vec<f64> {
        let mut prev = None;
        signal
            .ys()
            .iter()
            .map(|&y| {
                let s = match prev {
                    None => y,
                    // α·y + (1 - α)·prev, written so a constant input stays exact
                    Some(prev) => prev + self.alpha * (y - prev),
                };
                prev = Some(s);
                s
            })
            .collect()
    }
}

/// Unweighted moving average over a centered window.
///
/// The window is clipped at the signal bounds instead of padded, so the
/// first and last samples average over fewer neighbours.
///
/// ```
/// use maneuver_events::{signal::Signal, smoothing::{RectangularFilter, SmoothingFilter}};
///
/// let filter = RectangularFilter::new(3).unwrap();
/// let signal = Signal::new(vec![0, 1, 2, 3], vec![0.0, 3.0, 6.0, 9.0]).unwrap();
/// assert_eq!(filter.smoothen(&signal), vec![1.5, 3.0, 6.0, 7.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectangularFilter {
    window: usize,
}

impl RectangularFilter {
    pub fn new(window: usize) -> Result<Self> {
        validate_window("rectangular window", window)?;
        Ok(Self { window })
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }
}

impl SmoothingFilter for RectangularFilter {
    fn smoothen(&self, signal: &Signal) -> Vec<f64> {
        let ys = signal.ys();
        (0..ys.len())
            .map(|i| {
                // a clipped centered window always contains `i`
                descriptive::mean(window::centered(ys, i, self.window)).unwrap_or(ys[i])
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityFilter;

impl SmoothingFilter for IdentityFilter {
    fn smoothen(&self, signal: &Signal) -> Vec<f64> {
        signal.ys().to_vec()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKind {
    #[default]
    Ewma,
    Rectangular,
    None,
}

/// Serializable description of a smoothing stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub kind: SmoothingKind,
    pub window: usize,
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            kind: SmoothingKind::Ewma,
            window: 3,
            alpha: EwmaFilter::DEFAULT_ALPHA,
        }
    }
}

impl SmoothingConfig {
    pub fn build(&self) -> Result<BoxedSmoothingFilter> {
        Ok(match self.kind {
            SmoothingKind::Ewma => Box::new(EwmaFilter::new(self.window, self.alpha)?),
            SmoothingKind::Rectangular => Box::new(RectangularFilter::new(self.window)?),
            SmoothingKind::None => Box::new(IdentityFilter),
        })
    }
}

fn validate_window(name: &str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::configuration(format!("{name} must be at least 1")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(ys: &[f64]) -> Signal {
        Signal::new((0..).take(ys.len()).collect(), ys.to_vec()).unwrap()
    }

    #[test]
    fn test_constant_signal_is_fixed_point() {
        let s = signal(&[4.0; 7]);
        assert_eq!(EwmaFilter::new(3, 0.1).unwrap().smoothen(&s), vec![4.0; 7]);
        assert_eq!(RectangularFilter::new(3).unwrap().smoothen(&s), vec![4.0; 7]);
        assert_eq!(RectangularFilter::new(20).unwrap().smoothen(&s), vec![4.0; 7]);
    }

    #[test]
    fn test_ewma_recursion() {
        let s = signal(&[10.0, 0.0, 0.0]);
        let out = EwmaFilter::new(1, 0.1).unwrap().smoothen(&s);
        assert_eq!(out[0], 10.0);
        assert!((out[1] - 9.0).abs() < 1e-12);
        assert!((out[2] - 8.1).abs() < 1e-12);
    }

    #[test]
    fn test_ewma_alpha_one_is_identity() {
        let s = signal(&[1.0, 5.0, -2.0]);
        assert_eq!(EwmaFilter::new(3, 1.0).unwrap().smoothen(&s), s.ys());
    }

    #[test]
    fn test_filters_on_empty_signal() {
        let s = Signal::default();
        assert!(EwmaFilter::new(3, 0.1).unwrap().smoothen(&s).is_empty());
        assert!(RectangularFilter::new(3).unwrap().smoothen(&s).is_empty());
    }

    #[test]
    fn test_rectangular_window_larger_than_signal() {
        let s = signal(&[1.0, 3.0]);
        assert_eq!(RectangularFilter::new(5).unwrap().smoothen(&s), vec![2.0, 2.0]);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(EwmaFilter::new(0, 0.1), Err(Error::Configuration { .. })));
        assert!(EwmaFilter::new(3, 0.0).is_err());
        assert!(EwmaFilter::new(3, 1.5).is_err());
        assert!(EwmaFilter::new(3, f64::NAN).is_err());
        assert!(RectangularFilter::new(0).is_err());
    }

    #[test]
    fn test_config_builds_each_kind() {
        let s = signal(&[0.0, 6.0, 0.0]);
        let mut config = SmoothingConfig::default();
        assert_eq!(config.build().unwrap().smoothen(&s).len(), 3);
        config.kind = SmoothingKind::Rectangular;
        assert_eq!(config.build().unwrap().smoothen(&s), vec![3.0, 2.0, 3.0]);
        config.kind = SmoothingKind::None;
        assert_eq!(config.build().unwrap().smoothen(&s), s.ys());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SmoothingConfig = serde_json::from_str(r#"{"kind":"rectangular"}"#).unwrap();
        assert_eq!(config.kind, SmoothingKind::Rectangular);
        assert_eq!(config.window, 3);
    }
}
