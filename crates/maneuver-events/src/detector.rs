//! Moving-average event detector
//!
//! The detector predicts every sample from the samples preceding it and
//! flags the samples that fall outside the prediction's control limits.
//!
//! # Baseline
//!
//! For index `i` the baseline window is `[i - w, i)`, the `w` samples before
//! `i`. Near the start of the series the window shrinks to the samples that
//! exist. The sample under test never takes part in its own prediction.
//!
//! - `expected[i]` is the mean of the window
//! - `σ[i]` is the sample standard deviation of the window (zero for a
//!   window of one sample)
//! - `lower[i] = expected[i] - k·σ[i]`, `upper[i] = expected[i] + k·σ[i]`
//!
//! Index 0 has no history; it predicts itself and never violates.
//!
//! # Violations
//!
//! Index `i` violates when `y[i] < lower[i]` or `y[i] > upper[i]`. A flat
//! window (`σ = 0`) tolerates no deviation at all when `k > 0`, while
//! `k = 0` turns alarms off. Runs of violating indices are coalesced into
//! one half-open [`Violation`].

use maneuver_stats::{descriptive, window};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, interval::Violation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of preceding samples forming the baseline
    pub window_size: usize,
    /// Control limit half-width in standard deviations
    pub alarm_level: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 2,
            alarm_level: 3.0,
        }
    }
}

/// Expected value and control limits of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub expected: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ControlLimits {
    #[must_use]
    pub fn is_violated_by(&self, value: f64, alarm_level: f64) -> bool {
        alarm_level > 0.0 && (value < self.lower || value > self.upper)
    }
}

/// Per-sample prediction of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionModel {
    alarm_level: f64,
    limits: Vec<ControlLimits>,
}

impl PredictionModel {
    #[must_use]
    pub fn limits(&self) -> &[ControlLimits] {
        &self.limits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Sorted, non-overlapping runs of samples outside the control limits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `values` does not have one value per
    /// predicted sample.
    pub fn find_violations(&self, values: &[f64]) -> Result<Vec<Violation>> {
        if values.len() != self.limits.len() {
            return Err(Error::invalid_range(format!(
                "prediction model covers {} samples but series has {}",
                self.limits.len(),
                values.len()
            )));
        }

        let mut violations = Vec::new();
        let mut run_start = None;
        for (i, (limits, &value)) in self.limits.iter().zip(values).enumerate() {
            match (limits.is_violated_by(value, self.alarm_level), run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    violations.push(Violation::new(start, i));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            violations.push(Violation::new(start, values.len()));
        }
        Ok(violations)
    }
}

/// Prediction model together with the violations it produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub prediction_model: PredictionModel,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverageDetector {
    config: DetectorConfig,
}

impl MovingAverageDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        if config.window_size == 0 {
            return Err(Error::configuration("detection window must be at least 1"));
        }
        if !(config.alarm_level.is_finite() && config.alarm_level >= 0.0) {
            return Err(Error::configuration(format!(
                "alarm level must be a non-negative number, got {}",
                config.alarm_level
            )));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Computes the control limits of every sample of `values`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if the series is non-empty but shorter
    /// than the detection window.
    pub fn compute_prediction_model(&self, values: &[f64]) -> Result<PredictionModel> {
        let DetectorConfig {
            window_size,
            alarm_level,
        } = self.config;
        if !values.is_empty() {
            Error::ensure_len("moving average detector", window_size, values.len())?;
        }

        let limits = (0..values.len())
            .map(|i| {
                let history = window::preceding(values, i, window_size);
                let expected = descriptive::mean(history).unwrap_or(values[i]);
                let width = alarm_level * descriptive::sample_std_dev(history);
                ControlLimits {
                    expected,
                    lower: expected - width,
                    upper: expected + width,
                }
            })
            .collect();
        Ok(PredictionModel {
            alarm_level,
            limits,
        })
    }

    pub fn detect(&self, values: &[f64]) -> Result<Detection> {
        let prediction_model = self.compute_prediction_model(values)?;
        let violations = prediction_model.find_violations(values)?;
        tracing::debug!(
            samples = values.len(),
            violations = violations.len(),
            "threshold violations detected"
        );
        Ok(Detection {
            prediction_model,
            violations,
        })
    }
}
