//! Pipeline configuration
//!
//! All stages are configured through one serializable [`PipelineConfig`],
//! passed by value into [`EventPipeline::new`](crate::pipeline::EventPipeline::new).
//! Missing fields take their documented defaults, so a partial JSON file
//! is a valid configuration:
//!
//! ```
//! use maneuver_events::config::PipelineConfig;
//!
//! let config: PipelineConfig =
//!     serde_json::from_str(r#"{ "classifier": { "num_classes": 4 } }"#).unwrap();
//! assert_eq!(config.classifier.num_classes, 4);
//! assert_eq!(config.detector.window_size, 2);
//! assert_eq!(config.detector.alarm_level, 3.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    classifier::{Classifier, ClassifierConfig},
    detector::{DetectorConfig, MovingAverageDetector},
    feature::FeatureKind,
    smoothing::SmoothingConfig,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Filter applied to the raw measurement
    pub raw_smoothing: SmoothingConfig,
    /// Secondary signal the events are detected on
    pub feature: FeatureKind,
    /// Filter applied to the feature series
    pub feature_smoothing: SmoothingConfig,
    pub detector: DetectorConfig,
    pub classifier: ClassifierConfig,
}

impl PipelineConfig {
    /// Checks every stage's parameters without running anything.
    pub fn validate(&self) -> Result<()> {
        self.raw_smoothing.build()?;
        self.feature_smoothing.build()?;
        MovingAverageDetector::new(self.detector)?;
        Classifier::new(self.classifier)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, smoothing::SmoothingKind};

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.classifier.num_classes, 6);
        assert_eq!(config.detector.alarm_level, 3.0);
        assert_eq!(config.detector.window_size, 2);
        assert_eq!(config.raw_smoothing.window, 3);
        assert_eq!(config.feature_smoothing.alpha, 0.1);
        assert_eq!(config.raw_smoothing.kind, SmoothingKind::Ewma);
        assert_eq!(config.feature, FeatureKind::RateOfChange);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_bad_stage() {
        let mut config = PipelineConfig::default();
        config.classifier.num_classes = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));

        let mut config = PipelineConfig::default();
        config.feature_smoothing.alpha = 2.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.detector.alarm_level = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut config = PipelineConfig::default();
        config.feature = FeatureKind::Raw;
        config.raw_smoothing.kind = SmoothingKind::None;
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
