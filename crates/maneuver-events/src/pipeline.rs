//! End-to-end event detection and classification
//!
//! [`EventPipeline`] chains the stages in the order the data flows:
//!
//! ```text
//! raw signal
//!   └─ raw smoothing ─► smoothed signal
//!       └─ feature extraction ─► feature signal
//!           └─ feature smoothing ─► analysed series
//!               ├─ detector ─► prediction model + violations
//!               │   └─ interval builder ─► event intervals
//!               └─ aggregator (over the intervals) ─► events
//!                   └─ classifier ─► classification result
//! ```
//!
//! The pipeline is built once from a [`PipelineConfig`] and is immutable
//! afterwards, so one instance can process any number of sources, from any
//! number of threads.
//!
//! # Example
//!
//! ```
//! use maneuver_events::{config::PipelineConfig, pipeline::EventPipeline, signal::Signal};
//!
//! let pipeline = EventPipeline::new(PipelineConfig::default()).unwrap();
//! let ys = (0..20_i32).map(|i| f64::from(i % 7)).collect();
//! let signal = Signal::new((0..20).collect(), ys).unwrap();
//! let analysis = pipeline.run(&signal).unwrap();
//! assert!(analysis.classification.classes().len() <= 6);
//! ```

use std::collections::BTreeMap;

use crate::{
    Result,
    aggregate::{Event, aggregate_events},
    classifier::{ClassificationResult, Classifier},
    config::PipelineConfig,
    detector::{MovingAverageDetector, PredictionModel},
    feature::BoxedFeatureExtractor,
    interval::{EventInterval, IndexInterval, Violation, build_event_intervals},
    signal::Signal,
    smoothing::BoxedSmoothingFilter,
};

#[derive(Debug)]
pub struct EventPipeline {
    config: PipelineConfig,
    raw_filter: BoxedSmoothingFilter,
    extractor: BoxedFeatureExtractor,
    feature_filter: BoxedSmoothingFilter,
    detector: MovingAverageDetector,
    classifier: Classifier,
}

/// Every intermediate product of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalAnalysis {
    /// The raw signal after raw smoothing
    pub smoothed: Signal,
    /// The smoothed feature series the detector and aggregator ran on
    pub feature: Signal,
    pub prediction_model: PredictionModel,
    pub violations: Vec<Violation>,
    pub intervals: Vec<EventInterval>,
    pub classification: ClassificationResult,
}

impl SignalAnalysis {
    /// The `x` values of the first and last sample covered by `event`.
    #[must_use]
    pub fn event_span(&self, event: &Event) -> Option<(i64, i64)> {
        let xs = self.feature.xs();
        let first = *xs.get(event.interval.start)?;
        let last = *xs.get(event.interval.end.checked_sub(1)?)?;
        Some((first, last))
    }
}

/// Outcome for one named source of a batch run.
#[derive(Debug)]
pub struct SourceAnalysis {
    pub source: String,
    pub result: Result<SignalAnalysis>,
}

impl EventPipeline {
    /// Validates `config` and builds every stage.
    ///
    /// Fails with [`Error::Configuration`](crate::Error::Configuration)
    /// when any stage rejects its parameters.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            config,
            raw_filter: config.raw_smoothing.build()?,
            extractor: config.feature.build(),
            feature_filter: config.feature_smoothing.build()?,
            detector: MovingAverageDetector::new(config.detector)?,
            classifier: Classifier::new(config.classifier)?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage over `signal`.
    ///
    /// An empty signal yields empty outputs at every stage.
    pub fn run(&self, signal: &Signal) -> Result<SignalAnalysis> {
        let smoothed = signal.with_values(self.raw_filter.smoothen(signal))?;
        let raw_feature = self.extractor.compute_feature(&smoothed)?;
        let feature = raw_feature.with_values(self.feature_filter.smoothen(&raw_feature))?;
        tracing::debug!(
            samples = signal.len(),
            feature_samples = feature.len(),
            feature = self.extractor.name(),
            "feature series computed"
        );

        let series = feature.ys();
        let detection = self.detector.detect(series)?;
        let intervals =
            build_event_intervals(IndexInterval::new(0, series.len()), &detection.violations)?;
        let events = aggregate_events(&intervals, series)?;
        let classification = self.classifier.classify(&events);
        tracing::debug!(
            violations = detection.violations.len(),
            events = events.len(),
            classes = classification.classes().len(),
            "signal analysed"
        );

        Ok(SignalAnalysis {
            smoothed,
            feature,
            prediction_model: detection.prediction_model,
            violations: detection.violations,
            intervals,
            classification,
        })
    }

    /// Runs every source independently, in source id order.
    ///
    /// A failing source is reported in its own [`SourceAnalysis`] and does
    /// not stop the others.
    pub fn run_all(&self, sources: &BTreeMap<String, Signal>) -> Vec<SourceAnalysis> {
        sources
            .iter()
            .map(|(source, signal)| {
                let _span = tracing::info_span!("source", id = %source).entered();
                let result = self.run(signal);
                if let Err(err) = &result {
                    tracing::warn!(%err, "analysis failed");
                }
                SourceAnalysis {
                    source: source.clone(),
                    result,
                }
            })
            .collect()
    }
}
