use chrono::{DateTime, Utc};
use maneuver_events::{
    classifier::EventClass,
    config::PipelineConfig,
    detector::PredictionModel,
    field::TrackedField,
    interval::{EventInterval, Violation},
    pipeline::{SignalAnalysis, SourceAnalysis},
};
use serde::{Deserialize, Serialize};

/// Result of classifying every source of one track log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Timestamp of the analysed log, when the log carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// The measurement the events were detected on
    pub field: TrackedField,
    /// Unit of the measurement
    pub unit: String,
    /// Unit of the analysed feature series
    pub feature_unit: String,
    /// Configuration every source was analysed with
    pub config: PipelineConfig,
    pub sources: Vec<SourceReport>,
}

/// Outcome for a single data source.
///
/// A failed source carries only its error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    Analysed(AnalysisRecord),
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Samples in the extracted signal
    pub samples: usize,
    /// Samples in the analysed feature series
    pub feature_samples: usize,
    /// Threshold violations, as index ranges of the feature series
    pub violations: Vec<Violation>,
    /// Events in temporal order
    pub events: Vec<EventRecord>,
    /// Classes in ascending average order
    pub classes: Vec<EventClass>,
    /// Iterations the classifier ran
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_model: Option<PredictionModel>,
}

/// A classified event with its position in the input domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub interval: EventInterval,
    /// `x` of the first sample of the event
    pub x_start: i64,
    /// `x` of the last sample of the event
    pub x_end: i64,
    pub mean: f64,
    pub variance: f64,
    pub class_id: usize,
}

impl SourceReport {
    pub fn new(analysis: &SourceAnalysis, with_model: bool) -> Self {
        let outcome = match &analysis.result {
            Ok(result) => SourceOutcome::Analysed(AnalysisRecord::new(result, with_model)),
            Err(err) => SourceOutcome::Failed {
                error: err.to_string(),
            },
        };
        Self {
            source: analysis.source.clone(),
            outcome,
        }
    }
}

impl AnalysisRecord {
    pub fn new(analysis: &SignalAnalysis, with_model: bool) -> Self {
        let classification = &analysis.classification;
        let events = classification
            .events()
            .iter()
            .map(|classified| {
                let event = &classified.event;
                let (x_start, x_end) = analysis.event_span(event).unwrap_or_default();
                EventRecord {
                    interval: event.interval,
                    x_start,
                    x_end,
                    mean: event.feature.mean,
                    variance: event.feature.variance,
                    class_id: classified.class_id,
                }
            })
            .collect();
        Self {
            samples: analysis.smoothed.len(),
            feature_samples: analysis.feature.len(),
            violations: analysis.violations.clone(),
            events,
            classes: classification.classes().to_vec(),
            iterations: classification.iterations(),
            prediction_model: with_model.then(|| analysis.prediction_model.clone()),
        }
    }
}
