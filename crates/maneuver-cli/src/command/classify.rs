use std::{
    collections::{BTreeMap, BTreeSet},
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use chrono::Utc;
use maneuver_events::{
    classifier::ClassifiedEvent,
    config::PipelineConfig,
    feature::FeatureKind,
    field::TrackedField,
    pipeline::{EventPipeline, SignalAnalysis, SourceAnalysis},
    smoothing::SmoothingKind,
};

use crate::{
    schema::report::{ClassificationReport, SourceReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    /// Track log JSON file
    input: PathBuf,
    /// Measurement to detect events on
    #[arg(long, default_value_t = TrackedField::Altitude)]
    field: TrackedField,
    /// Only analyse the given source (repeatable)
    #[arg(long = "source", value_name = "ID")]
    sources: Vec<String>,
    /// Pipeline configuration JSON file; flags given explicitly override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of event classes [default: 6]
    #[arg(long)]
    classes: Option<usize>,
    /// Alarm level in standard deviations, 0 disables alarms [default: 3]
    #[arg(long)]
    alarm: Option<f64>,
    /// Trailing window of the detector baseline [default: 2]
    #[arg(long)]
    detect_window: Option<usize>,
    /// Window of the smoothing filters [default: 3]
    #[arg(long)]
    feature_window: Option<usize>,
    /// Smoothing factor of the EWMA filters [default: 0.1]
    #[arg(long)]
    ewma_alpha: Option<f64>,
    /// Smoothing filter for both the raw signal and the feature [default: ewma]
    #[arg(long, value_enum)]
    smoothing: Option<SmoothingArg>,
    /// Feature the events are detected on [default: rate-of-change]
    #[arg(long, value_enum)]
    feature: Option<FeatureArg>,
    /// Classes with fewer events are merged into a neighbour [default: 1]
    #[arg(long)]
    min_class_size: Option<usize>,
    /// Iteration cap of the classifier [default: 3000]
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Write a JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Include the prediction model in the JSON report
    #[arg(long)]
    with_model: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SmoothingArg {
    Ewma,
    Rectangular,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FeatureArg {
    RateOfChange,
    Raw,
}

impl From<SmoothingArg> for SmoothingKind {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::Ewma => SmoothingKind::Ewma,
            SmoothingArg::Rectangular => SmoothingKind::Rectangular,
            SmoothingArg::None => SmoothingKind::None,
        }
    }
}

impl From<FeatureArg> for FeatureKind {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::RateOfChange => FeatureKind::RateOfChange,
            FeatureArg::Raw => FeatureKind::Raw,
        }
    }
}

impl ClassifyArg {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => PipelineConfig::default(),
        };
        let config = self.apply_overrides(base);
        config
            .validate()
            .context("Invalid pipeline configuration")?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: PipelineConfig) -> PipelineConfig {
        for smoothing in [&mut config.raw_smoothing, &mut config.feature_smoothing] {
            if let Some(kind) = self.smoothing {
                smoothing.kind = kind.into();
            }
            if let Some(window) = self.feature_window {
                smoothing.window = window;
            }
            if let Some(alpha) = self.ewma_alpha {
                smoothing.alpha = alpha;
            }
        }
        if let Some(feature) = self.feature {
            config.feature = feature.into();
        }
        if let Some(window) = self.detect_window {
            config.detector.window_size = window;
        }
        if let Some(alarm) = self.alarm {
            config.detector.alarm_level = alarm;
        }
        if let Some(classes) = self.classes {
            config.classifier.num_classes = classes;
        }
        if let Some(size) = self.min_class_size {
            config.classifier.min_class_size = size;
        }
        if let Some(iterations) = self.max_iterations {
            config.classifier.max_iterations = iterations;
        }
        config
    }
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let config = arg.pipeline_config()?;
    let pipeline = EventPipeline::new(config)?;

    let mut log = util::read_track_log_file(&arg.input)?;
    if !arg.sources.is_empty() {
        let ids = arg.sources.iter().cloned().collect::<BTreeSet<_>>();
        for id in ids.iter().filter(|id| !log.sources.contains_key(*id)) {
            tracing::warn!(source = %id, "source not found in track log");
        }
        log = log.sources_matching(&ids);
    }
    tracing::info!(
        sources = log.sources.len(),
        samples = log.total_samples(),
        field = %arg.field,
        "track log loaded"
    );

    let mut signals = BTreeMap::new();
    let mut analyses = Vec::new();
    for (source, signal) in log.signals(arg.field) {
        match signal {
            Ok(signal) => {
                signals.insert(source, signal);
            }
            Err(err) => {
                tracing::warn!(%source, %err, "signal extraction failed");
                analyses.push(SourceAnalysis {
                    source,
                    result: Err(err),
                });
            }
        }
    }
    analyses.extend(pipeline.run_all(&signals));
    analyses.sort_by(|a, b| a.source.cmp(&b.source));

    let mut stdout = io::stdout().lock();
    for analysis in &analyses {
        write_source(&mut stdout, analysis).context("Failed to write events to stdout")?;
    }

    if let Some(path) = &arg.output {
        let unit = arg.field.unit();
        let report = ClassificationReport {
            generated_at: Utc::now(),
            recorded_at: log.recorded_at,
            field: arg.field,
            unit: unit.to_owned(),
            feature_unit: config.feature.unit(unit),
            config,
            sources: analyses
                .iter()
                .map(|analysis| SourceReport::new(analysis, arg.with_model))
                .collect(),
        };
        Output::save_json(&report, Some(path.clone()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn write_source<W>(writer: &mut W, analysis: &SourceAnalysis) -> io::Result<()>
where
    W: Write,
{
    let result = match &analysis.result {
        Ok(result) => result,
        Err(err) => return writeln!(writer, "{}: failed: {err}", analysis.source),
    };
    let classification = &result.classification;
    writeln!(
        writer,
        "{}: {} samples, {} violations, {} events, {} classes",
        analysis.source,
        result.smoothed.len(),
        result.violations.len(),
        classification.events().len(),
        classification.classes().len(),
    )?;
    for classified in classification.events() {
        writeln!(writer, "{}", event_line(result, classified))?;
    }
    for class in classification.classes() {
        writeln!(
            writer,
            "  class {}: {} events ([{:.4};{:.4}], avg: {:.4}, stddev: {:.4})",
            class.id,
            class.count,
            class.min,
            class.max,
            class.avg,
            class.variance.sqrt(),
        )?;
    }
    Ok(())
}

fn event_line(analysis: &SignalAnalysis, classified: &ClassifiedEvent) -> String {
    let event = &classified.event;
    let (x0, x1) = analysis.event_span(event).unwrap_or_default();
    let class = analysis.classification.class(classified.class_id);
    match class {
        Some(class) => format!(
            "{} x=[{x0}; {x1}] : class {} ([{:.4};{:.4}], avg: {:.4}, stddev: {:.4})",
            event.interval,
            class.id,
            class.min,
            class.max,
            class.avg,
            class.variance.sqrt(),
        ),
        None => format!("{} x=[{x0}; {x1}] : unclassified", event.interval),
    }
}
