//! Event detection and classification for track logs
//!
//! This crate turns a time-ordered numeric signal extracted from a vehicle
//! or sensor log into a short sequence of classified events: intervals
//! where the signal departs from its locally expected baseline, labelled
//! by the behavioural cluster they belong to.
//!
//! # Overview
//!
//! The stages, leaves first:
//!
//! 1. **Smoothing** ([`smoothing`]): EWMA and rectangular moving averages
//! 2. **Feature extraction** ([`feature`]): rate of change of the smoothed signal
//! 3. **Detection** ([`detector`]): trailing-window baseline, control limits
//!    and threshold violations
//! 4. **Interval building** ([`interval`]): gap-free partition of the domain
//!    bounded by the violations
//! 5. **Aggregation** ([`aggregate`]): mean and variance of every interval
//! 6. **Classification** ([`classifier`]): 1-D clustering of the event features
//!
//! [`pipeline::EventPipeline`] runs them in order, configured by
//! [`config::PipelineConfig`]. Input comes either as a bare
//! [`signal::Signal`] or as a [`track::TrackLog`] from which one
//! [`field::TrackedField`] is selected per run.
//!
//! # Example
//!
//! ```
//! use maneuver_events::{
//!     config::PipelineConfig,
//!     field::TrackedField,
//!     pipeline::EventPipeline,
//!     track::TrackLog,
//! };
//!
//! let log: TrackLog = serde_json::from_str(
//!     r#"{ "sources": { "USA5596": [
//!         { "t": 0, "alt": 1000.0 }, { "t": 1, "alt": 1000.0 },
//!         { "t": 2, "alt": 1000.0 }, { "t": 3, "alt": 1100.0 },
//!         { "t": 4, "alt": 1200.0 }, { "t": 5, "alt": 1300.0 }
//!     ] } }"#,
//! )
//! .unwrap();
//!
//! let pipeline = EventPipeline::new(PipelineConfig::default()).unwrap();
//! let signal = log.signal("USA5596", TrackedField::Altitude).unwrap().unwrap();
//! let analysis = pipeline.run(&signal).unwrap();
//!
//! for (event, class) in analysis.classification.iter() {
//!     println!("{} : class {} (avg {:.4})", event.interval, class.id, class.avg);
//! }
//! ```

pub use self::error::{Error, Result};

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod detector;
mod error;
pub mod feature;
pub mod field;
pub mod interval;
pub mod pipeline;
pub mod signal;
pub mod smoothing;
pub mod track;
