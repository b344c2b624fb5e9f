//! Track log input model
//!
//! A track log is the already-extracted output of a log reader: for every
//! data source (e.g. an aircraft call sign) a list of timestamped samples
//! carrying optional measurement columns. The pipeline consumes one
//! [`Signal`] per source, obtained by selecting a [`TrackedField`].
//!
//! # Serialization
//!
//! ```json
//! {
//!   "recorded_at": "2016-05-01T12:00:00Z",
//!   "sources": {
//!     "USA5596": [
//!       { "t": 0, "alt": 12000.0, "speed": 250.0 },
//!       { "t": 1, "alt": 12010.0, "speed": 251.0 }
//!     ]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, field::TrackedField, signal::Signal};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLog {
    /// When the underlying log was recorded, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// Samples per data source, keyed by source id
    pub sources: BTreeMap<String, Vec<TrackSample>>,
}

/// One timestamped sample of a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    /// Sequence index or timestamp
    pub t: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl TrackSample {
    #[must_use]
    pub fn value(&self, field: TrackedField) -> Option<f64> {
        match field {
            TrackedField::PosX => self.pos_x,
            TrackedField::PosY => self.pos_y,
            TrackedField::Altitude => self.alt,
            TrackedField::Speed => self.speed,
            TrackedField::Heading => self.heading,
        }
    }
}

impl TrackLog {
    /// Extracts the signal of `field` for one source.
    ///
    /// Samples lacking the field are skipped and the rest are ordered by
    /// `t`. Returns `Ok(None)` for an unknown source and an
    /// [`Error::InvalidRange`] when two samples share a timestamp.
    pub fn signal(&self, source: &str, field: TrackedField) -> Result<Option<Signal>> {
        self.sources
            .get(source)
            .map(|samples| extract_signal(source, samples, field))
            .transpose()
    }

    /// Extracts the signal of `field` for every source.
    ///
    /// Extraction errors are kept per source so that one malformed source
    /// does not hide the others.
    #[must_use]
    pub fn signals(&self, field: TrackedField) -> BTreeMap<String, Result<Signal>> {
        self.sources
            .iter()
            .map(|(source, samples)| (source.clone(), extract_signal(source, samples, field)))
            .collect()
    }

    /// A copy of this log restricted to the given source ids.
    #[must_use]
    pub fn sources_matching(&self, ids: &BTreeSet<String>) -> Self {
        Self {
            recorded_at: self.recorded_at,
            sources: self
                .sources
                .iter()
                .filter(|(id, _)| ids.contains(*id))
                .map(|(id, samples)| (id.clone(), samples.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }
}

fn extract_signal(source: &str, samples: &[TrackSample], field: TrackedField) -> Result<Signal> {
    let mut points = samples
        .iter()
        .filter_map(|sample| sample.value(field).map(|value| (sample.t, value)))
        .collect::<Vec<_>>();
    points.sort_by_key(|(t, _)| *t);
    if let Some(pair) = points.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(Error::invalid_range(format!(
            "source {source} has two samples at t={}",
            pair[0].0
        )));
    }
    Signal::from_samples(points)
}
