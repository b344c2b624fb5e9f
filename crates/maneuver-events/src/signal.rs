//! Time-ordered numeric samples from one data source.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An ordered sequence of `(x, y)` samples.
///
/// `x` is a strictly increasing integer index or timestamp and `y` is a
/// finite measurement. Both invariants are checked once at construction,
/// so every stage downstream can rely on them.
///
/// # Example
///
/// ```
/// use maneuver_events::signal::Signal;
///
/// let signal = Signal::new(vec![0, 1, 2], vec![1.0, 2.0, 4.0]).unwrap();
/// assert_eq!(signal.len(), 3);
/// assert!(Signal::new(vec![0, 0], vec![1.0, 2.0]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Signal {
    x: Vec<i64>,
    y: Vec<f64>,
}

impl Signal {
    /// Builds a signal from its index and value columns.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] when:
    ///
    /// - the columns differ in length
    /// - `x` is not strictly increasing
    /// - a value is not finite
    pub fn new(x: Vec<i64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::invalid_range(format!(
                "index column has {} samples but value column has {}",
                x.len(),
                y.len()
            )));
        }
        if let Some(i) = x.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::invalid_range(format!(
                "index column not strictly increasing at sample {}: {} then {}",
                i + 1,
                x[i],
                x[i + 1]
            )));
        }
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_range(format!(
                "sample {i} has non-finite value {}",
                y[i]
            )));
        }
        Ok(Self { x, y })
    }

    pub fn from_samples<I>(samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let (x, y) = samples.into_iter().unzip();
        Self::new(x, y)
    }

    /// A signal over the same index column with different values.
    ///
    /// Fails when `y` does not have one value per sample or contains a
    /// non-finite value.
    pub fn with_values(&self, y: Vec<f64>) -> Result<Self> {
        Self::new(self.x.clone(), y)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn xs(&self) -> &[i64] {
        &self.x
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = (i64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// First and last index value, `None` for an empty signal.
    #[must_use]
    pub fn x_bounds(&self) -> Option<(i64, i64)> {
        Some((*self.x.first()?, *self.x.last()?))
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Columns {
            x: Vec<i64>,
            y: Vec<f64>,
        }
        let Columns { x, y } = Columns::deserialize(deserializer)?;
        Self::new(x, y).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_length_mismatch() {
        let err = Signal::new(vec![0, 1], vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_duplicate_and_decreasing_index() {
        assert!(Signal::new(vec![0, 1, 1], vec![0.0; 3]).is_err());
        assert!(Signal::new(vec![3, 2], vec![0.0; 2]).is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        assert!(Signal::new(vec![0, 1], vec![0.0, f64::NAN]).is_err());
        assert!(Signal::new(vec![0], vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_empty_signal_is_valid() {
        let signal = Signal::new(vec![], vec![]).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.x_bounds(), None);
    }

    #[test]
    fn test_from_samples_and_bounds() {
        let signal = Signal::from_samples([(10, 1.0), (12, 2.0), (15, 3.0)]).unwrap();
        assert_eq!(signal.xs(), &[10, 12, 15]);
        assert_eq!(signal.ys(), &[1.0, 2.0, 3.0]);
        assert_eq!(signal.x_bounds(), Some((10, 15)));
        assert_eq!(signal.samples().len(), 3);
    }

    #[test]
    fn test_with_values_keeps_index_column() {
        let signal = Signal::new(vec![1, 2], vec![0.0, 0.0]).unwrap();
        let other = signal.with_values(vec![5.0, 6.0]).unwrap();
        assert_eq!(other.xs(), signal.xs());
        assert!(signal.with_values(vec![1.0]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let signal: Signal = serde_json::from_str(r#"{"x":[0,1],"y":[1.5,2.5]}"#).unwrap();
        assert_eq!(signal.len(), 2);
        assert!(serde_json::from_str::<Signal>(r#"{"x":[1,0],"y":[1.5,2.5]}"#).is_err());
    }
}
