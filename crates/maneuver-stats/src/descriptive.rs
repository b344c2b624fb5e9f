/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency and
/// dispersion for a dataset of `f64` values. The variance is the *sample*
/// variance (`n - 1` denominator); a dataset with a single value has a
/// variance of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The sample variance of the dataset.
    pub variance: f64,
    /// The sample standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from values in any order.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use maneuver_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        Self::from_slice(&values)
    }

    /// Computes descriptive statistics from a slice without copying it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use maneuver_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_slice(&[42.0]).unwrap();
    /// assert_eq!(stats.mean, 42.0);
    /// assert_eq!(stats.variance, 0.0);
    /// assert!(DescriptiveStats::from_slice(&[]).is_none());
    /// ```
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = sample_variance_around(values, mean);
        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Arithmetic mean of `values`, `None` when empty.
///
/// ```
/// # use maneuver_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance of `values` (`n - 1` denominator).
///
/// Returns `0.0` for fewer than two values, so the result is always
/// non-negative and finite for finite input.
///
/// ```
/// # use maneuver_stats::descriptive::sample_variance;
/// assert_eq!(sample_variance(&[2.0, 4.0]), 2.0);
/// assert_eq!(sample_variance(&[7.0]), 0.0);
/// ```
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    match mean(values) {
        Some(mean) => sample_variance_around(values, mean),
        None => 0.0,
    }
}

/// Sample standard deviation of `values`, `0.0` for fewer than two values.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

#[expect(clippy::cast_precision_loss)]
fn sample_variance_around(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    // Rounding can push a flat dataset's sum a hair below zero.
    (sum_sq / (values.len() - 1) as f64).max(0.0)
}
