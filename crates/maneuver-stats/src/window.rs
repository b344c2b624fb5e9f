//! Boundary-clipped windows over a series.
//!
//! Windows never pad a series with synthetic values: near the bounds they
//! shrink to the samples that exist.

use std::ops::Range;

/// Index range of the `size` samples strictly preceding `index`.
///
/// Near the start of the series the range shrinks; at `index == 0` it is
/// empty.
///
/// ```
/// # use maneuver_stats::window::preceding_range;
/// assert_eq!(preceding_range(5, 2), 3..5);
/// assert_eq!(preceding_range(1, 3), 0..1);
/// assert_eq!(preceding_range(0, 3), 0..0);
/// ```
#[must_use]
pub fn preceding_range(index: usize, size: usize) -> Range<usize> {
    index.saturating_sub(size)..index
}

/// The `size` samples strictly preceding `index`, clipped at the start.
///
/// # Panics
///
/// Panics if `index > values.len()`.
#[must_use]
pub fn preceding(values: &[f64], index: usize, size: usize) -> &[f64] {
    &values[preceding_range(index, size)]
}

/// Index range of a window of width `size` centered on `index`, clipped to
/// `0..len`.
///
/// The window spans `index - (size - 1) / 2 ..= index + size / 2`, so an
/// even width leans one sample to the right. A non-empty window always
/// contains `index` as long as `index < len`.
///
/// ```
/// # use maneuver_stats::window::centered_range;
/// assert_eq!(centered_range(5, 3, 10), 4..7);
/// assert_eq!(centered_range(0, 3, 10), 0..2);
/// assert_eq!(centered_range(9, 3, 10), 8..10);
/// assert_eq!(centered_range(2, 2, 10), 2..4);
/// ```
#[must_use]
pub fn centered_range(index: usize, size: usize, len: usize) -> Range<usize> {
    let left = size.saturating_sub(1) / 2;
    let right = size / 2;
    let start = index.saturating_sub(left);
    let end = index.saturating_add(right).saturating_add(1).min(len);
    start.min(end)..end
}

/// A window of width `size` centered on `index`, clipped to the series.
#[must_use]
pub fn centered(values: &[f64], index: usize, size: usize) -> &[f64] {
    &values[centered_range(index, size, values.len())]
}
