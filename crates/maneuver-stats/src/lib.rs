//! Statistical helpers for the maneuver event pipeline.
//!
//! This crate provides the small set of numeric building blocks the event
//! detector and classifier are made of:
//!
//! - **Descriptive statistics**: count, min, max, mean, sample variance and
//!   standard deviation of a dataset
//! - **Windows**: trailing and centered index windows clipped to the bounds
//!   of a series
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`window`]: Boundary-clipped window slices over a series
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use maneuver_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.5);
//! ```
//!
//! ## Taking the window preceding a sample
//!
//! ```
//! use maneuver_stats::window;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(window::preceding(&values, 3, 2), &[2.0, 3.0]);
//! assert_eq!(window::preceding(&values, 1, 2), &[1.0]);
//! ```

pub mod descriptive;
pub mod window;
