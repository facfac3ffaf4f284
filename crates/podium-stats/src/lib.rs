//! Statistical utilities for the podium workspace.
//!
//! This crate provides the small set of generic statistical tools the
//! placement analysis needs:
//!
//! - **Descriptive statistics**: min, max, mean, median, variance and standard deviation
//! - **Frequency tables**: exact counts of discrete values (seeds, match counts, AA tiers)
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`frequency`]: Counting occurrences of discrete values
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use podium_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Counting discrete values
//!
//! ```
//! use podium_stats::frequency::Frequency;
//!
//! let seeds = [1, 2, 1, 3, 1];
//! let freq = Frequency::new(seeds);
//! assert_eq!(freq.count(&1), 3);
//! assert_eq!(freq.total(), 5);
//! ```

pub mod descriptive;
pub mod frequency;
