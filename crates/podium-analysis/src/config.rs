use serde::{Deserialize, Serialize};

use crate::{archetype::COVID_FIRST_YEAR, validate::ValidationPolicy, window::WindowPolicy};

/// Tunable policy of an analysis run.
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// ```
/// # use podium_analysis::config::AnalysisConfig;
/// let config: AnalysisConfig = serde_json::from_str(r#"{ "top_brackets": 5 }"#).unwrap();
/// assert_eq!(config.top_brackets, 5);
/// assert_eq!(config.covid_first_year, 2021);
/// assert_eq!(config.validation.year_floor, 1999);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub validation: ValidationPolicy,
    pub window: WindowPolicy,
    /// First season in which a super senior counts as a pandemic extension.
    pub covid_first_year: i32,
    /// Seed assigned to unseeded wrestlers for differentials. Derived from
    /// the data when absent.
    pub unseeded_seed: Option<u8>,
    /// Length of the bracket ranking lists.
    pub top_brackets: usize,
    /// Number of youngest and oldest brackets to list.
    pub age_extremes: usize,
    /// Largest bracket in the "chalkiest sums" table.
    pub chalk_sum_limit: i64,
    /// Number of brackets in the "largest sums" table.
    pub largest_sums: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::default(),
            window: WindowPolicy::default(),
            covid_first_year: COVID_FIRST_YEAR,
            unseeded_seed: None,
            top_brackets: 10,
            age_extremes: 3,
            chalk_sum_limit: 10,
            largest_sums: 4,
        }
    }
}
