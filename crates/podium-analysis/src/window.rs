//! Career-window filter
//!
//! Longitudinal statistics are only meaningful for careers that are fully
//! observable. A wrestler who was a freshman in the dataset's first season
//! may have placed as a "freshman" only because earlier seasons are missing,
//! and a junior in the final season may still add finishes. This module
//! removes such careers so they neither inflate nor truncate the sequences
//! the classification engine sees.
//!
//! # Window Policy
//!
//! For each eligibility class the admissible seasons form a closed range
//! offset from the dataset's first and last season:
//!
//! | Class | lower bound    | upper bound    |
//! |-------|----------------|----------------|
//! | Fr    | `year_min + 0` | `year_max - 3` |
//! | So    | `year_min + 1` | `year_max - 2` |
//! | Jr    | `year_min + 2` | `year_max - 1` |
//! | Sr    | `year_min + 3` | `year_max`     |
//! | SSr   | `year_min + 4` | `year_max`     |
//!
//! A career is **observably complete** when its latest finish is as a senior
//! or super senior, or when enough seasons have passed since its latest
//! finish that further finishes would have appeared (`Jr` 3, `So` 4,
//! `Fr` 5 seasons before `year_max`).
//!
//! Both checks operate on whole careers: one out-of-window record excludes
//! every record of that wrestler.
//!
//! # Examples
//!
//! ```
//! use podium_analysis::{record::Eligibility, window::{CareerWindow, WindowPolicy}};
//!
//! let window = CareerWindow::new(&WindowPolicy::default(), 2000, 2025);
//! let fr = window.range(Eligibility::Fr);
//! assert_eq!((fr.start, fr.end), (2000, 2022));
//! assert!(window.contains(Eligibility::SSr, 2004));
//! assert!(!window.contains(Eligibility::SSr, 2003));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    career::{self, Career},
    record::{Dataset, Eligibility},
};

/// A value for each eligibility class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTable<T> {
    #[serde(rename = "Fr")]
    pub fr: T,
    #[serde(rename = "So")]
    pub so: T,
    #[serde(rename = "Jr")]
    pub jr: T,
    #[serde(rename = "Sr")]
    pub sr: T,
    #[serde(rename = "SSr")]
    pub ssr: T,
}

impl<T> ClassTable<T> {
    #[must_use]
    pub fn get(&self, eligibility: Eligibility) -> &T {
        match eligibility {
            Eligibility::Fr => &self.fr,
            Eligibility::So => &self.so,
            Eligibility::Jr => &self.jr,
            Eligibility::Sr => &self.sr,
            Eligibility::SSr => &self.ssr,
        }
    }
}

/// Offsets of one class's admissible seasons.
///
/// `lower_offset` is added to the dataset's first season and `upper_offset`
/// to its last season (so it is usually zero or negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassWindow {
    pub lower_offset: i32,
    pub upper_offset: i32,
}

impl ClassWindow {
    const fn new(lower_offset: i32, upper_offset: i32) -> Self {
        Self {
            lower_offset,
            upper_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPolicy {
    pub offsets: ClassTable<ClassWindow>,
    /// Seasons that must have passed since a career's latest finish in this
    /// class for the career to count as complete. `None` means always
    /// complete.
    pub completion_lags: ClassTable<Option<i32>>,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            offsets: ClassTable {
                fr: ClassWindow::new(0, -3),
                so: ClassWindow::new(1, -2),
                jr: ClassWindow::new(2, -1),
                sr: ClassWindow::new(3, 0),
                ssr: ClassWindow::new(4, 0),
            },
            completion_lags: ClassTable {
                fr: Some(5),
                so: Some(4),
                jr: Some(3),
                sr: None,
                ssr: None,
            },
        }
    }
}

/// A closed range of seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// The window policy resolved against a dataset's season bounds.
#[derive(Debug, Clone)]
pub struct CareerWindow {
    ranges: ClassTable<YearRange>,
    completion_lags: ClassTable<Option<i32>>,
    year_max: i32,
}

/// Outcome of the window filter for one career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    #[display("admitted")]
    Admitted,
    #[display("incomplete")]
    Incomplete,
    #[display("out of window")]
    OutOfWindow,
}

/// Outcome of filtering, counted per wrestler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub wrestlers: usize,
    /// Careers that may still add finishes.
    pub incomplete: usize,
    /// Complete careers with at least one record outside its class range.
    pub out_of_window: usize,
    pub admitted: usize,
}

impl CareerWindow {
    #[must_use]
    pub fn new(policy: &WindowPolicy, year_min: i32, year_max: i32) -> Self {
        let range = |w: &ClassWindow| YearRange {
            start: year_min + w.lower_offset,
            end: year_max + w.upper_offset,
        };
        let offsets = &policy.offsets;
        Self {
            ranges: ClassTable {
                fr: range(&offsets.fr),
                so: range(&offsets.so),
                jr: range(&offsets.jr),
                sr: range(&offsets.sr),
                ssr: range(&offsets.ssr),
            },
            completion_lags: policy.completion_lags.clone(),
            year_max,
        }
    }

    /// Resolves the policy against the dataset's own season bounds.
    #[must_use]
    pub fn for_dataset(policy: &WindowPolicy, dataset: &Dataset) -> Self {
        Self::new(policy, dataset.year_min(), dataset.year_max())
    }

    #[must_use]
    pub fn range(&self, eligibility: Eligibility) -> YearRange {
        *self.ranges.get(eligibility)
    }

    #[must_use]
    pub fn contains(&self, eligibility: Eligibility, year: i32) -> bool {
        self.range(eligibility).contains(year)
    }

    /// Every `(eligibility, year)` of the career is inside its class range.
    #[must_use]
    pub fn is_fully_in_window(&self, career: &Career<'_>) -> bool {
        career
            .records()
            .iter()
            .all(|r| self.contains(r.eligibility, r.year))
    }

    /// The career cannot gain further finishes within the dataset.
    #[must_use]
    pub fn is_observably_complete(&self, career: &Career<'_>) -> bool {
        let Some(latest) = career.latest() else {
            return false;
        };
        match *self.completion_lags.get(latest.eligibility) {
            Some(lag) => latest.year <= self.year_max - lag,
            None => true,
        }
    }

    /// Why a career is or is not admitted; completeness is checked first.
    #[must_use]
    pub fn status(&self, career: &Career<'_>) -> WindowStatus {
        if !self.is_observably_complete(career) {
            WindowStatus::Incomplete
        } else if !self.is_fully_in_window(career) {
            WindowStatus::OutOfWindow
        } else {
            WindowStatus::Admitted
        }
    }

    /// Keeps only careers that are both complete and fully in window.
    ///
    /// The returned dataset inherits the season bounds of `dataset`.
    #[must_use]
    pub fn filter(&self, dataset: &Dataset) -> (Dataset, WindowSummary) {
        let mut summary = WindowSummary::default();
        let mut admitted = BTreeSet::new();
        for career in career::group(dataset) {
            summary.wrestlers += 1;
            match self.status(&career) {
                WindowStatus::Incomplete => summary.incomplete += 1,
                WindowStatus::OutOfWindow => {
                    debug!(wrestler = career.wrestler(), "career outside window");
                    summary.out_of_window += 1;
                }
                WindowStatus::Admitted => {
                    admitted.insert(career.wrestler());
                }
            }
        }
        summary.admitted = admitted.len();
        let filtered = dataset.retain_wrestlers(&admitted);
        info!(
            wrestlers = summary.wrestlers,
            admitted = summary.admitted,
            incomplete = summary.incomplete,
            out_of_window = summary.out_of_window,
            records = filtered.len(),
            "applied career window"
        );
        (filtered, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::aa;

    fn window() -> CareerWindow {
        CareerWindow::new(&WindowPolicy::default(), 2000, 2025)
    }

    #[test]
    fn test_default_ranges() {
        let w = window();
        let expect = [
            (Eligibility::Fr, 2000, 2022),
            (Eligibility::So, 2001, 2023),
            (Eligibility::Jr, 2002, 2024),
            (Eligibility::Sr, 2003, 2025),
            (Eligibility::SSr, 2004, 2025),
        ];
        for (elig, start, end) in expect {
            assert_eq!(w.range(elig), YearRange { start, end }, "{elig}");
        }
    }

    #[test]
    fn test_completion_lags() {
        let w = window();
        let check = |elig, year| {
            let rows = [aa("A", elig, year, 3)];
            w.is_observably_complete(&Career::new("A", rows.iter().collect()))
        };
        assert!(check(Eligibility::Fr, 2020));
        assert!(!check(Eligibility::Fr, 2021));
        assert!(check(Eligibility::So, 2021));
        assert!(!check(Eligibility::So, 2022));
        assert!(check(Eligibility::Jr, 2022));
        assert!(!check(Eligibility::Jr, 2023));
        assert!(check(Eligibility::Sr, 2025));
        assert!(check(Eligibility::SSr, 2025));
    }

    #[test]
    fn test_one_out_of_window_record_excludes_career() {
        let dataset = Dataset::new(vec![
            aa("Early", Eligibility::So, 2000, 4),
            aa("Early", Eligibility::Jr, 2001, 2),
            aa("Early", Eligibility::Sr, 2002, 1),
            aa("Ok", Eligibility::Fr, 2010, 5),
            aa("Ok", Eligibility::Sr, 2013, 1),
            aa("Late", Eligibility::So, 2024, 3),
            aa("Anchor", Eligibility::Sr, 2025, 8),
        ])
        .unwrap();
        let (filtered, summary) = window().filter(&dataset);
        assert_eq!(filtered.wrestlers(), BTreeSet::from(["Anchor", "Ok"]));
        assert_eq!(filtered.len(), 3);
        assert_eq!(summary.wrestlers, 4);
        assert_eq!(summary.out_of_window, 1);
        assert_eq!(summary.incomplete, 1);
        assert_eq!(summary.admitted, 2);
        assert_eq!(filtered.year_min(), 2000);
    }

    #[test]
    fn test_status_checks_completeness_first() {
        let w = window();
        let rows = [aa("A", Eligibility::So, 2000, 3), aa("A", Eligibility::Jr, 2024, 2)];
        let career = Career::new("A", rows.iter().collect());
        assert_eq!(w.status(&career), WindowStatus::Incomplete);
        let rows = [aa("B", Eligibility::So, 2000, 3)];
        let career = Career::new("B", rows.iter().collect());
        assert_eq!(w.status(&career), WindowStatus::OutOfWindow);
        assert_eq!(WindowStatus::OutOfWindow.to_string(), "out of window");
    }

    #[test]
    fn test_policy_deserializes_partial_config() {
        let json = r#"{ "completion_lags": { "Fr": 4, "So": 3, "Jr": 2, "Sr": null, "SSr": null } }"#;
        let policy: WindowPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.completion_lags.fr, Some(4));
        assert_eq!(policy.offsets, WindowPolicy::default().offsets);
    }
}
