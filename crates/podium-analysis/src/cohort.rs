//! Cross-sectional tallies by eligibility class
//!
//! Raw per-class and per-season counts. These use every validated record, not
//! only the careers admitted by the window filter.

use std::collections::BTreeMap;

use podium_stats::frequency::Frequency;

use crate::record::{Dataset, Eligibility};

/// All-American and national-champion counts per class.
#[derive(Debug, Clone)]
pub struct EligibilitySummary {
    pub aa: Frequency<Eligibility>,
    pub nc: Frequency<Eligibility>,
}

impl EligibilitySummary {
    #[must_use]
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            aa: Frequency::with_keys(
                Eligibility::ALL,
                dataset.records().iter().map(|r| r.eligibility),
            ),
            nc: Frequency::with_keys(Eligibility::ALL, dataset.champions().map(|r| r.eligibility)),
        }
    }
}

/// Counts per season and class, with every season between the dataset's
/// bounds present.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTrends {
    pub years: Vec<i32>,
    pub aa: BTreeMap<Eligibility, Vec<usize>>,
    pub nc: BTreeMap<Eligibility, Vec<usize>>,
}

impl YearlyTrends {
    #[must_use]
    pub fn new(dataset: &Dataset) -> Self {
        let years = dataset.years().collect::<Vec<_>>();
        let empty = || {
            Eligibility::ALL
                .into_iter()
                .map(|e| (e, vec![0; years.len()]))
                .collect::<BTreeMap<_, _>>()
        };
        let mut aa = empty();
        let mut nc = empty();
        for record in dataset.records() {
            let Ok(index) = usize::try_from(record.year - dataset.year_min()) else {
                continue;
            };
            if let Some(slot) = aa.get_mut(&record.eligibility).and_then(|c| c.get_mut(index)) {
                *slot += 1;
            }
            if record.is_champion()
                && let Some(slot) = nc.get_mut(&record.eligibility).and_then(|c| c.get_mut(index))
            {
                *slot += 1;
            }
        }
        Self { years, aa, nc }
    }
}

/// Centered rolling mean; windows are truncated at both ends rather than
/// dropped, so the output has the same length as `counts`.
///
/// `window` should be odd.
///
/// ```
/// # use podium_analysis::cohort::rolling_mean;
/// assert_eq!(rolling_mean(&[3, 0, 3, 6], 3), vec![1.5, 2.0, 3.0, 4.5]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rolling_mean(counts: &[usize], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..counts.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(counts.len());
            let slice = &counts[lo..hi];
            slice.iter().sum::<usize>() as f64 / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::aa;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            aa("A", Eligibility::Fr, 2000, 1),
            aa("B", Eligibility::Sr, 2000, 2),
            aa("C", Eligibility::Sr, 2002, 1),
            aa("D", Eligibility::Sr, 2002, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_eligibility_summary() {
        let summary = EligibilitySummary::new(&dataset());
        assert_eq!(summary.aa.count(&Eligibility::Sr), 3);
        assert_eq!(summary.aa.count(&Eligibility::SSr), 0);
        assert_eq!(summary.aa.iter().count(), 5);
        assert_eq!(summary.nc.total(), 2);
        assert_eq!(summary.nc.percent(&Eligibility::Fr), 50.0);
    }

    #[test]
    fn test_yearly_trends_zero_filled() {
        let trends = YearlyTrends::new(&dataset());
        assert_eq!(trends.years, vec![2000, 2001, 2002]);
        assert_eq!(trends.aa[&Eligibility::Sr], vec![1, 0, 2]);
        assert_eq!(trends.nc[&Eligibility::Sr], vec![0, 0, 1]);
        assert_eq!(trends.nc[&Eligibility::SSr], vec![0, 0, 0]);
    }

    #[test]
    fn test_rolling_mean_edges() {
        assert!(rolling_mean(&[], 3).is_empty());
        assert_eq!(rolling_mean(&[4], 3), vec![4.0]);
        assert_eq!(rolling_mean(&[1, 2, 3], 1), vec![1.0, 2.0, 3.0]);
    }
}
