//! Career archetype classification
//!
//! Archetypes are independent, non-exclusive labels describing the *shape*
//! of a wrestler's placement sequence. Lower places are better, so an
//! "improving" career is one whose places decrease.
//!
//! # Placement Archetypes
//!
//! All six require at least [`MIN_AAS`] finishes and are evaluated once over
//! the whole sequence, so each matches a career at most once:
//!
//! - [`Archetype::ContinuedProgression`]: strictly better every season
//! - [`Archetype::PlateauBreaker`]: the same place twice in a row, then a
//!   better place right after
//! - [`Archetype::RegressionSurvivor`]: a drop of three or more places, later
//!   followed by a finish within one place of the best before the drop
//! - [`Archetype::ConsistentElite`]: every finish between 2nd and 4th
//! - [`Archetype::EarlyPeak`]: best finish in the first half of the career
//!   and the last finish at least two places worse
//! - [`Archetype::FinishOnAWin`]: every finish odd (won the last match of
//!   the tournament)
//!
//! # Last Chance
//!
//! Single-finish careers are instead checked for the [`LastChance`]
//! sub-kinds, which may co-occur.
//!
//! # Examples
//!
//! ```
//! use podium_analysis::archetype::{self, Archetype};
//!
//! let labels = archetype::classify(&[5, 3, 1]);
//! assert_eq!(labels, vec![Archetype::ContinuedProgression, Archetype::FinishOnAWin]);
//! assert!(archetype::classify(&[1, 2]).is_empty());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{career::Career, record::Eligibility};

/// Fewest finishes a placement archetype can match.
pub const MIN_AAS: usize = 3;

/// Default first season of the pandemic-extension super senior year.
pub const COVID_FIRST_YEAR: i32 = 2021;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
pub enum Archetype {
    #[display("Continued Progression")]
    #[serde(rename = "Continued Progression")]
    ContinuedProgression,
    #[display("Plateau Breaker")]
    #[serde(rename = "Plateau Breaker")]
    PlateauBreaker,
    #[display("Regression Survivor")]
    #[serde(rename = "Regression Survivor")]
    RegressionSurvivor,
    #[display("Consistent Elite")]
    #[serde(rename = "Consistent Elite")]
    ConsistentElite,
    #[display("Early Peak")]
    #[serde(rename = "Early Peak")]
    EarlyPeak,
    #[display("Finish on a Win")]
    #[serde(rename = "Finish on a Win")]
    FinishOnAWin,
}

impl Archetype {
    pub const ALL: [Self; 6] = [
        Self::ContinuedProgression,
        Self::PlateauBreaker,
        Self::RegressionSurvivor,
        Self::ConsistentElite,
        Self::EarlyPeak,
        Self::FinishOnAWin,
    ];

    /// One-line description for report tables.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ContinuedProgression => "The wrestling ideal: improving every single year",
            Self::PlateauBreaker => {
                "Stuck at the same placement for consecutive years, then finally breaking through"
            }
            Self::RegressionSurvivor => {
                "Suffered a major setback (3+ places) but clawed their way back"
            }
            Self::ConsistentElite => "Multiple top-4 finishes but no championship",
            Self::EarlyPeak => {
                "Best wrestling came early in their career, couldn't recapture it by the end"
            }
            Self::FinishOnAWin => {
                "Always finishing the season strong: winning their final placement match"
            }
        }
    }

    /// Whether `places` (career order) has this shape.
    #[must_use]
    pub fn matches(self, places: &[u8]) -> bool {
        if places.len() < MIN_AAS {
            return false;
        }
        match self {
            Self::ContinuedProgression => is_continued_progression(places),
            Self::PlateauBreaker => is_plateau_breaker(places),
            Self::RegressionSurvivor => is_regression_survivor(places),
            Self::ConsistentElite => is_consistent_elite(places),
            Self::EarlyPeak => is_early_peak(places),
            Self::FinishOnAWin => is_finish_on_a_win(places),
        }
    }
}

/// Every placement archetype matching `places`, in [`Archetype::ALL`] order.
///
/// Total over any input: short or empty sequences simply match nothing.
#[must_use]
pub fn classify(places: &[u8]) -> Vec<Archetype> {
    Archetype::ALL
        .into_iter()
        .filter(|a| a.matches(places))
        .collect()
}

fn is_continued_progression(places: &[u8]) -> bool {
    places.windows(2).all(|w| w[0] > w[1])
}

fn is_plateau_breaker(places: &[u8]) -> bool {
    places
        .windows(3)
        .any(|w| w[0] == w[1] && w[2] < w[0])
}

fn is_regression_survivor(places: &[u8]) -> bool {
    let n = places.len();
    (0..n.saturating_sub(2)).any(|i| {
        if places[i + 1].saturating_sub(places[i]) < 3 {
            return false;
        }
        let best_before = places[..=i].iter().copied().min().unwrap_or(places[i]);
        places[i + 2..]
            .iter()
            .any(|&p| p <= best_before.saturating_add(1))
    })
}

fn is_consistent_elite(places: &[u8]) -> bool {
    places.iter().all(|p| (2..=4).contains(p))
}

fn is_early_peak(places: &[u8]) -> bool {
    let Some(&best) = places.iter().min() else {
        return false;
    };
    let Some(best_index) = places.iter().position(|&p| p == best) else {
        return false;
    };
    let last = places[places.len() - 1];
    best_index < places.len() / 2 && last >= best.saturating_add(2)
}

fn is_finish_on_a_win(places: &[u8]) -> bool {
    places.iter().all(|p| p % 2 == 1)
}

/// Sub-kinds of a single-finish career.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
pub enum LastChance {
    /// The only finish came as a senior or super senior.
    #[display("Senior Last Chance")]
    #[serde(rename = "Senior Last Chance")]
    Senior,
    /// The only finish came in a pandemic-extension super senior season.
    #[display("COVID Last Chance")]
    #[serde(rename = "COVID Last Chance")]
    Covid,
    /// The only finish was a title in the final year.
    #[display("Championship Last Chance")]
    #[serde(rename = "Championship Last Chance")]
    Championship,
}

impl LastChance {
    pub const ALL: [Self; 3] = [Self::Senior, Self::Covid, Self::Championship];

    #[must_use]
    pub fn criteria(self) -> &'static str {
        match self {
            Self::Senior => "First and only All-American finish came in their final year",
            Self::Covid => {
                "Pandemic extension granted one final chance at the podium and they made the most of it"
            }
            Self::Championship => {
                "Senior year breakthrough: never placed before, went straight to the top of the podium"
            }
        }
    }
}

/// Last Chance sub-kinds of a finish that is a wrestler's only one.
#[must_use]
pub fn classify_last_chance(
    eligibility: Eligibility,
    year: i32,
    place: u8,
    covid_first_year: i32,
) -> Vec<LastChance> {
    let mut kinds = Vec::new();
    if eligibility.is_final_year() {
        kinds.push(LastChance::Senior);
    }
    if eligibility == Eligibility::SSr && year >= covid_first_year {
        kinds.push(LastChance::Covid);
    }
    if place == 1 && eligibility.is_final_year() {
        kinds.push(LastChance::Championship);
    }
    kinds
}

/// Career AA-count bucket used to break down archetype counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
pub enum AaBucket {
    #[display("3")]
    #[serde(rename = "3")]
    Three,
    #[display("4")]
    #[serde(rename = "4")]
    Four,
    #[display("5+")]
    #[serde(rename = "5+")]
    FivePlus,
}

impl AaBucket {
    pub const ALL: [Self; 3] = [Self::Three, Self::Four, Self::FivePlus];

    /// Bucket for a career length; `None` below [`MIN_AAS`].
    #[must_use]
    pub fn from_aa_count(n: usize) -> Option<Self> {
        match n {
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            n if n >= 5 => Some(Self::FivePlus),
            _ => None,
        }
    }
}

/// A classified wrestler as listed in reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Member {
    pub wrestler: String,
    /// `Name (Fr-So-Jr-Sr)` placement string.
    pub placement: String,
}

impl Member {
    fn of(career: &Career<'_>) -> Self {
        Self {
            wrestler: career.wrestler().to_owned(),
            placement: career.placement_string(),
        }
    }
}

/// Classification of every career, grouped for reporting.
#[derive(Debug, Clone, Default)]
pub struct ArchetypeTally {
    placement: BTreeMap<Archetype, BTreeMap<AaBucket, Vec<Member>>>,
    last_chance: BTreeMap<LastChance, Vec<Member>>,
}

impl ArchetypeTally {
    /// Classifies each career and groups the matches.
    ///
    /// Members are sorted by wrestler name within each group.
    #[must_use]
    pub fn from_careers(careers: &[Career<'_>], covid_first_year: i32) -> Self {
        let mut tally = Self::default();
        for career in careers {
            let places = career.places();
            if let Some(bucket) = AaBucket::from_aa_count(places.len()) {
                for archetype in classify(&places) {
                    tally
                        .placement
                        .entry(archetype)
                        .or_default()
                        .entry(bucket)
                        .or_default()
                        .push(Member::of(career));
                }
            }
            if let [only] = career.records() {
                for kind in
                    classify_last_chance(only.eligibility, only.year, only.place, covid_first_year)
                {
                    tally
                        .last_chance
                        .entry(kind)
                        .or_default()
                        .push(Member::of(career));
                }
            }
        }
        tally.placement.values_mut().flat_map(BTreeMap::values_mut).for_each(|m| m.sort());
        tally.last_chance.values_mut().for_each(|m| m.sort());
        tally
    }

    /// Wrestlers matching `archetype` whose career falls in `bucket`.
    #[must_use]
    pub fn members(&self, archetype: Archetype, bucket: AaBucket) -> &[Member] {
        self.placement
            .get(&archetype)
            .and_then(|b| b.get(&bucket))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self, archetype: Archetype, bucket: AaBucket) -> usize {
        self.members(archetype, bucket).len()
    }

    /// Matches across all buckets.
    #[must_use]
    pub fn total(&self, archetype: Archetype) -> usize {
        AaBucket::ALL
            .into_iter()
            .map(|b| self.count(archetype, b))
            .sum()
    }

    #[must_use]
    pub fn last_chance_members(&self, kind: LastChance) -> &[Member] {
        self.last_chance
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        career,
        record::{Dataset, test_util::aa},
        window::{CareerWindow, WindowPolicy},
    };

    #[test]
    fn test_classification_is_total() {
        assert!(classify(&[]).is_empty());
        assert!(classify(&[1]).is_empty());
        assert!(classify(&[8, 8]).is_empty());
        for a in 1..=8 {
            for b in 1..=8 {
                for c in 1..=8 {
                    let _ = classify(&[a, b, c]);
                }
            }
        }
    }

    #[test]
    fn test_continued_progression() {
        assert!(Archetype::ContinuedProgression.matches(&[4, 3, 2, 1]));
        assert!(!Archetype::ContinuedProgression.matches(&[4, 3, 3, 1]));
        assert!(!Archetype::ContinuedProgression.matches(&[2, 1]));
    }

    #[test]
    fn test_plateau_breaker() {
        assert!(Archetype::PlateauBreaker.matches(&[4, 3, 3, 1]));
        assert!(Archetype::PlateauBreaker.matches(&[5, 5, 2]));
        assert!(!Archetype::PlateauBreaker.matches(&[5, 5, 5]));
        assert!(!Archetype::PlateauBreaker.matches(&[5, 4, 4]));
    }

    #[test]
    fn test_regression_survivor() {
        assert!(Archetype::RegressionSurvivor.matches(&[1, 4, 1]));
        assert!(Archetype::RegressionSurvivor.matches(&[1, 4, 2]));
        assert!(!Archetype::RegressionSurvivor.matches(&[1, 4, 3]));
        assert!(!Archetype::RegressionSurvivor.matches(&[2, 4, 2]));
        // the recovery must come after the drop season
        assert!(Archetype::RegressionSurvivor.matches(&[3, 2, 6, 8, 3]));
        assert!(!Archetype::RegressionSurvivor.matches(&[2, 6, 8]));
    }

    #[test]
    fn test_consistent_elite() {
        assert!(Archetype::ConsistentElite.matches(&[2, 3, 4]));
        assert!(!Archetype::ConsistentElite.matches(&[1, 2, 3]));
        assert!(!Archetype::ConsistentElite.matches(&[2, 3, 5]));
    }

    #[test]
    fn test_early_peak() {
        assert!(Archetype::EarlyPeak.matches(&[1, 3, 4]));
        assert!(Archetype::EarlyPeak.matches(&[3, 1, 2, 4]));
        // first minimum is at index 1, not below 3 / 2
        assert!(!Archetype::EarlyPeak.matches(&[3, 1, 4]));
        assert!(!Archetype::EarlyPeak.matches(&[1, 3, 2]));
        assert!(!Archetype::EarlyPeak.matches(&[5, 3, 1]));
    }

    #[test]
    fn test_finish_on_a_win() {
        assert!(Archetype::FinishOnAWin.matches(&[7, 5, 1]));
        assert!(!Archetype::FinishOnAWin.matches(&[7, 5, 2]));
    }

    #[test]
    fn test_last_chance_all_kinds() {
        let kinds = classify_last_chance(Eligibility::SSr, 2022, 1, COVID_FIRST_YEAR);
        assert_eq!(
            kinds,
            vec![LastChance::Senior, LastChance::Covid, LastChance::Championship]
        );
        let kinds = classify_last_chance(Eligibility::SSr, 2019, 3, COVID_FIRST_YEAR);
        assert_eq!(kinds, vec![LastChance::Senior]);
        assert!(classify_last_chance(Eligibility::Jr, 2022, 1, COVID_FIRST_YEAR).is_empty());
    }

    #[test]
    fn test_bucket_keys() {
        assert_eq!(AaBucket::from_aa_count(2), None);
        assert_eq!(AaBucket::from_aa_count(3), Some(AaBucket::Three));
        assert_eq!(AaBucket::from_aa_count(6), Some(AaBucket::FivePlus));
        assert_eq!(AaBucket::FivePlus.to_string(), "5+");
    }

    #[test]
    fn test_end_to_end_progression_career() {
        let dataset = Dataset::new(vec![
            aa("A", Eligibility::Jr, 2012, 1),
            aa("A", Eligibility::Fr, 2010, 5),
            aa("A", Eligibility::So, 2011, 3),
            aa("B", Eligibility::Sr, 2008, 2),
            aa("C", Eligibility::SSr, 2021, 1),
            aa("D", Eligibility::Sr, 2025, 4),
        ])
        .unwrap();
        let window = CareerWindow::for_dataset(&WindowPolicy::default(), &dataset);
        let (filtered, _) = window.filter(&dataset);
        let careers = career::group(&filtered);
        let a = careers.iter().find(|c| c.wrestler() == "A").unwrap();
        assert_eq!(a.places(), vec![5, 3, 1]);

        let tally = ArchetypeTally::from_careers(&careers, COVID_FIRST_YEAR);
        let members = tally.members(Archetype::ContinuedProgression, AaBucket::Three);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].placement, "A (5-3-1-DNP)");
        assert_eq!(tally.total(Archetype::FinishOnAWin), 1);
        assert_eq!(tally.total(Archetype::ConsistentElite), 0);
        assert_eq!(tally.total(Archetype::EarlyPeak), 0);

        let senior: Vec<_> = tally
            .last_chance_members(LastChance::Senior)
            .iter()
            .map(|m| m.wrestler.as_str())
            .collect();
        assert_eq!(senior, vec!["B", "C", "D"]);
        assert_eq!(tally.last_chance_members(LastChance::Covid).len(), 1);
        assert_eq!(tally.last_chance_members(LastChance::Championship)[0].wrestler, "C");
    }
}
