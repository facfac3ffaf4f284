//! Year/weight bracket statistics
//!
//! A [`Bracket`] is the podium of one weight class in one season: up to
//! eight records, reconstructed by grouping and never stored. Brackets are
//! built from the *unfiltered* dataset since they are cross-sectional.
//!
//! # Measures
//!
//! - **Chalk**: a placement match (final, 3rd, 5th, 7th) where the two
//!   wrestlers seeded for it finished exactly there, in seed order
//! - **Exact matches**: wrestlers whose numeric seed equals their place
//! - **Differential**: `seed - place`, positive when a wrestler beat their
//!   seed. Unseeded wrestlers get a placeholder seed above every real seed,
//!   so a high finish from outside the seeds always reads as a large upset.
//! - **Average age**: `Fr` = 1 through `SSr` = 5, averaged over the podium
//!
//! # Examples
//!
//! ```
//! use podium_analysis::{bracket, record::{Dataset, Eligibility, PlacementRecord, Seed}};
//!
//! let rec = |name: &str, place, seed| PlacementRecord {
//!     wrestler: name.into(),
//!     school: "State".into(),
//!     year: 2010,
//!     weight: 157,
//!     place,
//!     seed: Some(seed),
//!     eligibility: Eligibility::Jr,
//!     placement_seed_delta: 0,
//!     progression_eligible: None,
//!     aa_count: None,
//! };
//! let dataset = Dataset::new(vec![
//!     rec("A", 1, Seed::Seeded(1)),
//!     rec("B", 2, Seed::Seeded(2)),
//!     rec("C", 3, Seed::Unseeded),
//! ])
//! .unwrap();
//! let brackets = bracket::group(&dataset);
//! assert_eq!(brackets.len(), 1);
//! assert_eq!(brackets[0].exact_matches(), 2);
//! assert_eq!(brackets[0].chalk_matches().len(), 1);
//! ```

use std::{
    collections::BTreeMap,
    fmt,
    ops::RangeInclusive,
};

use podium_stats::{descriptive::DescriptiveStats, frequency::Frequency};
use serde::Serialize;

use crate::record::{Dataset, Eligibility, PlacementRecord, Seed};

/// Placeholder seed when the dataset has no numeric seeds at all.
pub const FALLBACK_UNSEEDED_SEED: u8 = 17;

/// Separator between wrestlers in a bracket's detail string.
pub const DETAIL_DELIM: &str = " | ";

/// Placeholder seed for unseeded wrestlers: one past the largest real seed.
#[must_use]
pub fn unseeded_placeholder(dataset: &Dataset) -> u8 {
    dataset
        .records()
        .iter()
        .filter_map(PlacementRecord::seed_number)
        .max()
        .map_or(FALLBACK_UNSEEDED_SEED, |max| max.saturating_add(1))
}

/// `seed - place` for one record, substituting `placeholder` for an
/// unseeded or missing seed.
#[must_use]
pub fn differential(record: &PlacementRecord, placeholder: u8) -> i32 {
    let seed = record.seed_number().unwrap_or(placeholder);
    i32::from(seed) - i32::from(record.place)
}

/// Differential sums per season; every season between the dataset's bounds
/// is present, with zero for seasons without records.
#[must_use]
pub fn yearly_differentials(dataset: &Dataset, placeholder: u8) -> BTreeMap<i32, i64> {
    let mut sums = dataset
        .years()
        .map(|y| (y, 0))
        .collect::<BTreeMap<_, _>>();
    for record in dataset.records() {
        *sums.entry(record.year).or_default() += i64::from(differential(record, placeholder));
    }
    sums
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BracketKey {
    pub year: i32,
    pub weight: u32,
}

impl fmt::Display for BracketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}lbs", self.year, self.weight)
    }
}

/// The podium of one weight class in one season, ordered by place.
#[derive(Debug, Clone)]
pub struct Bracket<'a> {
    key: BracketKey,
    records: Vec<&'a PlacementRecord>,
}

/// Groups the dataset into brackets, ordered by `(year, weight)`.
#[must_use]
pub fn group(dataset: &Dataset) -> Vec<Bracket<'_>> {
    let mut by_key = BTreeMap::<BracketKey, Vec<&PlacementRecord>>::new();
    for record in dataset.records() {
        let key = BracketKey {
            year: record.year,
            weight: record.weight,
        };
        by_key.entry(key).or_default().push(record);
    }
    by_key
        .into_iter()
        .map(|(key, mut records)| {
            records.sort_by_key(|r| r.place);
            Bracket { key, records }
        })
        .collect()
}

impl<'a> Bracket<'a> {
    #[must_use]
    pub fn key(&self) -> BracketKey {
        self.key
    }

    #[must_use]
    pub fn records(&self) -> &[&'a PlacementRecord] {
        &self.records
    }

    /// The round's two finishers if they were seeded for exactly those
    /// places, in order.
    #[must_use]
    pub fn chalk(&self, round: ChalkRound) -> Option<ChalkMatch> {
        let (high, low) = round.places();
        let pair = self
            .records
            .iter()
            .filter(|r| r.place == high || r.place == low)
            .collect::<Vec<_>>();
        let [first, second] = pair.as_slice() else {
            return None;
        };
        let chalk = first.place == high
            && second.place == low
            && first.seed == Some(Seed::Seeded(high))
            && second.seed == Some(Seed::Seeded(low));
        chalk.then(|| ChalkMatch {
            bracket: self.key,
            round,
            winner: first.wrestler.clone(),
            runner_up: second.wrestler.clone(),
        })
    }

    /// Every chalk round of this bracket.
    #[must_use]
    pub fn chalk_matches(&self) -> Vec<ChalkMatch> {
        ChalkRound::ALL
            .into_iter()
            .filter_map(|round| self.chalk(round))
            .collect()
    }

    /// Wrestlers whose numeric seed equals their place.
    #[must_use]
    pub fn exact_matches(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.seed_number() == Some(r.place))
            .count()
    }

    #[must_use]
    pub fn differential_sum(&self, placeholder: u8) -> i64 {
        self.records
            .iter()
            .map(|r| i64::from(differential(r, placeholder)))
            .sum()
    }

    /// Mean eligibility age of the podium (`Fr` = 1 .. `SSr` = 5).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_age(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total = self
            .records
            .iter()
            .map(|r| u32::from(r.eligibility.age()))
            .sum::<u32>();
        f64::from(total) / self.records.len() as f64
    }

    #[must_use]
    pub fn class_count(&self, eligibility: Eligibility) -> usize {
        self.records
            .iter()
            .filter(|r| r.eligibility == eligibility)
            .count()
    }

    /// `1. Name (Seed) | 2. Name (Seed) | ...`
    #[must_use]
    pub fn seed_details(&self) -> String {
        self.details(PlacementRecord::seed_label)
    }

    /// `1. Name (Class) | 2. Name (Class) | ...`
    #[must_use]
    pub fn class_details(&self) -> String {
        self.details(|r| r.eligibility.to_string())
    }

    fn details(&self, label: impl Fn(&PlacementRecord) -> String) -> String {
        self.records
            .iter()
            .map(|r| format!("{}. {} ({})", r.place, r.wrestler, label(r)))
            .collect::<Vec<_>>()
            .join(DETAIL_DELIM)
    }
}

/// A placement match decided between adjacent places.
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
pub enum ChalkRound {
    #[display("Final")]
    #[serde(rename = "Final")]
    Final,
    #[display("3rd")]
    #[serde(rename = "3rd")]
    Third,
    #[display("5th")]
    #[serde(rename = "5th")]
    Fifth,
    #[display("7th")]
    #[serde(rename = "7th")]
    Seventh,
}

impl ChalkRound {
    pub const ALL: [Self; 4] = [Self::Final, Self::Third, Self::Fifth, Self::Seventh];

    /// The places decided by this match, winner first.
    #[must_use]
    pub fn places(self) -> (u8, u8) {
        match self {
            Self::Final => (1, 2),
            Self::Third => (3, 4),
            Self::Fifth => (5, 6),
            Self::Seventh => (7, 8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChalkMatch {
    pub bracket: BracketKey,
    pub round: ChalkRound,
    pub winner: String,
    pub runner_up: String,
}

impl fmt::Display for ChalkMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (high, low) = self.round.places();
        write!(
            f,
            "{}: {} ({high}→{high}), {} ({low}→{low})",
            self.bracket, self.winner, self.runner_up
        )
    }
}

/// Per-bracket measures, computed once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketScore {
    pub bracket: BracketKey,
    pub differential_sum: i64,
    pub exact_matches: usize,
    pub average_age: f64,
    pub seed_details: String,
    pub class_details: String,
}

/// The brackets with the most wrestlers of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMax {
    pub eligibility: Eligibility,
    pub max_count: usize,
    /// Every bracket reaching `max_count`, with its class details.
    pub brackets: Vec<(BracketKey, String)>,
}

/// Seeds of the wrestlers who finished in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSeeds {
    pub place: u8,
    pub seeded: usize,
    pub unseeded: usize,
    /// Over numeric seeds only; `None` if nobody in this place was seeded.
    pub stats: Option<DescriptiveStats>,
    pub frequency: Frequency<u8>,
}

/// Cross-sectional statistics over every bracket of a dataset.
#[derive(Debug, Clone)]
pub struct BracketAnalysis {
    pub placeholder: u8,
    pub scores: Vec<BracketScore>,
    pub chalk: BTreeMap<ChalkRound, Vec<ChalkMatch>>,
    pub yearly_differentials: BTreeMap<i32, i64>,
    pub max_by_class: Vec<ClassMax>,
    pub seeds_by_place: Vec<PlaceSeeds>,
}

impl BracketAnalysis {
    /// Analyzes every bracket. `placeholder` overrides the unseeded seed
    /// derived from the data.
    #[must_use]
    pub fn new(dataset: &Dataset, placeholder: Option<u8>) -> Self {
        let placeholder = placeholder.unwrap_or_else(|| unseeded_placeholder(dataset));
        let brackets = group(dataset);

        let mut chalk = ChalkRound::ALL
            .into_iter()
            .map(|r| (r, Vec::new()))
            .collect::<BTreeMap<_, _>>();
        for m in brackets.iter().flat_map(Bracket::chalk_matches) {
            chalk.entry(m.round).or_default().push(m);
        }

        let scores = brackets
            .iter()
            .map(|b| BracketScore {
                bracket: b.key(),
                differential_sum: b.differential_sum(placeholder),
                exact_matches: b.exact_matches(),
                average_age: b.average_age(),
                seed_details: b.seed_details(),
                class_details: b.class_details(),
            })
            .collect();

        Self {
            placeholder,
            scores,
            chalk,
            yearly_differentials: yearly_differentials(dataset, placeholder),
            max_by_class: max_by_class(&brackets),
            seeds_by_place: seeds_by_place(dataset),
        }
    }

    #[must_use]
    pub fn chalk_count(&self, round: ChalkRound) -> usize {
        self.chalk.get(&round).map_or(0, Vec::len)
    }

    /// Brackets with the lowest differential sums.
    #[must_use]
    pub fn most_chalk_by_sum(&self, n: usize) -> Vec<&BracketScore> {
        let mut sorted = self.scores.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|s| (s.differential_sum, s.bracket));
        sorted.truncate(n);
        sorted
    }

    /// Brackets with the most exact matches; ties go to the lower sum.
    #[must_use]
    pub fn most_chalk_by_matches(&self, n: usize) -> Vec<&BracketScore> {
        let mut sorted = self.scores.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|s| (std::cmp::Reverse(s.exact_matches), s.differential_sum, s.bracket));
        sorted.truncate(n);
        sorted
    }

    /// Brackets with the highest differential sums.
    #[must_use]
    pub fn largest_sums(&self, n: usize) -> Vec<&BracketScore> {
        let mut sorted = self.scores.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|s| (std::cmp::Reverse(s.differential_sum), s.bracket));
        sorted.truncate(n);
        sorted
    }

    /// Brackets grouped by differential sum, for sums within `range`.
    #[must_use]
    pub fn sums_within(&self, range: RangeInclusive<i64>) -> BTreeMap<i64, Vec<&BracketScore>> {
        let mut grouped = BTreeMap::<i64, Vec<&BracketScore>>::new();
        for score in self
            .scores
            .iter()
            .filter(|s| range.contains(&s.differential_sum))
        {
            grouped.entry(score.differential_sum).or_default().push(score);
        }
        grouped
    }

    /// Brackets with exactly `n` exact matches, in `(year, weight)` order.
    #[must_use]
    pub fn with_exact_matches(&self, n: usize) -> Vec<&BracketScore> {
        self.scores.iter().filter(|s| s.exact_matches == n).collect()
    }

    /// How many brackets had 0 through 8 exact matches.
    #[must_use]
    pub fn exact_match_distribution(&self) -> Frequency<usize> {
        Frequency::with_keys(0..=8, self.scores.iter().map(|s| s.exact_matches))
    }

    #[must_use]
    pub fn differential_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::from_integers(self.scores.iter().map(|s| s.differential_sum))
    }

    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn exact_match_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::from_integers(self.scores.iter().map(|s| s.exact_matches as i64))
    }

    #[must_use]
    pub fn age_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.scores.iter().map(|s| s.average_age))
    }

    /// Brackets with the lowest average age.
    #[must_use]
    pub fn youngest(&self, n: usize) -> Vec<&BracketScore> {
        let mut sorted = self.scores.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| {
            a.average_age
                .total_cmp(&b.average_age)
                .then(a.bracket.cmp(&b.bracket))
        });
        sorted.truncate(n);
        sorted
    }

    /// Brackets with the highest average age.
    #[must_use]
    pub fn oldest(&self, n: usize) -> Vec<&BracketScore> {
        let mut sorted = self.scores.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| {
            b.average_age
                .total_cmp(&a.average_age)
                .then(a.bracket.cmp(&b.bracket))
        });
        sorted.truncate(n);
        sorted
    }
}

fn max_by_class(brackets: &[Bracket<'_>]) -> Vec<ClassMax> {
    Eligibility::ALL
        .into_iter()
        .filter_map(|eligibility| {
            let max_count = brackets
                .iter()
                .map(|b| b.class_count(eligibility))
                .max()
                .filter(|&max| max > 0)?;
            let brackets = brackets
                .iter()
                .filter(|b| b.class_count(eligibility) == max_count)
                .map(|b| (b.key(), b.class_details()))
                .collect();
            Some(ClassMax {
                eligibility,
                max_count,
                brackets,
            })
        })
        .collect()
}

fn seeds_by_place(dataset: &Dataset) -> Vec<PlaceSeeds> {
    (1..=8)
        .map(|place| {
            let finishers = dataset
                .records()
                .iter()
                .filter(|r| r.place == place)
                .collect::<Vec<_>>();
            let frequency = Frequency::new(finishers.iter().filter_map(|r| r.seed_number()));
            let unseeded = finishers
                .iter()
                .filter(|r| r.seed == Some(Seed::Unseeded))
                .count();
            PlaceSeeds {
                place,
                seeded: frequency.total(),
                unseeded,
                stats: DescriptiveStats::new(frequency.iter().flat_map(|(seed, count)| {
                    std::iter::repeat_n(f64::from(*seed), count)
                })),
                frequency,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::record;

    fn seeded(name: &str, elig: Eligibility, year: i32, place: u8, seed: u8) -> PlacementRecord {
        record(name, elig, year, 157, place, Some(Seed::Seeded(seed)))
    }

    fn chalk_bracket() -> Dataset {
        Dataset::new(
            (1..=8)
                .map(|p| seeded(&format!("W{p}"), Eligibility::Jr, 2010, p, p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_final_chalk() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Sr, 2010, 1, 1),
            seeded("B", Eligibility::Jr, 2010, 2, 2),
        ])
        .unwrap();
        let brackets = group(&dataset);
        let m = brackets[0].chalk(ChalkRound::Final).unwrap();
        assert_eq!(m.winner, "A");
        assert_eq!(m.to_string(), "2010 157lbs: A (1→1), B (2→2)");
    }

    #[test]
    fn test_swapped_seeds_are_not_chalk() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Sr, 2010, 1, 2),
            seeded("B", Eligibility::Jr, 2010, 2, 1),
        ])
        .unwrap();
        assert!(group(&dataset)[0].chalk(ChalkRound::Final).is_none());
    }

    #[test]
    fn test_unseeded_never_chalk() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Sr, 2010, 7, 7),
            record("B", Eligibility::Jr, 2010, 157, 8, Some(Seed::Unseeded)),
        ])
        .unwrap();
        assert!(group(&dataset)[0].chalk(ChalkRound::Seventh).is_none());
    }

    #[test]
    fn test_missing_seed_is_never_chalk_or_exact() {
        let dataset = Dataset::new(vec![
            record("A", Eligibility::Sr, 2010, 157, 1, None),
            seeded("B", Eligibility::Jr, 2010, 2, 2),
            seeded("C", Eligibility::Jr, 2010, 3, 3),
            seeded("D", Eligibility::So, 2010, 4, 4),
        ])
        .unwrap();
        let brackets = group(&dataset);
        assert!(brackets[0].chalk(ChalkRound::Final).is_none());
        assert!(brackets[0].chalk(ChalkRound::Third).is_some());
        assert_eq!(brackets[0].exact_matches(), 3);
    }

    #[test]
    fn test_tied_places_are_not_chalk() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Sr, 2010, 1, 1),
            seeded("B", Eligibility::Jr, 2010, 2, 2),
            seeded("C", Eligibility::Jr, 2010, 2, 2),
        ])
        .unwrap();
        assert!(group(&dataset)[0].chalk(ChalkRound::Final).is_none());
    }

    #[test]
    fn test_perfect_bracket() {
        let dataset = chalk_bracket();
        let analysis = BracketAnalysis::new(&dataset, None);
        assert_eq!(analysis.placeholder, 9);
        let score = &analysis.scores[0];
        assert_eq!(score.exact_matches, 8);
        assert_eq!(score.differential_sum, 0);
        for round in ChalkRound::ALL {
            assert_eq!(analysis.chalk_count(round), 1);
        }
        assert_eq!(analysis.exact_match_distribution().count(&8), 1);
        assert_eq!(analysis.exact_match_distribution().count(&0), 0);
    }

    #[test]
    fn test_unseeded_placeholder_differential() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Sr, 2010, 2, 12),
            record("B", Eligibility::Jr, 2010, 157, 1, Some(Seed::Unseeded)),
            record("C", Eligibility::Jr, 2012, 157, 3, None),
        ])
        .unwrap();
        assert_eq!(unseeded_placeholder(&dataset), 13);
        let yearly = yearly_differentials(&dataset, 13);
        assert_eq!(yearly.keys().copied().collect::<Vec<_>>(), vec![2010, 2011, 2012]);
        assert_eq!(yearly[&2010], 10 + 12);
        assert_eq!(yearly[&2011], 0);
        assert_eq!(yearly[&2012], 10);

        let analysis = BracketAnalysis::new(&dataset, Some(20));
        assert_eq!(analysis.placeholder, 20);
        assert_eq!(analysis.yearly_differentials[&2010], 10 + 19);
    }

    #[test]
    fn test_age_rankings() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Fr, 2010, 1, 1),
            seeded("B", Eligibility::So, 2010, 2, 2),
            seeded("C", Eligibility::SSr, 2011, 1, 1),
            seeded("D", Eligibility::Sr, 2011, 2, 2),
            record("E", Eligibility::Jr, 2012, 165, 1, Some(Seed::Seeded(1))),
        ])
        .unwrap();
        let analysis = BracketAnalysis::new(&dataset, None);
        let youngest = analysis.youngest(1);
        assert_eq!(youngest[0].bracket.year, 2010);
        assert!((youngest[0].average_age - 1.5).abs() < f64::EPSILON);
        let oldest = analysis.oldest(2);
        assert_eq!(oldest[0].bracket.year, 2011);
        assert_eq!(oldest[1].bracket.year, 2012);
        assert_eq!(oldest[0].class_details, "1. C (SSr) | 2. D (Sr)");
    }

    #[test]
    fn test_max_by_class() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Fr, 2010, 1, 1),
            seeded("B", Eligibility::Fr, 2010, 2, 2),
            seeded("C", Eligibility::Fr, 2011, 1, 1),
            seeded("D", Eligibility::Sr, 2011, 2, 2),
        ])
        .unwrap();
        let analysis = BracketAnalysis::new(&dataset, None);
        let fr = &analysis.max_by_class[0];
        assert_eq!(fr.eligibility, Eligibility::Fr);
        assert_eq!(fr.max_count, 2);
        assert_eq!(fr.brackets.len(), 1);
        assert_eq!(fr.brackets[0].1, "1. A (Fr) | 2. B (Fr)");
        let classes: Vec<_> = analysis.max_by_class.iter().map(|m| m.eligibility).collect();
        assert_eq!(classes, vec![Eligibility::Fr, Eligibility::Sr]);
    }

    #[test]
    fn test_seeds_by_place() {
        let dataset = Dataset::new(vec![
            seeded("A", Eligibility::Jr, 2010, 1, 1),
            seeded("B", Eligibility::Jr, 2011, 1, 4),
            record("C", Eligibility::Jr, 2012, 157, 1, Some(Seed::Unseeded)),
        ])
        .unwrap();
        let analysis = BracketAnalysis::new(&dataset, None);
        let first = &analysis.seeds_by_place[0];
        assert_eq!(first.place, 1);
        assert_eq!(first.seeded, 2);
        assert_eq!(first.unseeded, 1);
        assert_eq!(first.stats.as_ref().unwrap().median, 2.5);
        assert!(analysis.seeds_by_place[1].stats.is_none());
    }

    #[test]
    fn test_rankings_and_sum_groups() {
        let mut records = chalk_bracket().records().to_vec();
        records.push(seeded("X", Eligibility::Jr, 2011, 1, 9));
        records.push(seeded("Y", Eligibility::Jr, 2011, 2, 2));
        let dataset = Dataset::new(records).unwrap();
        let analysis = BracketAnalysis::new(&dataset, None);
        assert_eq!(analysis.most_chalk_by_sum(1)[0].bracket.year, 2010);
        assert_eq!(analysis.largest_sums(1)[0].differential_sum, 8);
        assert_eq!(analysis.most_chalk_by_matches(2)[1].exact_matches, 1);
        let groups = analysis.sums_within(0..=10);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 8]);
        assert_eq!(analysis.with_exact_matches(8).len(), 1);
    }
}
