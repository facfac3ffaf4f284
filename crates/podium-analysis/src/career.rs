//! Per-athlete aggregation
//!
//! A [`Career`] is the chronologically ordered list of one wrestler's
//! All-American finishes, ordered by `(year, eligibility rank)`. Every
//! sequential rule in the crate (archetypes, "improved every year", weight
//! transitions) is defined on this order.
//!
//! Careers borrow their records from a [`Dataset`]; they are rebuilt on
//! demand and never stored.
//!
//! # Examples
//!
//! ```
//! use podium_analysis::{career, record::{Dataset, Eligibility, PlacementRecord, Seed}};
//!
//! let rec = |elig, year, place| PlacementRecord {
//!     wrestler: "A".into(),
//!     school: "State".into(),
//!     year,
//!     weight: 157,
//!     place,
//!     seed: Some(Seed::Seeded(place)),
//!     eligibility: elig,
//!     placement_seed_delta: 0,
//!     progression_eligible: None,
//!     aa_count: None,
//! };
//! let dataset = Dataset::new(vec![
//!     rec(Eligibility::Jr, 2012, 1),
//!     rec(Eligibility::Fr, 2010, 5),
//!     rec(Eligibility::So, 2011, 3),
//! ])
//! .unwrap();
//!
//! let careers = career::group(&dataset);
//! assert_eq!(careers[0].places(), vec![5, 3, 1]);
//! assert_eq!(careers[0].placement_string(), "A (5-3-1-DNP)");
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::{Dataset, Eligibility, PlacementRecord};

/// One wrestler's ordered All-American finishes.
#[derive(Debug, Clone)]
pub struct Career<'a> {
    wrestler: &'a str,
    records: Vec<&'a PlacementRecord>,
}

/// Groups the dataset by wrestler and orders each career chronologically.
///
/// Careers are returned sorted by wrestler name.
#[must_use]
pub fn group(dataset: &Dataset) -> Vec<Career<'_>> {
    let mut by_wrestler = BTreeMap::<&str, Vec<&PlacementRecord>>::new();
    for record in dataset.records() {
        by_wrestler
            .entry(record.wrestler.as_str())
            .or_default()
            .push(record);
    }
    by_wrestler
        .into_iter()
        .map(|(wrestler, records)| Career::new(wrestler, records))
        .collect()
}

impl<'a> Career<'a> {
    /// Builds a career, sorting `records` by `(year, eligibility rank)`.
    #[must_use]
    pub fn new(wrestler: &'a str, mut records: Vec<&'a PlacementRecord>) -> Self {
        records.sort_by_key(|r| r.career_key());
        Self { wrestler, records }
    }

    #[must_use]
    pub fn wrestler(&self) -> &'a str {
        self.wrestler
    }

    /// Records in career order.
    #[must_use]
    pub fn records(&self) -> &[&'a PlacementRecord] {
        &self.records
    }

    /// The most recent finish.
    #[must_use]
    pub fn latest(&self) -> Option<&'a PlacementRecord> {
        self.records.last().copied()
    }

    /// Number of All-American finishes.
    #[must_use]
    pub fn aa_count(&self) -> usize {
        self.records.len()
    }

    /// Number of national titles.
    #[must_use]
    pub fn nc_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_champion()).count()
    }

    /// Places in career order.
    #[must_use]
    pub fn places(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.place).collect()
    }

    /// `(year, weight, eligibility)` in career order.
    pub fn timeline(&self) -> impl Iterator<Item = (i32, u32, Eligibility)> + '_ {
        self.records
            .iter()
            .map(|r| (r.year, r.weight, r.eligibility))
    }

    #[must_use]
    pub fn distinct_weights(&self) -> BTreeSet<u32> {
        self.records.iter().map(|r| r.weight).collect()
    }

    /// Distinct classes with an All-American finish, in rank order.
    #[must_use]
    pub fn eligibility_combo(&self) -> BTreeSet<Eligibility> {
        self.records.iter().map(|r| r.eligibility).collect()
    }

    /// Distinct classes with a national title, in rank order.
    #[must_use]
    pub fn title_combo(&self) -> BTreeSet<Eligibility> {
        self.records
            .iter()
            .filter(|r| r.is_champion())
            .map(|r| r.eligibility)
            .collect()
    }

    /// `Name (Fr-So-Jr-Sr)` with the place earned in each class, or `DNP`.
    ///
    /// The `SSr` slot is appended only when the wrestler has a super senior
    /// finish. If a class appears twice the later finish wins.
    #[must_use]
    pub fn placement_string(&self) -> String {
        let by_class = self
            .records
            .iter()
            .map(|r| (r.eligibility, r.place))
            .collect::<BTreeMap<_, _>>();
        let parts = Eligibility::ALL
            .into_iter()
            .filter(|e| *e != Eligibility::SSr || by_class.contains_key(e))
            .map(|e| by_class.get(&e).map_or_else(|| "DNP".to_owned(), u8::to_string))
            .collect::<Vec<_>>();
        format!("{} ({})", self.wrestler, parts.join("-"))
    }

    /// `Name (w1, w2, ...)` with the distinct weights in ascending order.
    #[must_use]
    pub fn weights_string(&self) -> String {
        let weights = self
            .distinct_weights()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>();
        format!("{} ({})", self.wrestler, weights.join(", "))
    }

    /// Strictly better place every season; needs at least two finishes.
    #[must_use]
    pub fn improved_every_year(&self) -> bool {
        self.records.len() >= 2 && self.records.windows(2).all(|w| w[0].place > w[1].place)
    }

    /// Each consecutive pair of finishes where the weight changed.
    #[must_use]
    pub fn weight_transitions(&self) -> Vec<WeightTransition> {
        self.records
            .windows(2)
            .filter(|w| w[0].weight != w[1].weight)
            .map(|w| WeightTransition::new(self.wrestler, w[0], w[1]))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceChange {
    Improved,
    Worse,
    Same,
}

/// A move between weight classes from one finish to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightTransition {
    pub wrestler: String,
    pub from_weight: u32,
    pub to_weight: u32,
    pub from_place: u8,
    pub to_place: u8,
    pub direction: Direction,
    pub place_change: PlaceChange,
}

impl WeightTransition {
    fn new(wrestler: &str, from: &PlacementRecord, to: &PlacementRecord) -> Self {
        let direction = if to.weight > from.weight {
            Direction::Up
        } else {
            Direction::Down
        };
        let place_change = match to.place.cmp(&from.place) {
            std::cmp::Ordering::Less => PlaceChange::Improved,
            std::cmp::Ordering::Greater => PlaceChange::Worse,
            std::cmp::Ordering::Equal => PlaceChange::Same,
        };
        Self {
            wrestler: wrestler.to_owned(),
            from_weight: from.weight,
            to_weight: to.weight,
            from_place: from.place,
            to_place: to.place,
            direction,
            place_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        Seed,
        test_util::{aa, record},
    };

    #[test]
    fn test_career_order_by_year_then_rank() {
        let dataset = Dataset::new(vec![
            aa("A", Eligibility::Sr, 2013, 2),
            aa("A", Eligibility::So, 2011, 4),
            aa("B", Eligibility::Fr, 2011, 1),
            aa("A", Eligibility::Fr, 2010, 6),
        ])
        .unwrap();
        let careers = group(&dataset);
        assert_eq!(careers.len(), 2);
        assert_eq!(careers[0].wrestler(), "A");
        let years: Vec<_> = careers[0].timeline().map(|(y, _, _)| y).collect();
        assert_eq!(years, vec![2010, 2011, 2013]);
        assert_eq!(careers[0].places(), vec![6, 4, 2]);
        assert!(careers[0].improved_every_year());
    }

    #[test]
    fn test_same_year_orders_by_rank() {
        let a = aa("A", Eligibility::So, 2011, 4);
        let b = aa("A", Eligibility::Fr, 2011, 7);
        let career = Career::new("A", vec![&a, &b]);
        assert_eq!(career.places(), vec![7, 4]);
    }

    #[test]
    fn test_placement_string_with_ssr() {
        let rows = [
            aa("A", Eligibility::So, 2019, 3),
            aa("A", Eligibility::SSr, 2021, 1),
        ];
        let career = Career::new("A", rows.iter().collect());
        assert_eq!(career.placement_string(), "A (DNP-3-DNP-DNP-1)");
        assert_eq!(career.nc_count(), 1);
        assert_eq!(
            career.title_combo().into_iter().collect::<Vec<_>>(),
            vec![Eligibility::SSr]
        );
    }

    #[test]
    fn test_improved_every_year_needs_two() {
        let rows = [aa("A", Eligibility::Sr, 2019, 1)];
        let career = Career::new("A", rows.iter().collect());
        assert!(!career.improved_every_year());

        let rows = [
            aa("A", Eligibility::Jr, 2018, 2),
            aa("A", Eligibility::Sr, 2019, 2),
        ];
        let career = Career::new("A", rows.iter().collect());
        assert!(!career.improved_every_year());
    }

    #[test]
    fn test_weight_transitions() {
        let seed = Some(Seed::Seeded(3));
        let rows = [
            record("A", Eligibility::Fr, 2010, 149, 5, seed),
            record("A", Eligibility::So, 2011, 149, 3, seed),
            record("A", Eligibility::Jr, 2012, 157, 3, seed),
            record("A", Eligibility::Sr, 2013, 149, 1, seed),
        ];
        let career = Career::new("A", rows.iter().collect());
        let transitions = career.weight_transitions();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].direction, Direction::Up);
        assert_eq!(transitions[0].place_change, PlaceChange::Same);
        assert_eq!(transitions[1].direction, Direction::Down);
        assert_eq!(transitions[1].place_change, PlaceChange::Improved);
        assert_eq!(career.weights_string(), "A (149, 157)");
    }
}
