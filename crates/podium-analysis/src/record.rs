//! Placement records and the validated dataset
//!
//! This module provides the typed, immutable representation of the
//! All-American placement table once it has passed ingestion and validation.
//!
//! # Overview
//!
//! Each [`PlacementRecord`] is one All-American finish: one wrestler, one
//! season, one weight class, one place between 1 and 8. A [`Dataset`] owns the
//! records together with the season bounds observed in the *full* table, so
//! that a filtered dataset still knows the window it was cut from.
//!
//! # Data Structure
//!
//! ```text
//! Dataset
//! ├─ year_min, year_max (bounds of the unfiltered table)
//! └─ records: Vec<PlacementRecord>
//!     ├─ wrestler, school
//!     ├─ year, weight, place
//!     ├─ seed (numeric / unseeded / missing)
//!     ├─ eligibility (Fr, So, Jr, Sr, SSr)
//!     └─ placement_seed_delta (as provided by the dataset)
//! ```
//!
//! # Examples
//!
//! ```
//! use podium_analysis::record::{Eligibility, Seed};
//!
//! assert!(Eligibility::Fr < Eligibility::SSr);
//! assert_eq!("SSr".parse::<Eligibility>().unwrap(), Eligibility::SSr);
//! assert_eq!("US".parse::<Seed>().unwrap(), Seed::Unseeded);
//! assert_eq!("4".parse::<Seed>().unwrap().number(), Some(4));
//! ```

use std::{collections::BTreeSet, fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

/// Academic standing of a wrestler at the time of an All-American finish.
///
/// The declaration order is the eligibility rank used to order careers:
/// `Fr < So < Jr < Sr < SSr`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Eligibility {
    Fr,
    So,
    Jr,
    Sr,
    SSr,
}

impl Eligibility {
    /// All classes in rank order.
    pub const ALL: [Self; 5] = [Self::Fr, Self::So, Self::Jr, Self::Sr, Self::SSr];

    /// Canonical short form as written in the dataset.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "Fr",
            Self::So => "So",
            Self::Jr => "Jr",
            Self::Sr => "Sr",
            Self::SSr => "SSr",
        }
    }

    /// Plural label used in report prose.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fr => "Freshmen",
            Self::So => "Sophomores",
            Self::Jr => "Juniors",
            Self::Sr => "Seniors",
            Self::SSr => "Super Seniors",
        }
    }

    /// Ordinal "age" used for bracket age composition (`Fr` = 1 .. `SSr` = 5).
    #[must_use]
    pub fn age(self) -> u8 {
        self as u8 + 1
    }

    /// Senior or super senior.
    #[must_use]
    pub fn is_final_year(self) -> bool {
        matches!(self, Self::Sr | Self::SSr)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown eligibility class '{value}'")]
pub struct UnknownEligibility {
    pub value: String,
}

impl FromStr for Eligibility {
    type Err = UnknownEligibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownEligibility {
                value: s.to_owned(),
            })
    }
}

/// Pre-tournament seed of a wrestler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seed {
    Seeded(u8),
    /// Marked `US` in the dataset.
    Unseeded,
}

impl Seed {
    /// Dataset marker for unseeded wrestlers.
    pub const UNSEEDED_MARKER: &'static str = "US";

    /// Numeric seed, `None` when unseeded.
    #[must_use]
    pub fn number(self) -> Option<u8> {
        match self {
            Self::Seeded(n) => Some(n),
            Self::Unseeded => None,
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded(n) => fmt::Display::fmt(n, f),
            Self::Unseeded => f.write_str(Self::UNSEEDED_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed '{value}'")]
pub struct InvalidSeed {
    pub value: String,
}

impl FromStr for Seed {
    type Err = InvalidSeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::UNSEEDED_MARKER) {
            return Ok(Self::Unseeded);
        }
        match s.parse::<u8>() {
            Ok(n) if n > 0 => Ok(Self::Seeded(n)),
            _ => Err(InvalidSeed {
                value: s.to_owned(),
            }),
        }
    }
}

impl Serialize for Seed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Seeded(n) => serializer.serialize_u8(*n),
            Self::Unseeded => serializer.serialize_str(Self::UNSEEDED_MARKER),
        }
    }
}

/// One All-American finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementRecord {
    pub wrestler: String,
    pub school: String,
    pub year: i32,
    pub weight: u32,
    /// Final place, 1 (champion) through 8.
    pub place: u8,
    /// `None` when the seed cell was empty or unreadable.
    pub seed: Option<Seed>,
    pub eligibility: Eligibility,
    /// `seed - place` as provided by the dataset.
    pub placement_seed_delta: i32,
    pub progression_eligible: Option<bool>,
    /// The dataset's own career AA tally for this wrestler.
    pub aa_count: Option<u32>,
}

impl PlacementRecord {
    /// Chronological sort key of a career: season, then eligibility rank.
    #[must_use]
    pub fn career_key(&self) -> (i32, Eligibility) {
        (self.year, self.eligibility)
    }

    /// National champion finish.
    #[must_use]
    pub fn is_champion(&self) -> bool {
        self.place == 1
    }

    /// Numeric seed, `None` for unseeded or missing seeds.
    #[must_use]
    pub fn seed_number(&self) -> Option<u8> {
        self.seed.and_then(Seed::number)
    }

    /// Seed as written in the dataset (`"US"` for unseeded, `"?"` if missing).
    #[must_use]
    pub fn seed_label(&self) -> String {
        self.seed.map_or_else(|| "?".to_owned(), |s| s.to_string())
    }
}

/// The validated placement table.
///
/// Constructed by [`validate`](crate::validate::validate); never mutated
/// afterwards. Subsets produced by [`Dataset::retain_wrestlers`] keep the
/// season bounds of the table they were cut from.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<PlacementRecord>,
    year_min: i32,
    year_max: i32,
}

impl Dataset {
    /// Builds a dataset from records, deriving the season bounds.
    ///
    /// Returns `None` if `records` is empty.
    #[must_use]
    pub fn new(records: Vec<PlacementRecord>) -> Option<Self> {
        let year_min = records.iter().map(|r| r.year).min()?;
        let year_max = records.iter().map(|r| r.year).max()?;
        Some(Self {
            records,
            year_min,
            year_max,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn year_min(&self) -> i32 {
        self.year_min
    }

    #[must_use]
    pub fn year_max(&self) -> i32 {
        self.year_max
    }

    /// Every season between the bounds, inclusive.
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.year_min..=self.year_max
    }

    /// Champion (place 1) records.
    pub fn champions(&self) -> impl Iterator<Item = &PlacementRecord> {
        self.records.iter().filter(|r| r.is_champion())
    }

    /// Distinct wrestler names.
    #[must_use]
    pub fn wrestlers(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.wrestler.as_str()).collect()
    }

    /// A new dataset holding only the records of the given wrestlers.
    ///
    /// The season bounds are inherited, not recomputed.
    #[must_use]
    pub fn retain_wrestlers(&self, keep: &BTreeSet<&str>) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| keep.contains(r.wrestler.as_str()))
                .cloned()
                .collect(),
            year_min: self.year_min,
            year_max: self.year_max,
        }
    }
}
