//! Longitudinal career statistics
//!
//! Everything here is computed over careers admitted by the window filter:
//! multi-AA counts, strictly improving careers, weight-class moves and the
//! eligibility classes in which honors were earned.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    archetype::ArchetypeTally,
    career::{Career, Direction, PlaceChange, WeightTransition},
    record::Eligibility,
};

/// Highest tier broken out in funnel and combination tables; longer careers
/// are grouped with it.
pub const MAX_TIER: usize = 5;

/// Wrestlers by number of All-American finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Funnel {
    pub all: usize,
    /// Index `i` holds wrestlers with exactly `i + 1` finishes; the last
    /// entry holds [`MAX_TIER`] or more.
    pub tiers: [usize; MAX_TIER],
    /// Names of wrestlers in the last tier, sorted.
    pub top_tier_wrestlers: Vec<String>,
}

impl Funnel {
    #[must_use]
    pub fn new(careers: &[Career<'_>]) -> Self {
        let mut funnel = Self {
            all: careers.len(),
            ..Self::default()
        };
        for career in careers {
            let n = career.aa_count().clamp(1, MAX_TIER);
            funnel.tiers[n - 1] += 1;
            if n == MAX_TIER {
                funnel.top_tier_wrestlers.push(career.wrestler().to_owned());
            }
        }
        funnel.top_tier_wrestlers.sort();
        funnel
    }

    /// Wrestlers with more than one finish.
    #[must_use]
    pub fn multi_aa(&self) -> usize {
        self.all - self.tiers[0]
    }
}

/// A career with a strictly better place every season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovedCareer {
    pub wrestler: String,
    /// Places joined with `-`, e.g. `4-2-1`.
    pub progression: String,
    pub years: String,
    pub eligibility: String,
    pub aa_count: usize,
}

impl ImprovedCareer {
    fn of(career: &Career<'_>) -> Self {
        let join = |parts: Vec<String>| parts.join("-");
        Self {
            wrestler: career.wrestler().to_owned(),
            progression: join(career.places().iter().map(u8::to_string).collect()),
            years: join(career.timeline().map(|(y, _, _)| y.to_string()).collect()),
            eligibility: join(career.timeline().map(|(_, _, e)| e.to_string()).collect()),
            aa_count: career.aa_count(),
        }
    }
}

/// Strictly improving careers ordered by progression text, then name.
#[must_use]
pub fn improved_every_year(careers: &[Career<'_>]) -> Vec<ImprovedCareer> {
    let mut rows = careers
        .iter()
        .filter(|c| c.improved_every_year())
        .map(ImprovedCareer::of)
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        a.progression
            .cmp(&b.progression)
            .then_with(|| a.wrestler.cmp(&b.wrestler))
    });
    rows
}

/// Wrestlers who placed at more than one weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiWeight {
    /// Distinct weight count (2 or more) to wrestler names, sorted.
    pub by_count: BTreeMap<usize, Vec<String>>,
    /// `Name (w1, w2, ...)` for every multi-weight wrestler, sorted.
    pub displays: Vec<String>,
}

impl MultiWeight {
    #[must_use]
    pub fn new(careers: &[Career<'_>]) -> Self {
        let mut multi = Self::default();
        for career in careers {
            let n = career.distinct_weights().len();
            if n >= 2 {
                multi
                    .by_count
                    .entry(n)
                    .or_default()
                    .push(career.wrestler().to_owned());
                multi.displays.push(career.weights_string());
            }
        }
        multi.by_count.values_mut().for_each(|names| names.sort());
        multi.displays.sort();
        multi
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.by_count.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn wrestlers_at(&self, n: usize) -> &[String] {
        self.by_count.get(&n).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Weight-class moves and how the next finish compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionStats {
    pub transitions: Vec<WeightTransition>,
}

impl TransitionStats {
    #[must_use]
    pub fn new(careers: &[Career<'_>]) -> Self {
        Self {
            transitions: careers
                .iter()
                .flat_map(Career::weight_transitions)
                .collect(),
        }
    }

    #[must_use]
    pub fn moves(&self, direction: Direction) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.direction == direction)
            .count()
    }

    #[must_use]
    pub fn count(&self, direction: Direction, change: PlaceChange) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.direction == direction && t.place_change == change)
            .count()
    }

    /// Share of moves in `direction` with the given outcome, in percent.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percent(&self, direction: Direction, change: PlaceChange) -> f64 {
        let moves = self.moves(direction);
        if moves == 0 {
            0.0
        } else {
            100.0 * self.count(direction, change) as f64 / moves as f64
        }
    }
}

/// Wrestlers sharing one combination of classes within a tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboRow {
    pub classes: BTreeSet<Eligibility>,
    pub count: usize,
    pub pct: f64,
    pub wrestlers: Vec<String>,
    /// `Name (Fr-So-Jr-Sr)` strings, in the same order as `wrestlers`.
    pub placements: Vec<String>,
}

/// All wrestlers with exactly `n` honors earned in `n` distinct classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboTier {
    pub n: usize,
    pub total: usize,
    pub rows: Vec<ComboRow>,
}

/// Tiers of All-American class combinations.
#[must_use]
pub fn aa_combo_tiers(careers: &[Career<'_>]) -> Vec<ComboTier> {
    combo_tiers(careers, |c| (c.aa_count(), c.eligibility_combo()))
}

/// Tiers of national-title class combinations, champions only.
#[must_use]
pub fn nc_combo_tiers(careers: &[Career<'_>]) -> Vec<ComboTier> {
    combo_tiers(careers, |c| (c.nc_count(), c.title_combo()))
}

/// Groups careers whose honor count equals their distinct class count.
///
/// Careers with two honors in one class are left out of every tier. Rows
/// are sorted by count, most common first.
#[expect(clippy::cast_precision_loss)]
fn combo_tiers<F>(careers: &[Career<'_>], honors: F) -> Vec<ComboTier>
where
    F: Fn(&Career<'_>) -> (usize, BTreeSet<Eligibility>),
{
    let mut tiers = BTreeMap::<usize, BTreeMap<BTreeSet<Eligibility>, Vec<&Career<'_>>>>::new();
    for career in careers {
        let (n, classes) = honors(career);
        if n == 0 || n > MAX_TIER || classes.len() != n {
            continue;
        }
        tiers
            .entry(n)
            .or_default()
            .entry(classes)
            .or_default()
            .push(career);
    }

    tiers
        .into_iter()
        .map(|(n, combos)| {
            let total = combos.values().map(Vec::len).sum::<usize>();
            let mut rows = combos
                .into_iter()
                .map(|(classes, mut members)| {
                    members.sort_by_key(|c| c.wrestler());
                    ComboRow {
                        classes,
                        count: members.len(),
                        pct: 100.0 * members.len() as f64 / total as f64,
                        wrestlers: members.iter().map(|c| c.wrestler().to_owned()).collect(),
                        placements: members.iter().map(|c| c.placement_string()).collect(),
                    }
                })
                .collect::<Vec<_>>();
            rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.classes.cmp(&b.classes)));
            ComboTier { n, total, rows }
        })
        .collect()
}

/// Every longitudinal statistic over the admitted careers.
#[derive(Debug, Clone)]
pub struct ProgressionAnalysis {
    pub funnel: Funnel,
    pub improved: Vec<ImprovedCareer>,
    pub multi_weight: MultiWeight,
    pub transitions: TransitionStats,
    pub aa_combos: Vec<ComboTier>,
    pub nc_combos: Vec<ComboTier>,
    pub archetypes: ArchetypeTally,
}

impl ProgressionAnalysis {
    #[must_use]
    pub fn new(careers: &[Career<'_>], covid_first_year: i32) -> Self {
        Self {
            funnel: Funnel::new(careers),
            improved: improved_every_year(careers),
            multi_weight: MultiWeight::new(careers),
            transitions: TransitionStats::new(careers),
            aa_combos: aa_combo_tiers(careers),
            nc_combos: nc_combo_tiers(careers),
            archetypes: ArchetypeTally::from_careers(careers, covid_first_year),
        }
    }
}
