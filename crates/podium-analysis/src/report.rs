//! Report documents
//!
//! Plain nested, owned, serializable documents built from the analysis
//! results. Every leaf is an integer, a float, a pre-formatted percentage
//! string or a list of strings, so a static site generator can address any
//! value by a dotted path such as `report_stats.nc.Sr.count`.
//!
//! | Document | File | Built from |
//! |----------|------|------------|
//! | [`ReportStats`] | `report_stats.json` | unfiltered dataset |
//! | [`ProgressionReport`] | `report_02_stats.json` | admitted careers |
//! | [`BracketReport`] | `report_03_stats.json` | unfiltered brackets |
//! | [`TrendsReport`] | `report_trends.json` | unfiltered dataset |

use std::collections::BTreeMap;

use podium_stats::{descriptive::DescriptiveStats, frequency::Frequency};
use serde::Serialize;

use crate::{
    archetype::{AaBucket, Archetype, ArchetypeTally, LastChance},
    bracket::{BracketAnalysis, BracketScore, ChalkRound},
    career::{Direction, PlaceChange},
    cohort::{self, EligibilitySummary, YearlyTrends},
    config::AnalysisConfig,
    pipeline::PipelineOutput,
    progression::{ComboTier, ImprovedCareer, ProgressionAnalysis},
    record::Eligibility,
    validate::ValidationReport,
    window::{WindowSummary, YearRange},
};

/// Window of the rolling mean in [`TrendsReport`].
pub const TREND_WINDOW: usize = 3;

/// Percentage with one decimal, or `"0"` when `total` is zero.
///
/// ```
/// # use podium_analysis::report::pct_string;
/// assert_eq!(pct_string(1, 3), "33.3");
/// assert_eq!(pct_string(0, 0), "0");
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pct_string(count: usize, total: usize) -> String {
    if total == 0 {
        "0".to_owned()
    } else {
        format!("{:.1}", 100.0 * count as f64 / total as f64)
    }
}

#[expect(clippy::cast_precision_loss)]
fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(100.0 * count as f64 / total as f64, 1)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Every document of one run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    pub stats: ReportStats,
    pub progression: ProgressionReport,
    pub brackets: BracketReport,
    pub trends: TrendsReport,
}

impl ReportBundle {
    #[must_use]
    pub fn build(output: &PipelineOutput, config: &AnalysisConfig) -> Self {
        let progression = output.progression(config);
        let brackets = output.brackets(config);
        Self {
            stats: ReportStats::new(output),
            progression: ProgressionReport::new(&progression),
            brackets: BracketReport::new(&brackets, config),
            trends: TrendsReport::new(output),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassStat {
    pub count: usize,
    pub pct: String,
    pub label: String,
}

fn class_stats(freq: &Frequency<Eligibility>) -> BTreeMap<Eligibility, ClassStat> {
    Eligibility::ALL
        .into_iter()
        .map(|e| {
            let count = freq.count(&e);
            let stat = ClassStat {
                count,
                pct: pct_string(count, freq.total()),
                label: e.label().to_owned(),
            };
            (e, stat)
        })
        .collect()
}

/// Headline counts by eligibility class (`report_stats.json`).
#[derive(Debug, Clone, Serialize)]
pub struct ReportStats {
    pub year_min: i32,
    pub year_max: i32,
    /// `"2000–2025"`
    pub year_range: String,
    pub total_aa: usize,
    pub total_nc: usize,
    pub nc: BTreeMap<Eligibility, ClassStat>,
    pub aa: BTreeMap<Eligibility, ClassStat>,
    pub validation: ValidationReport,
    pub window: WindowDoc,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowDoc {
    pub ranges: BTreeMap<Eligibility, YearRange>,
    #[serde(flatten)]
    pub summary: WindowSummary,
}

impl ReportStats {
    #[must_use]
    pub fn new(output: &PipelineOutput) -> Self {
        let dataset = &output.dataset;
        let summary = EligibilitySummary::new(dataset);
        Self {
            year_min: dataset.year_min(),
            year_max: dataset.year_max(),
            year_range: format!("{}–{}", dataset.year_min(), dataset.year_max()),
            total_aa: summary.aa.total(),
            total_nc: summary.nc.total(),
            nc: class_stats(&summary.nc),
            aa: class_stats(&summary.aa),
            validation: output.validation.clone(),
            window: WindowDoc {
                ranges: Eligibility::ALL
                    .into_iter()
                    .map(|e| (e, output.window.range(e)))
                    .collect(),
                summary: output.window_summary,
            },
        }
    }
}

/// Wrestlers by exact AA count; the `n_5plus` tier includes longer careers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelDoc {
    pub all: usize,
    pub n_1plus: usize,
    pub n_2plus: usize,
    pub n_3plus: usize,
    pub n_4plus: usize,
    pub n_5plus: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightMoveDoc {
    pub n_transitions: usize,
    pub moves_up: usize,
    pub moves_down: usize,
    pub up_improved: usize,
    pub up_worse: usize,
    pub up_same: usize,
    pub down_improved: usize,
    pub down_worse: usize,
    pub down_same: usize,
    pub pct_up_improved: f64,
    pub pct_up_worse: f64,
    pub pct_up_same: f64,
    pub pct_down_improved: f64,
    pub pct_down_worse: f64,
    pub pct_down_same: f64,
}

/// One archetype's counts and members, keyed by AA bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeDoc {
    pub description: String,
    pub total: usize,
    pub by_aa: BTreeMap<String, usize>,
    pub wrestlers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArchetypeEntry {
    Placement(ArchetypeDoc),
    LastChance(BTreeMap<String, ArchetypeDoc>),
}

/// Key of the Last Chance group inside `archetypes`.
pub const LAST_CHANCE_KEY: &str = "Last Chance";

/// Bucket of single-finish careers.
const SINGLE_AA_BUCKET: &str = "1";

fn archetype_docs(tally: &ArchetypeTally) -> BTreeMap<String, ArchetypeEntry> {
    let mut docs = Archetype::ALL
        .into_iter()
        .map(|archetype| {
            let by_aa = AaBucket::ALL
                .into_iter()
                .map(|b| (b.to_string(), tally.count(archetype, b)))
                .collect();
            let wrestlers = AaBucket::ALL
                .into_iter()
                .map(|b| {
                    let placements = tally
                        .members(archetype, b)
                        .iter()
                        .map(|m| m.placement.clone())
                        .collect();
                    (b.to_string(), placements)
                })
                .collect();
            let doc = ArchetypeDoc {
                description: archetype.description().to_owned(),
                total: tally.total(archetype),
                by_aa,
                wrestlers,
            };
            (archetype.to_string(), ArchetypeEntry::Placement(doc))
        })
        .collect::<BTreeMap<_, _>>();

    let last_chance = LastChance::ALL
        .into_iter()
        .map(|kind| {
            let members = tally.last_chance_members(kind);
            let doc = ArchetypeDoc {
                description: kind.criteria().to_owned(),
                total: members.len(),
                by_aa: BTreeMap::from([(SINGLE_AA_BUCKET.to_owned(), members.len())]),
                wrestlers: BTreeMap::from([(
                    SINGLE_AA_BUCKET.to_owned(),
                    members.iter().map(|m| m.placement.clone()).collect(),
                )]),
            };
            (kind.to_string(), doc)
        })
        .collect();
    docs.insert(
        LAST_CHANCE_KEY.to_owned(),
        ArchetypeEntry::LastChance(last_chance),
    );
    docs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboRowDoc {
    /// Class flags in `Fr`..`SSr` order.
    pub classes: BTreeMap<Eligibility, bool>,
    pub count: usize,
    pub pct: String,
    pub wrestlers: Vec<String>,
    pub placements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboTierDoc {
    pub n: usize,
    pub total: usize,
    pub rows: Vec<ComboRowDoc>,
}

fn combo_docs(tiers: &[ComboTier]) -> Vec<ComboTierDoc> {
    tiers
        .iter()
        .map(|tier| ComboTierDoc {
            n: tier.n,
            total: tier.total,
            rows: tier
                .rows
                .iter()
                .map(|row| ComboRowDoc {
                    classes: Eligibility::ALL
                        .into_iter()
                        .map(|e| (e, row.classes.contains(&e)))
                        .collect(),
                    count: row.count,
                    pct: format!("{:.1}%", row.pct),
                    wrestlers: row.wrestlers.clone(),
                    placements: row.placements.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Multi-AA careers, progressions and archetypes (`report_02_stats.json`).
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionReport {
    pub n_complete_careers: usize,
    pub n_unique_wrestlers: usize,
    pub n_multi_aa: usize,
    pub n_multi_weight_aa: usize,
    pub n_improved_every_year: usize,
    pub pct_improved_of_multi_aa: f64,
    pub pct_improved_of_all: f64,
    pub funnel: FunnelDoc,
    pub five_x_aa_wrestlers: Vec<String>,
    pub multi_weight_by_n: BTreeMap<String, usize>,
    pub multi_weight_wrestlers: BTreeMap<String, Vec<String>>,
    pub multi_weight_displays: Vec<String>,
    pub weight_move_stats: WeightMoveDoc,
    pub wrestlers_4_weights: Vec<String>,
    pub improved_every_year: Vec<ImprovedCareer>,
    pub archetypes: BTreeMap<String, ArchetypeEntry>,
    pub eligibility_combos: Vec<ComboTierDoc>,
    pub nc_eligibility_combos: Vec<ComboTierDoc>,
}

impl ProgressionReport {
    #[must_use]
    pub fn new(analysis: &ProgressionAnalysis) -> Self {
        let funnel = &analysis.funnel;
        let n_multi_aa = funnel.multi_aa();
        let n_improved = analysis.improved.len();
        let multi = &analysis.multi_weight;
        let moves = &analysis.transitions;
        let weight_counts = [2, 3, 4];

        Self {
            n_complete_careers: funnel.all,
            n_unique_wrestlers: funnel.all,
            n_multi_aa,
            n_multi_weight_aa: multi.total(),
            n_improved_every_year: n_improved,
            pct_improved_of_multi_aa: pct(n_improved, n_multi_aa),
            pct_improved_of_all: pct(n_improved, funnel.all),
            funnel: FunnelDoc {
                all: funnel.all,
                n_1plus: funnel.tiers[0],
                n_2plus: funnel.tiers[1],
                n_3plus: funnel.tiers[2],
                n_4plus: funnel.tiers[3],
                n_5plus: funnel.tiers[4],
            },
            five_x_aa_wrestlers: funnel.top_tier_wrestlers.clone(),
            multi_weight_by_n: weight_counts
                .into_iter()
                .map(|n| (n.to_string(), multi.wrestlers_at(n).len()))
                .collect(),
            multi_weight_wrestlers: weight_counts
                .into_iter()
                .map(|n| (n.to_string(), multi.wrestlers_at(n).to_vec()))
                .collect(),
            multi_weight_displays: multi.displays.clone(),
            weight_move_stats: WeightMoveDoc {
                n_transitions: moves.transitions.len(),
                moves_up: moves.moves(Direction::Up),
                moves_down: moves.moves(Direction::Down),
                up_improved: moves.count(Direction::Up, PlaceChange::Improved),
                up_worse: moves.count(Direction::Up, PlaceChange::Worse),
                up_same: moves.count(Direction::Up, PlaceChange::Same),
                down_improved: moves.count(Direction::Down, PlaceChange::Improved),
                down_worse: moves.count(Direction::Down, PlaceChange::Worse),
                down_same: moves.count(Direction::Down, PlaceChange::Same),
                pct_up_improved: round_to(moves.percent(Direction::Up, PlaceChange::Improved), 1),
                pct_up_worse: round_to(moves.percent(Direction::Up, PlaceChange::Worse), 1),
                pct_up_same: round_to(moves.percent(Direction::Up, PlaceChange::Same), 1),
                pct_down_improved: round_to(
                    moves.percent(Direction::Down, PlaceChange::Improved),
                    1,
                ),
                pct_down_worse: round_to(moves.percent(Direction::Down, PlaceChange::Worse), 1),
                pct_down_same: round_to(moves.percent(Direction::Down, PlaceChange::Same), 1),
            },
            wrestlers_4_weights: multi.wrestlers_at(4).to_vec(),
            improved_every_year: analysis.improved.clone(),
            archetypes: archetype_docs(&analysis.archetypes),
            eligibility_combos: combo_docs(&analysis.aa_combos),
            nc_eligibility_combos: combo_docs(&analysis.nc_combos),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketRow {
    pub bracket: String,
    pub year: i32,
    pub weight: u32,
    pub differential_sum: i64,
    pub exact_matches: usize,
    pub average_age: f64,
    pub details: String,
}

impl BracketRow {
    fn seeded(score: &BracketScore) -> Self {
        Self::with_details(score, score.seed_details.clone())
    }

    fn aged(score: &BracketScore) -> Self {
        Self::with_details(score, score.class_details.clone())
    }

    fn with_details(score: &BracketScore, details: String) -> Self {
        Self {
            bracket: score.bracket.to_string(),
            year: score.bracket.year,
            weight: score.bracket.weight,
            differential_sum: score.differential_sum,
            exact_matches: score.exact_matches,
            average_age: round_to(score.average_age, 2),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChalkDoc {
    pub count: usize,
    pub matches: Vec<String>,
}

/// Mean and median rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Center {
    pub mean: f64,
    pub median: f64,
}

impl Center {
    fn of(stats: Option<&DescriptiveStats>, decimals: i32) -> Option<Self> {
        stats.map(|s| Self {
            mean: round_to(s.mean, decimals),
            median: round_to(s.median, decimals),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMaxDoc {
    pub max_count: usize,
    pub brackets: Vec<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSeedDoc {
    pub seeded: usize,
    pub unseeded: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub seeds: BTreeMap<u8, usize>,
}

/// Seed and placement statistics per bracket (`report_03_stats.json`).
#[derive(Debug, Clone, Serialize)]
pub struct BracketReport {
    pub unseeded_seed: u8,
    pub n_brackets: usize,
    pub chalk: BTreeMap<ChalkRound, ChalkDoc>,
    pub yearly_differential: BTreeMap<i32, i64>,
    pub yearly_differential_summary: Option<Center>,
    pub most_chalk_by_sum: Vec<BracketRow>,
    pub most_chalk_by_matches: Vec<BracketRow>,
    pub differential_summary: Option<Center>,
    pub exact_match_summary: Option<Center>,
    pub exact_match_distribution: BTreeMap<usize, usize>,
    pub chalk_sums: BTreeMap<i64, Vec<BracketRow>>,
    pub largest_sums: Vec<BracketRow>,
    pub exact_matches_4_5: BTreeMap<usize, Vec<BracketRow>>,
    pub max_aa_by_class: BTreeMap<Eligibility, ClassMaxDoc>,
    pub seed_distribution: BTreeMap<u8, PlaceSeedDoc>,
    pub youngest: Vec<BracketRow>,
    pub oldest: Vec<BracketRow>,
    pub age_summary: Option<Center>,
}

impl BracketReport {
    #[must_use]
    pub fn new(analysis: &BracketAnalysis, config: &AnalysisConfig) -> Self {
        let rows = |scores: Vec<&BracketScore>| {
            scores.into_iter().map(BracketRow::seeded).collect::<Vec<_>>()
        };
        let aged = |scores: Vec<&BracketScore>| {
            scores.into_iter().map(BracketRow::aged).collect::<Vec<_>>()
        };
        let yearly = analysis.yearly_differentials.values().copied();

        Self {
            unseeded_seed: analysis.placeholder,
            n_brackets: analysis.scores.len(),
            chalk: ChalkRound::ALL
                .into_iter()
                .map(|round| {
                    let matches = analysis
                        .chalk
                        .get(&round)
                        .map(|ms| ms.iter().map(ToString::to_string).collect())
                        .unwrap_or_default();
                    let doc = ChalkDoc {
                        count: analysis.chalk_count(round),
                        matches,
                    };
                    (round, doc)
                })
                .collect(),
            yearly_differential: analysis.yearly_differentials.clone(),
            yearly_differential_summary: Center::of(
                DescriptiveStats::from_integers(yearly).as_ref(),
                1,
            ),
            most_chalk_by_sum: rows(analysis.most_chalk_by_sum(config.top_brackets)),
            most_chalk_by_matches: rows(analysis.most_chalk_by_matches(config.top_brackets)),
            differential_summary: Center::of(analysis.differential_stats().as_ref(), 1),
            exact_match_summary: Center::of(analysis.exact_match_stats().as_ref(), 1),
            exact_match_distribution: analysis
                .exact_match_distribution()
                .iter()
                .map(|(k, c)| (*k, c))
                .collect(),
            chalk_sums: analysis
                .sums_within(0..=config.chalk_sum_limit)
                .into_iter()
                .map(|(sum, scores)| (sum, rows(scores)))
                .collect(),
            largest_sums: rows(analysis.largest_sums(config.largest_sums)),
            exact_matches_4_5: [4, 5]
                .into_iter()
                .map(|n| (n, rows(analysis.with_exact_matches(n))))
                .collect(),
            max_aa_by_class: analysis
                .max_by_class
                .iter()
                .map(|m| {
                    let doc = ClassMaxDoc {
                        max_count: m.max_count,
                        brackets: m.brackets.iter().map(|(k, _)| k.to_string()).collect(),
                        details: m
                            .brackets
                            .iter()
                            .map(|(k, details)| format!("{k}: {details}"))
                            .collect(),
                    };
                    (m.eligibility, doc)
                })
                .collect(),
            seed_distribution: analysis
                .seeds_by_place
                .iter()
                .map(|p| {
                    let doc = PlaceSeedDoc {
                        seeded: p.seeded,
                        unseeded: p.unseeded,
                        mean: p.stats.as_ref().map(|s| round_to(s.mean, 2)),
                        median: p.stats.as_ref().map(|s| s.median),
                        seeds: p.frequency.iter().map(|(s, c)| (*s, c)).collect(),
                    };
                    (p.place, doc)
                })
                .collect(),
            youngest: aged(analysis.youngest(config.age_extremes)),
            oldest: aged(analysis.oldest(config.age_extremes)),
            age_summary: Center::of(analysis.age_stats().as_ref(), 2),
        }
    }
}

/// Counts per season and class (`report_trends.json`).
#[derive(Debug, Clone, Serialize)]
pub struct TrendsReport {
    pub years: Vec<i32>,
    pub aa: BTreeMap<Eligibility, Vec<usize>>,
    pub nc: BTreeMap<Eligibility, Vec<usize>>,
    /// Centered rolling mean of `aa`.
    pub aa_smoothed: BTreeMap<Eligibility, Vec<f64>>,
    pub nc_smoothed: BTreeMap<Eligibility, Vec<f64>>,
}

impl TrendsReport {
    #[must_use]
    pub fn new(output: &PipelineOutput) -> Self {
        let trends = YearlyTrends::new(&output.dataset);
        let smooth = |counts: &BTreeMap<Eligibility, Vec<usize>>| {
            counts
                .iter()
                .map(|(e, c)| {
                    let smoothed = cohort::rolling_mean(c, TREND_WINDOW)
                        .into_iter()
                        .map(|v| round_to(v, 2))
                        .collect::<Vec<_>>();
                    (*e, smoothed)
                })
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            aa_smoothed: smooth(&trends.aa),
            nc_smoothed: smooth(&trends.nc),
            years: trends.years,
            aa: trends.aa,
            nc: trends.nc,
        }
    }
}
