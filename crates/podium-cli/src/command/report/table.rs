//! Console tables for the report command

use podium_analysis::{
    archetype::{AaBucket, Archetype, LastChance},
    bracket::ChalkRound,
    record::Eligibility,
    report::{
        ArchetypeDoc, ArchetypeEntry, BracketReport, BracketRow, Center, LAST_CHANCE_KEY,
        ProgressionReport, ReportBundle, ReportStats, WeightMoveDoc,
    },
};

pub(super) fn print_report(bundle: &ReportBundle) {
    println!(
        "All-American Placement Report ({})",
        bundle.stats.year_range
    );
    println!("==========================================\n");

    print_overview(&bundle.stats);
    println!();
    print_eligibility(&bundle.stats);
    println!();
    print_funnel(&bundle.progression);
    println!();
    print_weight_moves(&bundle.progression.weight_move_stats);
    println!();
    print_archetypes(&bundle.progression);
    println!();
    print_chalk(&bundle.brackets);
    println!();
    print_brackets(
        "Chalkiest Brackets (lowest differential sum)",
        &bundle.brackets.most_chalk_by_sum,
    );
    println!();
    print_brackets(
        "Chalkiest Brackets (most exact seed matches)",
        &bundle.brackets.most_chalk_by_matches,
    );
    println!();
    print_seed_distribution(&bundle.brackets);
    println!();
    print_ages(&bundle.brackets);
}

fn print_overview(stats: &ReportStats) {
    let validation = &stats.validation;
    let window = &stats.window.summary;
    println!("Dataset:");
    println!(
        "  Rows: {} read, {} retained, {} dropped",
        validation.rows_in,
        validation.rows_retained,
        validation.rows_dropped()
    );
    for (value, count) in &validation.unknown_eligibility {
        println!("  Unknown eligibility {value:?}: {count} rows");
    }
    for (column, count) in &validation.unparsed_counts {
        println!("  Unreadable {}: {count} cells, treated as missing", column.name());
    }
    println!(
        "  Wrestlers: {} total, {} admitted, {} incomplete, {} out of window",
        window.wrestlers, window.admitted, window.incomplete, window.out_of_window
    );
}

fn print_eligibility(stats: &ReportStats) {
    println!("All-Americans and Champions by Eligibility");
    println!(
        "  {:<16} {:>8} {:>8} {:>8} {:>8}",
        "Class", "AAs", "% AAs", "NCs", "% NCs"
    );
    println!("  {}", "-".repeat(52));
    for e in Eligibility::ALL {
        let (Some(aa), Some(nc)) = (stats.aa.get(&e), stats.nc.get(&e)) else {
            continue;
        };
        println!(
            "  {:<16} {:>8} {:>7}% {:>8} {:>7}%",
            aa.label, aa.count, aa.pct, nc.count, nc.pct
        );
    }
    println!(
        "  {:<16} {:>8} {:>8} {:>8}",
        "Total", stats.total_aa, "", stats.total_nc
    );
}

fn print_funnel(report: &ProgressionReport) {
    let funnel = &report.funnel;
    println!(
        "Careers in Window ({} wrestlers, {} multi-AA)",
        funnel.all, report.n_multi_aa
    );
    println!("  {:<10} {:>10}", "AAs", "Wrestlers");
    println!("  {}", "-".repeat(21));
    let tiers = [
        ("1", funnel.n_1plus),
        ("2", funnel.n_2plus),
        ("3", funnel.n_3plus),
        ("4", funnel.n_4plus),
        ("5+", funnel.n_5plus),
    ];
    for (label, count) in tiers {
        println!("  {label:<10} {count:>10}");
    }
    println!(
        "  Improved every year: {} ({:.1}% of multi-AA, {:.1}% of all)",
        report.n_improved_every_year, report.pct_improved_of_multi_aa, report.pct_improved_of_all
    );
    println!(
        "  Multi-weight AAs: {} (2 weights: {}, 3 weights: {}, 4 weights: {})",
        report.n_multi_weight_aa,
        report.multi_weight_by_n.get("2").copied().unwrap_or(0),
        report.multi_weight_by_n.get("3").copied().unwrap_or(0),
        report.multi_weight_by_n.get("4").copied().unwrap_or(0),
    );
}

fn print_weight_moves(moves: &WeightMoveDoc) {
    println!(
        "Weight Changes ({} transitions)",
        moves.n_transitions
    );
    println!(
        "  {:<10} {:<10} {:>8} {:>8}",
        "Direction", "Outcome", "Count", "%"
    );
    println!("  {}", "-".repeat(39));
    for (direction, outcome, count, pct) in weight_move_rows(moves) {
        println!("  {direction:<10} {outcome:<10} {count:>8} {pct:>7.1}%");
    }
}

/// `(direction, outcome, count, percent)` in display order.
fn weight_move_rows(moves: &WeightMoveDoc) -> [(&'static str, &'static str, usize, f64); 6] {
    [
        ("Up", "Improved", moves.up_improved, moves.pct_up_improved),
        ("Up", "Worse", moves.up_worse, moves.pct_up_worse),
        ("Up", "Same", moves.up_same, moves.pct_up_same),
        ("Down", "Improved", moves.down_improved, moves.pct_down_improved),
        ("Down", "Worse", moves.down_worse, moves.pct_down_worse),
        ("Down", "Same", moves.down_same, moves.pct_down_same),
    ]
}

fn print_archetypes(report: &ProgressionReport) {
    println!("Career Archetypes");
    println!(
        "  {:<26} {:>6} {:>6} {:>6} {:>6}",
        "Archetype", "3", "4", "5+", "Total"
    );
    println!("  {}", "-".repeat(54));
    for archetype in Archetype::ALL {
        let Some(ArchetypeEntry::Placement(doc)) = report.archetypes.get(&archetype.to_string())
        else {
            continue;
        };
        let [three, four, five_plus] = bucket_counts(doc);
        println!(
            "  {:<26} {three:>6} {four:>6} {five_plus:>6} {:>6}",
            archetype.to_string(),
            doc.total
        );
    }
    if let Some(ArchetypeEntry::LastChance(kinds)) = report.archetypes.get(LAST_CHANCE_KEY) {
        for kind in LastChance::ALL {
            if let Some(doc) = kinds.get(&kind.to_string()) {
                println!(
                    "  {:<26} {:>6} {:>6} {:>6} {:>6}",
                    kind.to_string(),
                    "",
                    "",
                    "",
                    doc.total
                );
            }
        }
    }
}

/// Counts for the 3, 4 and 5+ buckets; absent buckets count zero.
fn bucket_counts(doc: &ArchetypeDoc) -> [usize; 3] {
    AaBucket::ALL.map(|b| doc.by_aa.get(&b.to_string()).copied().unwrap_or(0))
}

fn print_chalk(report: &BracketReport) {
    println!(
        "Chalk ({} brackets, unseeded counted as seed {})",
        report.n_brackets, report.unseeded_seed
    );
    println!("  {:<10} {:>8}", "Match", "Chalk");
    println!("  {}", "-".repeat(19));
    for round in ChalkRound::ALL {
        let count = report.chalk.get(&round).map_or(0, |c| c.count);
        println!("  {:<10} {:>8}", round.to_string(), count);
    }
    print_center("Differential sum", report.differential_summary);
    print_center("Exact matches", report.exact_match_summary);
}

fn print_center(label: &str, center: Option<Center>) {
    if let Some(center) = center {
        println!(
            "  {label}: mean {:.1}, median {:.1}",
            center.mean, center.median
        );
    }
}

fn print_brackets(title: &str, rows: &[BracketRow]) {
    println!("{title}");
    println!(
        "  {:<14} {:>6} {:>6} {:>8}",
        "Bracket", "Sum", "Exact", "Avg Age"
    );
    println!("  {}", "-".repeat(37));
    for row in rows {
        println!(
            "  {:<14} {:>6} {:>6} {:>8.2}",
            row.bracket, row.differential_sum, row.exact_matches, row.average_age
        );
    }
}

fn print_seed_distribution(report: &BracketReport) {
    println!("Seeds by Place");
    println!(
        "  {:<6} {:>8} {:>9} {:>8} {:>8}",
        "Place", "Seeded", "Unseeded", "Mean", "Median"
    );
    println!("  {}", "-".repeat(43));
    for (place, doc) in &report.seed_distribution {
        println!(
            "  {:<6} {:>8} {:>9} {:>8} {:>8}",
            place,
            doc.seeded,
            doc.unseeded,
            optional_number(doc.mean),
            optional_number(doc.median)
        );
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| format!("{v:.2}"))
}

fn print_ages(report: &BracketReport) {
    print_brackets("Youngest Brackets", &report.youngest);
    println!();
    print_brackets("Oldest Brackets", &report.oldest);
    if let Some(center) = report.age_summary {
        println!(
            "  Average age across brackets: mean {:.2}, median {:.2}",
            center.mean, center.median
        );
    }
}
