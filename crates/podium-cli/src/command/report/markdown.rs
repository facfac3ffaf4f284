//! Markdown tables
//!
//! Every table is rendered by a pure function from the report documents;
//! [`save_tables`] only decides file names.

use std::{fmt::Write as _, path::Path};

use podium_analysis::{
    archetype::{AaBucket, Archetype, LastChance},
    record::Eligibility,
    report::{
        ArchetypeEntry, BracketReport, ComboTierDoc, LAST_CHANCE_KEY, ProgressionReport,
        ReportBundle, ReportStats,
    },
};
use tracing::info;

use crate::util::Output;

/// Filled cell of a combination table.
const MARKER: &str = "●";

pub(super) fn save_tables(dir: &Path, bundle: &ReportBundle) -> anyhow::Result<()> {
    let mut tables = vec![
        ("eligibility_summary.md", eligibility_summary(&bundle.stats)),
        ("archetypes.md", archetypes(&bundle.progression)),
        (
            "eligibility_combos_by_tier.md",
            combos(
                "# When AA was earned: combinations by eligibility year\n",
                "*Sorted by most common to least. ● = AA in that eligibility year.*\n",
                "AA",
                &bundle.progression.eligibility_combos,
            ),
        ),
        (
            "nc_eligibility_combos_by_tier.md",
            combos(
                "# When NC was won: combinations by eligibility year\n",
                "*National champions only (place = 1). Sorted by most common to least. \
                 ● = NC in that eligibility year.*\n",
                "NC",
                &bundle.progression.nc_eligibility_combos,
            ),
        ),
        ("max_aa_by_class_brackets.md", max_by_class(&bundle.brackets)),
    ];
    if let Some(text) = improved_progressions(&bundle.progression) {
        tables.push(("multi_aa_progression.md", text));
    }

    for (name, text) in &tables {
        Output::open(dir.join(name))?.write_text(text)?;
    }
    info!(dir = %dir.display(), tables = tables.len(), "saved markdown tables");
    Ok(())
}

/// Pipe table with columns padded to their widest cell.
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let widths = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain([h.chars().count(), 3])
                .max()
                .unwrap_or(3)
        })
        .collect::<Vec<_>>();
    let mut out = table_line(header, &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    out.push_str(&table_line(rule.as_slice(), &widths).replace(' ', "-"));
    for row in rows {
        out.push_str(&table_line(row.as_slice(), &widths));
    }
    out
}

fn table_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let padded = cells
        .iter()
        .map(AsRef::<str>::as_ref)
        .zip(widths)
        .map(|(c, w)| format!("{c}{}", " ".repeat(w.saturating_sub(c.chars().count()))))
        .collect::<Vec<_>>();
    format!("| {} |\n", padded.join(" | "))
}

/// `1234567` as `1,234,567`.
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn eligibility_summary(stats: &ReportStats) -> String {
    let rows = Eligibility::ALL
        .into_iter()
        .filter_map(|e| {
            let aa = stats.aa.get(&e).filter(|s| s.count > 0)?;
            let nc = stats.nc.get(&e)?;
            Some(vec![
                e.to_string(),
                aa.count.to_string(),
                format!("{}%", aa.pct),
                nc.count.to_string(),
                format!("{}%", nc.pct),
            ])
        })
        .collect::<Vec<_>>();
    let header = [
        "Eligibility Year",
        "All-Americans",
        "% of AAs",
        "National Champions",
        "% of NCs",
    ];
    format!("# Eligibility Year Summary\n\n{}", table(&header, &rows))
}

fn improved_progressions(report: &ProgressionReport) -> Option<String> {
    if report.improved_every_year.is_empty() {
        return None;
    }
    let rows = report
        .improved_every_year
        .iter()
        .map(|r| {
            vec![
                r.wrestler.clone(),
                r.progression.clone(),
                r.years.clone(),
                r.eligibility.clone(),
                r.aa_count.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let header = [
        "Wrestler",
        "Progression",
        "Years",
        "Eligibility sequence",
        "AA count",
    ];
    Some(format!(
        "# Multi-AA wrestlers who improved every year\n\n\
         *{} wrestlers out of {} multi-AA wrestlers ({:.1}%) had a strictly better \
         placement each consecutive year.*\n\n{}",
        report.n_improved_every_year,
        report.n_multi_aa,
        report.pct_improved_of_multi_aa,
        table(&header, &rows)
    ))
}

fn archetypes(report: &ProgressionReport) -> String {
    let mut out = String::from("# Career archetypes\n\n");
    let rows = Archetype::ALL
        .into_iter()
        .filter_map(|a| {
            let ArchetypeEntry::Placement(doc) = report.archetypes.get(&a.to_string())? else {
                return None;
            };
            let mut row = vec![a.to_string(), doc.description.clone()];
            row.extend(
                AaBucket::ALL
                    .into_iter()
                    .map(|b| doc.by_aa.get(&b.to_string()).copied().unwrap_or(0).to_string()),
            );
            row.push(doc.total.to_string());
            Some(row)
        })
        .collect::<Vec<_>>();
    let header = ["Archetype", "Description", "3× AA", "4× AA", "5+× AA", "Total"];
    out.push_str(&table(&header, &rows));

    if let Some(ArchetypeEntry::LastChance(kinds)) = report.archetypes.get(LAST_CHANCE_KEY) {
        let rows = LastChance::ALL
            .into_iter()
            .filter_map(|k| {
                let doc = kinds.get(&k.to_string())?;
                Some(vec![k.to_string(), doc.description.clone(), doc.total.to_string()])
            })
            .collect::<Vec<_>>();
        out.push_str("\n## Last Chance (1× AA)\n\n");
        out.push_str(&table(&["Sub-type", "Criteria", "Count"], &rows));
    }
    out
}

fn combos(title: &str, note: &str, honor: &str, tiers: &[ComboTierDoc]) -> String {
    let mut out = format!("{title}{note}");
    let header = ["Fr", "So", "Jr", "Sr", "SSr", "Count", "%"];
    for tier in tiers {
        let rows = tier
            .rows
            .iter()
            .map(|row| {
                let mut cells = Eligibility::ALL
                    .into_iter()
                    .map(|e| {
                        if row.classes.get(&e).copied().unwrap_or(false) {
                            MARKER.to_owned()
                        } else {
                            String::new()
                        }
                    })
                    .collect::<Vec<_>>();
                cells.push(thousands(row.count));
                cells.push(row.pct.clone());
                cells
            })
            .collect::<Vec<_>>();
        let _ = write!(
            out,
            "\n## {}× {honor} (n = {})\n\n{}",
            tier.n,
            thousands(tier.total),
            table(&header, &rows)
        );
    }
    out
}

fn max_by_class(report: &BracketReport) -> String {
    let rows = Eligibility::ALL
        .into_iter()
        .map(|e| {
            let doc = report.max_aa_by_class.get(&e);
            vec![
                e.to_string(),
                doc.map_or(0, |d| d.max_count).to_string(),
                doc.map(|d| d.brackets.join(", ")).unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    format!(
        "# Brackets with Maximum All-Americans by Eligibility Class\n\n\
         Brackets (year×weight) that achieved the maximum count of All-Americans for each \
         eligibility class.\n\n{}",
        table(&["Eligibility Class", "Maximum Count", "Brackets"], &rows)
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use podium_analysis::{
        report::{ClassStat, ComboRowDoc, WindowDoc},
        validate::ValidationReport,
        window::WindowSummary,
    };

    use super::*;

    #[test]
    fn test_table_pads_columns() {
        let rows = vec![vec!["Sr".to_owned(), "1,234".to_owned()]];
        assert_eq!(
            table(&["Class", "N"], &rows),
            "| Class | N     |\n|-------|-------|\n| Sr    | 1,234 |\n"
        );
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_combo_tier_markers() {
        let tier = ComboTierDoc {
            n: 2,
            total: 1200,
            rows: vec![ComboRowDoc {
                classes: Eligibility::ALL
                    .into_iter()
                    .map(|e| (e, matches!(e, Eligibility::Jr | Eligibility::Sr)))
                    .collect(),
                count: 1200,
                pct: "100.0%".to_owned(),
                wrestlers: vec![],
                placements: vec![],
            }],
        };
        let text = combos("# T\n", "*n*\n", "AA", &[tier]);
        assert!(text.contains("## 2× AA (n = 1,200)"));
        assert!(text.contains("|     |     | ●   | ●   |     | 1,200 | 100.0% |"));
    }

    #[test]
    fn test_eligibility_summary_skips_empty_classes() {
        let stat = |count, pct: &str| ClassStat {
            count,
            pct: pct.to_owned(),
            label: String::new(),
        };
        let aa = BTreeMap::from([
            (Eligibility::Jr, stat(3, "75.0")),
            (Eligibility::SSr, stat(0, "0.0")),
            (Eligibility::Sr, stat(1, "25.0")),
        ]);
        let nc = BTreeMap::from([
            (Eligibility::Jr, stat(1, "100.0")),
            (Eligibility::SSr, stat(0, "0.0")),
            (Eligibility::Sr, stat(0, "0.0")),
        ]);
        let stats = ReportStats {
            year_min: 2000,
            year_max: 2001,
            year_range: "2000–2001".to_owned(),
            total_aa: 4,
            total_nc: 1,
            nc,
            aa,
            validation: ValidationReport::default(),
            window: WindowDoc {
                ranges: BTreeMap::new(),
                summary: WindowSummary::default(),
            },
        };
        let text = eligibility_summary(&stats);
        assert!(text.starts_with("# Eligibility Year Summary\n\n"));
        assert!(text.contains("| Jr "));
        assert!(text.contains("| 75.0%"));
        assert!(!text.contains("SSr"));
    }
}
