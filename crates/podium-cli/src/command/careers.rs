use std::path::PathBuf;

use clap::Args;
use podium_analysis::{
    archetype::{self, Archetype, LastChance},
    career::{self, Career},
    record::Eligibility,
    window::{CareerWindow, WindowStatus},
};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CareersArg {
    /// Path to the placement CSV (or TSV) file
    pub input: PathBuf,

    /// Path to a JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only show the wrestler with this name (case-insensitive)
    #[arg(long)]
    pub wrestler: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write JSON to this path instead of stdout (implies --json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct FinishView {
    year: i32,
    weight: u32,
    eligibility: Eligibility,
    place: u8,
    seed: String,
    school: String,
}

#[derive(Debug, Clone, Serialize)]
struct CareerView {
    wrestler: String,
    placement: String,
    window: WindowStatus,
    finishes: Vec<FinishView>,
    archetypes: Vec<Archetype>,
    last_chance: Vec<LastChance>,
}

impl CareerView {
    fn new(career: &Career<'_>, window: &CareerWindow, covid_first_year: i32) -> Self {
        let last_chance = match career.records() {
            [only] => archetype::classify_last_chance(
                only.eligibility,
                only.year,
                only.place,
                covid_first_year,
            ),
            _ => vec![],
        };
        Self {
            wrestler: career.wrestler().to_owned(),
            placement: career.placement_string(),
            window: window.status(career),
            finishes: career
                .records()
                .iter()
                .map(|r| FinishView {
                    year: r.year,
                    weight: r.weight,
                    eligibility: r.eligibility,
                    place: r.place,
                    seed: r.seed_label(),
                    school: r.school.clone(),
                })
                .collect(),
            archetypes: archetype::classify(&career.places()),
            last_chance,
        }
    }
}

pub(crate) fn run(arg: &CareersArg) -> anyhow::Result<()> {
    let config = util::read_config_file(arg.config.as_deref())?;
    let output = util::run_pipeline(&arg.input, &config.analysis)?;

    let careers = career::group(&output.dataset);
    let views = select(&careers, arg.wrestler.as_deref())
        .map(|c| CareerView::new(c, &output.window, config.analysis.covid_first_year))
        .collect::<Vec<_>>();
    if let Some(name) = &arg.wrestler
        && views.is_empty()
    {
        anyhow::bail!("No wrestler named {name} in {}", arg.input.display());
    }

    if arg.json || arg.output.is_some() {
        return Output::save_json(&views, arg.output.clone(), config.output.pretty);
    }

    for view in &views {
        print_career(view);
        println!();
    }
    Ok(())
}

/// Careers of the wrestler named `name` (case-insensitive), or all of them.
fn select<'c, 'a>(
    careers: &'c [Career<'a>],
    name: Option<&'c str>,
) -> impl Iterator<Item = &'c Career<'a>> {
    careers
        .iter()
        .filter(move |c| name.is_none_or(|name| c.wrestler().eq_ignore_ascii_case(name)))
}

fn print_career(view: &CareerView) {
    println!("{} [{}]", view.placement, view.window);
    println!(
        "  {:<6} {:>6} {:<5} {:>5} {:>5}  {}",
        "Year", "Weight", "Class", "Place", "Seed", "School"
    );
    println!("  {}", "-".repeat(44));
    for finish in &view.finishes {
        println!(
            "  {:<6} {:>6} {:<5} {:>5} {:>5}  {}",
            finish.year,
            finish.weight,
            finish.eligibility.as_str(),
            finish.place,
            finish.seed,
            finish.school,
        );
    }
    let names = |labels: Vec<String>| {
        if labels.is_empty() {
            "-".to_owned()
        } else {
            labels.join(", ")
        }
    };
    println!(
        "  Archetypes : {}",
        names(view.archetypes.iter().map(ToString::to_string).collect())
    );
    if !view.last_chance.is_empty() {
        println!(
            "  Last Chance: {}",
            names(view.last_chance.iter().map(ToString::to_string).collect())
        );
    }
}

#[cfg(test)]
mod tests {
    use podium_analysis::{
        record::{Dataset, PlacementRecord, Seed},
        window::WindowPolicy,
    };

    use super::*;

    fn record(name: &str, eligibility: Eligibility, year: i32, place: u8) -> PlacementRecord {
        PlacementRecord {
            wrestler: name.to_owned(),
            school: "State".to_owned(),
            year,
            weight: 157,
            place,
            seed: Some(Seed::Seeded(place)),
            eligibility,
            placement_seed_delta: 0,
            progression_eligible: None,
            aa_count: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            record("Early Bird", Eligibility::Fr, 2000, 3),
            record("Jane Doe", Eligibility::Sr, 2010, 1),
            record("Late Start", Eligibility::Fr, 2020, 5),
        ])
        .unwrap()
    }

    fn view(dataset: &Dataset, name: &str) -> CareerView {
        let careers = career::group(dataset);
        let window = CareerWindow::for_dataset(&WindowPolicy::default(), dataset);
        let career = select(&careers, Some(name)).next().unwrap();
        CareerView::new(career, &window, archetype::COVID_FIRST_YEAR)
    }

    #[test]
    fn test_select_by_name_ignores_case() {
        let dataset = dataset();
        let careers = career::group(&dataset);
        let names = select(&careers, Some("jane DOE"))
            .map(Career::wrestler)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Jane Doe"]);
        assert_eq!(select(&careers, None).count(), 3);
        assert_eq!(select(&careers, Some("Nobody")).count(), 0);
    }

    #[test]
    fn test_single_senior_title_view() {
        let view = view(&dataset(), "Jane Doe");
        assert_eq!(view.window, WindowStatus::Admitted);
        assert!(view.archetypes.is_empty());
        assert_eq!(
            view.last_chance,
            vec![LastChance::Senior, LastChance::Championship]
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["window"], "admitted");
        assert_eq!(json["finishes"][0]["seed"], "1");
        assert_eq!(json["last_chance"][1], "Championship Last Chance");
    }

    #[test]
    fn test_recent_freshman_is_incomplete() {
        let view = view(&dataset(), "Late Start");
        assert_eq!(view.window, WindowStatus::Incomplete);
        assert!(view.last_chance.is_empty());
    }
}
