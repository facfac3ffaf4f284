use clap::Args;
use podium_analysis::{
    archetype::{self, COVID_FIRST_YEAR, LastChance, MIN_AAS},
    record::Eligibility,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ClassifyArg {
    /// Places in career order, e.g. `5 3 1`
    #[arg(required = true, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub places: Vec<u8>,

    /// Eligibility class of a single finish, for Last Chance checks
    #[arg(long, requires = "year")]
    pub eligibility: Option<Eligibility>,

    /// Season of a single finish, for Last Chance checks
    #[arg(long, requires = "eligibility")]
    pub year: Option<i32>,

    /// First season of the pandemic-extension year
    #[arg(long, default_value_t = COVID_FIRST_YEAR)]
    pub covid_first_year: i32,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let last_chance = last_chance(arg)?;
    println!("Placements: {}", placement_label(&arg.places));

    let labels = archetype::classify(&arg.places);
    if arg.places.len() < MIN_AAS {
        println!("  (placement archetypes need at least {MIN_AAS} finishes)");
    } else if labels.is_empty() {
        println!("  No placement archetype");
    }
    for label in &labels {
        println!("  {:<24} {}", label.to_string(), label.description());
    }

    if let Some(kinds) = last_chance {
        if kinds.is_empty() {
            println!("  No Last Chance kind");
        }
        for kind in kinds {
            println!("  {:<24} {}", kind.to_string(), kind.criteria());
        }
    }
    Ok(())
}

/// `5-3-1`
fn placement_label(places: &[u8]) -> String {
    places
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join("-")
}

/// Last Chance kinds of a single finish, or `None` when no class and season
/// were given.
fn last_chance(arg: &ClassifyArg) -> anyhow::Result<Option<Vec<LastChance>>> {
    let (Some(eligibility), Some(year)) = (arg.eligibility, arg.year) else {
        return Ok(None);
    };
    let [place] = arg.places.as_slice() else {
        anyhow::bail!("--eligibility and --year apply to a single finish only");
    };
    Ok(Some(archetype::classify_last_chance(
        eligibility,
        year,
        *place,
        arg.covid_first_year,
    )))
}
