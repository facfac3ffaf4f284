//! Full report command
//!
//! Runs every analysis over one placement table, prints the console tables
//! and writes the JSON documents and Markdown tables to the configured
//! directories.

mod markdown;
mod table;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use podium_analysis::report::ReportBundle;
use serde::Serialize;
use tracing::info;

use crate::util::{self, Output};

/// Summary counts by eligibility class.
const STATS_FILE: &str = "report_stats.json";
/// Career progressions and archetypes.
const PROGRESSION_FILE: &str = "report_02_stats.json";
/// Bracket seeding statistics.
const BRACKETS_FILE: &str = "report_03_stats.json";
const TRENDS_FILE: &str = "report_trends.json";
const META_FILE: &str = "report_meta.json";

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    /// Path to the placement CSV (or TSV) file
    pub input: PathBuf,

    /// Path to a JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the JSON documents (overrides the config file)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the Markdown tables (overrides the config file)
    #[arg(long)]
    pub tables_dir: Option<PathBuf>,

    /// Do not print console tables
    #[arg(long, short)]
    pub quiet: bool,
}

/// Provenance of one set of report documents.
#[derive(Debug, Serialize)]
struct ReportMeta<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    documents: [&'static str; 4],
    rows_retained: usize,
    wrestlers_admitted: usize,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let mut config = util::read_config_file(arg.config.as_deref())?;
    if let Some(dir) = &arg.data_dir {
        config.output.data_dir = Some(dir.clone());
    }
    if let Some(dir) = &arg.tables_dir {
        config.output.tables_dir = Some(dir.clone());
    }

    let output = util::run_pipeline(&arg.input, &config.analysis)?;
    let bundle = ReportBundle::build(&output, &config.analysis);

    if !arg.quiet {
        table::print_report(&bundle);
    }

    if let Some(dir) = &config.output.data_dir {
        save_documents(dir, &arg.input, &bundle, config.output.pretty)?;
    }
    if let Some(dir) = &config.output.tables_dir {
        markdown::save_tables(dir, &bundle)?;
    }
    if config.output.data_dir.is_none() && config.output.tables_dir.is_none() {
        info!("no output directory configured; nothing written");
    }
    Ok(())
}

fn save_documents(
    dir: &Path,
    input: &Path,
    bundle: &ReportBundle,
    pretty: bool,
) -> anyhow::Result<()> {
    save_document(dir, STATS_FILE, &bundle.stats, pretty)?;
    save_document(dir, PROGRESSION_FILE, &bundle.progression, pretty)?;
    save_document(dir, BRACKETS_FILE, &bundle.brackets, pretty)?;
    save_document(dir, TRENDS_FILE, &bundle.trends, pretty)?;

    let meta = ReportMeta {
        generated_at: Utc::now(),
        input,
        documents: [STATS_FILE, PROGRESSION_FILE, BRACKETS_FILE, TRENDS_FILE],
        rows_retained: bundle.stats.validation.rows_retained,
        wrestlers_admitted: bundle.stats.window.summary.admitted,
    };
    save_document(dir, META_FILE, &meta, pretty)?;
    info!(dir = %dir.display(), documents = meta.documents.len(), "saved report documents");
    Ok(())
}

fn save_document<T>(dir: &Path, name: &str, value: &T, pretty: bool) -> anyhow::Result<()>
where
    T: Serialize,
{
    Output::save_json(value, Some(dir.join(name)), pretty)
}
