use clap::{Parser, Subcommand};

use crate::util;

use self::{
    careers::CareersArg, check_template::CheckTemplateArg, classify::ClassifyArg,
    report::ReportArg,
};

mod careers;
mod check_template;
mod classify;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter (e.g. `debug`, `podium_analysis=trace`); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the full analysis and write report documents and tables
    Report(#[clap(flatten)] ReportArg),
    /// Print the archetypes of one placement sequence
    Classify(#[clap(flatten)] ClassifyArg),
    /// Print careers with their window status and archetypes
    Careers(#[clap(flatten)] CareersArg),
    /// Check that every data placeholder in a page template resolves
    CheckTemplate(#[clap(flatten)] CheckTemplateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_tracing(args.log_level.as_deref())?;
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Classify(arg) => classify::run(&arg)?,
        Mode::Careers(arg) => careers::run(&arg)?,
        Mode::CheckTemplate(arg) => check_template::run(&arg)?,
    }
    Ok(())
}
