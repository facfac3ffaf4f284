//! NCAA Division I wrestling All-American placement analysis
//!
//! This crate turns a table of All-American finishes (one row per wrestler,
//! season and weight class) into the statistics behind a set of published
//! reports: class breakdowns, career progressions, archetypes, weight-class
//! moves and bracket seeding accuracy.
//!
//! # Overview
//!
//! The analysis runs as a pipeline of pure stages:
//!
//! 1. **Ingest** ([`ingest::load_table`]): Read the CSV/TSV table and count
//!    missing values per column
//! 2. **Validate** ([`validate::validate`]): Check year and place ranges,
//!    drop rows with an unknown eligibility class
//! 3. **Career window** ([`window::CareerWindow`]): Keep wrestlers whose
//!    careers fall entirely inside the observed seasons and are complete
//! 4. **Careers** ([`career::Career`]): Group records per wrestler
//! 5. **Analyses**:
//!    - [`cohort`]: Counts by class and season (unfiltered)
//!    - [`progression`]: Funnels, improving careers, weight moves, class
//!      combinations and [`archetype`]s (window-filtered)
//!    - [`bracket`]: Chalk, seed differentials and podium ages (unfiltered)
//! 6. **Report** ([`report::ReportBundle`]): Owned documents ready to be
//!    serialized for a static site
//!
//! Cross-sectional tallies always use the unfiltered dataset, and
//! longitudinal ones always use the window-filtered one. [`pipeline::run`]
//! keeps both side by side.
//!
//! # Examples
//!
//! ```
//! use podium_analysis::{config::AnalysisConfig, ingest, pipeline, report::ReportBundle};
//!
//! let csv = "\
//! Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,Seed
//! So,2010,157,3,Alpha,State,0,3
//! Jr,2011,157,1,Alpha,State,0,1
//! Sr,2011,165,2,Bravo,Tech,0,US
//! ";
//! let config = AnalysisConfig::default();
//! let table = ingest::read_table(csv.as_bytes())?;
//! let output = pipeline::run(table, &config)?;
//! let bundle = ReportBundle::build(&output, &config);
//! assert_eq!(bundle.stats.total_nc, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archetype;
pub mod bracket;
pub mod career;
pub mod cohort;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod progression;
pub mod record;
pub mod report;
pub mod validate;
pub mod window;
