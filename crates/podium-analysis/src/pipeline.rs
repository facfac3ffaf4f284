//! Stage orchestration
//!
//! Runs validation and the career-window filter, keeping the unfiltered and
//! filtered datasets side by side. Later stages borrow from
//! [`PipelineOutput`]; nothing is recomputed between report sections.

use tracing::info;

use crate::{
    bracket::BracketAnalysis,
    career::{self, Career},
    config::AnalysisConfig,
    ingest::RawTable,
    progression::ProgressionAnalysis,
    record::Dataset,
    validate::{self, ValidationError, ValidationReport},
    window::{CareerWindow, WindowSummary},
};

/// The validated table and its career-window subset.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Every validated record; feeds cross-sectional tallies.
    pub dataset: Dataset,
    /// Records of admitted careers only; feeds longitudinal analyses.
    pub filtered: Dataset,
    pub window: CareerWindow,
    pub validation: ValidationReport,
    pub window_summary: WindowSummary,
}

/// Validates `table` and applies the career window.
pub fn run(table: RawTable, config: &AnalysisConfig) -> Result<PipelineOutput, ValidationError> {
    let (dataset, validation) = validate::validate(table, &config.validation)?;
    let window = CareerWindow::for_dataset(&config.window, &dataset);
    let (filtered, window_summary) = window.filter(&dataset);
    Ok(PipelineOutput {
        dataset,
        filtered,
        window,
        validation,
        window_summary,
    })
}

impl PipelineOutput {
    /// Admitted careers in wrestler order.
    #[must_use]
    pub fn careers(&self) -> Vec<Career<'_>> {
        career::group(&self.filtered)
    }

    #[must_use]
    pub fn progression(&self, config: &AnalysisConfig) -> ProgressionAnalysis {
        let careers = self.careers();
        let analysis = ProgressionAnalysis::new(&careers, config.covid_first_year);
        info!(
            careers = careers.len(),
            multi_aa = analysis.funnel.multi_aa(),
            improved = analysis.improved.len(),
            "analyzed careers"
        );
        analysis
    }

    #[must_use]
    pub fn brackets(&self, config: &AnalysisConfig) -> BracketAnalysis {
        let analysis = BracketAnalysis::new(&self.dataset, config.unseeded_seed);
        info!(
            brackets = analysis.scores.len(),
            unseeded_seed = analysis.placeholder,
            "analyzed brackets"
        );
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_table;

    #[test]
    fn test_filtered_and_unfiltered_side_by_side() {
        let csv = "\
Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,Seed
Fr,2000,157,5,A,S,0,5
So,2001,157,3,A,S,0,3
Jr,2002,157,1,A,S,0,1
So,2000,165,1,B,S,0,1
Sr,2010,165,2,C,S,0,2
";
        let table = read_table(csv.as_bytes()).unwrap();
        let output = run(table, &AnalysisConfig::default()).unwrap();
        assert_eq!(output.dataset.len(), 5);
        assert_eq!(output.filtered.len(), 4);
        assert_eq!(output.window_summary.out_of_window, 1);
        let names: Vec<_> = output.careers().iter().map(Career::wrestler).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
