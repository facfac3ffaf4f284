use std::path::PathBuf;

use podium_analysis::config::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Contents of the `--config` file.
///
/// Every section may be omitted; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodiumConfig {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Where report artifacts are written.
///
/// Nothing is written for a directory left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the JSON documents consumed by the static site
    pub data_dir: Option<PathBuf>,
    /// Directory for the Markdown tables
    pub tables_dir: Option<PathBuf>,
    /// Indent JSON documents
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            tables_dir: None,
            pretty: true,
        }
    }
}
