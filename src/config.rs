use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::analysis::KeywordRule;
use crate::core::RegionFilter;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "hoodrank.toml";

/// Output format for reports and answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Markdown,
    Json,
}

/// Which report to produce when no query is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Headline metrics plus the full table ordered by rank
    #[default]
    Overview,
    /// Top undervalued neighbourhoods
    Rankings,
    /// Region-filtered table, best scores first
    Explorer,
    /// Extremes, best/worst region and the market split
    Insights,
    /// Mean score per region and category counts
    Distribution,
}

/// Main configuration for hoodrank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoodrankConfig {
    /// Path to the neighbourhood value CSV
    pub data: PathBuf,
    /// Region filter for the explorer view ("All" or a region name)
    pub region: String,
    pub view: View,
    pub output_format: OutputFormat,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Free-text question; takes precedence over `view`
    pub query: Option<String>,
    /// Length of the undervalued ranking
    pub top_k: usize,
    /// Rows shown by the explorer view
    pub explorer_limit: usize,
    /// Enable debug logging
    pub verbose: bool,
    /// Extra keyword rules, checked after the built-in ones
    pub rules: Vec<KeywordRule>,
}

impl HoodrankConfig {
    /// Checks the data file exists and the numeric and region settings make sense.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.data.exists() {
            anyhow::bail!("Data file does not exist: {:?}", self.data);
        }
        if self.top_k == 0 {
            anyhow::bail!("top_k must be at least 1");
        }
        if self.explorer_limit == 0 {
            anyhow::bail!("explorer_limit must be at least 1");
        }
        self.region_filter()?;
        Ok(())
    }

    pub fn region_filter(&self) -> anyhow::Result<RegionFilter> {
        self.region
            .parse()
            .with_context(|| format!("Unsupported region filter {:?}", self.region))
    }

    /// Loads `hoodrank.toml` from the current directory, if there is one.
    pub fn load_from_file() -> anyhow::Result<Option<Self>> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(Some(config))
    }
}

impl Default for HoodrankConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/neighbourhood_value_ranking.csv"),
            region: RegionFilter::ALL_SENTINEL.to_string(),
            view: View::Overview,
            output_format: OutputFormat::Plain,
            output: None,
            query: None,
            top_k: 10,
            explorer_limit: 15,
            verbose: false,
            rules: Vec::new(),
        }
    }
}
