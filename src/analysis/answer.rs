//! Structured answers returned by the query dispatcher

use std::fmt;

use serde::Serialize;

use crate::analysis::rank::RegionAverage;
use crate::core::{NeighbourhoodRecord, Region};

/// What a query resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Best,
    Worst,
    RegionInsight(Region),
    Help,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Best => f.write_str("best value"),
            Intent::Worst => f.write_str("most overpriced"),
            Intent::RegionInsight(region) => write!(f, "{region} insight"),
            Intent::Help => f.write_str("help"),
        }
    }
}

/// The data points a renderer needs for one neighbourhood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub neighbourhood: String,
    pub region: Region,
    pub value_score: f64,
    pub avg_price: f64,
    pub avg_availability: f64,
    pub value_rank: usize,
}

impl From<&NeighbourhoodRecord> for Highlight {
    fn from(record: &NeighbourhoodRecord) -> Self {
        Self {
            neighbourhood: record.neighbourhood.clone(),
            region: record.region,
            value_score: record.value_score,
            avg_price: record.avg_price,
            avg_availability: record.avg_availability,
            value_rank: record.value_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInsight {
    pub region: Region,
    pub mean_score: f64,
    pub neighbourhoods: usize,
    /// Qualitative profile of the borough's rental market
    pub notes: Vec<&'static str>,
}

impl From<RegionAverage> for RegionInsight {
    fn from(avg: RegionAverage) -> Self {
        Self {
            region: avg.region,
            mean_score: avg.mean_score,
            neighbourhoods: avg.neighbourhoods,
            notes: profile_notes(avg.region).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelpText {
    pub topics: Vec<&'static str>,
    pub examples: Vec<&'static str>,
}

impl Default for HelpText {
    fn default() -> Self {
        Self {
            topics: vec![
                "Best or worst neighbourhood",
                "Borough insights (Manhattan, Queens, Brooklyn, Bronx, Staten Island)",
                "Undervalued or overpriced areas",
            ],
            examples: vec!["best value area", "Queens insight"],
        }
    }
}

/// One answer per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    BestValue(Highlight),
    MostOverpriced(Highlight),
    RegionInsight(RegionInsight),
    /// The intent was understood but the table has nothing to show for it.
    NoData { intent: Intent, reason: String },
    Help(HelpText),
}

impl Answer {
    pub fn title(&self) -> String {
        match self {
            Answer::BestValue(_) => "Best Value Neighbourhood".to_string(),
            Answer::MostOverpriced(_) => "Most Overpriced Neighbourhood".to_string(),
            Answer::RegionInsight(insight) => format!("{} Insight", insight.region),
            Answer::NoData { .. } => "No Data Available".to_string(),
            Answer::Help(_) => "I can help with".to_string(),
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Answer::Help(_))
    }
}

/// Canned market profile per borough.
pub fn profile_notes(region: Region) -> &'static [&'static str] {
    match region {
        Region::Manhattan => &[
            "Highest prices in NYC",
            "Often overpriced relative to availability",
        ],
        Region::Queens => &[
            "Best overall value borough",
            "High availability at moderate prices",
        ],
        Region::Brooklyn => &[
            "Mixed pricing behaviour",
            "Some neighbourhoods undervalued, others overpriced",
        ],
        Region::Bronx => &[
            "Lower prices than Manhattan",
            "Good value in several neighbourhoods",
        ],
        Region::StatenIsland => &[
            "High availability, fewer listings",
            "Niche value, limited demand",
        ],
    }
}
