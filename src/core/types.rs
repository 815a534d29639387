//! Core types shared across hoodrank modules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HoodError;

/// The five boroughs. Declaration order is the tie-break order for
/// region aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Manhattan,
        Region::Brooklyn,
        Region::Queens,
        Region::Bronx,
        Region::StatenIsland,
    ];

    /// Canonical, case-sensitive name as it appears in the data file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Manhattan => "Manhattan",
            Region::Brooklyn => "Brooklyn",
            Region::Queens => "Queens",
            Region::Bronx => "Bronx",
            Region::StatenIsland => "Staten Island",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = HoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| HoodError::InvalidRegion(s.to_string()))
    }
}

/// Region selector used by the explorer views. `All` is the "no filter" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    pub const ALL_SENTINEL: &'static str = "All";

    pub fn matches(&self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(r) => *r == region,
        }
    }
}

impl FromStr for RegionFilter {
    type Err = HoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_SENTINEL {
            return Ok(RegionFilter::All);
        }
        s.parse().map(RegionFilter::Only)
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str(Self::ALL_SENTINEL),
            RegionFilter::Only(r) => r.fmt(f),
        }
    }
}

/// Precomputed value classification. Never recomputed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueCategory {
    Undervalued,
    #[serde(rename = "Fairly Priced")]
    FairlyPriced,
    Overpriced,
}

impl ValueCategory {
    pub const ALL: [ValueCategory; 3] = [
        ValueCategory::Undervalued,
        ValueCategory::FairlyPriced,
        ValueCategory::Overpriced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueCategory::Undervalued => "Undervalued",
            ValueCategory::FairlyPriced => "Fairly Priced",
            ValueCategory::Overpriced => "Overpriced",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown value category {s:?}"))
    }
}

/// One row of the value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighbourhoodRecord {
    pub neighbourhood: String,
    pub region: Region,
    pub avg_price: f64,
    /// Days per year
    pub avg_availability: f64,
    /// (availability x popularity) / price, computed upstream
    pub value_score: f64,
    /// Dense rank by score descending, 1 = best. Assigned by `Dataset::new`.
    pub value_rank: usize,
    pub value_category: ValueCategory,
}

impl NeighbourhoodRecord {
    /// Builds an unranked record; `Dataset::new` fills in `value_rank`.
    pub fn new(
        neighbourhood: impl Into<String>,
        region: Region,
        avg_price: f64,
        avg_availability: f64,
        value_score: f64,
        value_category: ValueCategory,
    ) -> Self {
        Self {
            neighbourhood: neighbourhood.into(),
            region,
            avg_price,
            avg_availability,
            value_score,
            value_rank: 0,
            value_category,
        }
    }
}
