//! Value ranking views
//!
//! Every view is re-derived from the borrowed dataset on each call; nothing
//! is cached.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::core::{Dataset, NeighbourhoodRecord, Region, RegionFilter, ValueCategory};
use crate::error::{HoodError, Result};

/// Which end of the score range `top_k` reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Highest score first
    Best,
    /// Lowest score first
    Worst,
}

/// Mean value score of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAverage {
    pub region: Region,
    pub mean_score: f64,
    pub neighbourhoods: usize,
}

/// Record count per value category. All three categories are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketDistribution {
    counts: BTreeMap<ValueCategory, usize>,
}

impl MarketDistribution {
    fn tally<'a>(records: impl IntoIterator<Item = &'a NeighbourhoodRecord>) -> Self {
        let mut counts: BTreeMap<_, _> = ValueCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        for record in records {
            *counts.entry(record.value_category).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, category: ValueCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValueCategory, usize)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

/// Headline figures shown above every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total_neighbourhoods: usize,
    pub regions: usize,
    pub undervalued: usize,
}

/// The insight panel: extremes at neighbourhood and region level plus the
/// market split. Each part is independent; an empty category only blanks its
/// own slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights<'a> {
    pub best: Option<&'a NeighbourhoodRecord>,
    pub worst: Option<&'a NeighbourhoodRecord>,
    pub best_region: Option<RegionAverage>,
    pub worst_region: Option<RegionAverage>,
    pub distribution: MarketDistribution,
}

/// Read-only view engine over a borrowed [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> RankingEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Records in `region`, or all records for the "All" sentinel.
    ///
    /// A known region with no rows gives an empty Vec; a name outside the
    /// region set is `InvalidRegion`.
    pub fn filter_by_region(&self, region: &str) -> Result<Vec<&'a NeighbourhoodRecord>> {
        let filter: RegionFilter = region.parse()?;
        Ok(self.filter(filter))
    }

    pub fn filter(&self, filter: RegionFilter) -> Vec<&'a NeighbourhoodRecord> {
        let records: Vec<_> = self
            .dataset
            .iter()
            .filter(|r| filter.matches(r.region))
            .collect();
        debug!(%filter, matched = records.len(), "region filter applied");
        records
    }

    /// Full table ordered by `value_rank`.
    pub fn ranked(&self) -> Vec<&'a NeighbourhoodRecord> {
        let mut records: Vec<_> = self.dataset.iter().collect();
        records.sort_by_key(|r| r.value_rank);
        records
    }

    /// Highest scoring Undervalued neighbourhood.
    pub fn best(&self) -> Result<&'a NeighbourhoodRecord> {
        self.extreme(ValueCategory::Undervalued, Direction::Best)
    }

    /// Lowest scoring Overpriced neighbourhood.
    pub fn worst(&self) -> Result<&'a NeighbourhoodRecord> {
        self.extreme(ValueCategory::Overpriced, Direction::Worst)
    }

    fn extreme(
        &self,
        category: ValueCategory,
        direction: Direction,
    ) -> Result<&'a NeighbourhoodRecord> {
        let records: Vec<_> = self.dataset.iter().collect();
        top_k(&records, category, 1, direction)
            .into_iter()
            .next()
            .ok_or(HoodError::EmptyCategory(category))
    }

    /// Mean score per region, highest first. Regions without rows are left out.
    pub fn region_averages(&self) -> Vec<RegionAverage> {
        let mut sums: BTreeMap<Region, (f64, usize)> = BTreeMap::new();
        for record in self.dataset {
            let entry = sums.entry(record.region).or_insert((0.0, 0));
            entry.0 += record.value_score;
            entry.1 += 1;
        }

        let mut averages: Vec<_> = sums
            .into_iter()
            .map(|(region, (sum, count))| RegionAverage {
                region,
                mean_score: sum / count as f64,
                neighbourhoods: count,
            })
            .collect();

        // BTreeMap iteration is in region declaration order and the sort is
        // stable, so equal means keep that order.
        averages.sort_by(|a, b| b.mean_score.total_cmp(&a.mean_score));
        averages
    }

    pub fn region_average(&self, region: Region) -> Option<RegionAverage> {
        self.region_averages()
            .into_iter()
            .find(|avg| avg.region == region)
    }

    pub fn best_region(&self) -> Option<RegionAverage> {
        self.region_averages().into_iter().next()
    }

    pub fn worst_region(&self) -> Option<RegionAverage> {
        self.region_averages().into_iter().last()
    }

    pub fn market_distribution(&self) -> MarketDistribution {
        MarketDistribution::tally(self.dataset)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            total_neighbourhoods: self.dataset.len(),
            regions: self.dataset.regions().len(),
            undervalued: self.market_distribution().get(ValueCategory::Undervalued),
        }
    }

    pub fn insights(&self) -> Insights<'a> {
        let averages = self.region_averages();
        Insights {
            best: self.best().ok(),
            worst: self.worst().ok(),
            best_region: averages.first().cloned(),
            worst_region: averages.last().cloned(),
            distribution: self.market_distribution(),
        }
    }
}

/// First `k` records of `category`, ordered by score in `direction`.
///
/// Equal scores fall back to `value_rank`, ascending for `Best` and descending
/// for `Worst`, so the two directions are exact mirrors of each other.
pub fn top_k<'a>(
    records: &[&'a NeighbourhoodRecord],
    category: ValueCategory,
    k: usize,
    direction: Direction,
) -> Vec<&'a NeighbourhoodRecord> {
    let mut matching: Vec<_> = records
        .iter()
        .copied()
        .filter(|r| r.value_category == category)
        .collect();

    matching.sort_by(|a, b| match direction {
        Direction::Best => by_score_descending(a, b),
        Direction::Worst => by_score_descending(b, a),
    });
    matching.truncate(k);
    matching
}

/// Top `n` records by score regardless of category.
pub fn top_scores<'a>(records: &[&'a NeighbourhoodRecord], n: usize) -> Vec<&'a NeighbourhoodRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| by_score_descending(a, b));
    sorted.truncate(n);
    sorted
}

fn by_score_descending(a: &NeighbourhoodRecord, b: &NeighbourhoodRecord) -> Ordering {
    b.value_score
        .partial_cmp(&a.value_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.value_rank.cmp(&b.value_rank))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, region: Region, score: f64, category: ValueCategory) -> NeighbourhoodRecord {
        NeighbourhoodRecord::new(name, region, 100.0, 50.0, score, category)
    }

    fn scenario() -> Dataset {
        Dataset::new(vec![
            NeighbourhoodRecord::new("Chelsea", Region::Manhattan, 300.0, 10.0, 0.5, ValueCategory::Overpriced),
            NeighbourhoodRecord::new("Astoria", Region::Queens, 120.0, 25.0, 3.2, ValueCategory::Undervalued),
        ])
        .unwrap()
    }

    fn mixed() -> Dataset {
        use ValueCategory::*;
        Dataset::new(vec![
            record("Tribeca", Region::Manhattan, 0.2, Overpriced),
            record("SoHo", Region::Manhattan, 0.4, Overpriced),
            record("Harlem", Region::Manhattan, 1.8, FairlyPriced),
            record("Bushwick", Region::Brooklyn, 2.9, Undervalued),
            record("Dumbo", Region::Brooklyn, 0.3, Overpriced),
            record("Flushing", Region::Queens, 3.4, Undervalued),
            record("Jamaica", Region::Queens, 2.9, Undervalued),
            record("Fordham", Region::Bronx, 2.0, FairlyPriced),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_best_and_worst() {
        let dataset = scenario();
        let engine = RankingEngine::new(&dataset);

        let best = engine.best().unwrap();
        assert_eq!(best.neighbourhood, "Astoria");
        assert_eq!(best.value_score, 3.2);

        let worst = engine.worst().unwrap();
        assert_eq!(worst.neighbourhood, "Chelsea");
        assert_eq!(worst.value_score, 0.5);
    }

    #[test]
    fn test_best_on_empty_category_is_reported() {
        let dataset = Dataset::new(vec![record("Harlem", Region::Manhattan, 1.0, ValueCategory::FairlyPriced)]).unwrap();
        let engine = RankingEngine::new(&dataset);

        assert_eq!(engine.best(), Err(HoodError::EmptyCategory(ValueCategory::Undervalued)));
        assert_eq!(engine.worst(), Err(HoodError::EmptyCategory(ValueCategory::Overpriced)));
    }

    #[test]
    fn test_filter_by_region() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);

        assert_eq!(engine.filter_by_region("All").unwrap().len(), dataset.len());

        let manhattan = engine.filter_by_region("Manhattan").unwrap();
        assert_eq!(manhattan.len(), 3);
        assert!(manhattan.iter().all(|r| r.region == Region::Manhattan));
    }

    #[test]
    fn test_filter_distinguishes_empty_from_invalid() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);

        assert_eq!(engine.filter_by_region("Staten Island").unwrap(), Vec::<&NeighbourhoodRecord>::new());
        assert_eq!(
            engine.filter_by_region("Narnia"),
            Err(HoodError::InvalidRegion("Narnia".to_string()))
        );
        assert!(engine.filter_by_region("manhattan").is_err());
    }

    #[test]
    fn test_top_k_orders_and_truncates() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);
        let all = engine.filter(RegionFilter::All);

        let best: Vec<_> = top_k(&all, ValueCategory::Undervalued, 2, Direction::Best)
            .iter()
            .map(|r| r.neighbourhood.as_str())
            .collect();
        assert_eq!(best, vec!["Flushing", "Bushwick"]);

        let worst: Vec<_> = top_k(&all, ValueCategory::Overpriced, 10, Direction::Worst)
            .iter()
            .map(|r| r.neighbourhood.as_str())
            .collect();
        assert_eq!(worst, vec!["Tribeca", "Dumbo", "SoHo"]);
    }

    #[test]
    fn test_top_k_directions_mirror_with_ties() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);
        let all = engine.filter(RegionFilter::All);

        let best = top_k(&all, ValueCategory::Undervalued, 5, Direction::Best);
        let mut worst = top_k(&all, ValueCategory::Undervalued, 5, Direction::Worst);
        worst.reverse();
        assert_eq!(best, worst);
    }

    #[test]
    fn test_top_k_empty_category_is_empty_not_error() {
        let dataset = scenario();
        let engine = RankingEngine::new(&dataset);
        let all = engine.filter(RegionFilter::All);

        assert!(top_k(&all, ValueCategory::FairlyPriced, 10, Direction::Best).is_empty());
        assert!(top_k(&all, ValueCategory::Undervalued, 0, Direction::Best).is_empty());
    }

    #[test]
    fn test_region_averages_sorted_and_complete() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);
        let averages = engine.region_averages();

        let regions: Vec<_> = averages.iter().map(|a| a.region).collect();
        assert_eq!(
            regions,
            vec![Region::Queens, Region::Bronx, Region::Brooklyn, Region::Manhattan]
        );
        assert!(averages.windows(2).all(|w| w[0].mean_score >= w[1].mean_score));
        assert!(averages.iter().all(|a| a.mean_score.is_finite()));

        // Reversing the comparison gives the same pairs in ascending order.
        let mut ascending = averages.clone();
        ascending.sort_by(|a, b| a.mean_score.total_cmp(&b.mean_score));
        let mut reversed = averages.clone();
        reversed.reverse();
        let pairs = |list: &[RegionAverage]| -> Vec<(Region, f64)> {
            list.iter().map(|a| (a.region, a.mean_score)).collect()
        };
        assert_eq!(pairs(&ascending), pairs(&reversed));

        let queens = engine.region_average(Region::Queens).unwrap();
        assert!((queens.mean_score - 3.15).abs() < 1e-9);
        assert_eq!(queens.neighbourhoods, 2);
        assert!(engine.region_average(Region::StatenIsland).is_none());
    }

    #[test]
    fn test_best_and_worst_region() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);

        assert_eq!(engine.best_region().unwrap().region, Region::Queens);
        assert_eq!(engine.worst_region().unwrap().region, Region::Manhattan);
    }

    #[test]
    fn test_market_distribution_sums_to_len() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);
        let dist = engine.market_distribution();

        assert_eq!(dist.get(ValueCategory::Undervalued), 3);
        assert_eq!(dist.get(ValueCategory::FairlyPriced), 2);
        assert_eq!(dist.get(ValueCategory::Overpriced), 3);
        assert_eq!(dist.total(), dataset.len());

        let empty = Dataset::default();
        let dist = RankingEngine::new(&empty).market_distribution();
        assert_eq!(dist.iter().count(), 3);
        assert_eq!(dist.total(), 0);
    }

    #[test]
    fn test_summary_and_ranked_table() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);

        assert_eq!(
            engine.summary(),
            DatasetSummary {
                total_neighbourhoods: 8,
                regions: 4,
                undervalued: 3,
            }
        );

        let ranked: Vec<_> = engine.ranked().iter().map(|r| r.value_rank).collect();
        assert_eq!(ranked, (1..=8).collect::<Vec<_>>());
        assert_eq!(engine.ranked()[0].neighbourhood, "Flushing");
    }

    #[test]
    fn test_top_scores_ignores_category() {
        let dataset = mixed();
        let engine = RankingEngine::new(&dataset);
        let manhattan = engine.filter(RegionFilter::Only(Region::Manhattan));

        let top: Vec<_> = top_scores(&manhattan, 2)
            .iter()
            .map(|r| r.neighbourhood.as_str())
            .collect();
        assert_eq!(top, vec!["Harlem", "SoHo"]);
    }

    #[test]
    fn test_signed_zero_scores_fall_back_to_rank() {
        let mut first = record("A", Region::Queens, -0.0, ValueCategory::Overpriced);
        first.value_rank = 1;
        let mut second = record("B", Region::Queens, 0.0, ValueCategory::Overpriced);
        second.value_rank = 2;

        let top: Vec<_> = top_scores(&[&second, &first], 2)
            .iter()
            .map(|r| r.neighbourhood.as_str())
            .collect();
        assert_eq!(top, vec!["A", "B"]);
    }

    #[test]
    fn test_insights_tolerate_missing_extremes() {
        let dataset = Dataset::new(vec![record("Harlem", Region::Manhattan, 1.0, ValueCategory::FairlyPriced)]).unwrap();
        let insights = RankingEngine::new(&dataset).insights();

        assert!(insights.best.is_none());
        assert!(insights.worst.is_none());
        assert_eq!(insights.best_region.as_ref().unwrap().region, Region::Manhattan);
        assert_eq!(insights.worst_region.as_ref().unwrap().region, Region::Manhattan);
        assert_eq!(insights.distribution.total(), 1);
    }
}
