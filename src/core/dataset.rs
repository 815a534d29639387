use std::collections::{BTreeSet, HashSet};

use crate::core::types::{NeighbourhoodRecord, Region};
use crate::error::{HoodError, Result};

/// Immutable value table for one session.
///
/// Constructed once, then only borrowed. Input order is preserved; it is the
/// tie-break for `value_rank`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<NeighbourhoodRecord>,
}

impl Dataset {
    /// Validates the rows and assigns dense ranks.
    ///
    /// Rejects non-finite or negative numbers and duplicate
    /// `(neighbourhood, region)` pairs with `HoodError::Schema`.
    pub fn new(mut records: Vec<NeighbourhoodRecord>) -> Result<Self> {
        for record in &mut records {
            normalise_zero(&mut record.avg_price);
            normalise_zero(&mut record.avg_availability);
            normalise_zero(&mut record.value_score);
        }

        let mut seen: HashSet<(&str, Region)> = HashSet::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let row = i + 1;
            check_non_negative(row, "avg_price", record.avg_price)?;
            check_non_negative(row, "avg_availability", record.avg_availability)?;
            check_non_negative(row, "value_score", record.value_score)?;

            if !seen.insert((record.neighbourhood.as_str(), record.region)) {
                return Err(HoodError::schema(
                    row,
                    "neighbourhood",
                    format!(
                        "duplicate neighbourhood {:?} in {}",
                        record.neighbourhood, record.region
                    ),
                ));
            }
        }

        assign_dense_ranks(&mut records);
        Ok(Self { records })
    }

    pub fn records(&self) -> &[NeighbourhoodRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NeighbourhoodRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Regions that have at least one record, in declaration order.
    pub fn regions(&self) -> BTreeSet<Region> {
        self.records.iter().map(|r| r.region).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a NeighbourhoodRecord;
    type IntoIter = std::slice::Iter<'a, NeighbourhoodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn check_non_negative(row: usize, column: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(HoodError::schema(row, column, format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(HoodError::schema(row, column, format!("{value} is negative")));
    }
    Ok(())
}

/// `-0.0` compares equal to `0.0` but sorts below it under `total_cmp`.
fn normalise_zero(value: &mut f64) {
    if *value == 0.0 {
        *value = 0.0;
    }
}

/// Ranks 1..=n by score descending. `sort_by` is stable, so equal scores keep
/// input order.
fn assign_dense_ranks(records: &mut [NeighbourhoodRecord]) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[b].value_score.total_cmp(&records[a].value_score));

    for (position, index) in order.into_iter().enumerate() {
        records[index].value_rank = position + 1;
    }
}
