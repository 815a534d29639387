//! CSV ingestion for the value table
//!
//! The schema is fixed. Every required column is resolved up front from the
//! header row so a missing column fails before any row is read.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::core::dataset::Dataset;
use crate::core::types::{NeighbourhoodRecord, Region, ValueCategory};
use crate::error::{HoodError, Result};

const NEIGHBOURHOOD: &str = "neighbourhood";
const AVG_PRICE: &str = "avg_price";
const AVG_AVAILABILITY: &str = "avg_availability";
const VALUE_SCORE: &str = "value_score";
const VALUE_RANK: &str = "value_rank";
const VALUE_CATEGORY: &str = "value_category";

/// Accepted header names for the region column, in preference order.
const REGION_ALIASES: &[&str] = &["neighbourhood_group", "region"];

/// Column positions resolved from the header row.
struct Columns {
    neighbourhood: usize,
    region: usize,
    /// Header name the region column was found under.
    region_header: &'static str,
    avg_price: usize,
    avg_availability: usize,
    value_score: usize,
    value_rank: usize,
    value_category: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| HoodError::Schema(format!("missing required column `{name}`")))
        };

        let (region, region_header) = REGION_ALIASES
            .iter()
            .find_map(|&name| find(name).map(|index| (index, name)))
            .ok_or_else(|| {
                HoodError::Schema(format!(
                    "missing required column `{}`",
                    REGION_ALIASES.join("` or `")
                ))
            })?;

        Ok(Self {
            neighbourhood: require(NEIGHBOURHOOD)?,
            region,
            region_header,
            avg_price: require(AVG_PRICE)?,
            avg_availability: require(AVG_AVAILABILITY)?,
            value_score: require(VALUE_SCORE)?,
            value_rank: require(VALUE_RANK)?,
            value_category: require(VALUE_CATEGORY)?,
        })
    }
}

/// Loads the value table from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| HoodError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "loading value table");
    read_dataset(file)
}

/// Parses the value table from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| HoodError::Schema(format!("failed to read CSV headers: {e}")))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut source_ranks = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let raw = result.map_err(|e| HoodError::Schema(format!("failed to parse row {row}: {e}")))?;

        let (record, rank) = parse_row(row, &columns, &raw)?;
        records.push(record);
        source_ranks.push(rank);
    }

    let dataset = Dataset::new(records)?;

    let disagreements = dataset
        .iter()
        .zip(&source_ranks)
        .filter(|(record, source)| record.value_rank != **source)
        .count();
    if disagreements > 0 {
        warn!(
            disagreements,
            "value_rank column disagrees with value_score order; using derived ranks"
        );
    }

    debug!(rows = dataset.len(), "value table loaded");
    Ok(dataset)
}

fn parse_row(
    row: usize,
    columns: &Columns,
    raw: &StringRecord,
) -> Result<(NeighbourhoodRecord, usize)> {
    let field = |index: usize, column: &str| {
        raw.get(index)
            .ok_or_else(|| HoodError::schema(row, column, "value missing"))
    };
    let number = |index: usize, column: &str| -> Result<f64> {
        let text = field(index, column)?;
        text.parse::<f64>()
            .map_err(|e| HoodError::schema(row, column, format!("{text:?} is not a number ({e})")))
    };

    let neighbourhood = field(columns.neighbourhood, NEIGHBOURHOOD)?;
    if neighbourhood.is_empty() {
        return Err(HoodError::schema(row, NEIGHBOURHOOD, "empty name"));
    }

    let region_text = field(columns.region, columns.region_header)?;
    let region: Region = region_text.parse().map_err(|_| {
        HoodError::schema(row, columns.region_header, format!("unknown region {region_text:?}"))
    })?;

    let category_text = field(columns.value_category, VALUE_CATEGORY)?;
    let category: ValueCategory = category_text
        .parse()
        .map_err(|e: String| HoodError::schema(row, VALUE_CATEGORY, e))?;

    let rank_text = field(columns.value_rank, VALUE_RANK)?;
    let rank = parse_rank(rank_text)
        .ok_or_else(|| HoodError::schema(row, VALUE_RANK, format!("{rank_text:?} is not an integer")))?;

    let record = NeighbourhoodRecord::new(
        neighbourhood,
        region,
        number(columns.avg_price, AVG_PRICE)?,
        number(columns.avg_availability, AVG_AVAILABILITY)?,
        number(columns.value_score, VALUE_SCORE)?,
        category,
    );

    Ok((record, rank))
}

/// Accepts "7" and the "7.0" that spreadsheet exports tend to produce.
fn parse_rank(text: &str) -> Option<usize> {
    if let Ok(rank) = text.parse::<usize>() {
        return Some(rank);
    }
    let float = text.parse::<f64>().ok()?;
    (float.fract() == 0.0 && float >= 1.0).then_some(float as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "neighbourhood,neighbourhood_group,avg_price,avg_availability,value_score,value_rank,value_category";

    fn parse(body: &str) -> Result<Dataset> {
        read_dataset(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_reads_fixed_schema() {
        let dataset = parse(
            "Chelsea,Manhattan,300,10,0.5,2,Overpriced\n\
             Astoria,Queens,120,25,3.2,1,Undervalued\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        let astoria = &dataset.records()[1];
        assert_eq!(astoria.neighbourhood, "Astoria");
        assert_eq!(astoria.region, Region::Queens);
        assert_eq!(astoria.value_rank, 1);
        assert_eq!(astoria.value_category, ValueCategory::Undervalued);
    }

    #[test]
    fn test_region_header_alias() {
        let csv = "neighbourhood,region,avg_price,avg_availability,value_score,value_rank,value_category\n\
                   Port Richmond,Staten Island,80,200,4.0,1,Fairly Priced\n";
        let dataset = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].region, Region::StatenIsland);
    }

    #[test]
    fn test_region_error_names_header_in_use() {
        let csv = "neighbourhood,region,avg_price,avg_availability,value_score,value_rank,value_category\n\
                   Hoboken,New Jersey,100,10,1.0,1,Overpriced\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            HoodError::Schema("row 1, column `region`: unknown region \"New Jersey\"".to_string())
        );

        let err = parse("Hoboken,New Jersey,100,10,1.0,1,Overpriced\n").unwrap_err();
        assert!(matches!(err, HoodError::Schema(msg) if msg.contains("`neighbourhood_group`")));
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "neighbourhood,neighbourhood_group,avg_price,value_score,value_rank,value_category\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            HoodError::Schema("missing required column `avg_availability`".to_string())
        );
    }

    #[test]
    fn test_bad_number_names_row_and_column() {
        let err = parse("Chelsea,Manhattan,cheap,10,0.5,1,Overpriced\n").unwrap_err();
        assert!(matches!(err, HoodError::Schema(msg) if msg.contains("row 1") && msg.contains("avg_price")));
    }

    #[test]
    fn test_unknown_region_and_category() {
        let err = parse("Hoboken,New Jersey,100,10,1.0,1,Overpriced\n").unwrap_err();
        assert!(matches!(err, HoodError::Schema(msg) if msg.contains("New Jersey")));

        let err = parse("Chelsea,Manhattan,100,10,1.0,1,Bargain\n").unwrap_err();
        assert!(matches!(err, HoodError::Schema(msg) if msg.contains("Bargain")));
    }

    #[test]
    fn test_derived_rank_wins_over_rank_column() {
        let dataset = parse(
            "Chelsea,Manhattan,300,10,0.5,1,Overpriced\n\
             Astoria,Queens,120,25,3.2,2,Undervalued\n",
        )
        .unwrap();

        let ranks: Vec<_> = dataset.iter().map(|r| r.value_rank).collect();
        assert_eq!(ranks, vec![2, 1]);
    }

    #[test]
    fn test_negative_price_or_availability_is_rejected() {
        let err = parse("Chelsea,Manhattan,-5,10,0.5,1,Overpriced\n").unwrap_err();
        assert_eq!(
            err,
            HoodError::Schema("row 1, column `avg_price`: -5 is negative".to_string())
        );

        let err = parse(
            "Chelsea,Manhattan,300,10,0.5,1,Overpriced\n\
             Astoria,Queens,120,-1.5,3.2,2,Undervalued\n",
        )
        .unwrap_err();
        assert!(matches!(err, HoodError::Schema(msg) if msg.contains("row 2") && msg.contains("avg_availability")));
    }

    #[test]
    fn test_float_rank_is_accepted() {
        let dataset = parse("Chelsea,Manhattan,300,10,0.5,1.0,Overpriced\n").unwrap();
        assert_eq!(dataset.records()[0].value_rank, 1);
        assert!(parse("Chelsea,Manhattan,300,10,0.5,1.5,Overpriced\n").is_err());
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let dataset = read_dataset(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, HoodError::Io { .. }));
    }
}
