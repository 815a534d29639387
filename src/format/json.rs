//! JSON output format for hoodrank

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

use super::Formatter;
use crate::analysis::answer::Answer;
use crate::analysis::rank::{DatasetSummary, Insights, MarketDistribution, RegionAverage};
use crate::core::NeighbourhoodRecord;

/// Collects sections into one object and writes it on `finish`, so the output
/// is always a single valid document. Tables accumulate under `tables` in the
/// order they were written.
pub struct JsonFormatter {
    sections: Map<String, Value>,
    tables: Vec<Value>,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct Table<'a> {
    title: &'a str,
    records: &'a [&'a NeighbourhoodRecord],
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            sections: Map::new(),
            tables: Vec::new(),
        }
    }

    fn insert(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        self.sections
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_summary(&mut self, _output: &mut dyn Write, summary: &DatasetSummary) -> Result<()> {
        self.insert("summary", summary)
    }

    fn write_table(
        &mut self,
        _output: &mut dyn Write,
        title: &str,
        records: &[&NeighbourhoodRecord],
    ) -> Result<()> {
        self.tables
            .push(serde_json::to_value(Table { title, records })?);
        Ok(())
    }

    fn write_region_averages(
        &mut self,
        _output: &mut dyn Write,
        averages: &[RegionAverage],
    ) -> Result<()> {
        self.insert("region_averages", averages)
    }

    fn write_distribution(
        &mut self,
        _output: &mut dyn Write,
        distribution: &MarketDistribution,
    ) -> Result<()> {
        self.insert("market_distribution", distribution)
    }

    fn write_insights(&mut self, _output: &mut dyn Write, insights: &Insights<'_>) -> Result<()> {
        self.insert("insights", insights)
    }

    fn write_answer(&mut self, _output: &mut dyn Write, answer: &Answer) -> Result<()> {
        self.insert("answer", answer)
    }

    fn finish(&mut self, output: &mut dyn Write) -> Result<()> {
        let mut sections = std::mem::take(&mut self.sections);
        if !self.tables.is_empty() {
            sections.insert(
                "tables".to_string(),
                Value::Array(std::mem::take(&mut self.tables)),
            );
        }
        let document = Value::Object(sections);
        serde_json::to_writer_pretty(&mut *output, &document)?;
        writeln!(output)?;
        output.flush()?;
        Ok(())
    }
}
