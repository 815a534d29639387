//! Output format modules for hoodrank

pub mod json;
pub mod markdown;
pub mod plain;

use anyhow::Result;
use std::io::Write;

use crate::analysis::answer::Answer;
use crate::analysis::rank::{DatasetSummary, Insights, MarketDistribution, RegionAverage};
use crate::config::OutputFormat;
use crate::core::{NeighbourhoodRecord, ValueCategory};

/// Renders report sections. Sections are written in call order; `finish` must
/// be called once at the end.
pub trait Formatter {
    fn write_summary(&mut self, output: &mut dyn Write, summary: &DatasetSummary) -> Result<()>;

    fn write_table(
        &mut self,
        output: &mut dyn Write,
        title: &str,
        records: &[&NeighbourhoodRecord],
    ) -> Result<()>;

    fn write_region_averages(
        &mut self,
        output: &mut dyn Write,
        averages: &[RegionAverage],
    ) -> Result<()>;

    fn write_distribution(
        &mut self,
        output: &mut dyn Write,
        distribution: &MarketDistribution,
    ) -> Result<()>;

    fn write_insights(&mut self, output: &mut dyn Write, insights: &Insights<'_>) -> Result<()>;

    fn write_answer(&mut self, output: &mut dyn Write, answer: &Answer) -> Result<()>;

    fn finish(&mut self, output: &mut dyn Write) -> Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Plain => Box::new(plain::PlainFormatter),
        OutputFormat::Markdown => Box::new(markdown::MarkdownFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
    }
}

/// Body lines of an answer, shared by the text formatters.
pub(crate) fn answer_lines(answer: &Answer) -> Vec<String> {
    match answer {
        Answer::BestValue(h) => vec![
            format!("{} ({})", h.neighbourhood, h.region),
            format!("Avg Price: ${:.0}", h.avg_price),
            format!("Availability: {:.0} days", h.avg_availability),
            format!("Value Score: {:.2}", h.value_score),
        ],
        Answer::MostOverpriced(h) => vec![
            format!("{} ({})", h.neighbourhood, h.region),
            format!("Avg Price: ${:.0}", h.avg_price),
            format!("Value Score: {:.2}", h.value_score),
        ],
        Answer::RegionInsight(insight) => {
            let mut lines = vec![format!("Avg Value Score: {:.2}", insight.mean_score)];
            lines.push(format!("Neighbourhoods: {}", insight.neighbourhoods));
            lines.extend(insight.notes.iter().map(|n| n.to_string()));
            lines
        }
        Answer::NoData { intent, reason } => vec![format!("{intent}: {reason}")],
        Answer::Help(help) => {
            let mut lines: Vec<String> = help.topics.iter().map(|t| t.to_string()).collect();
            let examples: Vec<_> = help.examples.iter().map(|e| format!("\"{e}\"")).collect();
            lines.push(format!("Try: {}", examples.join(" or ")));
            lines
        }
    }
}

/// Sentences for the market split, in the order the insight panel lists them.
pub(crate) fn distribution_lines(distribution: &MarketDistribution) -> Vec<String> {
    vec![
        format!(
            "{} neighbourhoods are fairly priced",
            distribution.get(ValueCategory::FairlyPriced)
        ),
        format!(
            "{} neighbourhoods offer strong value",
            distribution.get(ValueCategory::Undervalued)
        ),
        format!(
            "{} neighbourhoods appear overpriced",
            distribution.get(ValueCategory::Overpriced)
        ),
    ]
}
