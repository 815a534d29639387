//! Markdown output format for hoodrank

use anyhow::Result;
use std::io::Write;

use super::{Formatter, answer_lines, distribution_lines};
use crate::analysis::answer::{Answer, Highlight};
use crate::analysis::rank::{DatasetSummary, Insights, MarketDistribution, RegionAverage};
use crate::core::NeighbourhoodRecord;

pub struct MarkdownFormatter;

/// Pipes inside a cell would split the row.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn write_card(output: &mut dyn Write, title: &str, lines: &[String]) -> Result<()> {
    writeln!(output, "> **{}**", title)?;
    for line in lines {
        writeln!(output, "> - {}", line)?;
    }
    writeln!(output)?;
    Ok(())
}

impl Formatter for MarkdownFormatter {
    fn write_summary(&mut self, output: &mut dyn Write, summary: &DatasetSummary) -> Result<()> {
        writeln!(output, "# Neighbourhood Value Analysis")?;
        writeln!(output)?;
        writeln!(output, "| Total Neighbourhoods | Boroughs | Undervalued Areas |")?;
        writeln!(output, "|---:|---:|---:|")?;
        writeln!(
            output,
            "| {} | {} | {} |",
            summary.total_neighbourhoods, summary.regions, summary.undervalued
        )?;
        writeln!(output)?;
        Ok(())
    }

    fn write_table(
        &mut self,
        output: &mut dyn Write,
        title: &str,
        records: &[&NeighbourhoodRecord],
    ) -> Result<()> {
        writeln!(output, "## {}", title)?;
        writeln!(output)?;
        if records.is_empty() {
            writeln!(output, "*No neighbourhoods.*")?;
            writeln!(output)?;
            return Ok(());
        }

        writeln!(
            output,
            "| Rank | Neighbourhood | Borough | Avg Price | Availability | Value Score | Category |"
        )?;
        writeln!(output, "|---:|---|---|---:|---:|---:|---|")?;
        for r in records {
            writeln!(
                output,
                "| {} | {} | {} | ${:.0} | {:.0} | {:.2} | {} |",
                r.value_rank,
                cell(&r.neighbourhood),
                r.region,
                r.avg_price,
                r.avg_availability,
                r.value_score,
                r.value_category
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn write_region_averages(
        &mut self,
        output: &mut dyn Write,
        averages: &[RegionAverage],
    ) -> Result<()> {
        writeln!(output, "## Borough Averages")?;
        writeln!(output)?;
        writeln!(output, "| Borough | Avg Value Score | Neighbourhoods |")?;
        writeln!(output, "|---|---:|---:|")?;
        for avg in averages {
            writeln!(
                output,
                "| {} | {:.2} | {} |",
                avg.region, avg.mean_score, avg.neighbourhoods
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn write_distribution(
        &mut self,
        output: &mut dyn Write,
        distribution: &MarketDistribution,
    ) -> Result<()> {
        writeln!(output, "## Market Distribution")?;
        writeln!(output)?;
        for line in distribution_lines(distribution) {
            writeln!(output, "- {}", line)?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn write_insights(&mut self, output: &mut dyn Write, insights: &Insights<'_>) -> Result<()> {
        writeln!(output, "## Key Insights")?;
        writeln!(output)?;

        match insights.best {
            Some(r) => write_card(
                output,
                "Best Value Neighbourhood",
                &answer_lines(&Answer::BestValue(Highlight::from(r))),
            )?,
            None => write_card(output, "Best Value Neighbourhood", &["No undervalued neighbourhoods".to_string()])?,
        }
        match insights.worst {
            Some(r) => write_card(
                output,
                "Most Overpriced Neighbourhood",
                &answer_lines(&Answer::MostOverpriced(Highlight::from(r))),
            )?,
            None => write_card(output, "Most Overpriced Neighbourhood", &["No overpriced neighbourhoods".to_string()])?,
        }
        if let Some(avg) = &insights.best_region {
            write_card(
                output,
                "Best Value Borough",
                &[format!("**{}** has the highest average value score ({:.2})", avg.region, avg.mean_score)],
            )?;
        }
        if let Some(avg) = &insights.worst_region {
            write_card(
                output,
                "Lowest Value Borough",
                &[format!("**{}** shows the lowest average value score ({:.2})", avg.region, avg.mean_score)],
            )?;
        }

        self.write_distribution(output, &insights.distribution)
    }

    fn write_answer(&mut self, output: &mut dyn Write, answer: &Answer) -> Result<()> {
        write_card(output, &answer.title(), &answer_lines(answer))
    }

    fn finish(&mut self, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "---")?;
        output.flush()?;
        Ok(())
    }
}
