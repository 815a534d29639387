//! Plain text output format for hoodrank

use anyhow::Result;
use std::io::Write;

use super::{Formatter, answer_lines, distribution_lines};
use crate::analysis::answer::{Answer, Highlight};
use crate::analysis::rank::{DatasetSummary, Insights, MarketDistribution, RegionAverage};
use crate::core::NeighbourhoodRecord;

pub struct PlainFormatter;

fn write_block(output: &mut dyn Write, title: &str, lines: &[String]) -> Result<()> {
    writeln!(output, "{}", title)?;
    for line in lines {
        writeln!(output, "  {}", line)?;
    }
    writeln!(output)?;
    Ok(())
}

impl Formatter for PlainFormatter {
    fn write_summary(&mut self, output: &mut dyn Write, summary: &DatasetSummary) -> Result<()> {
        writeln!(output, "=== NEIGHBOURHOOD VALUE ===")?;
        writeln!(output, "Total neighbourhoods: {}", summary.total_neighbourhoods)?;
        writeln!(output, "Boroughs: {}", summary.regions)?;
        writeln!(output, "Undervalued areas: {}", summary.undervalued)?;
        writeln!(output)?;
        Ok(())
    }

    fn write_table(
        &mut self,
        output: &mut dyn Write,
        title: &str,
        records: &[&NeighbourhoodRecord],
    ) -> Result<()> {
        writeln!(output, "=== {} ===", title.to_uppercase())?;
        if records.is_empty() {
            writeln!(output, "(no neighbourhoods)")?;
            writeln!(output)?;
            return Ok(());
        }

        let name_width = records
            .iter()
            .map(|r| r.neighbourhood.chars().count())
            .max()
            .unwrap_or(0)
            .max("Neighbourhood".len());

        writeln!(
            output,
            "{:>4}  {:<name_width$}  {:<13}  {:>8}  {:>6}  {:>7}  {}",
            "Rank", "Neighbourhood", "Borough", "Price", "Avail", "Score", "Category"
        )?;
        for r in records {
            writeln!(
                output,
                "{:>4}  {:<name_width$}  {:<13}  {:>8.0}  {:>6.0}  {:>7.2}  {}",
                r.value_rank,
                r.neighbourhood,
                r.region.as_str(),
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
        writeln!(output, "=== BOROUGH AVERAGES ===")?;
        for avg in averages {
            writeln!(
                output,
                "{:<13}  {:>7.2}  ({} neighbourhoods)",
                avg.region.as_str(),
                avg.mean_score,
                avg.neighbourhoods
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
        write_block(output, "=== MARKET DISTRIBUTION ===", &distribution_lines(distribution))
    }

    fn write_insights(&mut self, output: &mut dyn Write, insights: &Insights<'_>) -> Result<()> {
        writeln!(output, "=== KEY INSIGHTS ===")?;

        let best = insights
            .best
            .map(|r| Answer::BestValue(Highlight::from(r)))
            .map(|a| answer_lines(&a))
            .unwrap_or_else(|| vec!["No undervalued neighbourhoods".to_string()]);
        write_block(output, "Best Value Neighbourhood", &best)?;

        let worst = insights
            .worst
            .map(|r| Answer::MostOverpriced(Highlight::from(r)))
            .map(|a| answer_lines(&a))
            .unwrap_or_else(|| vec!["No overpriced neighbourhoods".to_string()]);
        write_block(output, "Most Overpriced Neighbourhood", &worst)?;

        if let Some(avg) = &insights.best_region {
            write_block(
                output,
                "Best Value Borough",
                &[format!(
                    "{} has the highest average value score ({:.2})",
                    avg.region, avg.mean_score
                )],
            )?;
        }
        if let Some(avg) = &insights.worst_region {
            write_block(
                output,
                "Lowest Value Borough",
                &[format!(
                    "{} shows the lowest average value score ({:.2})",
                    avg.region, avg.mean_score
                )],
            )?;
        }

        self.write_distribution(output, &insights.distribution)
    }

    fn write_answer(&mut self, output: &mut dyn Write, answer: &Answer) -> Result<()> {
        write_block(output, &answer.title(), &answer_lines(answer))
    }

    fn finish(&mut self, output: &mut dyn Write) -> Result<()> {
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RankingEngine;
    use crate::core::{Dataset, Region, ValueCategory};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            NeighbourhoodRecord::new("Chelsea", Region::Manhattan, 300.0, 10.0, 0.5, ValueCategory::Overpriced),
            NeighbourhoodRecord::new("Astoria", Region::Queens, 120.0, 25.0, 3.2, ValueCategory::Undervalued),
        ])
        .unwrap()
    }

    #[test]
    fn test_plain_table() {
        let dataset = dataset();
        let engine = RankingEngine::new(&dataset);
        let mut output = Vec::new();

        PlainFormatter
            .write_table(&mut output, "Rankings", &engine.ranked())
            .unwrap();

        let result = String::from_utf8(output).unwrap();
        assert!(result.contains("=== RANKINGS ==="));
        let astoria = result.find("Astoria").unwrap();
        let chelsea = result.find("Chelsea").unwrap();
        assert!(astoria < chelsea);
        assert!(result.contains("3.20"));
    }

    #[test]
    fn test_plain_insights() {
        let dataset = dataset();
        let engine = RankingEngine::new(&dataset);
        let mut output = Vec::new();

        PlainFormatter
            .write_insights(&mut output, &engine.insights())
            .unwrap();

        let result = String::from_utf8(output).unwrap();
        assert!(result.contains("  Astoria (Queens)"));
        assert!(result.contains("  Chelsea (Manhattan)"));
        assert!(result.contains("Queens has the highest average value score (3.20)"));
        assert!(result.contains("Manhattan shows the lowest average value score (0.50)"));
        assert!(result.contains("1 neighbourhoods offer strong value"));
    }
}
