use crate::analysis::{Direction, QueryDispatcher, RankingEngine, top_k, top_scores};
use crate::config::{HoodrankConfig, View};
use crate::core::{Dataset, ValueCategory, load_dataset};
use crate::format::{Formatter, create_formatter};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

/// Main entry point for the hoodrank CLI.
///
/// Loads the value table once, then renders either the answer to
/// `config.query` or the report selected by `config.view`, to
/// `config.output` or stdout.
pub fn run(config: HoodrankConfig) -> Result<()> {
    config.validate()?;

    let dataset = load_dataset(&config.data)
        .with_context(|| format!("Failed to load value table {:?}", config.data))?;
    info!(
        neighbourhoods = dataset.len(),
        path = %config.data.display(),
        "value table loaded"
    );

    let mut output: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    render(&config, &dataset, output.as_mut())?;

    if let Some(path) = &config.output {
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

/// Renders one report or answer for `dataset` into `output`.
pub fn render(config: &HoodrankConfig, dataset: &Dataset, output: &mut dyn Write) -> Result<()> {
    let engine = RankingEngine::new(dataset);
    let mut formatter = create_formatter(config.output_format);

    match config.query.as_deref() {
        Some(query) => {
            let dispatcher = QueryDispatcher::with_rules(engine, &config.rules)
                .context("Invalid keyword rules in configuration")?;
            let answer = dispatcher.answer(query);
            formatter.write_answer(output, &answer)?;
        }
        None => render_view(config, &engine, formatter.as_mut(), output)?,
    }

    formatter.finish(output)
}

fn render_view(
    config: &HoodrankConfig,
    engine: &RankingEngine<'_>,
    formatter: &mut dyn Formatter,
    output: &mut dyn Write,
) -> Result<()> {
    debug!(view = ?config.view, "rendering view");
    formatter.write_summary(output, &engine.summary())?;

    match config.view {
        View::Overview => {
            formatter.write_table(output, "Dataset Overview", &engine.ranked())?;
        }
        View::Rankings => {
            let all = engine.ranked();
            let top = top_k(&all, ValueCategory::Undervalued, config.top_k, Direction::Best);
            let title = format!("Top {} Undervalued Neighbourhoods", config.top_k);
            formatter.write_table(output, &title, &top)?;
        }
        View::Explorer => {
            let filter = config.region_filter()?;
            let records = engine.filter(filter);
            let top = top_scores(&records, config.explorer_limit);
            let title = format!("Borough Explorer: {}", filter);
            formatter.write_table(output, &title, &top)?;

            let full = top_scores(&records, records.len());
            let title = format!("{} Neighbourhoods by Value Score", filter);
            formatter.write_table(output, &title, &full)?;
        }
        View::Insights => {
            formatter.write_insights(output, &engine.insights())?;
        }
        View::Distribution => {
            formatter.write_region_averages(output, &engine.region_averages())?;
            formatter.write_distribution(output, &engine.market_distribution())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::core::{NeighbourhoodRecord, Region};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            NeighbourhoodRecord::new("Chelsea", Region::Manhattan, 300.0, 10.0, 0.5, ValueCategory::Overpriced),
            NeighbourhoodRecord::new("Astoria", Region::Queens, 120.0, 25.0, 3.2, ValueCategory::Undervalued),
            NeighbourhoodRecord::new("Harlem", Region::Manhattan, 150.0, 60.0, 1.4, ValueCategory::FairlyPriced),
        ])
        .unwrap()
    }

    fn render_to_string(config: &HoodrankConfig) -> String {
        let mut output = Vec::new();
        render(config, &dataset(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_query_takes_precedence_over_view() {
        let config = HoodrankConfig {
            query: Some("queens insight".to_string()),
            view: View::Rankings,
            ..Default::default()
        };
        let result = render_to_string(&config);
        assert!(result.starts_with("Queens Insight"));
        assert!(result.contains("Avg Value Score: 3.20"));
        assert!(!result.contains("NEIGHBOURHOOD VALUE"));
    }

    #[test]
    fn test_explorer_respects_region_filter() {
        let config = HoodrankConfig {
            view: View::Explorer,
            region: "Manhattan".to_string(),
            ..Default::default()
        };
        let result = render_to_string(&config);
        assert!(result.contains("BOROUGH EXPLORER: MANHATTAN"));
        assert!(result.contains("Harlem"));
        assert!(result.contains("Chelsea"));
        assert!(!result.contains("Astoria"));
    }

    #[test]
    fn test_explorer_lists_full_region_after_top_rows() {
        let config = HoodrankConfig {
            view: View::Explorer,
            region: "Manhattan".to_string(),
            explorer_limit: 1,
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        let result: serde_json::Value = serde_json::from_str(&render_to_string(&config)).unwrap();
        let tables = result["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 2);

        assert_eq!(tables[0]["title"], "Borough Explorer: Manhattan");
        let top = tables[0]["records"].as_array().unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0]["neighbourhood"], "Harlem");

        assert_eq!(tables[1]["title"], "Manhattan Neighbourhoods by Value Score");
        let names: Vec<_> = tables[1]["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["neighbourhood"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Harlem", "Chelsea"]);
    }

    #[test]
    fn test_rankings_only_lists_undervalued() {
        let config = HoodrankConfig {
            view: View::Rankings,
            output_format: OutputFormat::Markdown,
            ..Default::default()
        };
        let result = render_to_string(&config);
        assert!(result.contains("## Top 10 Undervalued Neighbourhoods"));
        assert!(result.contains("| Astoria |"));
        assert!(!result.contains("| Chelsea |"));
    }

    #[test]
    fn test_invalid_rule_surfaces_as_error() {
        let config = HoodrankConfig {
            query: Some("best".to_string()),
            rules: vec![crate::analysis::KeywordRule {
                keywords: vec!["x".to_string()],
                target: crate::analysis::RuleTarget::Region("Atlantis".to_string()),
            }],
            ..Default::default()
        };
        let mut output = Vec::new();
        assert!(render(&config, &dataset(), &mut output).is_err());
    }
}
