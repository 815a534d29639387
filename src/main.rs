use anyhow::Result;
use clap::{Parser, ValueEnum};
use hoodrank::config::{OutputFormat, View};
use hoodrank::{HoodrankConfig, run};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Plain,
    Md,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Plain => OutputFormat::Plain,
            CliOutputFormat::Md => OutputFormat::Markdown,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliView {
    Overview,
    Rankings,
    Explorer,
    Insights,
    Distribution,
}

impl From<CliView> for View {
    fn from(v: CliView) -> Self {
        match v {
            CliView::Overview => View::Overview,
            CliView::Rankings => View::Rankings,
            CliView::Explorer => View::Explorer,
            CliView::Insights => View::Insights,
            CliView::Distribution => View::Distribution,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Neighbourhood value rankings and canned insights", long_about = None)]
struct Args {
    /// Question to answer, e.g. "best value area" or "Queens insight"
    query: Option<String>,

    /// Neighbourhood value CSV
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Borough filter for the explorer view ("All" or an exact borough name)
    #[arg(short, long)]
    region: Option<String>,

    /// Report to show when no question is given
    #[arg(long, value_enum)]
    view: Option<CliView>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of neighbourhoods in the undervalued ranking
    #[arg(long)]
    top: Option<usize>,

    /// Number of rows in the borough explorer
    #[arg(long)]
    limit: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "hoodrank=debug" } else { "hoodrank=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load from file or default
    let mut config = HoodrankConfig::load_from_file()?.unwrap_or_default();

    // 2. Override with CLI args
    if let Some(q) = args.query {
        config.query = Some(q);
    }
    if let Some(d) = args.data {
        config.data = d;
    }
    if let Some(r) = args.region {
        config.region = r;
    }
    if let Some(v) = args.view {
        config.view = v.into();
    }
    if let Some(f) = args.format {
        config.output_format = f.into();
    }
    if let Some(o) = args.output {
        config.output = Some(o);
    }
    if let Some(k) = args.top {
        config.top_k = k;
    }
    if let Some(l) = args.limit {
        config.explorer_limit = l;
    }
    if args.verbose {
        config.verbose = true;
    }

    init_logging(config.verbose)?;

    run(config)
}
