use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use precios_core::{ReportConfig, ResolveError, Resolver, search};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "precios")]
#[command(about = "Fetch the daily market price report and search it by product", long_about = None)]
#[command(version)]
struct Cli {
    /// Product to search for (case-insensitive substring, e.g. "yuca");
    /// omit to show the whole report
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to today in the configured
    /// time zone
    #[arg(short, long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Match only this column instead of every column
    #[arg(long, value_name = "COLUMN")]
    column: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored table
    Human,
    /// JSON output for machine consumption
    Json,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        ReportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("precios.toml");
        if default_config_path.exists() {
            ReportConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ReportConfig::default()
        }
    };

    let reference = cli.date.unwrap_or_else(|| config.today());
    let resolver = Resolver::from_config(config).context("Failed to build HTTP client")?;

    let resolution = match resolver.resolve(reference) {
        Ok(resolution) => resolution,
        Err(ResolveError::Exhausted { attempts }) => {
            formatter::print_exhausted(&attempts);
            std::process::exit(1);
        }
        Err(err @ ResolveError::Schema(_)) => {
            // A config/upstream shape mismatch must fail loudly, never
            // render misaligned columns
            return Err(err).context("Report layout no longer matches the configuration");
        }
    };

    let query = cli.query.unwrap_or_default();
    let filtered = search::filter(&resolution.table, &query, cli.column.as_deref());

    match cli.format {
        OutputFormat::Human => formatter::print_human(&resolution, &filtered, &query),
        OutputFormat::Json => formatter::print_json(&resolution, &filtered, &query)?,
    }

    Ok(())
}
