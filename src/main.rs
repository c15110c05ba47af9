//! Event-Sweep main entry point
//!
//! This is the command-line interface for the Event-Sweep listings scraper.

use clap::Parser;
use event_sweep::config::{load_config, validate_start_url, Config};
use event_sweep::crawler::{PageFetcher, PaginationTraverser, TracingObserver};
use event_sweep::output::{write_records, write_records_to_path, OutputFormat};
use event_sweep::state::EventRecord;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Event-Sweep: a paginated event listings scraper
///
/// Event-Sweep fetches an event listings page, follows its "next page" links,
/// and writes every listing it finds as structured records.
#[derive(Parser, Debug)]
#[command(name = "event-sweep")]
#[command(version)]
#[command(about = "A paginated event listings scraper", long_about = None)]
struct Cli {
    /// URL of the first listings page (defaults to scrape.start-url from the config)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop following pages once more than this many events are collected (0 means no limit)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write records to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// On failure, still write the events collected before it
    #[arg(long)]
    partial: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so records written to stdout stay clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("event_sweep=info,warn"),
            1 => EnvFilter::new("event_sweep=debug,info"),
            2 => EnvFilter::new("event_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the config file (if any) with command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    // Load the config file or fall back to defaults
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    // Command-line flags win over the file
    if let Some(url) = &cli.url {
        config.scrape.start_url = Some(url.clone());
    }
    if let Some(limit) = cli.limit {
        config.scrape.limit = Some(limit);
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(path) = &cli.output {
        config.output.path = Some(path.display().to_string());
    }

    Ok(config)
}

/// Handles the scrape: traverse, then write whatever should be written
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;

    // Resolve and check the start URL
    let start_url = config
        .scrape
        .start_url
        .clone()
        .ok_or("no start URL given; pass URL or set scrape.start-url in the config")?;
    validate_start_url(&start_url)?;

    let limit = config.scrape.limit.filter(|limit| *limit > 0);
    match limit {
        Some(limit) => tracing::info!("Starting at {} (limit: {} events)", start_url, limit),
        None => tracing::info!("Starting at {} (no limit)", start_url),
    }

    // Build the fetcher and traverser
    let fetcher = PageFetcher::from_config(&config)?;
    let traverser = PaginationTraverser::new(fetcher).with_observer(TracingObserver);

    // Traverse, then write the records
    if cli.partial {
        match traverser.traverse_partial(&start_url, limit).await {
            Ok(state) => emit(&config, &state.into_records()),
            Err(partial) => {
                tracing::warn!(
                    "Writing {} events collected before the failure",
                    partial.state.offset()
                );
                emit(&config, &partial.state.accumulated)?;
                Err(partial.into())
            }
        }
    } else {
        let state = traverser.traverse(&start_url, limit).await?;
        emit(&config, &state.into_records())
    }
}

/// Writes records to the configured destination
fn emit(config: &Config, records: &[EventRecord]) -> Result<(), Box<dyn std::error::Error>> {
    let format = config.output.format;

    match &config.output.path {
        Some(path) => {
            write_records_to_path(records, format, Path::new(path))?;
            tracing::info!("Wrote {} events to {} ({})", records.len(), path, format);
        }
        None => {
            let stdout = std::io::stdout();
            write_records(records, format, stdout.lock())?;
        }
    }

    Ok(())
}
