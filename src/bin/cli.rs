//! pydoc-scraper CLI
//!
//! Fetches the Python documentation site and PEP index, extracts
//! structured facts, and emits tabular reports.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pydoc_scraper::{
    error::Result,
    models::Config,
    outputs::{self, OutputFormat},
    services,
    storage::ResponseCache,
    utils::http::PageFetcher,
};

/// Python documentation and PEP index scraper
#[derive(Parser, Debug)]
#[command(
    name = "pydoc-scraper",
    version,
    about = "Python documentation and PEP index scraper"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Clear the response cache before fetching
    #[arg(short = 'c', long)]
    clear_cache: bool,

    /// Report output format (omit for plain rows on stdout)
    #[arg(short, long, value_enum)]
    output: Option<OutputArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Digest of per-version "What's New" articles
    WhatsNew,

    /// Roster of documented Python versions and their statuses
    LatestVersions,

    /// Download the zipped A4 PDF documentation archive
    Download,

    /// Tally authoritative PEP statuses against the index
    Pep,
}

impl Command {
    /// Mode name used for logging and result file names.
    fn mode_name(&self) -> &'static str {
        match self {
            Command::WhatsNew => "whats-new",
            Command::LatestVersions => "latest-versions",
            Command::Download => "download",
            Command::Pep => "pep",
        }
    }
}

/// Report output format selector.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputArg {
    /// Aligned console table
    Pretty,
    /// Timestamped CSV file under the results directory
    File,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Pretty => OutputFormat::Pretty,
            OutputArg::File => OutputFormat::File,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Scraper starting: {} mode", cli.command.mode_name());

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let cache = ResponseCache::new(&config.paths.cache_dir);
    if cli.clear_cache {
        cache.clear().await?;
        log::info!("Response cache cleared");
    }

    let fetcher = PageFetcher::new(&config.http, cache)?;

    let report = match &cli.command {
        Command::WhatsNew => Some(services::whats_new::run(&fetcher, &config).await?),
        Command::LatestVersions => Some(services::latest_versions::run(&fetcher, &config).await?),
        Command::Download => {
            services::download::run(&fetcher, &config).await?;
            None
        }
        Command::Pep => {
            Some(services::pep::run(&fetcher, &config, &config.expected_statuses).await?)
        }
    };

    if let Some(report) = report {
        let format = cli
            .output
            .map(OutputFormat::from)
            .unwrap_or(OutputFormat::Plain);
        outputs::write_report(&report, format, &config.paths.results_dir, cli.command.mode_name())?;
    }

    log::info!("Done!");

    Ok(())
}
