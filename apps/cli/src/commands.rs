//! CLI command definitions, routing, and tracing setup.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use orgscrape_api::ApiState;
use orgscrape_extractor::{PageExtractor, parse_target_url};
use orgscrape_shared::{
    AppConfig, OrgScrapeError, ScrapedOrganizationProfile, config_file_path, init_config,
    load_config, render_config,
};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// orgscrape: pull mission, programs and contacts out of nonprofit websites.
#[derive(Parser)]
#[command(
    name = "orgscrape",
    version,
    about = "Extract best-effort organization profiles from nonprofit web pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape one or more pages and print their profiles as JSON.
    Scrape {
        /// Page URLs to scrape.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Maximum pages fetched at once (defaults to config).
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Pretty-print JSON output.
        #[arg(long)]
        pretty: bool,

        /// Allow loopback/private hosts.
        #[arg(long)]
        allow_private: bool,
    },

    /// Serve the scrape API over HTTP.
    Serve {
        /// Listen address (defaults to config).
        #[arg(long)]
        bind: Option<String>,

        /// Allow the API to scrape loopback/private hosts.
        #[arg(long)]
        allow_private: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "orgscrape=info",
        1 => "orgscrape=debug,tower_http=debug",
        _ => "orgscrape=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so scraped JSON on stdout stays pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape {
            urls,
            concurrency,
            pretty,
            allow_private,
        } => cmd_scrape(&urls, concurrency, pretty, allow_private).await,
        Command::Serve {
            bind,
            allow_private,
        } => cmd_serve(bind, allow_private).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// scrape
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    urls: &[String],
    concurrency: Option<usize>,
    pretty: bool,
    allow_private: bool,
) -> Result<()> {
    let config = load_config()?;

    // Bad input is reported per URL and never fetched; the rest still run.
    let (targets, rejected) = partition_targets(urls, allow_private);
    let mut failures = rejected.len();
    for (raw, e) in &rejected {
        warn!(url = %raw, error = %e, "invalid URL skipped");
        eprintln!("error: {e}");
    }

    let total = urls.len();
    let concurrency = concurrency.unwrap_or(config.batch.concurrency).max(1);
    let extractor = Arc::new(PageExtractor::new(&config.fetch, allow_private)?);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    info!(urls = targets.len(), skipped = rejected.len(), concurrency, "scraping");

    let progress = CliProgress::new();
    let fetching = targets.len();
    let mut handles = Vec::with_capacity(fetching);

    for url in targets {
        let extractor = extractor.clone();
        let sem = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await;
            let result = extractor.extract(&url).await;
            (url, result)
        }));
    }

    for (done, handle) in handles.into_iter().enumerate() {
        let (url, result) = handle.await?;
        progress.page_done(url.as_str(), done + 1, fetching);

        match result {
            Ok(profile) => {
                progress.suspend(|| print_profile(&url, &profile, pretty))?;
            }
            Err(e) => {
                failures += 1;
                warn!(%url, error = %e, "scrape failed");
                progress.suspend(|| eprintln!("error: {e}"));
            }
        }
    }

    progress.finish();

    if failures > 0 {
        return Err(eyre!("{failures} of {total} URLs could not be scraped"));
    }
    Ok(())
}

/// Split raw arguments into fetchable targets and per-URL validation failures.
fn partition_targets(
    urls: &[String],
    allow_private: bool,
) -> (Vec<Url>, Vec<(String, OrgScrapeError)>) {
    let mut targets = Vec::with_capacity(urls.len());
    let mut rejected = Vec::new();
    for raw in urls {
        match parse_target_url(raw, allow_private) {
            Ok(url) => targets.push(url),
            Err(e) => rejected.push((raw.clone(), e)),
        }
    }
    (targets, rejected)
}

fn print_profile(url: &Url, profile: &ScrapedOrganizationProfile, pretty: bool) -> Result<()> {
    let doc = serde_json::json!({ "url": url.as_str(), "data": profile });
    let out = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{out}");
    Ok(())
}

/// Stderr spinner that stays out of the way of stdout output.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn page_done(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Scraped [{current}/{total}] {url}"));
    }

    fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        self.spinner.suspend(f)
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

async fn cmd_serve(bind: Option<String>, allow_private: bool) -> Result<()> {
    let mut config = load_config()?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if allow_private {
        config.server.allow_private_hosts = true;
    }

    let addr = config.server.socket_addr()?;
    if config.server.allow_private_hosts {
        warn!("private host scraping is enabled");
    }

    let state = ApiState::from_config(&config)?;
    orgscrape_api::serve(addr, state).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = config_file_path()?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    println!("# {}", config_file_path()?.display());
    print!("{}", render_config(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scrape_command() {
        let cli = Cli::try_parse_from([
            "orgscrape",
            "-vv",
            "scrape",
            "https://a.example.org",
            "https://b.example.org",
            "--concurrency",
            "2",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Scrape {
                urls,
                concurrency,
                pretty,
                allow_private,
            } => {
                assert_eq!(urls.len(), 2);
                assert_eq!(concurrency, Some(2));
                assert!(pretty);
                assert!(!allow_private);
            }
            _ => panic!("expected scrape command"),
        }
    }

    #[test]
    fn scrape_requires_a_url() {
        assert!(Cli::try_parse_from(["orgscrape", "scrape"]).is_err());
    }

    #[test]
    fn invalid_urls_do_not_block_valid_ones() {
        let urls = vec![
            "https://a.example.org".to_string(),
            "not a url".to_string(),
            "http://127.0.0.1:8080/".to_string(),
            "https://b.example.org/about".to_string(),
        ];

        let (targets, rejected) = partition_targets(&urls, false);

        let hosts: Vec<_> = targets.iter().filter_map(|u| u.host_str()).collect();
        assert_eq!(hosts, vec!["a.example.org", "b.example.org"]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].0, "not a url");
        assert!(matches!(rejected[0].1, OrgScrapeError::Validation { .. }));
        assert_eq!(rejected[1].0, "http://127.0.0.1:8080/");
    }

    #[test]
    fn allow_private_admits_loopback_targets() {
        let urls = vec!["http://127.0.0.1:8080/".to_string()];
        let (targets, rejected) = partition_targets(&urls, true);
        assert_eq!(targets.len(), 1);
        assert!(rejected.is_empty());
    }

    #[test]
    fn parses_serve_with_json_logs() {
        let cli = Cli::try_parse_from([
            "orgscrape",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.log_format, LogFormat::Json));
        match cli.command {
            Command::Serve {
                bind,
                allow_private,
            } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
                assert!(!allow_private);
            }
            _ => panic!("expected serve command"),
        }
    }
}
