//! policy-relay CLI
//!
//! Usage: policy-relay <COMMAND>
//!
//! Commands:
//!   send     Push results to every configured result target
//!   summary  Aggregate results and deliver a digest to summary targets
//!   targets  List configured targets

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use policy_relay::infrastructure::input::read_results;
use policy_relay::infrastructure::{loki_targets, summary_targets};
use policy_relay::{
    Config, DispatchOptions, Dispatcher, JsonOutboxMailer, PolicyResult, ReqwestClient,
    SummaryBatch,
};

/// policy-relay - fan-out of policy evaluation results
#[derive(Parser, Debug)]
#[command(name = "policy-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./policy-relay.toml or the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Push results to every configured result target
    Send {
        /// Newline-delimited JSON results (stdin if omitted)
        results: Option<PathBuf>,
    },

    /// Aggregate results and deliver a digest to summary targets
    Summary {
        /// Newline-delimited JSON results (stdin if omitted)
        results: Option<PathBuf>,
    },

    /// List configured targets
    Targets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, warnings) = Config::discover(cli.config.as_deref())
        .context("failed to load configuration")?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    match cli.command {
        Commands::Send { results } => cmd_send(&config, results.as_deref()),
        Commands::Summary { results } => cmd_summary(&config, results.as_deref()),
        Commands::Targets => cmd_targets(&config),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_send(config: &Config, input: Option<&Path>) -> Result<()> {
    let results = load_results(input)?;

    let client = ReqwestClient::new(config.dispatch_timeout())
        .context("failed to create HTTP client")?;
    let targets = loki_targets(config, Arc::new(client)).context("invalid target configuration")?;
    if targets.is_empty() {
        bail!("no result targets configured");
    }

    let dispatcher = Dispatcher::new(targets, Vec::new(), dispatch_options(config))?;

    let total = results.len();
    let mut failed = 0;
    for result in results {
        failed += dispatcher.dispatch(result).failure_count();
    }
    dispatcher.shutdown();

    info!(results = total, failed_deliveries = failed, "send finished");
    if failed > 0 {
        bail!("{} deliveries failed", failed);
    }
    Ok(())
}

fn cmd_summary(config: &Config, input: Option<&Path>) -> Result<()> {
    let results = load_results(input)?;

    let targets = summary_targets(config, Arc::new(JsonOutboxMailer::stdout()))
        .context("invalid summary configuration")?;
    if targets.is_empty() {
        bail!("no summary targets configured");
    }

    let dispatcher = Dispatcher::new(Vec::new(), targets, dispatch_options(config))?;
    let report = dispatcher.dispatch_summary(SummaryBatch::from_results(&results));
    dispatcher.shutdown();

    if !report.is_success() {
        bail!("{} summary deliveries failed", report.failure_count());
    }
    Ok(())
}

fn cmd_targets(config: &Config) -> Result<()> {
    for loki in &config.loki {
        println!("loki     {:<20} {}", loki.name, loki.host);
    }
    for summary in &config.summary {
        println!(
            "summary  {:<20} {}",
            summary.name,
            summary.template_dir.display()
        );
    }
    if config.loki.is_empty() && config.summary.is_empty() {
        println!("no targets configured");
    }
    Ok(())
}

fn dispatch_options(config: &Config) -> DispatchOptions {
    DispatchOptions {
        timeout: config.dispatch_timeout(),
        queue_capacity: config.dispatch.queue_capacity,
    }
}

fn load_results(input: Option<&Path>) -> Result<Vec<PolicyResult>> {
    match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(read_results(BufReader::new(file))?)
        }
        None => Ok(read_results(io::stdin().lock())?),
    }
}
