mod commands;
mod config;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use probe_core::{RunLedger, TriggerRequest};
use probe_logging::{probe_error, probe_info, LevelFilter, LogDestination, DEFAULT_LOG_FILE};

use crate::config::{Overrides, ProbeConfig};

#[derive(Parser)]
#[command(
    name = "reparse-probe",
    about = "Trigger dependency reparses and verify their effect in the database",
    version,
    propagate_version = true
)]
struct Cli {
    /// RON config file; a missing file means defaults
    #[arg(long, global = true, env = "PROBE_CONFIG", default_value = "probe.ron")]
    config: PathBuf,

    /// Backend base URL
    #[arg(long, global = true, env = "PROBE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Parser service base URL
    #[arg(long, global = true, env = "PROBE_PARSER_URL")]
    parser_url: Option<String>,

    /// MySQL connection URL
    #[arg(long, global = true, env = "PROBE_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Where log lines go
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::Terminal)]
    log: LogTarget,

    /// Debug-level logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl LogTarget {
    fn destination(self) -> LogDestination {
        match self {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger reparses and verify that dependency rows appear
    Verify {
        /// Item to verify as ID:LANG (repeatable; default: config targets)
        #[arg(long = "item", conflicts_with = "projects")]
        items: Vec<TriggerRequest>,

        /// Verify every stored project against the rows of its own folder
        #[arg(long)]
        projects: bool,

        /// Stop polling as soon as the count changes
        #[arg(long)]
        early_exit: bool,

        /// Polling deadline per item in seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Trigger a reparse for every project without verifying
    Reparse {
        /// Only projects that have no dependency rows yet
        #[arg(long)]
        missing_only: bool,
    },

    /// Trigger one batch reparse of a project for several languages
    ReparseMultiple {
        #[arg(long)]
        project: i64,

        /// Comma-separated languages
        #[arg(long, value_delimiter = ',', required = true)]
        languages: Vec<String>,
    },

    /// Re-detect project languages with the parser service
    RescanLanguages,

    /// Check that the backend, the parser service and the store answer
    Health,

    /// Run synthetic fixtures through the parser service
    ParserSmoke {
        /// Language to test (repeatable; default: python, java, javascript, go)
        #[arg(long = "language")]
        languages: Vec<String>,
    },

    /// Show dependency counts per language
    Stats,

    /// Delete injected fixture rows whose file path contains PATTERN
    Purge {
        #[arg(long)]
        pattern: String,
    },
}

const EXIT_FAILURES: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if !probe_logging::initialize(cli.log.destination(), level) {
        eprintln!("Warning: logging could not be initialised");
    }

    match run(cli).await {
        Ok(ledger) if ledger.all_passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FAILURES),
        Err(err) => {
            probe_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunLedger> {
    let (deadline_secs, early_exit) = match &cli.command {
        Commands::Verify {
            deadline_secs,
            early_exit,
            ..
        } => (*deadline_secs, *early_exit),
        _ => (None, false),
    };
    let config = load_config(
        &cli.config,
        Overrides {
            backend_url: cli.backend_url,
            parser_url: cli.parser_url,
            database_url: cli.database_url,
            deadline_secs,
            early_exit,
        },
    )?;
    probe_info!(
        "backend={} parser={}",
        config.backend_url,
        config.parser_url
    );

    match cli.command {
        Commands::Verify { projects: true, .. } => commands::verify::run_projects(&config).await,
        Commands::Verify { items, .. } => commands::verify::run(&config, items).await,
        Commands::Reparse { missing_only } => {
            commands::reparse::run_all(&config, missing_only).await
        }
        Commands::ReparseMultiple { project, languages } => {
            commands::reparse::run_multiple(&config, project, &languages).await
        }
        Commands::RescanLanguages => commands::rescan::run(&config).await,
        Commands::Health => commands::health::run(&config).await,
        Commands::ParserSmoke { languages } => commands::smoke::run(&config, &languages).await,
        Commands::Stats => commands::maintenance::stats(&config).await,
        Commands::Purge { pattern } => commands::maintenance::purge(&config, &pattern).await,
    }
}

fn load_config(path: &Path, overrides: Overrides) -> anyhow::Result<ProbeConfig> {
    let mut config = ProbeConfig::load(path).context("loading configuration")?;
    config.apply(overrides);
    Ok(config)
}
