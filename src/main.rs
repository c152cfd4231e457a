use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beamfold::config::{Config, LoggingConfig};
use beamfold::error::EXIT_FAILURE;

mod commands;

#[derive(Parser)]
#[command(
    name = "beamfold",
    version,
    about = "Deterministic train/test/valid folds for entity alignment datasets",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the dataset directories
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one fold of one dataset
    Split {
        /// Dataset directory name
        dataset: String,

        /// Fold number, also the shuffle seed
        fold: u32,

        /// Fail on an input without records
        #[arg(long, default_value = "false")]
        reject_empty: bool,

        /// Print the outcome as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Write every fold of every dataset
    Run {
        /// Dataset to process (repeatable, defaults to the configured list)
        #[arg(short, long)]
        dataset: Vec<String>,

        /// Number of folds per dataset
        #[arg(long)]
        folds: Option<u32>,

        /// Stop at the first failed unit
        #[arg(long, default_value = "false")]
        fail_fast: bool,

        /// Fail on inputs without records
        #[arg(long, default_value = "false")]
        reject_empty: bool,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Check written folds against their input
    Verify {
        /// Dataset directory name
        dataset: String,

        /// Fold to check (defaults to all configured folds)
        #[arg(short, long)]
        fold: Option<u32>,

        /// Print the reports as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    setup_tracing(&config.logging, cli.verbose);
    tracing::debug!(root = %config.paths.root.display(), "Configuration loaded");

    let result = match cli.command {
        Commands::Split {
            dataset,
            fold,
            json,
            ..
        } => {
            tracing::info!(dataset = %dataset, fold = %fold, "Starting split command");
            commands::split(&config, &dataset, fold, json)
        }

        Commands::Run {
            dataset,
            fail_fast,
            json,
            ..
        } => {
            let datasets = if dataset.is_empty() {
                config.paths.datasets.clone()
            } else {
                dataset
            };
            tracing::info!(
                datasets = ?datasets,
                folds = config.folds.count,
                fail_fast = %fail_fast,
                "Starting run command"
            );
            commands::run(&config, &datasets, fail_fast, json)
        }

        Commands::Verify {
            dataset,
            fold,
            json,
        } => {
            tracing::info!(dataset = %dataset, fold = ?fold, "Starting verify command");
            commands::verify(&config, &dataset, fold, json)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Config file and environment, then command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(root) = &cli.root {
        config.paths.root = root.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    match &cli.command {
        Commands::Split { reject_empty, .. } => {
            config.folds.reject_empty_input |= *reject_empty;
        }
        Commands::Run {
            folds,
            reject_empty,
            ..
        } => {
            if let Some(folds) = folds {
                config.folds.count = *folds;
            }
            config.folds.reject_empty_input |= *reject_empty;
        }
        Commands::Verify { .. } => {}
    }

    config.validate()?;
    Ok(config)
}

fn setup_tracing(logging: &LoggingConfig, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("beamfold=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new(format!("beamfold={},warn", logging.level))
    };

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
