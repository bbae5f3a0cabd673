use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use altscroll_core::AppConfig;

mod commands;

const LOG_FILE_NAME: &str = "altscroll.log";

#[derive(Parser)]
#[command(name = "altscroll")]
#[command(author, version, about = "Drag, momentum and snap scrolling in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/altscroll/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the carousel TUI
    Run,
    /// Replay a gesture script against an in-memory surface
    Simulate(commands::simulate::SimulateArgs),
    /// Print the effective configuration
    Config {
        /// Print only the config file location
        #[arg(long)]
        path: bool,
        /// Write the effective configuration if no file exists yet
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config_path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    match cli.command {
        Some(Commands::Run) | None => {
            init_file_logging(&config)?;
            commands::run::run(config).await
        }
        Some(Commands::Simulate(args)) => {
            init_stderr_logging(&config);
            commands::simulate::run(&config, args).await
        }
        Some(Commands::Config { path, init }) => {
            init_stderr_logging(&config);
            commands::config::run(&config, cli.config_path.as_deref(), path, init)
        }
    }
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

/// Log to stderr so stdout carries only the trace
fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// The TUI owns the screen, so logs go to a file in the data directory
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let file_appender = log_appender(config)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .init();
    Ok(())
}

/// Non-rotating appender for `<data_dir>/altscroll.log`. Creates the directory.
fn log_appender(config: &AppConfig) -> Result<RollingFileAppender> {
    let directory = config.data_dir();
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&directory)
        .with_context(|| format!("Failed to open log file in {}", directory.display()))
}
