// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tsync - inspect and administer team records

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{order, team, Env};
use output::OutputFormat;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(
    name = "tsync",
    version,
    about = "Team record synchronization - operator tool"
)]
struct Cli {
    /// Directory holding the record log
    #[arg(long, global = true, env = "TSYNC_DATA_DIR", default_value = ".tsync")]
    data_dir: PathBuf,

    /// Configuration file (defaults to <data-dir>/tsync.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List teams, or show one team's record
    Show(team::ShowArgs),
    /// Add a participant to their team
    Join(team::CodeArgs),
    /// Remove a participant from their team
    Leave(team::CodeArgs),
    /// Mark a participant ready and check the team's quorum
    Ready(team::CodeArgs),
    /// Return a team's record to defaults, keeping its test order
    Reset(team::TeamArgs),
    /// Delete a team's record
    Delete(team::TeamArgs),
    /// Print the test order a team gets
    Order(order::OrderArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.as_deref())?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("tsync.toml"));
    let config = ts_core::SyncConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let format = cli.format;

    // Order is a pure function of the configuration
    if let Commands::Order(args) = &cli.command {
        return order::handle(args, &config, format);
    }

    let env = Env::open(&cli.data_dir, config).await?;
    match cli.command {
        Commands::Show(args) => team::show(&env, args, format).await,
        Commands::Join(args) => team::join(&env, args, format).await,
        Commands::Leave(args) => team::leave(&env, args).await,
        Commands::Ready(args) => team::ready(&env, args).await,
        Commands::Reset(args) => team::reset(&env, args).await,
        Commands::Delete(args) => team::delete(&env, args).await,
        Commands::Order(_) => Ok(()),
    }
}

fn setup_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let name = path
        .file_name()
        .with_context(|| format!("log file has no name: {}", path.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}
