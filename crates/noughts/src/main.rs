//! Noughts - terminal entry point.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use noughts::{AppConfig, Cli, Command, FileStore, TerminalView};
use noughts_core::{GameMode, Store, Table, decode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { mode, save, config } => run_play(mode, save, config).await,
        Command::Inspect { file } => run_inspect(file).await,
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run an interactive game on stdin/stdout
async fn run_play(
    mode: Option<GameMode>,
    save: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::load(config.as_deref())?.with_overrides(mode, save);
    init_tracing(config.log_filter());
    info!(mode = %config.mode(), save = ?config.save_path(), "Starting noughts");

    let mut table = Table::new(*config.mode(), TerminalView::new())
        .with_implicit_start(*config.implicit_start());
    if let Some(path) = config.save_path() {
        let store: Arc<dyn Store> = Arc::new(FileStore::new(path.clone()));
        table = table.with_store(store);
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    noughts::run(&table, stdin, &mut stdout).await
}

/// Validate a save file and print it
#[instrument]
async fn run_inspect(file: PathBuf) -> Result<()> {
    init_tracing("warn");

    let store = FileStore::new(file.clone());
    let bytes = store
        .read()
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let session = decode(&bytes)
        .and_then(|state| state.into_session(GameMode::default()))
        .with_context(|| format!("{} is not a valid save file", file.display()))?;

    println!("{}", session.board().display());
    println!("turns: {}", session.turn_count());
    println!("{}", noughts::status_line(&session));
    Ok(())
}
