//! Command-line interface for noughts.

use clap::{Parser, Subcommand};
use noughts_core::GameMode;
use std::path::PathBuf;

/// Noughts - tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe against a friend or a naive computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game
    Play {
        /// human-vs-human, human-first-vs-heuristic or heuristic-first-vs-human
        #[arg(short, long)]
        mode: Option<GameMode>,

        /// Save file used by `save`, `load` and autosave
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Config file (defaults to noughts.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a save file and print its board
    Inspect {
        /// Save file to read
        file: PathBuf,
    },
}
