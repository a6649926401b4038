//! Noughts - tic-tac-toe in the terminal
//!
//! Host shell around [`noughts_core`]: a terminal view implementing the
//! session callbacks, a file-backed save target, and configuration.
//!
//! # Architecture
//!
//! - **Config**: TOML file plus command-line overrides
//! - **Store**: save file written through a temporary sibling
//! - **Terminal**: line commands in, board frames out

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod store;
mod terminal;

pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use store::FileStore;
pub use terminal::{Input, TerminalView, run, status_line};
