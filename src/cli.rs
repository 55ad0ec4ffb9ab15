//! Command-line interface for tictactoe_client.

use clap::{Parser, Subcommand};
use tictactoe_client::GameMode;

/// Tic-tac-toe client - plays against a friend or the rules service
#[derive(Parser, Debug)]
#[command(name = "tictactoe_client")]
#[command(about = "Tic-tac-toe client backed by a remote rules service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Rules service URL (overrides config and environment)
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal, reading moves from stdin
    Play {
        /// Opponent: pvp (two players) or pvc (computer). Omit to start in the menu.
        #[arg(short, long)]
        mode: Option<GameMode>,
    },

    /// Check that the rules service is reachable
    Health,
}
