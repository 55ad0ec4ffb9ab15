//! Tic-tac-toe client - terminal driver
//!
//! Projects the controller state onto stdout and feeds stdin lines back in
//! as moves and menu actions.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_client::{
    ClientConfig, GameController, GameMode, GameSnapshot, HttpRulesClient, Mark, MoveOutcome,
    Phase, Position, Turn,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let service = HttpRulesClient::new(config.service_url(), config.request_timeout())
        .context("Failed to build rules service client")?;

    match cli.command {
        Command::Play { mode } => run_play(service, &config, mode).await,
        Command::Health => run_health(service).await,
    }
}

/// Resolves config: file (or defaults), then environment, then flags.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(url) = &cli.service_url {
        config = config.with_service_url(url.clone());
    }
    info!(service_url = %config.service_url(), "Configuration resolved");
    Ok(config)
}

/// Probes the rules service health endpoint.
async fn run_health(service: HttpRulesClient) -> Result<()> {
    let report = service
        .health()
        .await
        .with_context(|| format!("Rules service at {} is unreachable", service.base_url()))?;
    println!("{}: {}", service.base_url(), report.status);
    Ok(())
}

/// Runs the interactive game loop on stdin/stdout.
async fn run_play(
    service: HttpRulesClient,
    config: &ClientConfig,
    mode: Option<GameMode>,
) -> Result<()> {
    let controller = GameController::from_config(service, config);
    if let Some(mode) = mode {
        controller.start(mode);
    }
    render(&controller.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "reset" | "again" => controller.reset(),
            "menu" => controller.back_to_menu(),
            other => {
                if let Ok(mode) = other.parse::<GameMode>() {
                    controller.start(mode);
                } else if let Some(pos) = Position::parse(other) {
                    let outcome = controller.attempt_move(pos.row(), pos.col()).await;
                    if let MoveOutcome::Rejected(reason) = outcome {
                        debug!(%reason, "Move ignored");
                        continue;
                    }
                    if outcome == MoveOutcome::ComputerScheduled {
                        println!("Computer is thinking...");
                        controller.settle().await;
                    }
                } else {
                    println!("Unrecognised input {:?}, type 'help'", other);
                    continue;
                }
            }
        }
        render(&controller.snapshot());
    }

    Ok(())
}

fn print_help() {
    println!("Moves: 'row col' (0-2), a cell number 1-9 or a label like 'center'");
    println!("Menu:  pvp | pvc | reset | menu | quit");
}

/// Prints the board and a status headline.
fn render(snapshot: &GameSnapshot) {
    println!();
    println!("{}", snapshot.board().display());
    println!();
    match snapshot.phase() {
        Phase::Menu => {
            println!("Choose a mode: 'pvp' (another player) or 'pvc' (the computer)");
        }
        Phase::Ongoing => match (snapshot.mode(), snapshot.current_player()) {
            (Some(GameMode::PlayerVsComputer), Turn::Second) => {
                println!("Waiting for the computer");
            }
            (_, turn) => println!("{}, your turn ({})", turn.label(), turn.mark()),
        },
        Phase::Won => {
            let player = match snapshot.winner() {
                Some(Mark::X) => Turn::First.label(),
                _ => Turn::Second.label(),
            };
            println!("{} wins!", player);
            if let Some(line) = snapshot.winning_line() {
                let cells: Vec<&str> = line.positions().iter().map(|p| p.label()).collect();
                println!("Winning line: {} ({})", line, cells.join(", "));
            }
            println!("Type 'reset' to play again or 'menu' to go back");
        }
        Phase::Tied => {
            println!("It's a tie!");
            println!("Type 'reset' to play again or 'menu' to go back");
        }
    }
}
