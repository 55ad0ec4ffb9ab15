//! Tic-tac-toe client - a game controller backed by a remote rules service
//!
//! The client owns the board and turn order. Deciding wins and ties, and
//! choosing the computer's moves, is delegated to a rules service over HTTP.
//!
//! # Architecture
//!
//! - **Controller**: [`GameController`], the per-session state machine
//!   (menu, ongoing, won, tied)
//! - **Rules client**: the [`GameRulesService`] seam and its reqwest-backed
//!   [`HttpRulesClient`]
//! - **Games**: board, marks, positions and the JSON wire types
//! - **Config**: [`ClientConfig`] from TOML plus environment overrides
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_client::{ClientConfig, GameController, GameMode, HttpRulesClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let service = HttpRulesClient::new(config.service_url(), config.request_timeout())?;
//! let controller = GameController::from_config(service, &config);
//!
//! controller.start(GameMode::PlayerVsComputer);
//! controller.attempt_move(1, 1).await;
//! controller.settle().await;
//! println!("{}", controller.snapshot().board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod error;
mod games;
mod rules_client;

// Crate-level exports - Configuration
pub use config::{COMPUTER_DELAY_ENV, ClientConfig, SERVICE_URL_ENV, StaleTurnPolicy};

// Crate-level exports - Controller
pub use controller::{GameController, GameSnapshot, MoveOutcome, Phase, RejectReason};

// Crate-level exports - Errors
pub use error::{ConfigError, RulesError, RulesErrorKind};

// Crate-level exports - Rules service
pub use rules_client::{GameRulesService, HttpRulesClient};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, BoardRequest, GameMode, GameStatus, HealthReport, InvalidCell, Mark, MoveSuggestion,
    Position, Square, StateReport, Turn, WinningLine,
};
