//! Error types for the rules client and configuration.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong talking to the rules service.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RulesErrorKind {
    /// Connection, timeout or other transport failure.
    #[display("transport failure: {}", _0)]
    Transport(String),
    /// The service answered with a non-success HTTP status.
    #[display("service returned HTTP {}", _0)]
    Status(u16),
    /// The response body did not match the expected shape.
    #[display("undecodable response: {}", _0)]
    Decode(String),
    /// The suggested move does not name a cell on the board.
    #[display("suggested cell ({}, {}) is off the board", row, col)]
    OffBoard {
        /// Suggested row.
        row: usize,
        /// Suggested column.
        col: usize,
    },
}

/// Rules service error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Rules service error: {} at {}:{}", kind, file, line)]
pub struct RulesError {
    /// Error category.
    pub kind: RulesErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RulesError {
    /// Creates a new rules error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: RulesErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for RulesError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::new(RulesErrorKind::Status(status.as_u16()))
        } else if err.is_decode() {
            Self::new(RulesErrorKind::Decode(err.to_string()))
        } else {
            Self::new(RulesErrorKind::Transport(err.to_string()))
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
