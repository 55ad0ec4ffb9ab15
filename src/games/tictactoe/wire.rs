//! JSON bodies exchanged with the game rules service.

use super::position::Position;
use super::types::{Board, GameStatus, Mark, WinningLine};
use serde::{Deserialize, Serialize};

/// Request body for both rules endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRequest {
    /// Board snapshot, rows of `""`/`"X"`/`"O"`.
    pub board: Board,
}

/// Response of the check-game-state endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StateReport {
    /// No winner yet and empty squares remain.
    Ongoing,
    /// Three in a row.
    Winner {
        /// Mark that completed the line.
        winner: Mark,
        /// Which line was completed.
        winning_condition: WinningLine,
    },
    /// Full board, no winner.
    Tie,
}

impl From<StateReport> for GameStatus {
    fn from(report: StateReport) -> Self {
        match report {
            StateReport::Ongoing => GameStatus::Ongoing,
            StateReport::Winner {
                winner,
                winning_condition,
            } => GameStatus::Won {
                winner,
                line: winning_condition,
            },
            StateReport::Tie => GameStatus::Tied,
        }
    }
}

/// Response of the compute-move endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveSuggestion {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl MoveSuggestion {
    /// Converts to a board position, `None` when off the board.
    pub fn position(&self) -> Option<Position> {
        Position::from_coords(self.row, self.col)
    }
}

impl From<Position> for MoveSuggestion {
    fn from(pos: Position) -> Self {
        Self::new(pos.row(), pos.col())
    }
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `"healthy"` when the service is up.
    pub status: String,
}
