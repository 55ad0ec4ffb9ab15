//! Core domain types for tic-tac-toe.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O.
    O,
}

/// Whose turn it is within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Turn {
    /// First player, plays X.
    #[default]
    First,
    /// Second player, plays O. The computer in player-vs-computer mode.
    Second,
}

impl Turn {
    /// Returns the mark played on this turn.
    pub fn mark(self) -> Mark {
        match self {
            Turn::First => Mark::X,
            Turn::Second => Mark::O,
        }
    }

    /// Returns the turn that follows this one.
    pub fn next(self) -> Self {
        match self {
            Turn::First => Turn::Second,
            Turn::Second => Turn::First,
        }
    }

    /// Display label used by drivers ("Player 1" / "Player 2").
    pub fn label(self) -> &'static str {
        match self {
            Turn::First => "Player 1",
            Turn::Second => "Player 2",
        }
    }
}

/// Opponent configuration chosen from the menu.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum GameMode {
    /// Two humans sharing the board.
    #[display("player vs player")]
    #[strum(serialize = "pvp", serialize = "player")]
    PlayerVsPlayer,
    /// Human plays X, the rules service plays O.
    #[display("player vs computer")]
    #[strum(serialize = "pvc", serialize = "computer")]
    PlayerVsComputer,
}

/// One of the eight three-in-a-row lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum WinningLine {
    /// Row 0.
    #[display("top_row")]
    TopRow,
    /// Row 1.
    #[display("middle_row")]
    MiddleRow,
    /// Row 2.
    #[display("bottom_row")]
    BottomRow,
    /// Column 0.
    #[display("left_column")]
    LeftColumn,
    /// Column 1.
    #[display("middle_column")]
    MiddleColumn,
    /// Column 2.
    #[display("right_column")]
    RightColumn,
    /// (0,0) to (2,2).
    #[display("top_left_bottom_right_diagonal")]
    TopLeftBottomRightDiagonal,
    /// (0,2) to (2,0).
    #[display("top_right_bottom_left_diagonal")]
    TopRightBottomLeftDiagonal,
}

impl WinningLine {
    /// Cells covered by this line, used for highlighting.
    pub fn positions(self) -> [Position; 3] {
        use Position::*;
        match self {
            WinningLine::TopRow => [TopLeft, TopCenter, TopRight],
            WinningLine::MiddleRow => [MiddleLeft, Center, MiddleRight],
            WinningLine::BottomRow => [BottomLeft, BottomCenter, BottomRight],
            WinningLine::LeftColumn => [TopLeft, MiddleLeft, BottomLeft],
            WinningLine::MiddleColumn => [TopCenter, Center, BottomCenter],
            WinningLine::RightColumn => [TopRight, MiddleRight, BottomRight],
            WinningLine::TopLeftBottomRightDiagonal => [TopLeft, Center, BottomRight],
            WinningLine::TopRightBottomLeftDiagonal => [TopRight, Center, BottomLeft],
        }
    }
}

/// Cell text that is not "", "X" or "O".
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid cell value: {:?}", value)]
pub struct InvalidCell {
    /// The rejected text.
    pub value: String,
}

/// A square on the board.
///
/// On the wire a square is the string `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square claimed by a mark.
    Occupied(Mark),
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        match square {
            Square::Empty => String::new(),
            Square::Occupied(mark) => mark.to_string(),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = InvalidCell;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Square::Empty),
            "X" => Ok(Square::Occupied(Mark::X)),
            "O" => Ok(Square::Occupied(Mark::O)),
            _ => Err(InvalidCell { value }),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Placing a mark returns a new board; the original is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [[Square; 3]; 3],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a board from three row strings such as `"XO."` (`.` or space for empty).
    pub fn parse(rows: [&str; 3]) -> Result<Self, InvalidCell> {
        let mut board = Self::new();
        for (r, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != 3 {
                return Err(InvalidCell {
                    value: (*text).to_string(),
                });
            }
            for (c, ch) in chars.into_iter().enumerate() {
                board.rows[r][c] = match ch {
                    'X' => Square::Occupied(Mark::X),
                    'O' => Square::Occupied(Mark::O),
                    '.' | ' ' => Square::Empty,
                    other => {
                        return Err(InvalidCell {
                            value: other.to_string(),
                        });
                    }
                };
            }
        }
        Ok(board)
    }

    /// Gets the square at a position.
    pub fn get(&self, pos: Position) -> Square {
        self.rows[pos.row()][pos.col()]
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns a copy of this board with `mark` at `pos`.
    #[must_use]
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Self {
        let mut rows = self.rows;
        rows[pos.row()][pos.col()] = Square::Occupied(mark);
        Self { rows }
    }

    /// Counts squares holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&s| s == Square::Occupied(mark))
            .count()
    }

    /// True when X leads O by zero or one mark.
    pub fn is_balanced(&self) -> bool {
        let x = self.count(Mark::X);
        let o = self.count(Mark::O);
        x == o || x == o + 1
    }

    /// True when no square is empty.
    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|&s| s != Square::Empty)
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their position number (1-9).
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, square) in row.iter().enumerate() {
                let symbol = match square {
                    Square::Empty => (r * 3 + c + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if c < 2 {
                    result.push('|');
                }
            }
            if r < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    #[default]
    Ongoing,
    /// The rules service reported a three-in-a-row.
    Won {
        /// Winning mark.
        winner: Mark,
        /// Line that produced the win.
        line: WinningLine,
    },
    /// The rules service reported a full board with no winner.
    Tied,
}

impl GameStatus {
    /// True while moves are still accepted.
    pub fn is_ongoing(&self) -> bool {
        matches!(self, GameStatus::Ongoing)
    }

    /// Winning mark, if the game was won.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// Winning line, if the game was won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self {
            GameStatus::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}
