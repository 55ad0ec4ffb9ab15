mod position;
mod types;
mod wire;

pub use position::Position;
pub use types::{Board, GameMode, GameStatus, InvalidCell, Mark, Square, Turn, WinningLine};
pub use wire::{BoardRequest, HealthReport, MoveSuggestion, StateReport};
