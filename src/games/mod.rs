//! Game domain types.

pub mod tictactoe;
