//! Contains pre-made implementations of the `Board` trait.

/// A square `Board` implementation for Tic-Tac-Toe of any size.
pub mod tic_tac_toe;
