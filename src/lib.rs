//! A small library for exhaustive minimax search on Tic-Tac-Toe style games.
//!
//! This library provides a deterministic minimax move selector for two-player,
//! perfect-information, zero-sum games played on a square grid, along with the pieces
//! needed to actually play: interchangeable player strategies and a game loop.
//! The search explores the whole game tree without pruning, so it is exact but only
//! practical for small boards such as the classic 3x3 game.
//!
//! # Example
//!
//! ```rust
//! use minimax_ttt::boards::tic_tac_toe::TicTacToeBoard;
//! use minimax_ttt::minimax::MinimaxSearch;
//! use minimax_ttt::{Board, Mark};
//!
//! // X threatens the top row and is to move
//! let mut board: TicTacToeBoard = "XX_ OO_ ___".parse()?;
//!
//! let mut search = MinimaxSearch::new();
//! let result = search.best_move(&mut board, Mark::X)?;
//!
//! assert_eq!(result.best_move, Some(2));
//! assert!(result.score > 0);
//! // the board is handed back exactly as it was
//! assert_eq!(board.empty_count(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Contains pre-made implementations of the `Board` trait.
pub mod boards;
/// Error types shared by the board, the search and the game loop.
pub mod error;
/// The game loop and its observer hooks.
pub mod game;
/// The core module of the library, containing the `MinimaxSearch` implementation.
pub mod minimax;
/// Player strategies: human input, random choice and minimax search.
pub mod player;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Contains the `SearchNode` struct, which represents a node in a captured search tree.
pub mod search_node;

use crate::error::BoardError;
use derive_more::Display;

/// A move is the row-major index of the cell to mark.
pub type Move = usize;

/// The central trait of the library, defining the interface for a game state.
///
/// Implementors hold a grid of cells, each either empty or carrying a [`Mark`].
/// The search engine simulates moves with [`Board::place`] and backtracks with
/// [`Board::clear`], so both must be exact inverses of each other.
pub trait Board: Clone {
    /// Total number of cells on the board.
    fn cell_count(&self) -> usize;

    /// Returns `None` if `cell` is out of range, otherwise the content of the cell.
    fn cell(&self, cell: Move) -> Option<Option<Mark>>;

    /// Writes `mark` into an empty cell.
    ///
    /// # Errors
    ///
    /// Fails without touching the board if the cell is out of range or already occupied.
    fn place(&mut self, cell: Move, mark: Mark) -> Result<(), BoardError>;

    /// Resets a marked cell to empty and returns the mark that was removed.
    ///
    /// # Errors
    ///
    /// Fails without touching the board if the cell is out of range or already empty.
    fn clear(&mut self, cell: Move) -> Result<Mark, BoardError>;

    /// Returns the mark that fills a complete row, column or diagonal, if any.
    fn winner(&self) -> Option<Mark>;

    /// Empties every cell.
    fn reset(&mut self);

    /// Returns all empty cells in ascending order.
    fn available_moves(&self) -> Vec<Move> {
        (0..self.cell_count())
            .filter(|&cell| self.is_legal(cell))
            .collect()
    }

    /// Whether `cell` is on the board and empty.
    fn is_legal(&self, cell: Move) -> bool {
        matches!(self.cell(cell), Some(None))
    }

    /// Number of empty cells.
    fn empty_count(&self) -> usize {
        (0..self.cell_count())
            .filter(|&cell| self.is_legal(cell))
            .count()
    }

    /// Whether no empty cell remains.
    fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Number of cells carrying `mark`.
    fn count(&self, mark: Mark) -> usize {
        (0..self.cell_count())
            .filter(|&cell| self.cell(cell) == Some(Some(mark)))
            .count()
    }

    /// Current status of the game, decided purely from the cells.
    fn outcome(&self) -> GameOutcome {
        match self.winner() {
            Some(mark) => GameOutcome::Won(mark),
            None if self.is_full() => GameOutcome::Drawn,
            None => GameOutcome::InProgress,
        }
    }

    /// Whether the board could have been reached by alternating play with X first,
    /// i.e. X has as many marks as O or exactly one more.
    fn turn_balance_holds(&self) -> bool {
        let x = self.count(Mark::X);
        let o = self.count(Mark::O);
        x == o || x == o + 1
    }

    /// The mark whose turn it is under alternating play with X first.
    fn next_mark(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }
}

/// The mark a player puts on the board.
#[derive(Debug, Display, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Mark {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Represents the possible states of a game.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The given mark completed a line.
    Won(Mark),
    /// The board is full and nobody won.
    Drawn,
}

impl GameOutcome {
    /// Whether the game is over.
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }
}
