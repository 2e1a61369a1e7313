//! Error types for the board, the search engine and the game loop.
//!
//! Every error here signals a broken contract (a bad move, a search on a finished
//! board) rather than a transient condition, so callers are expected to propagate
//! them instead of retrying.

use crate::{GameOutcome, Mark, Move};
use derive_more::{Display, Error, From};

/// Errors raised by [`Board`](crate::Board) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The cell index does not exist on this board.
    #[display("cell {cell} is outside the board ({cell_count} cells)")]
    OutOfBounds {
        /// Requested cell.
        cell: Move,
        /// Number of cells on the board.
        cell_count: usize,
    },

    /// A mark was placed on a cell that already holds one.
    #[display("cell {cell} is already occupied by {mark}")]
    CellOccupied {
        /// Requested cell.
        cell: Move,
        /// Mark already in the cell.
        mark: Mark,
    },

    /// A cell was cleared that holds no mark.
    #[display("cell {cell} is already empty")]
    CellEmpty {
        /// Requested cell.
        cell: Move,
    },

    /// Boards need at least one cell, and their cell count must fit in a `usize`.
    #[display("board size must be at least 1 and its cell count must fit in a usize")]
    InvalidSize,

    /// A textual layout does not describe a square board.
    #[display("layout with {symbols} cells is not a square board")]
    InvalidLayout {
        /// Number of cell symbols found.
        symbols: usize,
    },

    /// A textual layout contains a character that is not a cell symbol.
    #[display("unexpected symbol {symbol:?} in board layout")]
    InvalidSymbol {
        /// Offending character.
        symbol: char,
    },
}

/// Errors raised by [`MinimaxSearch`](crate::minimax::MinimaxSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum SearchError {
    /// The search was asked for a move on a board where the game is already over.
    #[display("cannot search a finished board ({outcome:?})")]
    TerminalBoard {
        /// Outcome already reached on the board.
        outcome: GameOutcome,
    },

    /// A simulated move was rejected by the board.
    #[display("{_0}")]
    #[from]
    Board(BoardError),
}

/// Errors raised while choosing moves or running a game.
#[derive(Debug, Display, Error, From)]
pub enum PlayError {
    /// A player chose a cell that is not in the current legal set.
    #[display("{mark} chose illegal move {cell}")]
    IllegalMove {
        /// Mark of the offending player.
        mark: Mark,
        /// Chosen cell.
        cell: Move,
    },

    /// A player was asked for a move on a board without empty cells.
    #[display("{mark} has no legal move")]
    NoLegalMove {
        /// Mark of the player asked to move.
        mark: Mark,
    },

    /// The human input source ran dry before a valid move was entered.
    #[display("input closed before a move was entered")]
    InputClosed,

    /// Both players of a game were given the same mark.
    #[display("both players use mark {mark}")]
    MarkConflict {
        /// The shared mark.
        mark: Mark,
    },

    /// The player set to move first does not hold the mark whose turn it is.
    #[display("{got} cannot move first, it is {expected}'s turn")]
    WrongFirstMover {
        /// Mark whose turn it is on the starting board.
        expected: Mark,
        /// Mark of the player given the first move.
        got: Mark,
    },

    /// A step was requested after the game finished.
    #[display("game is already over ({outcome:?})")]
    GameOver {
        /// Final outcome.
        outcome: GameOutcome,
    },

    /// A board operation failed.
    #[display("{_0}")]
    #[from]
    Board(BoardError),

    /// The search engine failed.
    #[display("{_0}")]
    #[from]
    Search(SearchError),

    /// Reading input or writing a prompt failed.
    #[display("i/o error: {_0}")]
    #[from]
    Io(std::io::Error),
}
