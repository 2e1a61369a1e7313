use crate::error::BoardError;
use crate::{Board, Mark, Move};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Side length of the classic board.
pub const DEFAULT_SIZE: usize = 3;

/// An implementation of the `Board` trait for Tic-Tac-Toe on a `size x size` grid.
///
/// Cells are stored row-major, so a move is an index from `0` to `size * size - 1`.
/// A line is won by filling a whole row, column or diagonal with one mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicTacToeBoard {
    size: usize,
    field: Vec<Option<Mark>>,
    empty: usize,
}

impl TicTacToeBoard {
    /// Creates an empty board with `size` rows and columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] if `size` is zero or `size * size` overflows.
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::InvalidSize);
        }

        let cell_count = size.checked_mul(size).ok_or(BoardError::InvalidSize)?;
        Ok(Self {
            size,
            field: vec![None; cell_count],
            empty: cell_count,
        })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Option<Mark>] {
        &self.field
    }

    /// Converts a row and column to a move, if both are on the board.
    pub fn index_of(&self, row: usize, col: usize) -> Option<Move> {
        (row < self.size && col < self.size).then_some(row * self.size + col)
    }

    /// A printable guide showing which index belongs to which cell.
    pub fn numbered(&self) -> NumberedCells<'_> {
        NumberedCells { board: self }
    }

    fn line_winner(&self, mut line: impl Iterator<Item = usize>) -> Option<Mark> {
        let first = self.field[line.next()?]?;
        line.all(|cell| self.field[cell] == Some(first))
            .then_some(first)
    }

    fn render(&self, f: &mut Formatter<'_>, symbol: impl Fn(usize) -> String) -> fmt::Result {
        let width = (self.field.len() - 1).to_string().len();
        for row in 0..self.size {
            write!(f, "|")?;
            for col in 0..self.size {
                write!(f, " {:<width$} |", symbol(row * self.size + col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Default for TicTacToeBoard {
    /// Creates an empty 3x3 board.
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            field: vec![None; DEFAULT_SIZE * DEFAULT_SIZE],
            empty: DEFAULT_SIZE * DEFAULT_SIZE,
        }
    }
}

impl Board for TicTacToeBoard {
    fn cell_count(&self) -> usize {
        self.field.len()
    }

    fn cell(&self, cell: Move) -> Option<Option<Mark>> {
        self.field.get(cell).copied()
    }

    fn place(&mut self, cell: Move, mark: Mark) -> Result<(), BoardError> {
        let cell_count = self.field.len();
        let slot = self
            .field
            .get_mut(cell)
            .ok_or(BoardError::OutOfBounds { cell, cell_count })?;
        if let Some(existing) = *slot {
            return Err(BoardError::CellOccupied {
                cell,
                mark: existing,
            });
        }

        *slot = Some(mark);
        self.empty -= 1;
        Ok(())
    }

    fn clear(&mut self, cell: Move) -> Result<Mark, BoardError> {
        let cell_count = self.field.len();
        let removed = self
            .field
            .get_mut(cell)
            .ok_or(BoardError::OutOfBounds { cell, cell_count })?
            .take()
            .ok_or(BoardError::CellEmpty { cell })?;
        self.empty += 1;
        Ok(removed)
    }

    fn winner(&self) -> Option<Mark> {
        let n = self.size;
        for i in 0..n {
            let row = self.line_winner((0..n).map(move |col| i * n + col));
            let column = self.line_winner((0..n).map(move |row| row * n + i));
            if let Some(mark) = row.or(column) {
                return Some(mark);
            }
        }

        self.line_winner((0..n).map(|i| i * n + i))
            .or_else(|| self.line_winner((0..n).map(|i| i * n + (n - 1 - i))))
    }

    fn reset(&mut self) {
        self.field.fill(None);
        self.empty = self.field.len();
    }

    fn empty_count(&self) -> usize {
        self.empty
    }

    fn is_full(&self) -> bool {
        self.empty == 0
    }
}

impl Display for TicTacToeBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(f, |cell| match self.field[cell] {
            Some(mark) => mark.to_string(),
            None => " ".to_string(),
        })
    }
}

/// Display adapter returned by [`TicTacToeBoard::numbered`].
#[derive(Debug, Clone, Copy)]
pub struct NumberedCells<'a> {
    board: &'a TicTacToeBoard,
}

impl Display for NumberedCells<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.board.render(f, |cell| cell.to_string())
    }
}

impl FromStr for TicTacToeBoard {
    type Err = BoardError;

    /// Parses a row-major layout such as `"XO_ _X_ __O"`.
    ///
    /// `X` and `O` (any case) are marks; `_`, `.` and `-` are empty cells. Whitespace and
    /// `|` are ignored so layouts can be written row by row.
    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        let field = layout
            .chars()
            .filter(|symbol| !symbol.is_whitespace() && *symbol != '|')
            .map(|symbol| match symbol.to_ascii_uppercase() {
                'X' => Ok(Some(Mark::X)),
                'O' => Ok(Some(Mark::O)),
                '_' | '.' | '-' => Ok(None),
                _ => Err(BoardError::InvalidSymbol { symbol }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let size = field.len().isqrt();
        if size == 0 || size * size != field.len() {
            return Err(BoardError::InvalidLayout {
                symbols: field.len(),
            });
        }

        let empty = field.iter().filter(|cell| cell.is_none()).count();
        Ok(Self { size, field, empty })
    }
}
