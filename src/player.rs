//! Player strategies.
//!
//! Every strategy answers the same question, "which empty cell do you mark next?",
//! through [`Player::choose_move`]. None of them mutates the board they are shown, and
//! all of them only ever return a cell from [`Board::available_moves`], so the game
//! loop can treat them interchangeably.

use crate::error::PlayError;
use crate::minimax::MinimaxSearch;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::{Board, Mark, Move};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::{debug, instrument, warn};

/// Message shown when a human enters something that is not a legal cell.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid or occupied square. Try again.";

/// A player bound to a mark and a strategy.
pub enum Player<R: RandomGenerator = StandardRandomGenerator> {
    /// Moves typed in by a person.
    Human(HumanPlayer),
    /// Uniformly random legal moves.
    Random(RandomPlayer<R>),
    /// Optimal moves from exhaustive minimax search.
    Minimax(MinimaxPlayer<R>),
}

impl<R: RandomGenerator> Player<R> {
    /// A human player reading moves from `input`.
    pub fn human(mark: Mark, input: impl MoveInput + 'static) -> Self {
        Player::Human(HumanPlayer::new(mark, input))
    }

    /// A random player using a default-constructed generator.
    pub fn random(mark: Mark) -> Self {
        Player::Random(RandomPlayer::new(mark, R::default()))
    }

    /// A minimax player with the default configuration.
    pub fn minimax(mark: Mark) -> Self {
        Player::Minimax(MinimaxPlayer::builder(mark).build())
    }

    /// The mark this player puts on the board.
    pub fn mark(&self) -> Mark {
        match self {
            Player::Human(p) => p.mark,
            Player::Random(p) => p.mark,
            Player::Minimax(p) => p.mark,
        }
    }

    /// Picks the next cell to mark on `board`.
    ///
    /// # Errors
    ///
    /// Fails if the board has no empty cell, if the search rejects the board, or if a
    /// human's input source fails or closes.
    #[instrument(skip(self, board), fields(mark = %self.mark()))]
    pub fn choose_move<B: Board>(&mut self, board: &B) -> Result<Move, PlayError> {
        let cell = match self {
            Player::Human(p) => p.choose_move(board),
            Player::Random(p) => p.choose_move(board),
            Player::Minimax(p) => p.choose_move(board),
        }?;
        debug!(cell, "move chosen");
        Ok(cell)
    }
}

impl<R: RandomGenerator> From<HumanPlayer> for Player<R> {
    fn from(player: HumanPlayer) -> Self {
        Player::Human(player)
    }
}

impl<R: RandomGenerator> From<RandomPlayer<R>> for Player<R> {
    fn from(player: RandomPlayer<R>) -> Self {
        Player::Random(player)
    }
}

impl<R: RandomGenerator> From<MinimaxPlayer<R>> for Player<R> {
    fn from(player: MinimaxPlayer<R>) -> Self {
        Player::Minimax(player)
    }
}

/// Line-oriented source of human moves.
pub trait MoveInput {
    /// Shows `prompt` and reads one line. `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Tells the person why their last line was refused.
    fn reject(&mut self, message: &str) -> io::Result<()>;
}

/// A [`MoveInput`] over any reader and writer, e.g. the terminal.
#[derive(Debug)]
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    /// Reads moves from `reader` and writes prompts to `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Gives back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl ConsoleInput<StdinLock<'static>, Stdout> {
    /// Reads from standard input and prompts on standard output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> MoveInput for ConsoleInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        writeln!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn reject(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{message}")?;
        self.writer.flush()
    }
}

/// Asks a person for moves until they enter a legal cell.
pub struct HumanPlayer {
    mark: Mark,
    input: Box<dyn MoveInput>,
}

impl HumanPlayer {
    /// Creates a human player for `mark` reading moves from `input`.
    pub fn new(mark: Mark, input: impl MoveInput + 'static) -> Self {
        Self {
            mark,
            input: Box::new(input),
        }
    }

    /// Prompts until a legal cell is entered; malformed, out of range and occupied
    /// cells are refused with [`INVALID_INPUT_MESSAGE`].
    pub fn choose_move<B: Board>(&mut self, board: &B) -> Result<Move, PlayError> {
        if board.is_full() {
            return Err(PlayError::NoLegalMove { mark: self.mark });
        }

        let prompt = format!(
            "Your turn. Input move (0-{}):",
            board.cell_count().saturating_sub(1)
        );
        loop {
            let line = self
                .input
                .read_line(&prompt)?
                .ok_or(PlayError::InputClosed)?;
            match line.trim().parse::<Move>() {
                Ok(cell) if board.is_legal(cell) => return Ok(cell),
                _ => {
                    warn!(mark = %self.mark, input = %line, "refused move input");
                    self.input.reject(INVALID_INPUT_MESSAGE)?;
                }
            }
        }
    }
}

/// Marks a uniformly random empty cell.
#[derive(Debug, Clone)]
pub struct RandomPlayer<R: RandomGenerator = StandardRandomGenerator> {
    mark: Mark,
    random: R,
}

impl<R: RandomGenerator> RandomPlayer<R> {
    /// Creates a random player for `mark` drawing from `random`.
    pub fn new(mark: Mark, random: R) -> Self {
        Self { mark, random }
    }

    pub fn choose_move<B: Board>(&mut self, board: &B) -> Result<Move, PlayError> {
        self.random
            .choose(&board.available_moves())
            .copied()
            .ok_or(PlayError::NoLegalMove { mark: self.mark })
    }
}

/// Plays the move [`MinimaxSearch`] rates best for its mark.
#[derive(Debug, Clone)]
pub struct MinimaxPlayer<R: RandomGenerator = StandardRandomGenerator> {
    mark: Mark,
    search: MinimaxSearch,
    random_opening: bool,
    random: R,
}

/// A builder for creating instances of `MinimaxPlayer`.
pub struct MinimaxPlayerBuilder<R: RandomGenerator> {
    mark: Mark,
    random_opening: bool,
    random_generator: R,
}

impl<R: RandomGenerator> MinimaxPlayerBuilder<R> {
    /// Creates a new builder for a player using `mark`.
    pub fn new(mark: Mark) -> Self {
        Self {
            mark,
            random_opening: false,
            random_generator: R::default(),
        }
    }

    /// On a completely empty board, pick a random cell instead of searching.
    ///
    /// Every opening is a draw under perfect play, so this only adds variety. Off by
    /// default, which keeps the player deterministic.
    pub fn with_random_opening(mut self, random_opening: bool) -> Self {
        self.random_opening = random_opening;
        self
    }

    /// Sets the random number generator used for random openings.
    pub fn with_random_generator(mut self, rg: R) -> Self {
        self.random_generator = rg;
        self
    }

    /// Builds the configured `MinimaxPlayer`.
    pub fn build(self) -> MinimaxPlayer<R> {
        MinimaxPlayer {
            mark: self.mark,
            search: MinimaxSearch::new(),
            random_opening: self.random_opening,
            random: self.random_generator,
        }
    }
}

impl<R: RandomGenerator> MinimaxPlayer<R> {
    /// Returns a new builder for `MinimaxPlayer`.
    pub fn builder(mark: Mark) -> MinimaxPlayerBuilder<R> {
        MinimaxPlayerBuilder::new(mark)
    }

    /// The search engine, with the statistics of the last search.
    pub fn search(&self) -> &MinimaxSearch {
        &self.search
    }

    /// Searches a private copy of `board`, so the caller's board is never touched.
    pub fn choose_move<B: Board>(&mut self, board: &B) -> Result<Move, PlayError> {
        let moves = board.available_moves();
        if self.random_opening && !moves.is_empty() && moves.len() == board.cell_count() {
            return self
                .random
                .choose(&moves)
                .copied()
                .ok_or(PlayError::NoLegalMove { mark: self.mark });
        }

        let mut scratch = board.clone();
        let result = self.search.best_move(&mut scratch, self.mark)?;
        result
            .best_move
            .ok_or(PlayError::NoLegalMove { mark: self.mark })
    }
}
