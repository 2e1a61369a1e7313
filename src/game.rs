use crate::boards::tic_tac_toe::TicTacToeBoard;
use crate::error::PlayError;
use crate::player::Player;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::{Board, GameOutcome, Mark, Move};
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info, instrument, warn};

/// Hooks called by [`Game`] as play progresses. All of them do nothing by default.
pub trait GameObserver<B: Board> {
    /// Called once, right before the first move is requested.
    fn on_start(&mut self, _board: &B) {}

    /// Called after `mark` was placed on `cell`.
    fn on_move(&mut self, _mark: Mark, _cell: Move, _board: &B) {}

    /// Called once when the game reaches a terminal outcome.
    fn on_finish(&mut self, _outcome: GameOutcome, _board: &B) {}
}

/// An observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl<B: Board> GameObserver<B> for SilentObserver {}

/// Writes a play-by-play of the game: the numbered cell guide, every move followed by
/// the board, and the result.
#[derive(Debug)]
pub struct ConsoleObserver<W> {
    out: W,
}

impl<W: Write> ConsoleObserver<W> {
    /// Creates an observer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(text).and_then(|()| self.out.flush()) {
            warn!(%err, "failed to write game output");
        }
    }
}

impl ConsoleObserver<io::Stdout> {
    /// Writes the play-by-play to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> GameObserver<TicTacToeBoard> for ConsoleObserver<W> {
    fn on_start(&mut self, board: &TicTacToeBoard) {
        self.emit(format_args!("Board valid positions\n{}", board.numbered()));
    }

    fn on_move(&mut self, mark: Mark, cell: Move, board: &TicTacToeBoard) {
        self.emit(format_args!("{mark} makes a move to square {cell}\n{board}\n"));
    }

    fn on_finish(&mut self, outcome: GameOutcome, _board: &TicTacToeBoard) {
        match outcome {
            GameOutcome::Won(mark) => self.emit(format_args!("{mark} wins!\n")),
            GameOutcome::Drawn => self.emit(format_args!("It's a tie!\n")),
            GameOutcome::InProgress => {}
        }
    }
}

/// Alternates two players on one board until somebody completes a line or the board
/// fills up.
///
/// The player passed first to [`Game::new`] moves first and must hold the mark whose
/// turn it is on the starting board. Every move is checked against
/// the legal set before it is applied; an illegal move ends the game loop with
/// [`PlayError::IllegalMove`] instead of being retried.
pub struct Game<B: Board, R: RandomGenerator = StandardRandomGenerator> {
    board: B,
    players: [Player<R>; 2],
    active: usize,
    outcome: GameOutcome,
    history: Vec<Move>,
    started: bool,
    observer: Box<dyn GameObserver<B>>,
}

impl<B: Board, R: RandomGenerator> Game<B, R> {
    /// Sets up a game on `board` with `first` to move.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::MarkConflict`] if both players use the same mark, and
    /// [`PlayError::WrongFirstMover`] if the game on `board` is still in progress and
    /// `first` does not hold the mark whose turn it is.
    pub fn new(board: B, first: Player<R>, second: Player<R>) -> Result<Self, PlayError> {
        if first.mark() == second.mark() {
            return Err(PlayError::MarkConflict { mark: first.mark() });
        }

        let outcome = board.outcome();
        let expected = board.next_mark();
        if !outcome.is_terminal() && first.mark() != expected {
            return Err(PlayError::WrongFirstMover {
                expected,
                got: first.mark(),
            });
        }

        Ok(Self {
            board,
            players: [first, second],
            active: 0,
            outcome,
            history: Vec::new(),
            started: false,
            observer: Box::new(SilentObserver),
        })
    }

    /// Reports progress to `observer`.
    pub fn with_observer(mut self, observer: impl GameObserver<B> + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The current position.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Outcome of the current position.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Cells played so far, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Mark of the player whose turn it is.
    pub fn active_mark(&self) -> Mark {
        self.players[self.active].mark()
    }

    /// Plays a single move and returns the resulting outcome.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::GameOver`] once the game has finished, and propagates any
    /// failure of the active player. A move outside the legal set is rejected with
    /// [`PlayError::IllegalMove`] and leaves the board untouched.
    #[instrument(skip(self), fields(mark = %self.active_mark(), ply = self.history.len()))]
    pub fn step(&mut self) -> Result<GameOutcome, PlayError> {
        if self.outcome.is_terminal() {
            return Err(PlayError::GameOver {
                outcome: self.outcome,
            });
        }
        if !self.started {
            self.started = true;
            self.observer.on_start(&self.board);
        }

        let player = &mut self.players[self.active];
        let mark = player.mark();
        let cell = player.choose_move(&self.board)?;
        self.apply(mark, cell)?;

        if self.outcome.is_terminal() {
            info!(outcome = ?self.outcome, moves = self.history.len(), "game finished");
            self.observer.on_finish(self.outcome, &self.board);
        } else {
            self.active = 1 - self.active;
        }
        Ok(self.outcome)
    }

    fn apply(&mut self, mark: Mark, cell: Move) -> Result<(), PlayError> {
        if !self.board.is_legal(cell) {
            warn!(%mark, cell, "illegal move rejected");
            return Err(PlayError::IllegalMove { mark, cell });
        }

        self.board.place(cell, mark)?;
        self.history.push(cell);
        self.outcome = self.board.outcome();
        debug!(cell, outcome = ?self.outcome, "move applied");
        self.observer.on_move(mark, cell, &self.board);
        Ok(())
    }

    /// Steps until the game is won or drawn and returns the final outcome.
    pub fn play(&mut self) -> Result<GameOutcome, PlayError> {
        while !self.outcome.is_terminal() {
            self.step()?;
        }
        Ok(self.outcome)
    }
}
