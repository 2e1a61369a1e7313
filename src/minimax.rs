use crate::error::{BoardError, SearchError};
use crate::search_node::SearchNode;
use crate::{Board, Mark, Move};
use ego_tree::{NodeMut, Tree};
use std::ops::{Deref, DerefMut};
use tracing::{debug, error, instrument, trace};

/// Minimax value of a position for the searching mark.
///
/// Positive is a win, negative a loss and zero a draw. Decided positions are worth
/// `1 + empty cells left`, so quicker wins and slower losses score better.
pub type Score = i32;

/// The outcome of a call to [`MinimaxSearch::best_move`].
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct SearchResult {
    /// The chosen move. `None` only if the board had no empty cell.
    pub best_move: Option<Move>,
    /// The guaranteed score of `best_move` under optimal play by both sides.
    pub score: Score,
    /// Number of positions visited.
    pub nodes: u64,
}

/// Counters collected during the most recent search.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct SearchStats {
    /// Positions visited, the root included.
    pub nodes: u64,
    /// Terminal positions reached.
    pub leaves: u64,
}

/// Exhaustive minimax search over every continuation of a position.
///
/// The search runs depth-first on the caller's board, placing a mark for each
/// candidate move and clearing it again before the next one, so the board is
/// handed back unchanged. Moves are tried in ascending cell order and only a strictly
/// better score replaces the current best, which makes the result deterministic.
#[derive(Debug, Default, Clone)]
pub struct MinimaxSearch {
    stats: SearchStats,
}

impl MinimaxSearch {
    /// Creates a new `MinimaxSearch`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of the last `best_move` or `build_tree` call.
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Finds the move that gives `me` the best guaranteed outcome, with `me` to move now
    /// and `me.opponent()` answering.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TerminalBoard`] if the game on `board` is already over.
    #[instrument(skip(self, board))]
    pub fn best_move<B: Board>(
        &mut self,
        board: &mut B,
        me: Mark,
    ) -> Result<SearchResult, SearchError> {
        let outcome = board.outcome();
        if outcome.is_terminal() {
            return Err(SearchError::TerminalBoard { outcome });
        }

        self.stats = SearchStats::default();
        let (best_move, score) = self.search(board, me, me)?;
        debug!(
            ?best_move,
            score,
            nodes = self.stats.nodes,
            leaves = self.stats.leaves,
            "search finished"
        );

        Ok(SearchResult {
            best_move,
            score,
            nodes: self.stats.nodes,
        })
    }

    /// Expands the complete game tree below `board` and scores every node for `me`,
    /// with `me` to move at the root.
    ///
    /// Children appear in the same order the search tries them, so the root's
    /// [`best_child`](crate::search_node::best_child) is the move `best_move` returns.
    /// The tree grows exponentially with the number of empty cells.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TerminalBoard`] if the game on `board` is already over.
    #[instrument(skip(self, board))]
    pub fn build_tree<B: Board>(
        &mut self,
        board: &B,
        me: Mark,
    ) -> Result<Tree<SearchNode>, SearchError> {
        let outcome = board.outcome();
        if outcome.is_terminal() {
            return Err(SearchError::TerminalBoard { outcome });
        }

        self.stats = SearchStats::default();
        let mut scratch = board.clone();
        let mut tree = Tree::new(SearchNode::root());
        let score = self.expand(&mut scratch, tree.root_mut(), me, me)?;
        debug!(score, nodes = self.stats.nodes, "search tree built");
        Ok(tree)
    }

    fn search<B: Board>(
        &mut self,
        board: &mut B,
        me: Mark,
        to_move: Mark,
    ) -> Result<(Option<Move>, Score), BoardError> {
        self.stats.nodes += 1;
        if let Some(score) = terminal_score(board, me) {
            self.stats.leaves += 1;
            return Ok((None, score));
        }

        let maximizing = to_move == me;
        let mut best: Option<(Move, Score)> = None;
        for cell in board.available_moves() {
            let score = {
                let mut scoped = ScopedMove::place(board, cell, to_move)?;
                self.search(&mut *scoped, me, to_move.opponent())?.1
            };
            if improves(best.map(|(_, s)| s), score, maximizing) {
                best = Some((cell, score));
            }
        }

        Ok(match best {
            Some((cell, score)) => {
                trace!(cell, score, %to_move, "best reply");
                (Some(cell), score)
            }
            None => (None, 0),
        })
    }

    fn expand<B: Board>(
        &mut self,
        board: &mut B,
        mut node: NodeMut<'_, SearchNode>,
        me: Mark,
        to_move: Mark,
    ) -> Result<Score, BoardError> {
        self.stats.nodes += 1;
        if let Some(score) = terminal_score(board, me) {
            self.stats.leaves += 1;
            node.value().score = score;
            return Ok(score);
        }

        let maximizing = to_move == me;
        let height = node.value().height + 1;
        let mut best: Option<Score> = None;
        for cell in board.available_moves() {
            let score = {
                let mut scoped = ScopedMove::place(board, cell, to_move)?;
                let child = node.append(SearchNode {
                    prev_move: Some(cell),
                    mark: Some(to_move),
                    height,
                    score: 0,
                    outcome: scoped.outcome(),
                });
                self.expand(&mut *scoped, child, me, to_move.opponent())?
            };
            if improves(best, score, maximizing) {
                best = Some(score);
            }
        }

        let score = best.unwrap_or(0);
        node.value().score = score;
        Ok(score)
    }
}

/// Score of a finished position for `me`, or `None` while the game goes on.
fn terminal_score<B: Board>(board: &B, me: Mark) -> Option<Score> {
    let weight = board.empty_count() as Score + 1;
    match board.winner() {
        Some(mark) if mark == me => Some(weight),
        Some(_) => Some(-weight),
        None if board.is_full() => Some(0),
        None => None,
    }
}

fn improves(best: Option<Score>, score: Score, maximizing: bool) -> bool {
    match best {
        None => true,
        Some(best) if maximizing => score > best,
        Some(best) => score < best,
    }
}

/// A simulated move that is taken back when the guard goes out of scope.
///
/// Dereferences to the board so the search can recurse into the position; dropping
/// the guard clears the cell on every exit path, `?` included.
struct ScopedMove<'a, B: Board> {
    board: &'a mut B,
    cell: Move,
}

impl<'a, B: Board> ScopedMove<'a, B> {
    fn place(board: &'a mut B, cell: Move, mark: Mark) -> Result<Self, BoardError> {
        board.place(cell, mark)?;
        Ok(Self { board, cell })
    }
}

impl<B: Board> Deref for ScopedMove<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &*self.board
    }
}

impl<B: Board> DerefMut for ScopedMove<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut *self.board
    }
}

impl<B: Board> Drop for ScopedMove<'_, B> {
    fn drop(&mut self) {
        if let Err(err) = self.board.clear(self.cell) {
            error!(cell = self.cell, %err, "failed to take back simulated move");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::boards::tic_tac_toe::TicTacToeBoard;
    use crate::error::SearchError;
    use crate::minimax::MinimaxSearch;
    use crate::search_node::{best_child, principal_variation};
    use crate::{Board, GameOutcome, Mark};

    fn board(layout: &str) -> TicTacToeBoard {
        layout.parse().unwrap()
    }

    #[test]
    fn empty_board_is_a_forced_draw() {
        // arrange
        let mut board = TicTacToeBoard::default();
        let mut search = MinimaxSearch::new();

        // act
        let first = search.best_move(&mut board, Mark::X).unwrap();
        let second = search.best_move(&mut board, Mark::X).unwrap();

        // assert
        assert_eq!(first.score, 0);
        assert!(first.best_move.is_some());
        assert_eq!(first, second);
        assert_eq!(board, TicTacToeBoard::default());
        assert_eq!(search.last_stats().nodes, first.nodes);
        assert!(search.last_stats().leaves > 0);
    }

    #[test]
    fn takes_immediate_win() {
        // arrange
        let mut board = board("XX_ OO_ ___");
        let before = board.clone();

        // act
        let result = MinimaxSearch::new().best_move(&mut board, Mark::X).unwrap();

        // assert
        assert_eq!(result.best_move, Some(2));
        assert_eq!(result.score, 5);
        assert_eq!(board, before);
    }

    #[test]
    fn prefers_own_win_over_blocking() {
        let mut board = board("OO_ XX_ ___");
        let result = MinimaxSearch::new().best_move(&mut board, Mark::O).unwrap();
        assert_eq!(result.best_move, Some(2));
        assert!(result.score > 0);
    }

    #[test]
    fn blocks_when_no_win_is_available() {
        let mut board = board("XX_ O__ ___");
        let result = MinimaxSearch::new().best_move(&mut board, Mark::O).unwrap();
        assert_eq!(result.best_move, Some(2));
        assert!(result.score <= 0);
        // X still forks with the centre; blocking only delays the loss
        assert_eq!(result.score, -3);
    }

    #[test]
    fn last_empty_cell_is_forced() {
        let mut board = board("XOX XOO OX_");
        let result = MinimaxSearch::new().best_move(&mut board, Mark::X).unwrap();
        assert_eq!(result.best_move, Some(8));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn finished_board_is_rejected() {
        // arrange
        let mut won = board("OOO XX_ X__");
        let mut drawn = board("XOX XOO OXX");
        let before = won.clone();

        // act
        let won_err = MinimaxSearch::new().best_move(&mut won, Mark::X);
        let drawn_err = MinimaxSearch::new().best_move(&mut drawn, Mark::O);

        // assert
        assert_eq!(
            won_err,
            Err(SearchError::TerminalBoard {
                outcome: GameOutcome::Won(Mark::O)
            })
        );
        assert_eq!(
            drawn_err,
            Err(SearchError::TerminalBoard {
                outcome: GameOutcome::Drawn
            })
        );
        assert_eq!(won, before);
    }

    #[test]
    fn chosen_move_is_always_empty_and_board_restored() {
        let layouts = [
            "X__ ___ ___",
            "X__ _O_ ___",
            "XO_ _X_ ___",
            "X_O _X_ O__",
            "OX_ _X_ ___",
        ];
        for layout in layouts {
            let mut board = board(layout);
            let before = board.clone();
            let me = board.next_mark();
            let result = MinimaxSearch::new().best_move(&mut board, me).unwrap();
            let cell = result.best_move.unwrap();
            assert!(before.is_legal(cell), "{layout}: picked {cell}");
            assert_eq!(board, before, "{layout}: board not restored");
        }
    }

    #[test]
    fn corner_against_centre_is_a_draw() {
        let mut board = board("X__ _O_ ___");
        let x = MinimaxSearch::new().best_move(&mut board, Mark::X).unwrap();
        assert_eq!(x.score, 0);
    }

    #[test]
    fn tree_matches_best_move() {
        // arrange
        let mut board = board("X_O _X_ O__");
        let mut search = MinimaxSearch::new();

        // act
        let result = search.best_move(&mut board, Mark::O).unwrap();
        let tree = search.build_tree(&board, Mark::O).unwrap();

        // assert
        let root = tree.root();
        assert_eq!(root.value().score, result.score);
        assert_eq!(root.children().count(), board.available_moves().len());
        let best = best_child(root).unwrap();
        assert_eq!(best.value().prev_move, result.best_move);
        assert_eq!(best.value().mark, Some(Mark::O));
        assert_eq!(best.value().height, 1);
        assert_eq!(search.last_stats().nodes as usize, tree.nodes().count());
    }

    #[test]
    fn principal_variation_ends_in_a_terminal_node() {
        let board = board("XX_ OO_ ___");
        let tree = MinimaxSearch::new().build_tree(&board, Mark::X).unwrap();
        assert_eq!(principal_variation(&tree), vec![2]);
        let win = best_child(tree.root()).unwrap();
        assert!(win.value().is_terminal());
        assert_eq!(win.value().outcome, GameOutcome::Won(Mark::X));
        assert_eq!(win.children().count(), 0);
    }

    #[test]
    fn build_tree_rejects_finished_boards() {
        let board = board("XXX OO_ ___");
        assert!(matches!(
            MinimaxSearch::new().build_tree(&board, Mark::O),
            Err(SearchError::TerminalBoard { .. })
        ));
    }
}
