use minimax_ttt::boards::tic_tac_toe::TicTacToeBoard;
use minimax_ttt::game::Game;
use minimax_ttt::minimax::MinimaxSearch;
use minimax_ttt::player::{MinimaxPlayer, Player, RandomPlayer};
use minimax_ttt::random::{RandomGenerator, SeededRandomGenerator};
use minimax_ttt::{Board, GameOutcome, Mark};

fn minimax(mark: Mark, seed: u64) -> Player<SeededRandomGenerator> {
    MinimaxPlayer::builder(mark)
        .with_random_opening(true)
        .with_random_generator(SeededRandomGenerator::new(seed))
        .build()
        .into()
}

fn random(mark: Mark, seed: u64) -> Player<SeededRandomGenerator> {
    RandomPlayer::new(mark, SeededRandomGenerator::new(seed)).into()
}

// Two perfect players always draw, whatever the opening.
#[test]
fn minimax_against_minimax_always_draws() {
    for seed in 0..10 {
        let mut game = Game::new(
            TicTacToeBoard::default(),
            minimax(Mark::X, seed),
            minimax(Mark::O, seed + 100),
        )
        .unwrap();
        assert_eq!(game.play().unwrap(), GameOutcome::Drawn, "seed {seed}");
    }
}

// A perfect player never loses to random moves, moving first or second.
#[test]
fn minimax_never_loses_to_random() {
    for seed in 0..25 {
        let mut first = Game::new(
            TicTacToeBoard::default(),
            minimax(Mark::X, seed),
            random(Mark::O, seed),
        )
        .unwrap();
        assert_ne!(first.play().unwrap(), GameOutcome::Won(Mark::O), "seed {seed}");

        let mut second = Game::new(
            TicTacToeBoard::default(),
            random(Mark::X, seed),
            minimax(Mark::O, seed),
        )
        .unwrap();
        assert_ne!(second.play().unwrap(), GameOutcome::Won(Mark::X), "seed {seed}");
    }
}

fn has_full_line(board: &TicTacToeBoard, mark: Mark) -> bool {
    let n = board.size();
    let full = |cells: Vec<usize>| cells.iter().all(|&c| board.cell(c) == Some(Some(mark)));
    (0..n).any(|r| full((0..n).map(|c| r * n + c).collect()))
        || (0..n).any(|c| full((0..n).map(|r| r * n + c).collect()))
        || full((0..n).map(|i| i * n + i).collect())
        || full((0..n).map(|i| i * n + n - 1 - i).collect())
}

// Random legal play keeps the turn balance and only reports real winners.
#[test]
fn random_play_preserves_board_invariants() {
    for seed in 0..200 {
        let mut rng = SeededRandomGenerator::new(seed);
        let mut board = TicTacToeBoard::default();
        let mut mark = Mark::X;
        while !board.outcome().is_terminal() {
            let moves = board.available_moves();
            let cell = *rng.choose(&moves).unwrap();
            board.place(cell, mark).unwrap();
            assert!(board.turn_balance_holds(), "seed {seed}: {board}");
            mark = mark.opponent();
        }
        match board.winner() {
            Some(winner) => assert!(has_full_line(&board, winner), "seed {seed}: {board}"),
            None => assert!(board.is_full()),
        }
    }
}

// Searching mid-game positions never disturbs them and never picks a taken cell.
#[test]
fn search_on_random_positions_is_pure() {
    for seed in 0..40 {
        let mut rng = SeededRandomGenerator::new(seed);
        let mut board = TicTacToeBoard::default();
        let mut mark = Mark::X;
        for _ in 0..(2 + seed as usize % 5) {
            let moves = board.available_moves();
            board.place(*rng.choose(&moves).unwrap(), mark).unwrap();
            mark = mark.opponent();
        }
        if board.outcome().is_terminal() {
            continue;
        }

        let before = board.clone();
        let mut search = MinimaxSearch::new();
        let first = search.best_move(&mut board, mark).unwrap();
        let again = search.best_move(&mut board, mark).unwrap();

        assert_eq!(board, before, "seed {seed}");
        assert_eq!(first, again, "seed {seed}");
        assert!(before.is_legal(first.best_move.unwrap()), "seed {seed}");
    }
}
