use clap::{Parser, ValueEnum};
use minimax_ttt::boards::tic_tac_toe::TicTacToeBoard;
use minimax_ttt::game::{ConsoleObserver, Game};
use minimax_ttt::minimax::MinimaxSearch;
use minimax_ttt::player::{ConsoleInput, MinimaxPlayer, Player, RandomPlayer};
use minimax_ttt::random::{DEFAULT_SEED, SeededRandomGenerator};
use minimax_ttt::search_node::principal_variation;
use minimax_ttt::{GameOutcome, Mark};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Human,
    Random,
    Minimax,
}

/// Tic-tac-toe in the terminal against the minimax engine.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Who plays X (moves first).
    #[arg(short, long, value_enum, default_value_t = Strategy::Minimax)]
    x: Strategy,

    /// Who plays O.
    #[arg(short, long, value_enum, default_value_t = Strategy::Minimax)]
    o: Strategy,

    /// Rows and columns of the board.
    #[arg(long, default_value_t = 3)]
    size: usize,

    /// Seed for the random players and random openings.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Let a minimax player open with a random cell.
    #[arg(long)]
    random_opening: bool,

    /// Print the line the engine expects from the starting position and exit.
    #[arg(long)]
    explain: bool,
}

fn player(strategy: Strategy, mark: Mark, cli: &Cli, seed: u64) -> Player<SeededRandomGenerator> {
    let random = SeededRandomGenerator::new(seed);
    match strategy {
        Strategy::Human => Player::human(mark, ConsoleInput::stdio()),
        Strategy::Random => RandomPlayer::new(mark, random).into(),
        Strategy::Minimax => MinimaxPlayer::builder(mark)
            .with_random_opening(cli.random_opening)
            .with_random_generator(random)
            .build()
            .into(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let board = TicTacToeBoard::with_size(cli.size)?;
    if board.size() > 3 && (cli.x == Strategy::Minimax || cli.o == Strategy::Minimax) {
        warn!(size = board.size(), "exhaustive search on boards above 3x3 may not finish");
    }

    if cli.explain {
        let tree = MinimaxSearch::new().build_tree(&board, Mark::X)?;
        println!(
            "Expected line: {:?} (score {})",
            principal_variation(&tree),
            tree.root().value().score
        );
        return Ok(());
    }

    let seed = cli.seed;
    let x = player(cli.x, Mark::X, &cli, seed);
    let o = player(cli.o, Mark::O, &cli, seed.wrapping_add(1));
    println!("tic-tac-toe: {:?} (X) vs {:?} (O)", cli.x, cli.o);

    let mut game = Game::new(board, x, o)?.with_observer(ConsoleObserver::stdout());
    match game.play()? {
        GameOutcome::Won(mark) => println!("Winner: {mark} after {} moves", game.history().len()),
        GameOutcome::Drawn => println!("Draw after {} moves", game.history().len()),
        GameOutcome::InProgress => {}
    }
    Ok(())
}
