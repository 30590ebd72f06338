use clap::{Parser, ValueEnum};
use rush_hour_solver::adversarial::{play_match, Agent, MatchEnd};
use rush_hour_solver::engine::Player;
use rush_hour_solver::heuristics::Evaluation;
use rush_hour_solver::mcts::{DEFAULT_EXPLORATION, DEFAULT_ITERATIONS};
use rush_hour_solver::utils::{load_board_file, GameMode};
use std::path::PathBuf;
use std::process;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    /// Minimax with alpha-beta pruning
    Alphabeta,
    /// Monte Carlo tree search
    Mcts,
    /// Uniformly random legal moves
    Random,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Plays a two-player Rush Hour race: X to the right edge, Y to the bottom edge", long_about = None)]
struct Args {
    /// Path to the board file; it must contain both X and Y
    board_file: PathBuf,

    /// Agent playing X (moves first)
    #[clap(long, value_enum, default_value_t = AgentKind::Alphabeta)]
    agent: AgentKind,

    /// Agent playing Y
    #[clap(long, value_enum, default_value_t = AgentKind::Random)]
    opponent: AgentKind,

    /// Look-ahead in full rounds for alpha-beta agents
    #[clap(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Position evaluation for alpha-beta agents
    #[clap(long, value_enum, default_value_t = Evaluation::Race)]
    evaluation: Evaluation,

    /// Playouts per move for MCTS agents
    #[clap(long, default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// UCT exploration constant for MCTS agents
    #[clap(long, default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,

    /// Seed for random and MCTS agents; player two uses seed + 1
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Stop the match as a draw after this many moves
    #[clap(long, default_value_t = 200)]
    move_limit: usize,
}

fn build_agent(kind: AgentKind, args: &Args, seed: u64) -> Agent {
    match kind {
        AgentKind::Alphabeta => Agent::AlphaBeta {
            depth: args.depth,
            evaluation: args.evaluation,
        },
        AgentKind::Mcts => Agent::Mcts {
            iterations: args.iterations,
            exploration: args.exploration,
            seed,
        },
        AgentKind::Random => Agent::Random { seed },
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let board = match load_board_file(&args.board_file, GameMode::TwoPlayer) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("Failed to load board: {}", err);
            process::exit(2);
        }
    };
    let agents = [
        build_agent(args.agent, &args, args.seed),
        build_agent(args.opponent, &args, args.seed.wrapping_add(1)),
    ];

    println!("Initial board state:\n{}\n", board);
    println!("{:?} ({}) vs {:?} ({})\n", args.agent, Player::One, args.opponent, Player::Two);

    let report = match play_match(&board, agents, args.move_limit) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Match aborted: {}", err);
            process::exit(1);
        }
    };

    let mut replay = board.clone();
    for (i, &(player, mv)) in report.moves.iter().enumerate() {
        println!("  Move {:>3}: {:<16} {}", i + 1, player.to_string(), replay.describe_move(mv));
        if let Err(err) = replay.make_move(mv) {
            eprintln!("Failed to replay match: {}", err);
            process::exit(1);
        }
    }
    println!("\nFinal board state:\n{}\n", replay);

    match report.end {
        MatchEnd::Won(player) => println!("Winner: {}", player),
        MatchEnd::Deadlock => println!("Draw: neither side can move"),
        MatchEnd::MoveLimit => println!("Draw: move limit of {} reached", args.move_limit),
    }
    println!("Moves played: {}", report.moves.len());
    println!("Nodes searched: {}", report.nodes);
    println!("Elapsed: {:.3?}", report.elapsed);
}
