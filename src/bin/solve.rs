use clap::{Parser, ValueEnum};
use log::info;
use rush_hour_solver::engine::{Board, Move, Player};
use rush_hour_solver::error::BoardError;
use rush_hour_solver::heuristics::Heuristic;
use rush_hour_solver::solver::{solve, SearchLimits, SolverConfig, Strategy};
use rush_hour_solver::utils::{load_board_file, GameMode};
use std::path::PathBuf;
use std::process;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Breadth-first search; always finds a shortest solution.
    Bfs,
    /// A* guided by `--heuristic`.
    Astar,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GoalArg {
    /// Drive `X` to the right edge.
    X,
    /// Drive `Y` to the bottom edge (requires `--mode two-player`).
    Y,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solves a Rush Hour board", long_about = None)]
struct Args {
    /// Path to the board file: one row per line, letters for vehicles, '.' for empty cells
    board_file: PathBuf,

    /// Search strategy
    #[clap(short, long, value_enum, default_value_t = StrategyArg::Bfs)]
    strategy: StrategyArg,

    /// Heuristic used by A*
    #[clap(long, value_enum, default_value_t = Heuristic::DistanceToGoal)]
    heuristic: Heuristic,

    /// Give up after expanding this many nodes
    #[clap(long)]
    max_expanded: Option<usize>,

    /// How goal vehicles are assigned
    #[clap(long, value_enum, default_value_t = GameMode::SinglePlayer)]
    mode: GameMode,

    /// Which goal vehicle to solve for
    #[clap(long, value_enum, default_value_t = GoalArg::X)]
    goal: GoalArg,

    /// Print the board after every move, highlighting the vehicle that moved
    #[clap(long)]
    show_boards: bool,
}

fn print_solution_boards(initial: &Board, moves: &[Move]) -> Result<(), BoardError> {
    let mut board = initial.clone();
    for (i, &mv) in moves.iter().enumerate() {
        board.make_move(mv)?;
        println!("Move {}: {}", i + 1, board.describe_move(mv));
        println!("{}\n", board.to_string_with_highlight(Some(mv.vehicle)));
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let board = match load_board_file(&args.board_file, args.mode) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("Failed to load board: {}", err);
            process::exit(2);
        }
    };
    let player = match args.goal {
        GoalArg::X => Player::One,
        GoalArg::Y => Player::Two,
    };
    if board.goal_vehicle(player).is_none() {
        eprintln!("The board has no goal vehicle for {}", player);
        process::exit(2);
    }

    let strategy = match args.strategy {
        StrategyArg::Bfs => Strategy::BreadthFirst,
        StrategyArg::Astar => Strategy::AStar(args.heuristic),
    };
    if let Strategy::AStar(h) = strategy {
        if !h.is_admissible() {
            info!("heuristic {} is not admissible; the solution may not be shortest", h);
        }
    }
    let config = SolverConfig {
        strategy,
        player,
        limits: SearchLimits {
            max_expanded: args.max_expanded,
        },
    };

    println!("Loaded board from {}\n", args.board_file.display());
    println!("Initial board state:\n{}\n", board);
    println!("Searching with {} for {}...\n", strategy, player);

    let solution = match solve(&board, &config) {
        Ok(solution) => solution,
        Err(err) => {
            eprintln!("Search failed: {}", err);
            process::exit(1);
        }
    };

    if solution.is_solved() {
        println!("Solution found ({} moves):", solution.moves.len());
        if solution.moves.is_empty() {
            println!("  No moves needed.");
        }
        for (i, &mv) in solution.moves.iter().enumerate() {
            println!("  Move {}: {}", i + 1, board.describe_move(mv));
        }
        println!();
        if args.show_boards {
            if let Err(err) = print_solution_boards(&board, &solution.moves) {
                eprintln!("Failed to replay solution: {}", err);
                process::exit(1);
            }
        }
    }

    println!("Outcome: {}", solution.outcome);
    println!("Expanded nodes: {}", solution.stats.expanded_nodes);
    println!("Generated nodes: {}", solution.stats.generated_nodes);
    println!("Distinct states: {}", solution.stats.distinct_states);
    println!("Elapsed: {:.3?}", solution.stats.elapsed);
}
