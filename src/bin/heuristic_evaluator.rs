use clap::Parser;
use rush_hour_solver::engine::Player;
use rush_hour_solver::heuristics::Heuristic;
use rush_hour_solver::solver::{solve_astar, solve_bfs, SearchLimits};
use rush_hour_solver::utils::{load_board_file, GameMode};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares A* heuristics on a set of Rush Hour boards", long_about = None)]
struct Args {
    /// Board files to evaluate
    #[clap(required = true)]
    boards: Vec<PathBuf>,

    /// Per-search node budget
    #[clap(long)]
    max_expanded: Option<usize>,
}

#[derive(Default)]
struct Tally {
    expanded: Vec<usize>,
    non_optimal: usize,
    unsolved: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let limits = SearchLimits {
        max_expanded: args.max_expanded,
    };

    let mut tallies: HashMap<Heuristic, Tally> = HashMap::new();
    println!("Starting heuristic evaluation for {} boards...", args.boards.len());

    for path in &args.boards {
        let board = match load_board_file(path, GameMode::SinglePlayer) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("Warning: skipping {}: {}", path.display(), err);
                continue;
            }
        };
        println!("\nEvaluating {}", path.display());

        // BFS gives the reference length each heuristic is checked against.
        let optimal = match solve_bfs(&board, Player::One, limits) {
            Ok(solution) if solution.is_solved() => Some(solution.moves.len()),
            Ok(solution) => {
                println!("  BFS: {}", solution.outcome);
                None
            }
            Err(err) => {
                eprintln!("Error: BFS failed on {}: {}", path.display(), err);
                continue;
            }
        };

        for heuristic in Heuristic::ALL {
            let tally = tallies.entry(heuristic).or_default();
            let solution = match solve_astar(&board, heuristic, Player::One, limits) {
                Ok(solution) => solution,
                Err(err) => {
                    eprintln!("Error: {} failed on {}: {}", heuristic, path.display(), err);
                    continue;
                }
            };
            if !solution.is_solved() {
                tally.unsolved += 1;
                println!("  Heuristic: {:<24} {}", heuristic.name(), solution.outcome);
                continue;
            }
            let length = solution.moves.len();
            let marker = match optimal {
                Some(best) if length > best => {
                    tally.non_optimal += 1;
                    format!(" (optimal {})", best)
                }
                _ => String::new(),
            };
            tally.expanded.push(solution.stats.expanded_nodes);
            println!(
                "  Heuristic: {:<24} Expanded: {:<8} Length: {}{}",
                heuristic.name(),
                solution.stats.expanded_nodes,
                length,
                marker
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards: {}", args.boards.len());
    println!(
        "Heuristics evaluated: {}",
        Heuristic::ALL.iter().map(|h| h.name()).collect::<Vec<&str>>().join(", ")
    );
    println!("\n--- Average Expanded Nodes ---");

    let mut averages: Vec<(Heuristic, f64, &Tally)> = Vec::new();
    for heuristic in Heuristic::ALL {
        let Some(tally) = tallies.get(&heuristic) else {
            continue;
        };
        if tally.expanded.is_empty() {
            println!("Heuristic {}: no solved boards.", heuristic.name());
            continue;
        }
        let total: usize = tally.expanded.iter().sum();
        averages.push((heuristic, total as f64 / tally.expanded.len() as f64, tally));
    }

    // Fewest expansions first.
    averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (heuristic, average, tally) in averages {
        println!(
            "Heuristic {:<24}: Average Expanded = {:.2}, Non-optimal = {}, Unsolved = {}",
            heuristic.name(),
            average,
            tally.non_optimal,
            tally.unsolved
        );
    }
}
