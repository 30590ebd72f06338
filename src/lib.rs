//! # Rush Hour Solver Library
//!
//! This library provides the board model for Rush Hour style sliding-vehicle puzzles,
//! single-agent solvers (breadth-first search and A*), and a two-player race variant
//! searched with minimax and alpha-beta pruning or Monte Carlo tree search.
//!
//! It is used by three binaries:
//! - `solve`: loads a board file and prints a shortest (or heuristic) solution.
//! - `race`: plays a two-player match between alpha-beta, MCTS, and random agents.
//! - `heuristic_evaluator`: runs A* with every heuristic on a set of boards and compares
//!   expanded nodes and solution lengths.
//!
//! ## Modules
//! - `engine`: the grid, vehicles, moves, and goal tests (`Board`, `Vehicle`, `Move`).
//! - `movegen`: legal single-cell slides in a fixed, reproducible order.
//! - `zobrist`: incremental state fingerprints and the visited set built on them.
//! - `heuristics`: A* estimates (`Heuristic`) and minimax evaluations (`Evaluation`).
//! - `solver`: `solve`, `solve_bfs`, and `solve_astar`.
//! - `adversarial`: `minimax` and the `play_match` driver.
//! - `mcts`: UCT tree search with seeded random playouts.
//! - `utils`: parsing board layouts from strings and files.
//! - `error`: `BoardError` and `LoadError`.

pub mod adversarial;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod mcts;
pub mod movegen;
pub mod solver;
pub mod utils;
pub mod zobrist;

pub use engine::{Board, Direction, Move, Player, Vehicle, VehicleId};
pub use error::{BoardError, LoadError};
pub use heuristics::{Evaluation, Heuristic};
pub use solver::{solve, Outcome, SearchLimits, Solution, SolverConfig, Strategy};
pub use utils::GameMode;
