//! Single-player search: breadth-first search and A*.
//!
//! Both strategies share the same shape. They keep a frontier of nodes, each holding a
//! board and the moves that led to it. They check the goal when a node is taken off the
//! frontier, and use a fresh [`VisitedSet`] so no configuration is expanded twice. Each
//! successor is an independent copy of its parent, so a board sitting in the frontier is
//! never mutated.
//!
//! A search ends in one of three ways, reported through [`Outcome`]:
//! - `Solved`: a goal state was reached, and `moves` holds the path to it.
//! - `Exhausted`: every reachable state was expanded, so the board has no solution.
//! - `BudgetExceeded`: the caller's node budget ran out first.
use crate::engine::{Board, Direction, Move, Player};
use crate::error::BoardError;
use crate::heuristics::Heuristic;
use crate::movegen::{legal_moves, Actor};
use crate::zobrist::VisitedSet;
use log::{debug, warn};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

/// Search strategy for single-player solving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    BreadthFirst,
    AStar(Heuristic),
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::BreadthFirst => write!(f, "bfs"),
            Strategy::AStar(h) => write!(f, "astar ({})", h),
        }
    }
}

/// Limits checked after every node taken off the frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop once this many nodes have been expanded.
    pub max_expanded: Option<usize>,
}

/// Full configuration for [`solve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Whose goal vehicle must reach its edge.
    pub player: Player,
    pub limits: SearchLimits,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            strategy: Strategy::BreadthFirst,
            player: Player::One,
            limits: SearchLimits::default(),
        }
    }
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// The reachable state space was exhausted without reaching a goal.
    Exhausted,
    /// The node budget ran out before the search finished.
    BudgetExceeded,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Solved => "solved",
            Outcome::Exhausted => "unsolvable (state space exhausted)",
            Outcome::BudgetExceeded => "gave up (node budget exceeded)",
        })
    }
}

/// Counters reported alongside every search result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded.
    pub expanded_nodes: usize,
    /// Successor states created, including ones discarded as duplicates.
    pub generated_nodes: usize,
    /// Distinct configurations recorded in the visited set.
    pub distinct_states: usize,
    pub elapsed: Duration,
}

/// Represents a result returned by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Moves from the initial board to the goal; empty unless `outcome` is `Solved`.
    pub moves: Vec<Move>,
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    /// The moves as `(symbol, direction)` pairs, labelled with `board`'s vehicles.
    pub fn labelled(&self, board: &Board) -> Vec<(char, Direction)> {
        self.moves.iter().map(|&mv| board.label_move(mv)).collect()
    }
}

// A frontier entry: a board and the path that reached it.
struct Node {
    board: Board,
    path: Vec<Move>,
}

impl Node {
    fn child(&self, mv: Move, board: Board) -> Node {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(mv);
        Node { board, path }
    }
}

/// Solves `board` with the strategy in `config`.
///
/// # Errors
/// Only if the engine tries to apply an illegal move, which indicates a bug.
pub fn solve(board: &Board, config: &SolverConfig) -> Result<Solution, BoardError> {
    match config.strategy {
        Strategy::BreadthFirst => solve_bfs(board, config.player, config.limits),
        Strategy::AStar(heuristic) => solve_astar(board, heuristic, config.player, config.limits),
    }
}

/// Breadth-first search. Returns a shortest solution by move count.
pub fn solve_bfs(board: &Board, player: Player, limits: SearchLimits) -> Result<Solution, BoardError> {
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut visited = VisitedSet::new();
    let mut frontier = VecDeque::new();

    debug!("bfs: starting search for {}", player);
    visited.insert(board.fingerprint());
    frontier.push_back(Node {
        board: board.clone(),
        path: Vec::new(),
    });

    while let Some(node) = frontier.pop_front() {
        if node.board.is_goal_reached(player) {
            return Ok(finish(node.path, Outcome::Solved, stats, &visited, started));
        }
        if budget_spent(&limits, &stats) {
            return Ok(finish(Vec::new(), Outcome::BudgetExceeded, stats, &visited, started));
        }
        stats.expanded_nodes += 1;

        for mv in legal_moves(&node.board, Actor::Player(player)) {
            let next = node.board.apply_move(mv)?;
            stats.generated_nodes += 1;
            if visited.insert(next.fingerprint()) {
                frontier.push_back(node.child(mv, next));
            }
        }
    }

    Ok(finish(Vec::new(), Outcome::Exhausted, stats, &visited, started))
}

// Priority queue entry. `BinaryHeap` is a max-heap, so the key is reversed: lowest `f`
// first, then lowest insertion sequence.
struct Candidate {
    key: Reverse<(i32, u64)>,
    cost: i32,
    node: Node,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// A* ordered by `g + h`, ties broken first-in-first-out.
///
/// The result is a shortest solution iff `heuristic` is admissible (see
/// [`Heuristic::is_admissible`]). Stale duplicates are pushed freely and dropped when popped.
pub fn solve_astar(
    board: &Board,
    heuristic: Heuristic,
    player: Player,
    limits: SearchLimits,
) -> Result<Solution, BoardError> {
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut visited = VisitedSet::new();
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0u64;

    debug!("astar: starting search for {} with heuristic {}", player, heuristic);
    frontier.push(Candidate {
        key: Reverse((heuristic.estimate(board, player), sequence)),
        cost: 0,
        node: Node {
            board: board.clone(),
            path: Vec::new(),
        },
    });

    while let Some(Candidate { cost, node, .. }) = frontier.pop() {
        if visited.contains(node.board.fingerprint()) {
            continue;
        }
        if node.board.is_goal_reached(player) {
            return Ok(finish(node.path, Outcome::Solved, stats, &visited, started));
        }
        if budget_spent(&limits, &stats) {
            return Ok(finish(Vec::new(), Outcome::BudgetExceeded, stats, &visited, started));
        }
        visited.insert(node.board.fingerprint());
        stats.expanded_nodes += 1;

        for mv in legal_moves(&node.board, Actor::Player(player)) {
            let next = node.board.apply_move(mv)?;
            stats.generated_nodes += 1;
            if visited.contains(next.fingerprint()) {
                continue;
            }
            sequence += 1;
            let g = cost + 1;
            let h = heuristic.estimate(&next, player);
            frontier.push(Candidate {
                key: Reverse((g + h, sequence)),
                cost: g,
                node: node.child(mv, next),
            });
        }
    }

    Ok(finish(Vec::new(), Outcome::Exhausted, stats, &visited, started))
}

fn budget_spent(limits: &SearchLimits, stats: &SearchStats) -> bool {
    match limits.max_expanded {
        Some(max) if stats.expanded_nodes >= max => {
            warn!("search stopped after expanding {} nodes", stats.expanded_nodes);
            true
        }
        _ => false,
    }
}

fn finish(
    moves: Vec<Move>,
    outcome: Outcome,
    mut stats: SearchStats,
    visited: &VisitedSet,
    started: Instant,
) -> Solution {
    stats.elapsed = started.elapsed();
    stats.distinct_states = visited.len();
    debug!(
        "search finished: {} after {} expanded nodes ({} distinct states), {} moves",
        outcome,
        stats.expanded_nodes,
        stats.distinct_states,
        moves.len()
    );
    Solution { moves, outcome, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_str_array, GameMode};

    fn board(rows: &[&str]) -> Board {
        board_from_str_array(rows, GameMode::SinglePlayer).unwrap()
    }

    // Shortest solution length by iterative deepening over every move sequence, with no
    // duplicate detection. Only viable on tiny boards.
    fn brute_force_shortest(board: &Board, max_depth: usize) -> Option<usize> {
        fn reachable(board: &Board, depth: usize) -> bool {
            if board.is_goal_reached(Player::One) {
                return true;
            }
            if depth == 0 {
                return false;
            }
            legal_moves(board, Actor::Everyone)
                .into_iter()
                .any(|mv| reachable(&board.apply_move(mv).unwrap(), depth - 1))
        }
        (0..=max_depth).find(|&depth| reachable(board, depth))
    }

    fn blocked_exit() -> Board {
        board(&[
            "......", "......", "...XXA", ".....A", "......", "......",
        ])
    }

    #[test]
    fn test_bfs_already_solved() {
        let b = board(&["....XX", "......"]);
        let solution = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert!(solution.is_solved());
        assert!(solution.moves.is_empty());
        assert_eq!(solution.stats.expanded_nodes, 0);
    }

    #[test]
    fn test_single_blocker_scenario_bfs_and_astar() {
        let b = blocked_exit();
        let expected = vec![('A', Direction::Forward), ('X', Direction::Forward)];

        let bfs = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(bfs.outcome, Outcome::Solved);
        assert_eq!(bfs.labelled(&b), expected);

        let astar = solve_astar(&b, Heuristic::DistanceToGoal, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(astar.outcome, Outcome::Solved);
        assert_eq!(astar.moves.len(), 2);
        assert!(b.replay(&astar.moves).unwrap().is_goal_reached(Player::One));
    }

    #[test]
    fn test_bfs_matches_brute_force_on_small_boards() {
        let boards = [
            board(&["XX.A", "...A", "...."]),
            board(&["XX.A", "B..A", "B..."]),
            board(&["....", "XXA.", "..A.", "..A."]),
            board(&["X.A.", "X.A.", "....", "BB.."]),
            board(&["..A.", "XXA.", "CC..", ".DD."]),
        ];
        for b in &boards {
            let solution = solve_bfs(b, Player::One, SearchLimits::default()).unwrap();
            let expected = brute_force_shortest(b, 7);
            match expected {
                Some(len) => {
                    assert!(solution.is_solved(), "board\n{}\nshould be solvable", b);
                    assert_eq!(solution.moves.len(), len, "board\n{}", b);
                }
                None => assert!(!solution.is_solved() || solution.moves.len() > 7, "board\n{}", b),
            }
        }
    }

    #[test]
    fn test_solutions_replay_to_goal() {
        let b = board(&[
            "AA...B", "C..D.B", "CXXD.B", "C..D..", "E...FF", "E.GGG.",
        ]);
        let bfs = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert!(bfs.is_solved());
        assert!(b.replay(&bfs.moves).unwrap().is_goal_reached(Player::One));

        for heuristic in Heuristic::ALL {
            let astar = solve_astar(&b, heuristic, Player::One, SearchLimits::default()).unwrap();
            assert!(astar.is_solved(), "{} failed to solve", heuristic);
            assert!(b.replay(&astar.moves).unwrap().is_goal_reached(Player::One));
            if heuristic.is_admissible() {
                assert_eq!(astar.moves.len(), bfs.moves.len(), "{} must be optimal", heuristic);
            } else {
                assert!(astar.moves.len() >= bfs.moves.len());
            }
        }
    }

    #[test]
    fn test_searches_are_deterministic() {
        let b = board(&[
            "AA...B", "C..D.B", "CXXD.B", "C..D..", "E...FF", "E.GGG.",
        ]);
        let first = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        let second = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(first.moves, second.moves);
        assert_eq!(first.stats.expanded_nodes, second.stats.expanded_nodes);

        let config = SolverConfig {
            strategy: Strategy::AStar(Heuristic::DistancePlusBlockers),
            ..SolverConfig::default()
        };
        let first = solve(&b, &config).unwrap();
        let second = solve(&b, &config).unwrap();
        assert_eq!(first.moves, second.moves);
    }

    #[test]
    fn test_deadlocked_board_exhausts() {
        let b = board(&["XXA", "BBA"]);
        let bfs = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(bfs.outcome, Outcome::Exhausted);
        assert!(bfs.moves.is_empty());
        assert_eq!(bfs.stats.expanded_nodes, 1);

        let astar = solve_astar(&b, Heuristic::DistanceToGoal, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(astar.outcome, Outcome::Exhausted);
        assert!(astar.moves.is_empty());
    }

    #[test]
    fn test_unsolvable_board_exhausts_finite_space() {
        // A is horizontal and shares X's row, so X can never pass it.
        let b = board(&["XX.AA", ".....", "....."]);
        let bfs = solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(bfs.outcome, Outcome::Exhausted);
        assert!(bfs.moves.is_empty());
        assert!(bfs.stats.expanded_nodes > 1);

        let astar = solve_astar(&b, Heuristic::DistancePlusBlockers, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(astar.outcome, Outcome::Exhausted);
        assert_eq!(astar.stats.expanded_nodes, bfs.stats.expanded_nodes);

        // X and A share five cells: (X at 0, A at 2 or 3) and (X at 1, A at 3).
        assert_eq!(bfs.stats.distinct_states, 3);
        assert_eq!(astar.stats.distinct_states, 3);
        assert_eq!(bfs.stats.expanded_nodes, 3);
    }

    #[test]
    fn test_budget_exceeded_is_distinct_from_exhausted() {
        let b = board(&[
            "AA...B", "C..D.B", "CXXD.B", "C..D..", "E...FF", "E.GGG.",
        ]);
        let limits = SearchLimits { max_expanded: Some(3) };
        let bfs = solve_bfs(&b, Player::One, limits).unwrap();
        assert_eq!(bfs.outcome, Outcome::BudgetExceeded);
        assert!(bfs.moves.is_empty());
        assert_eq!(bfs.stats.expanded_nodes, 3);

        let astar = solve_astar(&b, Heuristic::Null, Player::One, limits).unwrap();
        assert_eq!(astar.outcome, Outcome::BudgetExceeded);
        assert_eq!(astar.stats.expanded_nodes, 3);
    }

    #[test]
    fn test_initial_board_is_not_mutated() {
        let b = blocked_exit();
        let before = b.to_rows();
        let fingerprint = b.fingerprint();
        solve_bfs(&b, Player::One, SearchLimits::default()).unwrap();
        solve_astar(&b, Heuristic::Weighted, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(b.to_rows(), before);
        assert_eq!(b.fingerprint(), fingerprint);
    }

    #[test]
    fn test_informed_search_expands_fewer_nodes() {
        let b = board(&[
            "AA....", "......", "XX....", "......", "......", "......",
        ]);
        let null = solve_astar(&b, Heuristic::Null, Player::One, SearchLimits::default()).unwrap();
        let distance = solve_astar(&b, Heuristic::DistanceToGoal, Player::One, SearchLimits::default()).unwrap();
        assert_eq!(null.moves.len(), 4);
        assert_eq!(distance.moves.len(), 4);
        assert!(distance.stats.expanded_nodes < null.stats.expanded_nodes);
    }
}
