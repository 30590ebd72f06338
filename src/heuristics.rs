//! Cost estimators for A* and state evaluations for minimax.
//!
//! Both are closed enums picked when a search is configured. The CLI exposes them through
//! `clap::ValueEnum`, so the name is resolved once at argument-parsing time.
//!
//! Building blocks:
//! - `distance_to_goal`: cells between the goal vehicle's leading end and its edge.
//! - `blocking_vehicles`: distinct vehicles sitting on those cells.
//! - `blocked_cells`: occupied cells on those cells.
//! - `blockers_total_size`: summed length of the blocking vehicles.
//! - `steps_to_clear_path`: slides the blocking vehicles need to get off that path.
use crate::engine::{Board, Cell, Orientation, Player, VehicleId};
use clap::ValueEnum;
use std::fmt;

/// Estimate of the remaining moves to a goal state, consumed by A*.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Heuristic {
    /// Always zero; A* degenerates to uniform-cost search.
    Null,
    /// Cells left between the goal vehicle and its edge.
    DistanceToGoal,
    /// Occupied cells on the goal vehicle's path.
    BlockerCount,
    /// Distance plus the number of distinct vehicles on the path.
    DistancePlusBlockers,
    /// Summed length of the vehicles on the path. Not admissible.
    BlockersTotalSize,
    /// `5 * distance + blocked cells`. Favors pushing the goal vehicle forward; not admissible.
    Weighted,
    /// Fewest slides each blocking vehicle needs to leave the path, summed.
    StepsToClearPath,
}

impl Heuristic {
    /// Every heuristic, in declaration order.
    pub const ALL: [Heuristic; 7] = [
        Heuristic::Null,
        Heuristic::DistanceToGoal,
        Heuristic::BlockerCount,
        Heuristic::DistancePlusBlockers,
        Heuristic::BlockersTotalSize,
        Heuristic::Weighted,
        Heuristic::StepsToClearPath,
    ];

    /// Estimates the moves `player` still needs on `board`.
    pub fn estimate(&self, board: &Board, player: Player) -> i32 {
        match self {
            Heuristic::Null => 0,
            Heuristic::DistanceToGoal => distance_to_goal(board, player),
            Heuristic::BlockerCount => blocked_cells(board, player),
            Heuristic::DistancePlusBlockers => {
                distance_to_goal(board, player) + blocking_vehicles(board, player).len() as i32
            }
            Heuristic::BlockersTotalSize => blockers_total_size(board, player),
            Heuristic::Weighted => 5 * distance_to_goal(board, player) + blocked_cells(board, player),
            Heuristic::StepsToClearPath => steps_to_clear_path(board, player),
        }
    }

    /// Whether the estimate never exceeds the true remaining move count, so A* stays optimal.
    ///
    /// Each admissible variant changes by at most one per slide, which also makes it
    /// consistent; A* with a closed set relies on that.
    pub fn is_admissible(&self) -> bool {
        matches!(
            self,
            Heuristic::Null
                | Heuristic::DistanceToGoal
                | Heuristic::BlockerCount
                | Heuristic::DistancePlusBlockers
                | Heuristic::StepsToClearPath
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Null => "null",
            Heuristic::DistanceToGoal => "distance-to-goal",
            Heuristic::BlockerCount => "blocker-count",
            Heuristic::DistancePlusBlockers => "distance-plus-blockers",
            Heuristic::BlockersTotalSize => "blockers-total-size",
            Heuristic::Weighted => "weighted",
            Heuristic::StepsToClearPath => "steps-to-clear-path",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scores a position from the maximizing player's point of view, consumed by minimax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Evaluation {
    /// Exact terminal value: `1` if the maximizer has won, `-1` if the opponent has, else `0`.
    Outcome,
    /// Difference in remaining distance: opponent's minus the maximizer's.
    Distance,
    /// Distance and blockers for both sides, weighted, with a large bonus for a finished race.
    Race,
}

/// Value reported for a won position under [`Evaluation::Race`].
pub const RACE_WIN_BONUS: i32 = 1000;

impl Evaluation {
    /// Scores `board` for `maximizer`. Higher is better for the maximizer.
    pub fn evaluate(&self, board: &Board, maximizer: Player) -> i32 {
        let opponent = maximizer.opponent();
        match self {
            Evaluation::Outcome => {
                match (board.is_goal_reached(maximizer), board.is_goal_reached(opponent)) {
                    (true, false) => 1,
                    (false, true) => -1,
                    _ => 0,
                }
            }
            Evaluation::Distance => distance_to_goal(board, opponent) - distance_to_goal(board, maximizer),
            Evaluation::Race => {
                let mine = distance_to_goal(board, maximizer);
                let theirs = distance_to_goal(board, opponent);
                let my_blockers = blocked_cells(board, maximizer);
                let their_blockers = blocked_cells(board, opponent);
                let mut score = 100 * (theirs - mine) + 50 * (their_blockers - my_blockers);
                if board.is_goal_reached(maximizer) {
                    score += RACE_WIN_BONUS;
                }
                if board.is_goal_reached(opponent) {
                    score -= RACE_WIN_BONUS;
                }
                score
            }
        }
    }

    /// Value of a position where neither side can move.
    pub fn draw_value(&self) -> i32 {
        0
    }

    pub fn name(&self) -> &'static str {
        match self {
            Evaluation::Outcome => "outcome",
            Evaluation::Distance => "distance",
            Evaluation::Race => "race",
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Cells from just past the goal vehicle's leading end up to its edge, nearest first.
fn path_cells(board: &Board, player: Player) -> Vec<Cell> {
    let Some(id) = board.goal_vehicle(player) else {
        return Vec::new();
    };
    let (row, col) = board.vehicle(id).end();
    match player {
        Player::One => (col + 1..board.width()).map(|c| (row, c)).collect(),
        Player::Two => (row + 1..board.height()).map(|r| (r, col)).collect(),
    }
}

/// Cells the goal vehicle still has to cover to reach its edge. Zero when the goal vehicle
/// is absent or already home.
///
/// Player one measures to the right edge, player two to the bottom edge.
pub fn distance_to_goal(board: &Board, player: Player) -> i32 {
    path_cells(board, player).len() as i32
}

/// Distinct vehicles standing on the goal vehicle's path, nearest first.
pub fn blocking_vehicles(board: &Board, player: Player) -> Vec<VehicleId> {
    let mut blockers: Vec<VehicleId> = Vec::new();
    for (r, c) in path_cells(board, player) {
        if let Some(id) = board.vehicle_at(r, c) {
            if !blockers.contains(&id) {
                blockers.push(id);
            }
        }
    }
    blockers
}

/// Occupied cells on the goal vehicle's path.
pub fn blocked_cells(board: &Board, player: Player) -> i32 {
    path_cells(board, player)
        .into_iter()
        .filter(|&(r, c)| board.vehicle_at(r, c).is_some())
        .count() as i32
}

/// Summed length of the distinct vehicles on the goal vehicle's path.
pub fn blockers_total_size(board: &Board, player: Player) -> i32 {
    blocking_vehicles(board, player)
        .into_iter()
        .map(|id| board.vehicle(id).len() as i32)
        .sum()
}

/// Sum over the blocking vehicles of the fewest slides that take each one off the goal
/// vehicle's path.
///
/// A vehicle crossing the path can leave it on either side; the cheaper side that stays on
/// the board is used. A vehicle lying along the path can only shuffle along it, so it counts
/// one step per path cell it covers.
pub fn steps_to_clear_path(board: &Board, player: Player) -> i32 {
    let Some(goal) = board.goal_vehicle(player) else {
        return 0;
    };
    let (goal_row, goal_col) = board.vehicle(goal).end();
    let crossing = match player {
        Player::One => Orientation::Vertical,
        Player::Two => Orientation::Horizontal,
    };

    let mut steps = 0;
    for id in blocking_vehicles(board, player) {
        let vehicle = board.vehicle(id);
        let (start, end) = (vehicle.start(), vehicle.end());
        if vehicle.orientation() != crossing || vehicle.len() == 1 {
            steps += path_cells(board, player)
                .into_iter()
                .filter(|&(r, c)| board.vehicle_at(r, c) == Some(id))
                .count() as i32;
            continue;
        }
        steps += match player {
            Player::One => clearing_steps(start.0, end.0, goal_row, board.height()),
            Player::Two => clearing_steps(start.1, end.1, goal_col, board.width()),
        };
    }
    steps
}

// Slides for a vehicle spanning `lo..=hi` on its axis to stop covering `line`, on a board
// `extent` cells long along that axis.
fn clearing_steps(lo: usize, hi: usize, line: usize, extent: usize) -> i32 {
    let backward = hi - line + 1;
    let forward = line - lo + 1;
    let fits_backward = backward <= lo;
    let fits_forward = hi + forward < extent;
    let steps = match (fits_backward, fits_forward) {
        (true, false) => backward,
        (false, true) => forward,
        _ => backward.min(forward),
    };
    steps as i32
}
