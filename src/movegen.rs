//! Legal-move generation.
//!
//! A move is legal when the single cell the vehicle would newly cover is on the board and
//! empty. Broken-down vehicles never move, and in a two-player race a side may not move the
//! opponent's goal vehicle.
//!
//! Moves come out in a fixed order: vehicles by the row-major position of their start cell,
//! and for each vehicle `Backward` before `Forward`. Searches break ties by this order, which
//! keeps their results reproducible.
use crate::engine::{Board, Direction, Move, Player, VehicleId};

/// Whose vehicles a move list is generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    /// Every movable vehicle (single-player/cooperative mode).
    Everyone,
    /// Every movable vehicle except the opponent's goal vehicle.
    Player(Player),
    /// A single vehicle.
    Vehicle(VehicleId),
}

impl Actor {
    fn admits(self, board: &Board, id: VehicleId) -> bool {
        match self {
            Actor::Everyone => true,
            Actor::Player(player) => board.vehicle(id).role() != Some(player.opponent()),
            Actor::Vehicle(only) => only == id,
        }
    }
}

/// Whether `id` can slide one cell in `direction`.
pub fn can_move(board: &Board, id: VehicleId, direction: Direction) -> bool {
    let vehicle = board.vehicle(id);
    if vehicle.is_immovable() {
        return false;
    }
    let (row, col) = vehicle.leading_cell(direction);
    board.is_within_bounds(row, col) && board.vehicle_at(row as usize, col as usize).is_none()
}

/// Enumerates every legal single-cell slide for `actor`, in deterministic order.
pub fn legal_moves(board: &Board, actor: Actor) -> Vec<Move> {
    let mut moves = Vec::new();
    for id in vehicles_in_scan_order(board) {
        if !actor.admits(board, id) {
            continue;
        }
        for direction in Direction::ALL {
            if can_move(board, id, direction) {
                moves.push(Move::new(id, direction));
            }
        }
    }
    moves
}

/// Whether `actor` has at least one legal move.
pub fn has_legal_move(board: &Board, actor: Actor) -> bool {
    vehicles_in_scan_order(board)
        .into_iter()
        .filter(|&id| actor.admits(board, id))
        .any(|id| Direction::ALL.iter().any(|&d| can_move(board, id, d)))
}

// Vehicles ordered by the row-major index of their start cell.
fn vehicles_in_scan_order(board: &Board) -> Vec<VehicleId> {
    let mut ids = Vec::with_capacity(board.vehicle_count());
    for r in 0..board.height() {
        for c in 0..board.width() {
            if let Some(id) = board.vehicle_at(r, c) {
                if board.vehicle(id).start() == (r, c) {
                    ids.push(id);
                }
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_str_array, GameMode};

    fn labelled(board: &Board, moves: &[Move]) -> Vec<String> {
        moves.iter().map(|&m| board.describe_move(m)).collect()
    }

    #[test]
    fn test_moves_require_empty_in_bounds_cell() {
        let board = board_from_str_array(&["XX.A", "...A", "...."], GameMode::SinglePlayer).unwrap();
        let moves = legal_moves(&board, Actor::Everyone);
        assert_eq!(labelled(&board, &moves), vec!["X right", "A down"]);
    }

    #[test]
    fn test_move_order_is_row_major_by_start_cell() {
        let board = board_from_str_array(
            &["..B.", "XXB.", "....", ".AA."],
            GameMode::SinglePlayer,
        )
        .unwrap();
        let moves = legal_moves(&board, Actor::Everyone);
        assert_eq!(
            labelled(&board, &moves),
            vec!["B down", "A left", "A right"],
            "B starts on row 0, X has no room, A starts on row 3"
        );
    }

    #[test]
    fn test_immovable_vehicles_never_move() {
        let board = board_from_str_array(&["XX..", "..b.", "..b.", "...."], GameMode::SinglePlayer).unwrap();
        let b = board.find_vehicle('b').unwrap();
        assert!(!can_move(&board, b, Direction::Forward));
        assert!(!can_move(&board, b, Direction::Backward));
        let moves = legal_moves(&board, Actor::Everyone);
        assert!(moves.iter().all(|m| m.vehicle != b));
        assert_eq!(labelled(&board, &moves), vec!["X right"]);
    }

    #[test]
    fn test_player_actor_excludes_opponent_goal_vehicle() {
        let board = board_from_str_array(&["Y...", "Y...", ".XX.", "...."], GameMode::TwoPlayer).unwrap();
        let one = labelled(&board, &legal_moves(&board, Actor::Player(Player::One)));
        let two = labelled(&board, &legal_moves(&board, Actor::Player(Player::Two)));
        assert_eq!(one, vec!["X left", "X right"]);
        assert_eq!(two, vec!["Y down"]);
        let everyone = labelled(&board, &legal_moves(&board, Actor::Everyone));
        assert_eq!(everyone, vec!["Y down", "X left", "X right"]);
    }

    #[test]
    fn test_single_vehicle_actor() {
        let board = board_from_str_array(&["XX..", "..A.", "..A.", "...."], GameMode::SinglePlayer).unwrap();
        let a = board.find_vehicle('A').unwrap();
        let moves = legal_moves(&board, Actor::Vehicle(a));
        assert_eq!(labelled(&board, &moves), vec!["A up", "A down"]);
    }

    #[test]
    fn test_deadlocked_board_has_no_moves() {
        let board = board_from_str_array(&["XXA", "BBA"], GameMode::SinglePlayer).unwrap();
        assert!(legal_moves(&board, Actor::Everyone).is_empty());
        assert!(!has_legal_move(&board, Actor::Everyone));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let board = board_from_str_array(
            &["AA.B..", "...B..", "XX.B..", "..CCC.", "D.....", "D..EE."],
            GameMode::SinglePlayer,
        )
        .unwrap();
        assert_eq!(legal_moves(&board, Actor::Everyone), legal_moves(&board, Actor::Everyone));
        assert!(has_legal_move(&board, Actor::Everyone));
    }
}
