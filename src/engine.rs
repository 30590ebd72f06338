//! Core board model for Rush Hour.
//!
//! This module defines the game's fundamental components:
//! - `Vehicle`: a rigid occupant with a symbol, a start/end extent, an immovable flag, and an
//!   optional goal role. Its orientation is derived from its extent.
//! - `Move`: a one-cell slide of one vehicle along its own axis.
//! - `Board`: the occupancy grid plus the vehicle arena. It builds successor states and keeps
//!   an incrementally maintained fingerprint for duplicate detection.
use crate::error::BoardError;
use crate::zobrist::ZobristKeys;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A `(row, column)` coordinate, 0-based from the top-left corner.
pub type Cell = (usize, usize);

/// Axis a vehicle slides along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Start and end share a row; the vehicle slides left and right.
    Horizontal,
    /// Start and end share a column; the vehicle slides up and down.
    Vertical,
}

/// Direction of a one-cell slide along the vehicle's own axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Left for horizontal vehicles, up for vertical ones.
    Backward,
    /// Right for horizontal vehicles, down for vertical ones.
    Forward,
}

impl Direction {
    /// Both directions in move-generation order.
    pub const ALL: [Direction; 2] = [Direction::Backward, Direction::Forward];

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Backward => Direction::Forward,
            Direction::Forward => Direction::Backward,
        }
    }

    fn delta(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }

    /// Screen direction for a vehicle with the given orientation.
    ///
    /// ```
    /// use rush_hour_solver::engine::{Direction, Orientation};
    /// assert_eq!(Direction::Forward.label(Orientation::Horizontal), "right");
    /// assert_eq!(Direction::Backward.label(Orientation::Vertical), "up");
    /// ```
    pub fn label(self, orientation: Orientation) -> &'static str {
        match (orientation, self) {
            (Orientation::Horizontal, Direction::Backward) => "left",
            (Orientation::Horizontal, Direction::Forward) => "right",
            (Orientation::Vertical, Direction::Backward) => "up",
            (Orientation::Vertical, Direction::Forward) => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Backward => "backward",
            Direction::Forward => "forward",
        })
    }
}

/// One of the two racing sides.
///
/// Player one owns the `X` vehicle and races to the right edge. Player two owns `Y` and
/// races to the bottom edge. Single-player puzzles only use player one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Symbol of the player's goal vehicle in the textual layout.
    pub fn goal_symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'Y',
        }
    }

    fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player one (X)"),
            Player::Two => write!(f, "player two (Y)"),
        }
    }
}

/// A rigid vehicle occupying a straight run of cells.
///
/// `start` is always the top/left end. A single-cell vehicle has no axis of travel and is
/// only accepted when immovable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vehicle {
    symbol: char,
    start: Cell,
    end: Cell,
    immovable: bool,
    role: Option<Player>,
}

impl Vehicle {
    /// Creates a vehicle spanning `start..=end`.
    ///
    /// The two ends may be given in either order. Fails with `BoardError::Misaligned` if they
    /// do not share exactly one axis (a single-cell obstacle is the one exception).
    ///
    /// # Examples
    /// ```
    /// use rush_hour_solver::engine::{Orientation, Vehicle};
    /// let car = Vehicle::new('A', (2, 4), (2, 3), false, None).unwrap();
    /// assert_eq!(car.start(), (2, 3));
    /// assert_eq!(car.orientation(), Orientation::Horizontal);
    /// assert!(Vehicle::new('B', (0, 0), (1, 1), false, None).is_err());
    /// ```
    pub fn new(
        symbol: char,
        start: Cell,
        end: Cell,
        immovable: bool,
        role: Option<Player>,
    ) -> Result<Self, BoardError> {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let same_row = start.0 == end.0;
        let same_col = start.1 == end.1;
        let aligned = match (same_row, same_col) {
            (true, false) | (false, true) => true,
            (true, true) => immovable,
            (false, false) => false,
        };
        if !aligned {
            return Err(BoardError::Misaligned { symbol, start, end });
        }
        Ok(Vehicle {
            symbol,
            start,
            end,
            immovable,
            role,
        })
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn is_immovable(&self) -> bool {
        self.immovable
    }

    pub fn role(&self) -> Option<Player> {
        self.role
    }

    /// Orientation derived from the extent. Single-cell obstacles report `Horizontal`.
    pub fn orientation(&self) -> Orientation {
        if self.start.1 == self.end.1 && self.start.0 != self.end.0 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Number of cells the vehicle covers.
    pub fn len(&self) -> usize {
        match self.orientation() {
            Orientation::Horizontal => self.end.1 - self.start.1 + 1,
            Orientation::Vertical => self.end.0 - self.start.0 + 1,
        }
    }

    /// Cells covered by the vehicle, ordered from start to end.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        let (r, c) = self.start;
        match self.orientation() {
            Orientation::Horizontal => (0..self.len()).map(|i| (r, c + i)).collect(),
            Orientation::Vertical => (0..self.len()).map(|i| (r + i, c)).collect(),
        }
    }

    /// The cell a slide in `direction` would newly cover, in signed coordinates so that
    /// positions just off the grid are representable.
    pub fn leading_cell(&self, direction: Direction) -> (isize, isize) {
        let anchor = match direction {
            Direction::Backward => self.start,
            Direction::Forward => self.end,
        };
        let (r, c) = (anchor.0 as isize, anchor.1 as isize);
        match self.orientation() {
            Orientation::Horizontal => (r, c + direction.delta()),
            Orientation::Vertical => (r + direction.delta(), c),
        }
    }

    /// The cell a slide in `direction` would vacate.
    pub fn trailing_cell(&self, direction: Direction) -> Cell {
        match direction {
            Direction::Backward => self.end,
            Direction::Forward => self.start,
        }
    }
}

/// Stable index of a vehicle in a board's arena. Ids survive every successor state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(usize);

impl VehicleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single-cell slide of one vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub vehicle: VehicleId,
    pub direction: Direction,
}

impl Move {
    pub fn new(vehicle: VehicleId, direction: Direction) -> Self {
        Move { vehicle, direction }
    }

    /// The slide that undoes this one.
    pub fn reversed(self) -> Move {
        Move::new(self.vehicle, self.direction.reversed())
    }
}

// Per-vehicle data that never changes between states.
#[derive(Debug)]
struct VehicleSpec {
    symbol: char,
    len: usize,
    orientation: Orientation,
    immovable: bool,
    role: Option<Player>,
}

// Shared, read-only part of every board derived from the same initial layout.
#[derive(Debug)]
struct Fleet {
    specs: Vec<VehicleSpec>,
    goals: [Option<VehicleId>; 2],
    keys: ZobristKeys,
}

/// The game board: dimensions, occupancy grid and vehicle placements.
///
/// Vehicle records live in an arena shared by every board descending from the same initial
/// layout; a board only owns the start cell of each vehicle and the grid. Cloning a board
/// therefore copies two small vectors, and successors never alias their parent's grid.
///
/// Invariant: for every vehicle, the grid cells listed by its `occupied_cells` hold exactly
/// that vehicle's id and no other cell does.
#[derive(Clone, Debug)]
pub struct Board {
    height: usize,
    width: usize,
    fleet: Arc<Fleet>,
    starts: Vec<Cell>,
    grid: Vec<Option<VehicleId>>,
    fingerprint: u64,
}

impl Board {
    /// Builds a board from a validated vehicle list. Vehicle ids follow the list order.
    ///
    /// # Errors
    /// - `BoardError::DuplicateSymbol` if two vehicles share a symbol.
    /// - `BoardError::OutOfBounds` if a vehicle extends past the grid.
    /// - `BoardError::Overlap` if two vehicles claim the same cell.
    pub fn new(height: usize, width: usize, vehicles: Vec<Vehicle>) -> Result<Self, BoardError> {
        let mut symbols = HashSet::new();
        let mut grid: Vec<Option<VehicleId>> = vec![None; height * width];
        let mut goals = [None; 2];

        for (index, vehicle) in vehicles.iter().enumerate() {
            if !symbols.insert(vehicle.symbol) {
                return Err(BoardError::DuplicateSymbol(vehicle.symbol));
            }
            let id = VehicleId(index);
            for (r, c) in vehicle.occupied_cells() {
                if r >= height || c >= width {
                    return Err(BoardError::OutOfBounds {
                        symbol: vehicle.symbol,
                        row: r as isize,
                        col: c as isize,
                    });
                }
                let slot = &mut grid[r * width + c];
                if let Some(other) = *slot {
                    return Err(BoardError::Overlap {
                        first: vehicles[other.0].symbol,
                        second: vehicle.symbol,
                        row: r,
                        col: c,
                    });
                }
                *slot = Some(id);
            }
            if let Some(player) = vehicle.role {
                goals[player.index()] = Some(id);
            }
        }

        let keys = ZobristKeys::new(vehicles.len(), height * width);
        let fingerprint = vehicles
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, v)| acc ^ keys.key(i, v.start.0 * width + v.start.1));
        let specs = vehicles
            .iter()
            .map(|v| VehicleSpec {
                symbol: v.symbol,
                len: v.len(),
                orientation: v.orientation(),
                immovable: v.immovable,
                role: v.role,
            })
            .collect();

        Ok(Board {
            height,
            width,
            fleet: Arc::new(Fleet { specs, goals, keys }),
            starts: vehicles.iter().map(|v| v.start).collect(),
            grid,
            fingerprint,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether `(row, col)` lies on the grid. Accepts signed coordinates so callers can check
    /// one step past an edge.
    pub fn is_within_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Id of the vehicle covering `(row, col)`, if any.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    pub fn vehicle_at(&self, row: usize, col: usize) -> Option<VehicleId> {
        assert!(row < self.height && col < self.width, "cell ({}, {}) is off the board", row, col);
        self.grid[row * self.width + col]
    }

    /// Number of vehicles on the board.
    pub fn vehicle_count(&self) -> usize {
        self.starts.len()
    }

    /// Ids of every vehicle, in arena order.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> {
        (0..self.starts.len()).map(VehicleId)
    }

    /// Current placement of a vehicle.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this board's arena.
    pub fn vehicle(&self, id: VehicleId) -> Vehicle {
        let spec = &self.fleet.specs[id.0];
        let start = self.starts[id.0];
        let end = match spec.orientation {
            Orientation::Horizontal => (start.0, start.1 + spec.len - 1),
            Orientation::Vertical => (start.0 + spec.len - 1, start.1),
        };
        Vehicle {
            symbol: spec.symbol,
            start,
            end,
            immovable: spec.immovable,
            role: spec.role,
        }
    }

    /// Looks a vehicle up by symbol.
    pub fn find_vehicle(&self, symbol: char) -> Option<VehicleId> {
        self.fleet
            .specs
            .iter()
            .position(|s| s.symbol == symbol)
            .map(VehicleId)
    }

    /// The vehicle whose arrival decides `player`'s goal, if present.
    pub fn goal_vehicle(&self, player: Player) -> Option<VehicleId> {
        self.fleet.goals[player.index()]
    }

    /// The canonical fingerprint of the current occupancy.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Checks that `mv` is a legal slide on this board.
    pub fn check_move(&self, mv: Move) -> Result<(), BoardError> {
        if mv.vehicle.0 >= self.starts.len() {
            return Err(BoardError::UnknownVehicle(mv.vehicle.0));
        }
        let vehicle = self.vehicle(mv.vehicle);
        if vehicle.immovable {
            return Err(BoardError::Immovable(vehicle.symbol));
        }
        let (row, col) = vehicle.leading_cell(mv.direction);
        if !self.is_within_bounds(row, col) {
            return Err(BoardError::OutOfBounds {
                symbol: vehicle.symbol,
                row,
                col,
            });
        }
        let (row, col) = (row as usize, col as usize);
        if let Some(occupant) = self.grid[row * self.width + col] {
            return Err(BoardError::Collision {
                symbol: vehicle.symbol,
                occupant: self.fleet.specs[occupant.0].symbol,
                row,
                col,
            });
        }
        Ok(())
    }

    /// Returns a new board with `mv` applied. `self` is left untouched.
    ///
    /// # Errors
    /// `BoardError::OutOfBounds` or `BoardError::Collision` if the move is not legal. Engines
    /// only apply generated moves, so either indicates a caller bug.
    pub fn apply_move(&self, mv: Move) -> Result<Board, BoardError> {
        let mut next = self.clone();
        next.make_move(mv)?;
        Ok(next)
    }

    /// Applies `mv` in place. Paired with [`Board::unmake_move`] for tree search.
    pub fn make_move(&mut self, mv: Move) -> Result<(), BoardError> {
        self.check_move(mv)?;
        self.slide(mv);
        Ok(())
    }

    /// Reverts a move previously applied with [`Board::make_move`].
    pub fn unmake_move(&mut self, mv: Move) -> Result<(), BoardError> {
        self.make_move(mv.reversed())
    }

    /// Applies `moves` in order to a copy of this board.
    pub fn replay(&self, moves: &[Move]) -> Result<Board, BoardError> {
        let mut board = self.clone();
        for &mv in moves {
            board.make_move(mv)?;
        }
        Ok(board)
    }

    // Caller has already validated the move.
    fn slide(&mut self, mv: Move) {
        let vehicle = self.vehicle(mv.vehicle);
        let (lead_r, lead_c) = vehicle.leading_cell(mv.direction);
        let (trail_r, trail_c) = vehicle.trailing_cell(mv.direction);
        self.grid[trail_r * self.width + trail_c] = None;
        self.grid[lead_r as usize * self.width + lead_c as usize] = Some(mv.vehicle);

        let old_start = vehicle.start;
        let new_start = match (vehicle.orientation(), mv.direction) {
            (Orientation::Horizontal, Direction::Backward) => (old_start.0, old_start.1 - 1),
            (Orientation::Horizontal, Direction::Forward) => (old_start.0, old_start.1 + 1),
            (Orientation::Vertical, Direction::Backward) => (old_start.0 - 1, old_start.1),
            (Orientation::Vertical, Direction::Forward) => (old_start.0 + 1, old_start.1),
        };
        let keys = &self.fleet.keys;
        self.fingerprint ^= keys.key(mv.vehicle.0, old_start.0 * self.width + old_start.1);
        self.fingerprint ^= keys.key(mv.vehicle.0, new_start.0 * self.width + new_start.1);
        self.starts[mv.vehicle.0] = new_start;
    }

    /// Whether `player`'s goal vehicle has reached its edge: the right edge for player one,
    /// the bottom edge for player two. Returns `false` if the vehicle is absent.
    pub fn is_goal_reached(&self, player: Player) -> bool {
        let Some(id) = self.goal_vehicle(player) else {
            return false;
        };
        let end = self.vehicle(id).end;
        match player {
            Player::One => end.1 == self.width - 1,
            Player::Two => end.0 == self.height - 1,
        }
    }

    /// The first player (one before two) whose goal is reached.
    pub fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.is_goal_reached(p))
    }

    /// `(symbol, direction)` pair for reporting a move made on this board.
    pub fn label_move(&self, mv: Move) -> (char, Direction) {
        (self.fleet.specs[mv.vehicle.0].symbol, mv.direction)
    }

    /// Human-readable move, e.g. `"A down"`.
    pub fn describe_move(&self, mv: Move) -> String {
        let spec = &self.fleet.specs[mv.vehicle.0];
        format!("{} {}", spec.symbol, mv.direction.label(spec.orientation))
    }

    /// The layout as one string per row, `.` for empty cells.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|r| {
                (0..self.width)
                    .map(|c| match self.grid[r * self.width + c] {
                        Some(id) => self.fleet.specs[id.0].symbol,
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    /// Renders the board for a terminal, drawing `highlight`'s cells in inverse video.
    pub fn to_string_with_highlight(&self, highlight: Option<VehicleId>) -> String {
        let mut output = String::new();
        for r in 0..self.height {
            for c in 0..self.width {
                let cell = self.grid[r * self.width + c];
                let ch = cell.map_or('.', |id| self.fleet.specs[id.0].symbol);
                if cell.is_some() && cell == highlight {
                    output.push_str(&format!("\x1b[7m{}\x1b[m", ch));
                } else {
                    output.push(ch);
                }
            }
            if r < self.height - 1 {
                output.push('\n');
            }
        }
        output
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.height == other.height && self.width == other.width && self.grid == other.grid
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rows().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_str_array, GameMode};

    fn board(rows: &[&str]) -> Board {
        board_from_str_array(rows, GameMode::SinglePlayer).unwrap()
    }

    fn id(board: &Board, symbol: char) -> VehicleId {
        board.find_vehicle(symbol).unwrap()
    }

    fn assert_grid_consistent(board: &Board) {
        let mut covered = 0;
        for vid in board.vehicle_ids() {
            let v = board.vehicle(vid);
            for (r, c) in v.occupied_cells() {
                assert_eq!(board.vehicle_at(r, c), Some(vid), "cell ({}, {}) should hold '{}'", r, c, v.symbol());
                covered += 1;
            }
        }
        let occupied = (0..board.height())
            .flat_map(|r| (0..board.width()).map(move |c| (r, c)))
            .filter(|&(r, c)| board.vehicle_at(r, c).is_some())
            .count();
        assert_eq!(covered, occupied, "grid holds cells not owned by any vehicle");
    }

    #[test]
    fn test_vehicle_orientation_and_cells() {
        let h = Vehicle::new('A', (1, 1), (1, 3), false, None).unwrap();
        assert_eq!(h.orientation(), Orientation::Horizontal);
        assert_eq!(h.len(), 3);
        assert_eq!(h.occupied_cells(), vec![(1, 1), (1, 2), (1, 3)]);

        let v = Vehicle::new('B', (4, 0), (2, 0), false, None).unwrap();
        assert_eq!(v.orientation(), Orientation::Vertical);
        assert_eq!(v.start(), (2, 0), "ends are normalized to top/left first");
        assert_eq!(v.occupied_cells(), vec![(2, 0), (3, 0), (4, 0)]);
    }

    #[test]
    fn test_vehicle_misaligned_is_rejected() {
        let err = Vehicle::new('A', (0, 0), (2, 1), false, None).unwrap_err();
        assert!(matches!(err, BoardError::Misaligned { symbol: 'A', .. }));
    }

    #[test]
    fn test_single_cell_only_allowed_for_obstacles() {
        assert!(Vehicle::new('A', (0, 0), (0, 0), false, None).is_err());
        let rock = Vehicle::new('a', (0, 0), (0, 0), true, None).unwrap();
        assert_eq!(rock.occupied_cells(), vec![(0, 0)]);
    }

    #[test]
    fn test_leading_and_trailing_cells() {
        let v = Vehicle::new('A', (0, 2), (1, 2), false, None).unwrap();
        assert_eq!(v.leading_cell(Direction::Backward), (-1, 2));
        assert_eq!(v.leading_cell(Direction::Forward), (2, 2));
        assert_eq!(v.trailing_cell(Direction::Backward), (1, 2));
        assert_eq!(v.trailing_cell(Direction::Forward), (0, 2));
    }

    #[test]
    fn test_board_new_rejects_overlap() {
        let a = Vehicle::new('A', (0, 0), (0, 1), false, None).unwrap();
        let b = Vehicle::new('B', (0, 1), (1, 1), false, None).unwrap();
        let err = Board::new(3, 3, vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            BoardError::Overlap {
                first: 'A',
                second: 'B',
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn test_board_new_rejects_out_of_bounds_and_duplicates() {
        let a = Vehicle::new('A', (0, 1), (0, 3), false, None).unwrap();
        assert!(matches!(
            Board::new(3, 3, vec![a]),
            Err(BoardError::OutOfBounds { symbol: 'A', .. })
        ));

        let a1 = Vehicle::new('A', (0, 0), (0, 1), false, None).unwrap();
        let a2 = Vehicle::new('A', (2, 0), (2, 1), false, None).unwrap();
        assert_eq!(Board::new(3, 3, vec![a1, a2]).unwrap_err(), BoardError::DuplicateSymbol('A'));
    }

    #[test]
    fn test_is_within_bounds() {
        let b = board(&["XX.", "...", "..."]);
        assert!(b.is_within_bounds(0, 0));
        assert!(b.is_within_bounds(2, 2));
        assert!(!b.is_within_bounds(-1, 0));
        assert!(!b.is_within_bounds(0, 3));
        assert!(!b.is_within_bounds(3, 0));
    }

    #[test]
    fn test_apply_move_returns_independent_successor() {
        let parent = board(&["XX..", "A...", "A..."]);
        let x = id(&parent, 'X');
        let child = parent.apply_move(Move::new(x, Direction::Forward)).unwrap();

        assert_eq!(parent.to_rows(), vec!["XX..", "A...", "A..."]);
        assert_eq!(child.to_rows(), vec![".XX.", "A...", "A..."]);
        assert_eq!(child.vehicle(x).start(), (0, 1));
        assert_eq!(parent.vehicle(x).start(), (0, 0));
        assert_grid_consistent(&parent);
        assert_grid_consistent(&child);
    }

    #[test]
    fn test_apply_move_out_of_bounds_and_collision() {
        let b = board(&["XXA", "..A", "..."]);
        let x = id(&b, 'X');
        let a = id(&b, 'A');
        assert!(matches!(
            b.apply_move(Move::new(x, Direction::Backward)),
            Err(BoardError::OutOfBounds { symbol: 'X', row: 0, col: -1 })
        ));
        assert_eq!(
            b.apply_move(Move::new(x, Direction::Forward)).unwrap_err(),
            BoardError::Collision {
                symbol: 'X',
                occupant: 'A',
                row: 0,
                col: 2
            }
        );
        assert!(matches!(
            b.apply_move(Move::new(a, Direction::Backward)),
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_immovable_vehicle_cannot_move() {
        let b = board(&["XX..", "..a.", "..a."]);
        let rock = id(&b, 'a');
        assert_eq!(
            b.apply_move(Move::new(rock, Direction::Forward)).unwrap_err(),
            BoardError::Immovable('a')
        );
    }

    #[test]
    fn test_make_and_unmake_restore_state() {
        let mut b = board(&["XX..", "..A.", "..A.", "...."]);
        let original = b.clone();
        let mv = Move::new(id(&b, 'A'), Direction::Forward);
        b.make_move(mv).unwrap();
        assert_ne!(b, original);
        assert_ne!(b.fingerprint(), original.fingerprint());
        b.unmake_move(mv).unwrap();
        assert_eq!(b, original);
        assert_eq!(b.fingerprint(), original.fingerprint());
        assert_grid_consistent(&b);
    }

    #[test]
    fn test_fingerprint_matches_fresh_board_after_moves() {
        let start = board(&["XX..", "..A.", "..A.", "...."]);
        let a = id(&start, 'A');
        let moved = start
            .replay(&[
                Move::new(a, Direction::Forward),
                Move::new(a, Direction::Backward),
                Move::new(a, Direction::Forward),
            ])
            .unwrap();
        let fresh = board(&["XX..", "....", "..A.", "..A."]);
        assert_eq!(moved.to_rows(), fresh.to_rows());
        assert_eq!(moved.fingerprint(), fresh.fingerprint());
    }

    #[test]
    fn test_fingerprint_differs_for_different_occupancy() {
        let start = board(&["XX..", "..A.", "..A.", "...."]);
        let x = id(&start, 'X');
        let a = id(&start, 'A');
        let via_x = start.apply_move(Move::new(x, Direction::Forward)).unwrap();
        let via_a = start.apply_move(Move::new(a, Direction::Forward)).unwrap();
        assert_ne!(via_x.fingerprint(), via_a.fingerprint());
        assert_ne!(via_x.fingerprint(), start.fingerprint());
    }

    #[test]
    fn test_goal_reached_per_player() {
        let b = board_from_str_array(&["..XX", "Y...", "Y..."], GameMode::TwoPlayer).unwrap();
        assert!(b.is_goal_reached(Player::One));
        assert!(b.is_goal_reached(Player::Two));
        assert_eq!(b.winner(), Some(Player::One));

        let b = board_from_str_array(&["XX..", "Y...", "Y...", "...."], GameMode::TwoPlayer).unwrap();
        assert!(!b.is_goal_reached(Player::One));
        assert!(!b.is_goal_reached(Player::Two));
        assert_eq!(b.winner(), None);
    }

    #[test]
    fn test_goal_absent_vehicle_is_never_reached() {
        let b = board(&["XX..", "....", "...."]);
        assert!(!b.is_goal_reached(Player::Two));
        assert_eq!(b.goal_vehicle(Player::Two), None);
    }

    #[test]
    fn test_describe_and_label_move() {
        let b = board(&["XX..", "..A.", "..A."]);
        let a = id(&b, 'A');
        let mv = Move::new(a, Direction::Backward);
        assert_eq!(b.describe_move(mv), "A up");
        assert_eq!(b.label_move(mv), ('A', Direction::Backward));
    }

    #[test]
    fn test_display_and_highlight() {
        let b = board(&["XX.", "..."]);
        assert_eq!(format!("{}", b), "XX.\n...");
        let highlighted = b.to_string_with_highlight(b.find_vehicle('X'));
        assert!(highlighted.contains("\x1b[7mX\x1b[m"));
        assert_eq!(b.to_string_with_highlight(None), "XX.\n...");
    }

    #[test]
    fn test_board_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Board>();
    }
}
