use crate::engine::{Board, Cell, Player, Vehicle};
use crate::error::LoadError;
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// How goal vehicles are assigned when a layout is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum GameMode {
    /// Only `X` has a goal; `Y`, if present, is an ordinary vehicle.
    #[default]
    SinglePlayer,
    /// `X` races to the right edge and `Y` races to the bottom edge.
    TwoPlayer,
}

/// Parses an array of string slices into a `Board`.
///
/// Each string is one row, top row first. Every letter names a vehicle whose cells must
/// form one straight, contiguous run; `.` is an empty cell. Uppercase letters are movable
/// vehicles and lowercase letters are broken-down obstacles, which may be a single cell.
///
/// A trailing `\r` on each row and empty rows at the end of the layout are dropped, so a
/// file with CRLF line endings or a final newline loads as expected. Nothing else is
/// forgiven: a blank row inside the layout is a row of the wrong length, and any space is a
/// disallowed character.
///
/// # Arguments
/// * `rows`: the rows of the layout.
/// * `mode`: whether `Y` is player two's goal vehicle or an ordinary one.
///
/// # Returns
/// * `Ok(Board)` with vehicle ids assigned in symbol order.
/// * `Err(LoadError)` if:
///     - there are no rows (`Empty`),
///     - rows differ in length (`UnequalRows`),
///     - a character other than an ASCII letter or `.` appears (`DisallowedChar`),
///     - a letter's cells are scattered or bent (`Fragmented`),
///     - `X`, or `Y` in two-player mode, is missing (`MissingGoalVehicle`),
///     - a vehicle is otherwise invalid, e.g. a movable single cell (`Board`).
///
/// # Examples
/// ```
/// use rush_hour_solver::engine::Player;
/// use rush_hour_solver::utils::{board_from_str_array, GameMode};
///
/// let board = board_from_str_array(&["..A", "XXA", "..."], GameMode::SinglePlayer).unwrap();
/// assert_eq!((board.height(), board.width()), (3, 3));
/// assert!(board.goal_vehicle(Player::One).is_some());
///
/// assert!(board_from_str_array(&["XX", "A"], GameMode::SinglePlayer).is_err());
/// assert!(board_from_str_array(&["XX."], GameMode::TwoPlayer).is_err());
/// ```
pub fn board_from_str_array(rows: &[&str], mode: GameMode) -> Result<Board, LoadError> {
    let mut rows: Vec<&str> = rows
        .iter()
        .map(|&row| row.strip_suffix('\r').unwrap_or(row))
        .collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let width = rows[0].chars().count();
    let mut cells: BTreeMap<char, Vec<Cell>> = BTreeMap::new();
    for (r, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(LoadError::UnequalRows {
                row: r,
                expected: width,
                found,
            });
        }
        for (c, ch) in row.chars().enumerate() {
            match ch {
                '.' => {}
                ch if ch.is_ascii_alphabetic() => cells.entry(ch).or_default().push((r, c)),
                ch => return Err(LoadError::DisallowedChar { ch, row: r, col: c }),
            }
        }
    }

    for goal in required_goals(mode) {
        if !cells.contains_key(&goal.goal_symbol()) {
            return Err(LoadError::MissingGoalVehicle(goal.goal_symbol()));
        }
    }

    let mut vehicles = Vec::with_capacity(cells.len());
    for (symbol, run) in cells {
        // Cells were collected in row-major order, so the run's ends are its first and last.
        let (start, end) = (run[0], run[run.len() - 1]);
        if !is_straight_run(start, end, run.len()) {
            return Err(LoadError::Fragmented(symbol));
        }
        let role = match symbol {
            'X' => Some(Player::One),
            'Y' if mode == GameMode::TwoPlayer => Some(Player::Two),
            _ => None,
        };
        vehicles.push(Vehicle::new(symbol, start, end, symbol.is_ascii_lowercase(), role)?);
    }

    Ok(Board::new(rows.len(), width, vehicles)?)
}

/// Parses a whole layout held in one string, one row per line.
pub fn board_from_str(text: &str, mode: GameMode) -> Result<Board, LoadError> {
    let rows: Vec<&str> = text.lines().collect();
    board_from_str_array(&rows, mode)
}

/// Reads and parses a layout file.
///
/// # Errors
/// `LoadError::Io` if the file cannot be read, otherwise whatever [`board_from_str`] rejects.
pub fn load_board_file(path: &Path, mode: GameMode) -> Result<Board, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    board_from_str(&text, mode)
}

fn required_goals(mode: GameMode) -> &'static [Player] {
    match mode {
        GameMode::SinglePlayer => &[Player::One],
        GameMode::TwoPlayer => &[Player::One, Player::Two],
    }
}

// A run of `count` cells is straight and gap-free iff its ends share a row or column and
// the span between them covers exactly `count` cells.
fn is_straight_run(start: Cell, end: Cell, count: usize) -> bool {
    if start.0 == end.0 {
        end.1 - start.1 + 1 == count
    } else if start.1 == end.1 {
        end.0 - start.0 + 1 == count
    } else {
        false
    }
}
