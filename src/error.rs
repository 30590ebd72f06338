//! Error types for board construction, move application, and board loading.
//!
//! `BoardError` covers invariant violations inside the core: a vehicle whose ends do not
//! line up, two vehicles claiming the same cell, or a move that would leave the grid.
//! Search engines only apply moves produced by the move generator, so seeing one of these
//! after construction means an engine bug rather than bad user input.
//!
//! `LoadError` covers everything the text loader rejects before a `Board` ever exists.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or mutating a `Board`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Start and end do not share exactly one axis.
    #[error("vehicle '{symbol}' is misaligned: start {start:?} and end {end:?} must share exactly one row or column")]
    Misaligned {
        symbol: char,
        start: (usize, usize),
        end: (usize, usize),
    },

    /// A vehicle would occupy a cell outside the grid.
    #[error("vehicle '{symbol}' would leave the board at ({row}, {col})")]
    OutOfBounds { symbol: char, row: isize, col: isize },

    /// A slide targets a cell that is already taken.
    #[error("vehicle '{symbol}' cannot slide into ({row}, {col}), occupied by '{occupant}'")]
    Collision {
        symbol: char,
        occupant: char,
        row: usize,
        col: usize,
    },

    /// Two vehicles overlap at construction time.
    #[error("vehicles '{first}' and '{second}' overlap at ({row}, {col})")]
    Overlap {
        first: char,
        second: char,
        row: usize,
        col: usize,
    },

    /// The same symbol was given to more than one vehicle.
    #[error("vehicle symbol '{0}' is used more than once")]
    DuplicateSymbol(char),

    /// A move references a vehicle id the board does not have.
    #[error("no vehicle with id {0}")]
    UnknownVehicle(usize),

    /// An immovable vehicle was asked to move.
    #[error("vehicle '{0}' is broken down and cannot move")]
    Immovable(char),
}

/// Errors raised while turning a textual layout into a `Board`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read board file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the board layout is empty")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}; all rows must be the same length")]
    UnequalRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized character '{ch}' at row {row} col {col}; only letters and '.' are allowed")]
    DisallowedChar { ch: char, row: usize, col: usize },

    #[error("cells of vehicle '{0}' do not form a single straight run")]
    Fragmented(char),

    #[error("goal vehicle '{0}' is missing from the layout")]
    MissingGoalVehicle(char),

    #[error(transparent)]
    Board(#[from] BoardError),
}
