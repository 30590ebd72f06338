//! Canonical board fingerprints and the per-search visited set.
//!
//! A board's fingerprint is the XOR of one random key per `(vehicle, start cell)` pair.
//! Vehicles never change identity or length, so two boards built from the same vehicles
//! have identical occupancy grids exactly when every vehicle sits at the same start cell,
//! and that is what the fingerprint captures. A one-cell slide changes a single start cell,
//! so the fingerprint is updated in O(1) by XOR-ing the old key out and the new key in.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Seed for the key table. Fixed so fingerprints are reproducible across runs.
pub const ZOBRIST_SEED: u64 = 514514;

/// Random keys indexed by vehicle and cell.
#[derive(Debug, PartialEq, Eq)]
pub struct ZobristKeys {
    cells: usize,
    keys: Vec<u64>,
}

impl ZobristKeys {
    /// Builds a key table for `vehicle_count` vehicles on a board with `cells` cells,
    /// using the fixed [`ZOBRIST_SEED`].
    pub fn new(vehicle_count: usize, cells: usize) -> Self {
        Self::with_seed(vehicle_count, cells, ZOBRIST_SEED)
    }

    /// Builds a key table from an explicit seed.
    pub fn with_seed(vehicle_count: usize, cells: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let keys = (0..vehicle_count * cells).map(|_| rng.gen::<u64>()).collect();
        ZobristKeys { cells, keys }
    }

    /// Returns the key for `vehicle` having its start at cell index `cell`.
    ///
    /// # Panics
    /// Panics if `vehicle` or `cell` is outside the table.
    pub fn key(&self, vehicle: usize, cell: usize) -> u64 {
        assert!(cell < self.cells, "cell index {} out of range", cell);
        self.keys[vehicle * self.cells + cell]
    }
}

/// Fingerprints seen during one search invocation.
///
/// Never shared between searches; each engine call creates its own.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<u64>,
}

impl VisitedSet {
    pub fn new() -> Self {
        VisitedSet::default()
    }

    /// Marks `fingerprint` as seen. Returns `true` if it was not seen before.
    pub fn insert(&mut self, fingerprint: u64) -> bool {
        self.seen.insert(fingerprint)
    }

    pub fn contains(&self, fingerprint: u64) -> bool {
        self.seen.contains(&fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic_for_a_seed() {
        let a = ZobristKeys::new(4, 36);
        let b = ZobristKeys::new(4, 36);
        assert_eq!(a, b);
        assert_ne!(a, ZobristKeys::with_seed(4, 36, 7));
    }

    #[test]
    fn test_keys_are_distinct_across_vehicles_and_cells() {
        let keys = ZobristKeys::new(3, 16);
        let mut seen = HashSet::new();
        for v in 0..3 {
            for c in 0..16 {
                assert!(seen.insert(keys.key(v, c)), "duplicate key for vehicle {} cell {}", v, c);
            }
        }
    }

    #[test]
    fn test_visited_set_insert_reports_novelty() {
        let mut visited = VisitedSet::new();
        assert_eq!(visited.len(), 0);
        assert!(visited.insert(42));
        assert!(!visited.insert(42));
        assert!(visited.contains(42));
        assert!(!visited.contains(43));
        assert_eq!(visited.len(), 1);
    }
}
