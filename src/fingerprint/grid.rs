//! Spatial bucketing for neighbor-list construction.
//!
//! Divides space into uniform cubic cells so that candidate atom pairs can
//! be enumerated by scanning each cell against its 26 neighbors instead of
//! testing all O(n²) pairs. Distances are still checked exactly against the
//! per-pair cutoff by the caller; the grid only prunes.

use std::collections::HashMap;

/// Uniform-cell bucketing of atom positions.
#[derive(Debug)]
pub(crate) struct CellGrid {
    /// Inverse cell edge for coordinate-to-cell conversion.
    inv_edge: f64,
    /// Map from cell coordinates to atom indices.
    cells: HashMap<(i32, i32, i32), Vec<usize>>,
}

impl CellGrid {
    /// Buckets positions into cells of the given edge length.
    ///
    /// The edge should be at least the largest pair cutoff so that every
    /// true neighbor pair lands in adjacent cells.
    pub(crate) fn bucket(positions: &[[f64; 3]], edge: f64) -> Self {
        debug_assert!(edge > 0.0);
        let inv_edge = 1.0 / edge;
        let mut cells: HashMap<(i32, i32, i32), Vec<usize>> = HashMap::new();
        for (idx, pos) in positions.iter().enumerate() {
            cells
                .entry(Self::coords(pos, inv_edge))
                .or_default()
                .push(idx);
        }
        Self { inv_edge, cells }
    }

    fn coords(pos: &[f64; 3], inv_edge: f64) -> (i32, i32, i32) {
        (
            (pos[0] * inv_edge).floor() as i32,
            (pos[1] * inv_edge).floor() as i32,
            (pos[2] * inv_edge).floor() as i32,
        )
    }

    /// Enumerates candidate pairs `(i, j)` with `i < j` whose cells are
    /// identical or adjacent.
    ///
    /// Pairs are emitted in ascending `(i, j)` order so downstream results
    /// are deterministic regardless of hash iteration order.
    pub(crate) fn candidate_pairs(&self, positions: &[[f64; 3]]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (idx, pos) in positions.iter().enumerate() {
            let (cx, cy, cz) = Self::coords(pos, self.inv_edge);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        for &other in indices {
                            if other > idx {
                                pairs.push((idx, other));
                            }
                        }
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_no_pairs() {
        let positions: Vec<[f64; 3]> = vec![];
        let grid = CellGrid::bucket(&positions, 3.0);
        assert!(grid.candidate_pairs(&positions).is_empty());
    }

    #[test]
    fn close_pair_is_a_candidate() {
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let grid = CellGrid::bucket(&positions, 3.0);
        assert_eq!(grid.candidate_pairs(&positions), vec![(0, 1)]);
    }

    #[test]
    fn distant_pair_is_pruned() {
        let positions = vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
        let grid = CellGrid::bucket(&positions, 3.0);
        assert!(grid.candidate_pairs(&positions).is_empty());
    }

    #[test]
    fn boundary_straddling_pair_survives() {
        // Either side of a cell boundary; adjacency scan must still find it.
        let positions = vec![[2.99, 0.0, 0.0], [3.01, 0.0, 0.0]];
        let grid = CellGrid::bucket(&positions, 3.0);
        assert_eq!(grid.candidate_pairs(&positions), vec![(0, 1)]);
    }

    #[test]
    fn pairs_are_unique_and_ordered() {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let grid = CellGrid::bucket(&positions, 3.0);
        let pairs = grid.candidate_pairs(&positions);
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }
}
