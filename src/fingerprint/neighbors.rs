//! Neighbor analysis: cutoff bonding and local-environment statistics.
//!
//! Two atoms are bonded when their distance is within the sum of their
//! covalent radii scaled by a tolerance. The resulting [`NeighborList`] is
//! the intermediate every connectivity-based feature consumes; it is built
//! once per structure and cached by the generators, never stored on the
//! structure itself.

use nalgebra::DMatrix;

use super::error::Error;
use super::grid::CellGrid;
use crate::model::structure::Structure;
use crate::periodic;

/// Default bonding tolerance applied by the free-standing profile functions.
pub const DEFAULT_CUTOFF_SCALE: f64 = 1.2;

/// Topological shells summarized per atom.
pub const SHELLS: usize = 3;

/// Statistics emitted per shell (and per shell per property).
pub const STATS_PER_SHELL: usize = 5;

/// Cutoff-bonded connectivity of one structure.
#[derive(Debug, Clone)]
pub struct NeighborList {
    /// Per-atom bonded neighbors as `(index, distance)`, ascending by index.
    pub neighbors: Vec<Vec<(usize, f64)>>,
}

impl NeighborList {
    /// Builds the neighbor list for a structure.
    ///
    /// Atoms `i` and `j` are neighbors iff
    /// `d_ij <= (rcov_i + rcov_j) * cutoff_scale`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientGeometry`] for fewer than 2 atoms;
    /// [`Error::Lookup`] if an atom's species has no tabulated covalent
    /// radius.
    pub fn build(structure: &Structure, cutoff_scale: f64) -> Result<Self, Error> {
        let n = structure.atom_count();
        if n < 2 {
            return Err(Error::insufficient_geometry(&structure.unique_id, n, 2));
        }

        let positions = structure.positions();
        let radii = structure
            .atoms
            .iter()
            .map(|a| periodic::covalent_radius(a.number))
            .collect::<Result<Vec<_>, _>>()?;

        let max_cutoff = radii.iter().fold(0.0_f64, |m, r| m.max(*r)) * 2.0 * cutoff_scale;
        let grid = CellGrid::bucket(&positions, max_cutoff);

        let mut neighbors: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for (i, j) in grid.candidate_pairs(&positions) {
            let cutoff = (radii[i] + radii[j]) * cutoff_scale;
            let d = distance(&positions[i], &positions[j]);
            if d <= cutoff {
                neighbors[i].push((j, d));
                neighbors[j].push((i, d));
            }
        }
        for list in &mut neighbors {
            list.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        }

        Ok(Self { neighbors })
    }

    /// Number of atoms covered.
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Coordination number of one atom.
    #[inline]
    pub fn coordination(&self, atom: usize) -> usize {
        self.neighbors[atom].len()
    }

    /// Topological shells around one atom: `shells[s]` holds the atoms at
    /// graph distance `s + 1`, up to [`SHELLS`] deep.
    pub fn shells(&self, atom: usize) -> [Vec<usize>; SHELLS] {
        let n = self.neighbors.len();
        let mut depth = vec![usize::MAX; n];
        depth[atom] = 0;

        let mut shells: [Vec<usize>; SHELLS] = Default::default();
        let mut frontier = vec![atom];
        for s in 0..SHELLS {
            let mut next = Vec::new();
            for &u in &frontier {
                for &(v, _) in &self.neighbors[u] {
                    if depth[v] == usize::MAX {
                        depth[v] = s + 1;
                        next.push(v);
                    }
                }
            }
            next.sort_unstable();
            shells[s] = next.clone();
            frontier = next;
        }
        shells
    }
}

#[inline]
fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

/// Per-atom local-environment statistics.
///
/// Returns a matrix of shape `(num_atoms, k)` with
/// `k = SHELLS * STATS_PER_SHELL * (1 + properties.len())`. For each atom
/// and each topological shell the row holds
/// `[count, count / (N - 1), Σ 1/d, mean d, max d]` over the shell members
/// (geometric distances from the central atom), followed, for each requested
/// property, by `[Σ p, mean p, min p, max p, std p]` per shell. Empty shells
/// contribute zeros.
///
/// # Arguments
///
/// * `structure` — The structure to analyze
/// * `properties` — Elemental property names (see [`crate::periodic`])
///
/// # Errors
///
/// [`Error::InsufficientGeometry`] for fewer than 2 atoms; [`Error::Lookup`]
/// for an unrecognized property name or untabulated species.
pub fn neighbor_profile(structure: &Structure, properties: &[&str]) -> Result<DMatrix<f64>, Error> {
    let nl = NeighborList::build(structure, DEFAULT_CUTOFF_SCALE)?;
    profile_from_list(structure, &nl, properties)
}

/// Structure-level neighborhood summary: the column mean of
/// [`neighbor_profile`], length `15 * (1 + properties.len())`.
pub fn neighbor_features(structure: &Structure, properties: &[&str]) -> Result<Vec<f64>, Error> {
    let profile = neighbor_profile(structure, properties)?;
    Ok(column_means(&profile))
}

fn profile_from_list(
    structure: &Structure,
    nl: &NeighborList,
    properties: &[&str],
) -> Result<DMatrix<f64>, Error> {
    let n = structure.atom_count();
    let width = SHELLS * STATS_PER_SHELL * (1 + properties.len());

    // Resolve property values up front so a bad name fails before any work.
    let mut prop_values: Vec<Vec<f64>> = Vec::with_capacity(properties.len());
    for name in properties {
        let values = structure
            .atoms
            .iter()
            .map(|a| periodic::property(a.number, name))
            .collect::<Result<Vec<_>, _>>()?;
        prop_values.push(values);
    }

    let positions = structure.positions();
    let mut out = DMatrix::zeros(n, width);

    for atom in 0..n {
        let shells = nl.shells(atom);
        let mut col = 0;

        for shell in &shells {
            let count = shell.len() as f64;
            let dists: Vec<f64> = shell
                .iter()
                .map(|&j| distance(&positions[atom], &positions[j]))
                .collect();
            let (inv_sum, mean_d, max_d) = if dists.is_empty() {
                (0.0, 0.0, 0.0)
            } else {
                let inv: f64 = dists.iter().map(|d| 1.0 / d).sum();
                let mean = dists.iter().sum::<f64>() / count;
                let max = dists.iter().fold(0.0_f64, |m, d| m.max(*d));
                (inv, mean, max)
            };
            out[(atom, col)] = count;
            out[(atom, col + 1)] = count / (n as f64 - 1.0);
            out[(atom, col + 2)] = inv_sum;
            out[(atom, col + 3)] = mean_d;
            out[(atom, col + 4)] = max_d;
            col += STATS_PER_SHELL;
        }

        for values in &prop_values {
            for shell in &shells {
                if shell.is_empty() {
                    col += STATS_PER_SHELL;
                    continue;
                }
                let p: Vec<f64> = shell.iter().map(|&j| values[j]).collect();
                let count = p.len() as f64;
                let sum: f64 = p.iter().sum();
                let mean = sum / count;
                let min = p.iter().fold(f64::INFINITY, |m, v| m.min(*v));
                let max = p.iter().fold(f64::NEG_INFINITY, |m, v| m.max(*v));
                let var = p.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
                out[(atom, col)] = sum;
                out[(atom, col + 1)] = mean;
                out[(atom, col + 2)] = min;
                out[(atom, col + 3)] = max;
                out[(atom, col + 4)] = var.sqrt();
                col += STATS_PER_SHELL;
            }
        }
    }

    Ok(out)
}

fn column_means(matrix: &DMatrix<f64>) -> Vec<f64> {
    let rows = matrix.nrows().max(1) as f64;
    (0..matrix.ncols())
        .map(|c| matrix.column(c).sum() / rows)
        .collect()
}
