use super::atom::Atom;

/// An atomic configuration with its search metadata.
///
/// Atoms are ordered; the order is preserved by every fingerprint function
/// and by the aggregator's row ordering. The structure is read-only for the
/// purposes of fingerprinting — derived quantities such as neighbor lists
/// are cached outside the structure, keyed by [`unique_id`](Self::unique_id).
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Ordered atoms.
    pub atoms: Vec<Atom>,
    /// Periodic cell vectors, if the configuration is periodic.
    pub cell: Option<[[f64; 3]; 3]>,
    /// Unique identifier, e.g. from the upstream structure search.
    pub unique_id: String,
    /// Scalar target label (e.g. a relaxed energy score).
    pub score: f64,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>, unique_id: impl Into<String>, score: f64) -> Self {
        Self {
            atoms,
            cell: None,
            unique_id: unique_id.into(),
            score,
        }
    }

    pub fn with_cell(mut self, cell: [[f64; 3]; 3]) -> Self {
        self.cell = Some(cell);
        self
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.cell.is_some()
    }

    /// Atomic numbers in atom order.
    pub fn numbers(&self) -> Vec<u8> {
        self.atoms.iter().map(|a| a.number).collect()
    }

    /// Positions in atom order.
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Distinct species present, ascending.
    pub fn species(&self) -> Vec<u8> {
        let mut s = self.numbers();
        s.sort_unstable();
        s.dedup();
        s
    }

    /// Cell volume, if periodic.
    pub fn volume(&self) -> Option<f64> {
        self.cell.map(|c| {
            let cross = [
                c[1][1] * c[2][2] - c[1][2] * c[2][1],
                c[1][2] * c[2][0] - c[1][0] * c[2][2],
                c[1][0] * c[2][1] - c[1][1] * c[2][0],
            ];
            (c[0][0] * cross[0] + c[0][1] * cross[1] + c[0][2] * cross[2]).abs()
        })
    }

    /// Geometric centroid of the atom positions.
    pub fn centroid(&self) -> [f64; 3] {
        let n = self.atoms.len().max(1) as f64;
        let mut c = [0.0; 3];
        for atom in &self.atoms {
            c[0] += atom.position[0];
            c[1] += atom.position[1];
            c[2] += atom.position[2];
        }
        [c[0] / n, c[1] / n, c[2] / n]
    }
}
