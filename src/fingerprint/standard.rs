//! Standard composition- and geometry-based fingerprints.
//!
//! These features apply to any structure, periodic or not, and depend only
//! on species composition and pair distances. Unlike the particle family
//! they need no connectivity, so the generator keeps no cache.

use nalgebra::DMatrix;

use super::config::FingerprintConfig;
use super::error::Error;
use crate::model::structure::Structure;
use crate::periodic;

/// The closed catalogue of standard feature functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFeature {
    /// Mean atomic mass; width 1.
    Mass,
    /// Atom fraction per configured species; width `c`.
    Composition,
    /// Zero-padded descending Coulomb-matrix eigenvalues; width `max_atoms`.
    Eigenspectrum,
    /// Mean and minimum interatomic distance; width 2.
    Distance,
}

impl StandardFeature {
    /// Stable name used in diagnostics and descriptor columns.
    pub fn name(&self) -> &'static str {
        match self {
            StandardFeature::Mass => "mass",
            StandardFeature::Composition => "composition",
            StandardFeature::Eigenspectrum => "eigenspectrum",
            StandardFeature::Distance => "distance",
        }
    }
}

/// Generator for standard fingerprints.
#[derive(Debug)]
pub struct StandardFingerprintGenerator {
    config: FingerprintConfig,
}

impl StandardFingerprintGenerator {
    /// Creates a generator from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] or [`Error::Lookup`] for an invalid configuration.
    pub fn new(config: FingerprintConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Declared vector width of a feature under this configuration.
    pub fn width(&self, feature: StandardFeature) -> usize {
        match feature {
            StandardFeature::Mass => 1,
            StandardFeature::Composition => self.config.species_count(),
            StandardFeature::Eigenspectrum => self.config.max_atoms,
            StandardFeature::Distance => 2,
        }
    }

    /// Computes one feature vector for one structure.
    ///
    /// # Errors
    ///
    /// [`Error::SpeciesNotConfigured`] for a species outside the configured
    /// list; [`Error::AtomCountExceeded`] when the structure is wider than
    /// `max_atoms` for [`StandardFeature::Eigenspectrum`];
    /// [`Error::InsufficientGeometry`] for [`StandardFeature::Distance`] on
    /// fewer than 2 atoms.
    pub fn compute(
        &self,
        feature: StandardFeature,
        structure: &Structure,
    ) -> Result<Vec<f64>, Error> {
        for atom in &structure.atoms {
            if !self.config.atom_numbers.contains(&atom.number) {
                return Err(Error::species_not_configured(
                    &structure.unique_id,
                    atom.number,
                ));
            }
        }
        match feature {
            StandardFeature::Mass => self.mass(structure),
            StandardFeature::Composition => self.composition(structure),
            StandardFeature::Eigenspectrum => self.eigenspectrum(structure),
            StandardFeature::Distance => self.distance(structure),
        }
    }

    fn mass(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let n = structure.atom_count().max(1) as f64;
        let total: f64 = structure
            .atoms
            .iter()
            .map(|a| periodic::atomic_mass(a.number))
            .sum::<Result<f64, _>>()?;
        Ok(vec![total / n])
    }

    fn composition(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let n = structure.atom_count().max(1) as f64;
        let mut fractions = vec![0.0; self.config.species_count()];
        for atom in &structure.atoms {
            let slot = self
                .config
                .atom_numbers
                .iter()
                .position(|&s| s == atom.number)
                .unwrap_or_default();
            fractions[slot] += 1.0;
        }
        for f in &mut fractions {
            *f /= n;
        }
        Ok(fractions)
    }

    fn eigenspectrum(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let n = structure.atom_count();
        let max = self.config.max_atoms;
        if n > max {
            return Err(Error::AtomCountExceeded {
                unique_id: structure.unique_id.clone(),
                found: n,
                max,
            });
        }
        if n < 2 {
            return Err(Error::insufficient_geometry(&structure.unique_id, n, 2));
        }

        let positions = structure.positions();
        let z: Vec<f64> = structure.atoms.iter().map(|a| f64::from(a.number)).collect();
        let coulomb = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.5 * z[i].powf(2.4)
            } else {
                z[i] * z[j] / dist(&positions[i], &positions[j])
            }
        });

        let mut eigenvalues: Vec<f64> = coulomb.symmetric_eigenvalues().iter().copied().collect();
        eigenvalues.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        eigenvalues.resize(max, 0.0);
        Ok(eigenvalues)
    }

    fn distance(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let n = structure.atom_count();
        if n < 2 {
            return Err(Error::insufficient_geometry(&structure.unique_id, n, 2));
        }
        let positions = structure.positions();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut pairs = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = dist(&positions[i], &positions[j]);
                sum += d;
                min = min.min(d);
                pairs += 1.0;
            }
        }
        Ok(vec![sum / pairs, min])
    }
}

#[inline]
fn dist(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
