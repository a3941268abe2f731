//! Fingerprints for finite particles (clusters, nanoparticles).
//!
//! Every feature maps one structure to a fixed-width vector; widths are
//! closed-form functions of the configuration and are exposed through
//! [`ParticleFingerprintGenerator::width`]. The generator owns a
//! neighbor-list cache keyed by structure identifier so repeated feature
//! calls on the same structure reuse the connectivity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use super::config::FingerprintConfig;
use super::error::Error;
use super::neighbors::NeighborList;
use crate::model::structure::Structure;

/// The closed catalogue of particle feature functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleFeature {
    /// Statistics of per-atom nearest-neighbor distances; width 4.
    NearestNeighbour,
    /// Per species pair, histogram of bond counts; width `c² · max_bonds`.
    BondCount,
    /// Per species, histogram of centroid distances; width `c · nbin`.
    Distribution,
    /// Per species, coordination-number histogram; width `c · max_bonds`.
    Connections,
    /// Density-normalized radial distribution function; width `⌈rdf_rmax / dx⌉`.
    Rdf,
}

impl ParticleFeature {
    /// Stable name used in diagnostics and descriptor columns.
    pub fn name(&self) -> &'static str {
        match self {
            ParticleFeature::NearestNeighbour => "nearestneighbour",
            ParticleFeature::BondCount => "bond_count",
            ParticleFeature::Distribution => "distribution",
            ParticleFeature::Connections => "connections",
            ParticleFeature::Rdf => "rdf",
        }
    }
}

/// Generator for particle-based fingerprints.
pub struct ParticleFingerprintGenerator {
    config: FingerprintConfig,
    nl_cache: RefCell<HashMap<String, Rc<NeighborList>>>,
}

impl std::fmt::Debug for ParticleFingerprintGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleFingerprintGenerator")
            .field("config", &self.config)
            .field("cached", &self.nl_cache.borrow().len())
            .finish()
    }
}

impl ParticleFingerprintGenerator {
    /// Creates a generator from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] or [`Error::Lookup`] for an invalid configuration.
    pub fn new(config: FingerprintConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            nl_cache: RefCell::new(HashMap::new()),
        })
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Declared vector width of a feature under this configuration.
    pub fn width(&self, feature: ParticleFeature) -> usize {
        let c = self.config.species_count();
        match feature {
            ParticleFeature::NearestNeighbour => 4,
            ParticleFeature::BondCount => c * c * self.config.max_bonds,
            ParticleFeature::Distribution => c * self.config.nbin,
            ParticleFeature::Connections => c * self.config.max_bonds,
            ParticleFeature::Rdf => (self.config.rdf_rmax / self.config.dx).ceil() as usize,
        }
    }

    /// Computes one feature vector for one structure.
    ///
    /// # Errors
    ///
    /// [`Error::SpeciesNotConfigured`] if the structure contains a species
    /// outside the configured list; [`Error::InsufficientGeometry`] for
    /// fewer than 2 atoms where connectivity is required;
    /// [`Error::MissingCell`] for [`ParticleFeature::Rdf`] on a
    /// non-periodic structure.
    pub fn compute(
        &self,
        feature: ParticleFeature,
        structure: &Structure,
    ) -> Result<Vec<f64>, Error> {
        self.check_species(structure)?;
        match feature {
            ParticleFeature::NearestNeighbour => self.nearest_neighbour(structure),
            ParticleFeature::BondCount => self.bond_count(structure),
            ParticleFeature::Distribution => self.distribution(structure),
            ParticleFeature::Connections => self.connections(structure),
            ParticleFeature::Rdf => self.rdf(structure),
        }
    }

    /// Drops every cached neighbor list.
    pub fn clear_cache(&self) {
        self.nl_cache.borrow_mut().clear();
    }

    /// Drops the cached neighbor list for one structure, if present.
    pub fn invalidate(&self, unique_id: &str) {
        self.nl_cache.borrow_mut().remove(unique_id);
    }

    /// Number of structures with a cached neighbor list.
    pub fn cached_count(&self) -> usize {
        self.nl_cache.borrow().len()
    }

    /// Returns the structure's neighbor list, building (or with `get_nl`,
    /// rebuilding) and caching it as needed.
    pub(crate) fn neighbor_list(&self, structure: &Structure) -> Result<Rc<NeighborList>, Error> {
        if !self.config.get_nl {
            if let Some(nl) = self.nl_cache.borrow().get(&structure.unique_id) {
                return Ok(Rc::clone(nl));
            }
        }
        debug!("building neighbor list for '{}'", structure.unique_id);
        let nl = Rc::new(NeighborList::build(structure, self.config.cutoff_scale)?);
        self.nl_cache
            .borrow_mut()
            .insert(structure.unique_id.clone(), Rc::clone(&nl));
        Ok(nl)
    }

    fn check_species(&self, structure: &Structure) -> Result<(), Error> {
        for atom in &structure.atoms {
            if !self.config.atom_numbers.contains(&atom.number) {
                return Err(Error::species_not_configured(
                    &structure.unique_id,
                    atom.number,
                ));
            }
        }
        Ok(())
    }

    /// Index of a species in the configured slot order.
    fn slot(&self, number: u8) -> usize {
        self.config
            .atom_numbers
            .iter()
            .position(|&n| n == number)
            .unwrap_or_default()
    }

    fn nearest_neighbour(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let n = structure.atom_count();
        if n < 2 {
            return Err(Error::insufficient_geometry(&structure.unique_id, n, 2));
        }
        let positions = structure.positions();
        let mut nn = Vec::with_capacity(n);
        for i in 0..n {
            let mut best = f64::INFINITY;
            for j in 0..n {
                if i != j {
                    best = best.min(dist(&positions[i], &positions[j]));
                }
            }
            nn.push(best);
        }
        let count = nn.len() as f64;
        let mean = nn.iter().sum::<f64>() / count;
        let var = nn.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count;
        let min = nn.iter().fold(f64::INFINITY, |m, d| m.min(*d));
        let max = nn.iter().fold(f64::NEG_INFINITY, |m, d| m.max(*d));
        Ok(vec![mean, var.sqrt(), min, max])
    }

    fn bond_count(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let nl = self.neighbor_list(structure)?;
        let c = self.config.species_count();
        let b = self.config.max_bonds;

        let mut hist = vec![0.0; c * c * b];
        let mut per_species = vec![0.0; c];
        for (i, atom) in structure.atoms.iter().enumerate() {
            let a = self.slot(atom.number);
            per_species[a] += 1.0;
            let mut counts = vec![0usize; c];
            for &(j, _) in &nl.neighbors[i] {
                counts[self.slot(structure.atoms[j].number)] += 1;
            }
            for (other, &count) in counts.iter().enumerate() {
                let bin = count.min(b - 1);
                hist[(a * c + other) * b + bin] += 1.0;
            }
        }
        // Fractions within each central-species block; empty species stay zero.
        for a in 0..c {
            if per_species[a] > 0.0 {
                for v in &mut hist[a * c * b..(a + 1) * c * b] {
                    *v /= per_species[a];
                }
            }
        }
        Ok(hist)
    }

    fn distribution(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let c = self.config.species_count();
        let nbin = self.config.nbin;
        let half = self.config.cell_size / 2.0;
        let width = half / nbin as f64;
        let centroid = structure.centroid();

        let mut hist = vec![0.0; c * nbin];
        let mut per_species = vec![0.0; c];
        for atom in &structure.atoms {
            let s = self.slot(atom.number);
            per_species[s] += 1.0;
            let d = dist(&atom.position, &centroid);
            let bin = ((d / width) as usize).min(nbin - 1);
            hist[s * nbin + bin] += 1.0;
        }
        for s in 0..c {
            if per_species[s] > 0.0 {
                for v in &mut hist[s * nbin..(s + 1) * nbin] {
                    *v /= per_species[s];
                }
            }
        }
        Ok(hist)
    }

    fn connections(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let nl = self.neighbor_list(structure)?;
        let c = self.config.species_count();
        let b = self.config.max_bonds;

        let mut hist = vec![0.0; c * b];
        let mut per_species = vec![0.0; c];
        for (i, atom) in structure.atoms.iter().enumerate() {
            let s = self.slot(atom.number);
            per_species[s] += 1.0;
            let bin = nl.coordination(i).min(b - 1);
            hist[s * b + bin] += 1.0;
        }
        for s in 0..c {
            if per_species[s] > 0.0 {
                for v in &mut hist[s * b..(s + 1) * b] {
                    *v /= per_species[s];
                }
            }
        }
        Ok(hist)
    }

    fn rdf(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        let volume = structure.volume().ok_or_else(|| Error::MissingCell {
            unique_id: structure.unique_id.clone(),
            feature: ParticleFeature::Rdf.name(),
        })?;
        let n = structure.atom_count();
        if n < 2 {
            return Err(Error::insufficient_geometry(&structure.unique_id, n, 2));
        }

        let dx = self.config.dx;
        let nbins = self.width(ParticleFeature::Rdf);
        let positions = structure.positions();

        let mut counts = vec![0.0; nbins];
        for i in 0..n {
            for j in (i + 1)..n {
                let bin = (dist(&positions[i], &positions[j]) / dx) as usize;
                if bin < nbins {
                    counts[bin] += 1.0;
                }
            }
        }
        // g(r) against the ideal-gas expectation for each spherical shell.
        let n_sq = (n * n) as f64;
        let g = counts
            .iter()
            .enumerate()
            .map(|(k, &count)| {
                let r0 = k as f64 * dx;
                let r1 = r0 + dx;
                let shell = 4.0 / 3.0 * std::f64::consts::PI * (r1.powi(3) - r0.powi(3));
                2.0 * count * volume / (n_sq * shell)
            })
            .collect();
        Ok(g)
    }
}

#[inline]
fn dist(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    fn config() -> FingerprintConfig {
        FingerprintConfig {
            atom_numbers: vec![78, 79],
            cell_size: 30.0,
            ..Default::default()
        }
    }

    // Pt-Au dimer at typical bond length (pair cutoff 3.264 Å at scale 1.2).
    fn dimer() -> Structure {
        Structure::new(
            vec![Atom::new(78, [0.0, 0.0, 0.0]), Atom::new(79, [2.7, 0.0, 0.0])],
            "dimer",
            -1.0,
        )
    }

    // 2x2x2 cubic chunk, alternating Pt/Au, 2.7 Å spacing.
    fn cluster() -> Structure {
        let mut atoms = Vec::new();
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    let number = if (x + y + z) % 2 == 0 { 78 } else { 79 };
                    atoms.push(Atom::new(
                        number,
                        [x as f64 * 2.7, y as f64 * 2.7, z as f64 * 2.7],
                    ));
                }
            }
        }
        Structure::new(atoms, "cluster-8", -3.2)
    }

    #[test]
    fn widths_follow_closed_forms() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        assert_eq!(gen.width(ParticleFeature::NearestNeighbour), 4);
        assert_eq!(gen.width(ParticleFeature::BondCount), 52);
        assert_eq!(gen.width(ParticleFeature::Distribution), 8);
        assert_eq!(gen.width(ParticleFeature::Connections), 26);
        assert_eq!(gen.width(ParticleFeature::Rdf), 20);
    }

    #[test]
    fn every_feature_matches_its_declared_width() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let s = cluster().with_cell([[5.4, 0.0, 0.0], [0.0, 5.4, 0.0], [0.0, 0.0, 5.4]]);
        for feature in [
            ParticleFeature::NearestNeighbour,
            ParticleFeature::BondCount,
            ParticleFeature::Distribution,
            ParticleFeature::Connections,
            ParticleFeature::Rdf,
        ] {
            let v = gen.compute(feature, &s).unwrap();
            assert_eq!(v.len(), gen.width(feature), "{}", feature.name());
        }
    }

    #[test]
    fn nearest_neighbour_of_dimer() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let v = gen.compute(ParticleFeature::NearestNeighbour, &dimer()).unwrap();
        assert!((v[0] - 2.7).abs() < 1e-12); // mean
        assert!(v[1].abs() < 1e-12); // std
        assert!((v[2] - 2.7).abs() < 1e-12); // min
        assert!((v[3] - 2.7).abs() < 1e-12); // max
    }

    #[test]
    fn bond_count_fractions_sum_per_pair_block() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let v = gen.compute(ParticleFeature::BondCount, &cluster()).unwrap();
        let b = gen.config().max_bonds;
        // Each (central, other) block is a distribution over bond counts.
        for block in 0..4 {
            let sum: f64 = v[block * b..(block + 1) * b].iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn connections_of_dimer() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let v = gen.compute(ParticleFeature::Connections, &dimer()).unwrap();
        let b = gen.config().max_bonds;
        // One Pt atom with exactly one bond; same for Au.
        assert!((v[1] - 1.0).abs() < 1e-12);
        assert!((v[b + 1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distribution_rows_are_normalized() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let v = gen.compute(ParticleFeature::Distribution, &cluster()).unwrap();
        let nbin = gen.config().nbin;
        for s in 0..2 {
            let sum: f64 = v[s * nbin..(s + 1) * nbin].iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rdf_requires_a_cell() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let result = gen.compute(ParticleFeature::Rdf, &cluster());
        assert!(matches!(result, Err(Error::MissingCell { .. })));
    }

    #[test]
    fn rdf_peaks_at_the_bond_length() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let s = dimer().with_cell([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]);
        let v = gen.compute(ParticleFeature::Rdf, &s).unwrap();
        // 2.7 Å lands in bin 13 at dx = 0.2; every other bin is empty.
        let peak = (2.7 / 0.2) as usize;
        assert!(v[peak] > 0.0);
        for (k, &g) in v.iter().enumerate() {
            if k != peak {
                assert_eq!(g, 0.0);
            }
        }
    }

    #[test]
    fn unconfigured_species_is_rejected() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let mut s = dimer();
        s.atoms.push(Atom::new(29, [10.0, 0.0, 0.0]));
        let result = gen.compute(ParticleFeature::NearestNeighbour, &s);
        assert!(matches!(
            result,
            Err(Error::SpeciesNotConfigured { number: 29, .. })
        ));
    }

    #[test]
    fn neighbor_list_is_cached_and_invalidated() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let s = cluster();
        gen.compute(ParticleFeature::BondCount, &s).unwrap();
        assert_eq!(gen.cached_count(), 1);
        gen.compute(ParticleFeature::Connections, &s).unwrap();
        assert_eq!(gen.cached_count(), 1);

        gen.invalidate("cluster-8");
        assert_eq!(gen.cached_count(), 0);

        gen.compute(ParticleFeature::Connections, &s).unwrap();
        assert_eq!(gen.cached_count(), 1);
        gen.clear_cache();
        assert_eq!(gen.cached_count(), 0);
    }

    #[test]
    fn single_atom_is_insufficient() {
        let gen = ParticleFingerprintGenerator::new(config()).unwrap();
        let lone = Structure::new(vec![Atom::new(78, [0.0, 0.0, 0.0])], "lone", 0.0);
        let result = gen.compute(ParticleFeature::NearestNeighbour, &lone);
        assert!(matches!(result, Err(Error::InsufficientGeometry { .. })));
    }
}
