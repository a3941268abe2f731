//! Configuration for the fingerprint generators.
//!
//! One [`FingerprintConfig`] is shared by both generator families. It fixes
//! the species slots, the discretization of histogram-style features, the
//! bonding cutoff policy, and the neighbor-list refresh behavior. Vector
//! widths are closed-form functions of these settings, so a configuration
//! pins the width of every feature it can produce.

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::periodic;

/// Settings shared by the particle and standard fingerprint generators.
///
/// # Examples
///
/// ```
/// use atomfp::FingerprintConfig;
///
/// // Defaults with two species slots
/// let config = FingerprintConfig {
///     atom_numbers: vec![78, 79],
///     ..Default::default()
/// };
/// assert_eq!(config.max_bonds, 13);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Species (atomic numbers) that get per-species feature slots.
    ///
    /// Structures containing any other species are rejected. Accepts
    /// `atom_types` as an alias in TOML.
    #[serde(alias = "atom_types")]
    pub atom_numbers: Vec<u8>,

    /// Cap on bond-counting feature width: coordination numbers are clamped
    /// into `max_bonds` bins.
    pub max_bonds: usize,

    /// Refresh the cached neighbor list on every call instead of reusing it.
    pub get_nl: bool,

    /// Discretization step for the radial distribution function, in Ångströms.
    pub dx: f64,

    /// Extent of the centroid-distance histogram; bins span `[0, cell_size / 2]`.
    pub cell_size: f64,

    /// Bin count for the centroid-distance histogram.
    pub nbin: usize,

    /// Bonding tolerance: atoms are neighbors within
    /// `(rcov_i + rcov_j) * cutoff_scale`.
    pub cutoff_scale: f64,

    /// Range of the radial distribution function, in Ångströms.
    pub rdf_rmax: f64,

    /// Width of the eigenspectrum feature; structures with more atoms are
    /// rejected.
    pub max_atoms: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            atom_numbers: Vec::new(),
            max_bonds: 13,
            get_nl: false,
            dx: 0.2,
            cell_size: 50.0,
            nbin: 4,
            cutoff_scale: 1.2,
            rdf_rmax: 4.0,
            max_atoms: 100,
        }
    }
}

impl FingerprintConfig {
    /// Parses a configuration from TOML.
    ///
    /// Unspecified fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] if the TOML is malformed.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        Ok(toml::from_str(toml)?)
    }

    /// Number of configured species slots.
    #[inline]
    pub fn species_count(&self) -> usize {
        self.atom_numbers.len()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a species list is empty, a discretization
    /// parameter is non-positive, or a species has no tabulated data.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.atom_numbers.is_empty() {
            return Err(Error::Config("atom_numbers must not be empty".to_string()));
        }
        for &number in &self.atom_numbers {
            periodic::covalent_radius(number)?;
        }
        if self.max_bonds == 0 || self.nbin == 0 || self.max_atoms == 0 {
            return Err(Error::Config(
                "max_bonds, nbin, and max_atoms must be at least 1".to_string(),
            ));
        }
        if self.dx <= 0.0 || self.cell_size <= 0.0 || self.cutoff_scale <= 0.0 || self.rdf_rmax <= 0.0
        {
            return Err(Error::Config(
                "dx, cell_size, cutoff_scale, and rdf_rmax must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
