//! Error types for fingerprint generation.
//!
//! This module defines the error type used throughout the fingerprint module.
//! Errors are categorized by source: configuration parsing, geometry
//! requirements, species coverage, and vector-width contract violations.

use thiserror::Error;

use crate::periodic::PeriodicError;

/// Errors that can occur during fingerprint generation.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the fingerprint configuration TOML.
    #[error("failed to parse fingerprint configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration is internally inconsistent.
    #[error("invalid fingerprint configuration: {0}")]
    Config(String),

    /// A required geometric quantity is missing.
    ///
    /// Occurs when a feature needs the periodic cell (e.g. for density
    /// normalization) but the structure has none.
    #[error("structure '{unique_id}' has no unit cell but feature '{feature}' requires one")]
    MissingCell {
        /// Identifier of the offending structure.
        unique_id: String,
        /// The feature that needed the cell.
        feature: &'static str,
    },

    /// The structure contains a species outside the configured species list.
    ///
    /// No fallback policy exists; widen `atom_numbers` instead.
    #[error("structure '{unique_id}' contains species {number} not in the configured species list")]
    SpeciesNotConfigured {
        /// Identifier of the offending structure.
        unique_id: String,
        /// The unconfigured atomic number.
        number: u8,
    },

    /// The structure has too few atoms for neighbor analysis.
    #[error("structure '{unique_id}' has {found} atoms but at least {required} are required")]
    InsufficientGeometry {
        /// Identifier of the offending structure.
        unique_id: String,
        /// Atoms present.
        found: usize,
        /// Atoms required.
        required: usize,
    },

    /// The structure exceeds the configured eigenspectrum width.
    #[error("structure '{unique_id}' has {found} atoms, exceeding the configured maximum of {max}")]
    AtomCountExceeded {
        /// Identifier of the offending structure.
        unique_id: String,
        /// Atoms present.
        found: usize,
        /// Configured `max_atoms`.
        max: usize,
    },

    /// A feature function returned a vector of the wrong length.
    ///
    /// Widths are a hard contract; the aggregator aborts the whole batch
    /// rather than truncate or pad.
    #[error("feature '{feature}' returned a vector of length {got}, expected {expected}")]
    VectorLengthMismatch {
        /// The offending feature.
        feature: &'static str,
        /// Declared width.
        expected: usize,
        /// Observed width.
        got: usize,
    },

    /// Elemental property lookup failed.
    #[error("elemental property lookup failed: {0}")]
    Lookup(#[from] PeriodicError),
}

impl Error {
    /// Creates an [`InsufficientGeometry`](Error::InsufficientGeometry) error.
    pub(crate) fn insufficient_geometry(unique_id: &str, found: usize, required: usize) -> Self {
        Self::InsufficientGeometry {
            unique_id: unique_id.to_string(),
            found,
            required,
        }
    }

    /// Creates a [`SpeciesNotConfigured`](Error::SpeciesNotConfigured) error.
    pub(crate) fn species_not_configured(unique_id: &str, number: u8) -> Self {
        Self::SpeciesNotConfigured {
            unique_id: unique_id.to_string(),
            number,
        }
    }
}
