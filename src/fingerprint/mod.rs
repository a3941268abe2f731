//! Fingerprint generation: feature functions, generators, and the batch
//! aggregator.
//!
//! A [`FeatureFn`] names one feature function of one configured generator.
//! [`feature_matrix`] applies an ordered list of them to a batch of
//! structures and concatenates the resulting vectors per structure into one
//! matrix, preserving input order row for row.

mod config;
mod error;
mod grid;
mod neighbors;
mod particle;
mod standard;

pub use config::FingerprintConfig;
pub use error::Error;
pub use neighbors::{
    neighbor_features, neighbor_profile, NeighborList, DEFAULT_CUTOFF_SCALE, SHELLS,
    STATS_PER_SHELL,
};
pub use particle::{ParticleFeature, ParticleFingerprintGenerator};
pub use standard::{StandardFeature, StandardFingerprintGenerator};

use log::debug;
use nalgebra::DMatrix;

use crate::model::structure::Structure;

/// One feature function bound to its generator.
#[derive(Debug, Clone, Copy)]
pub enum FeatureFn<'a> {
    /// A particle-family feature.
    Particle(&'a ParticleFingerprintGenerator, ParticleFeature),
    /// A standard-family feature.
    Standard(&'a StandardFingerprintGenerator, StandardFeature),
}

impl FeatureFn<'_> {
    /// Declared vector width of this feature.
    pub fn width(&self) -> usize {
        match self {
            FeatureFn::Particle(gen, feature) => gen.width(*feature),
            FeatureFn::Standard(gen, feature) => gen.width(*feature),
        }
    }

    /// Stable feature name.
    pub fn name(&self) -> &'static str {
        match self {
            FeatureFn::Particle(_, feature) => feature.name(),
            FeatureFn::Standard(_, feature) => feature.name(),
        }
    }

    /// Computes the feature vector for one structure.
    pub fn compute(&self, structure: &Structure) -> Result<Vec<f64>, Error> {
        match self {
            FeatureFn::Particle(gen, feature) => gen.compute(*feature, structure),
            FeatureFn::Standard(gen, feature) => gen.compute(*feature, structure),
        }
    }
}

/// Applies every feature function to every structure and concatenates the
/// vectors per structure, in function order.
///
/// Row `i` of the result describes `structures[i]`; the column count is the
/// sum of the declared feature widths, plus one leading bias column of `1.0`
/// when `use_prior` is set.
///
/// # Errors
///
/// Any generator error aborts the whole batch; additionally
/// [`Error::VectorLengthMismatch`] if a feature vector disagrees with its
/// declared width. Nothing is ever truncated or padded.
pub fn feature_matrix(
    structures: &[Structure],
    functions: &[FeatureFn<'_>],
    use_prior: bool,
) -> Result<DMatrix<f64>, Error> {
    let prior = usize::from(use_prior);
    let width: usize = prior + functions.iter().map(FeatureFn::width).sum::<usize>();
    debug!(
        "generating {} x {} feature matrix from {} function(s)",
        structures.len(),
        width,
        functions.len()
    );

    let mut out = DMatrix::zeros(structures.len(), width);
    for (row, structure) in structures.iter().enumerate() {
        let mut col = 0;
        if use_prior {
            out[(row, 0)] = 1.0;
            col = 1;
        }
        for function in functions {
            let expected = function.width();
            let v = function.compute(structure)?;
            if v.len() != expected {
                return Err(Error::VectorLengthMismatch {
                    feature: function.name(),
                    expected,
                    got: v.len(),
                });
            }
            for (k, value) in v.iter().enumerate() {
                out[(row, col + k)] = *value;
            }
            col += expected;
        }
    }
    Ok(out)
}
