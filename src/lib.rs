//! A pure Rust library for atomistic machine-learning feature engineering.
//! It turns variable-size atomic structures into fixed-width numeric
//! fingerprint vectors, partitions labeled collections for cross-validation,
//! and catalogues the resulting descriptors in a durable SQLite-backed store.
//!
//! # Features
//!
//! - **Fingerprint generation** — Two generator families (particle-based and
//!   standard/bulk-based) with a closed catalogue of feature functions, each
//!   producing a vector of configuration-determined fixed width
//! - **Neighbor analysis** — Covalent-cutoff bonding, topological-shell
//!   statistics, and per-structure neighborhood summaries
//! - **Elemental data** — Tabulated masses, radii, electronegativities, and
//!   more, keyed by atomic number
//! - **Dataset partitioning** — Disjoint rank-based subset selection and
//!   deterministic k-fold splits
//! - **Descriptor store** — A flat key/row table mapping structure
//!   identifiers to feature values and targets, with column-wise queries and
//!   incremental column addition
//!
//! # Quick Start
//!
//! Configure the generators once, then aggregate any ordered list of feature
//! functions over a batch of structures with [`feature_matrix`]:
//!
//! ```
//! use atomfp::{Atom, Structure, FingerprintConfig};
//! use atomfp::{ParticleFingerprintGenerator, ParticleFeature};
//! use atomfp::{StandardFingerprintGenerator, StandardFeature};
//! use atomfp::{feature_matrix, FeatureFn};
//!
//! // A small batch of Pt/Au clusters from some structure search.
//! let structures: Vec<Structure> = (0..4)
//!     .map(|i| {
//!         let atoms = vec![
//!             Atom::new(78, [0.0, 0.0, 0.0]),
//!             Atom::new(79, [2.7, 0.0, 0.0]),
//!             Atom::new(78, [0.0, 2.7, 0.0]),
//!         ];
//!         Structure::new(atoms, format!("cand-{i}"), -(i as f64))
//!     })
//!     .collect();
//!
//! let config = FingerprintConfig {
//!     atom_numbers: vec![78, 79],
//!     ..Default::default()
//! };
//! let pfpv = ParticleFingerprintGenerator::new(config.clone())?;
//! let sfpv = StandardFingerprintGenerator::new(config)?;
//!
//! let matrix = feature_matrix(
//!     &structures,
//!     &[
//!         FeatureFn::Particle(&pfpv, ParticleFeature::NearestNeighbour),
//!         FeatureFn::Standard(&sfpv, StandardFeature::Mass),
//!         FeatureFn::Standard(&sfpv, StandardFeature::Composition),
//!     ],
//!     false,
//! )?;
//!
//! // One row per structure; 4 + 1 + 2 concatenated columns.
//! assert_eq!(matrix.shape(), (4, 7));
//! # Ok::<(), atomfp::FingerprintError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`periodic`] — Tabulated elemental properties
//! - [`store`] — The SQLite-backed descriptor table
//! - [`feature_matrix`] — Batch aggregation over feature functions
//! - [`FingerprintConfig`] — Shared generator configuration
//!
//! # Data Types
//!
//! ## Inputs
//!
//! - [`Structure`] — Atomic configuration with identifier and target label
//! - [`Atom`] — Single atom with atomic number and Cartesian coordinates
//!
//! ## Fingerprinting
//!
//! - [`ParticleFingerprintGenerator`] / [`ParticleFeature`] — Cluster features
//! - [`StandardFingerprintGenerator`] / [`StandardFeature`] — Bulk features
//! - [`FeatureFn`] — One feature function bound to its generator
//! - [`NeighborList`] — Covalent-cutoff connectivity
//!
//! ## Partitioning
//!
//! - [`Subset`] / [`TrainSet`] — Disjoint selections with taken-set tracking
//! - [`k_fold`] — Cross-validation row splits
//!
//! ## Persistence
//!
//! - [`DescriptorStore`] — Identifier-keyed feature/target table

mod dataset;
mod fingerprint;
mod model;

pub mod periodic;
pub mod store;

pub use model::atom::Atom;
pub use model::structure::Structure;

pub use fingerprint::{
    feature_matrix, neighbor_features, neighbor_profile, FeatureFn, FingerprintConfig,
    NeighborList, ParticleFeature, ParticleFingerprintGenerator, StandardFeature,
    StandardFingerprintGenerator, DEFAULT_CUTOFF_SCALE, SHELLS, STATS_PER_SHELL,
};

pub use fingerprint::Error as FingerprintError;

pub use dataset::{k_fold, train_subset, unique_subset, DatasetError, Subset, TrainSet};

pub use store::{DescriptorStore, StoreError, ID_COLUMN};

pub use periodic::{mendeleev_params, properties, PeriodicError};
