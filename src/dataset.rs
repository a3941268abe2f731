//! Dataset partitioning: disjoint subset selection and k-fold splits.
//!
//! Selection is rank-based and deterministic: structures are ordered by a
//! caller-supplied scalar key, descending, with ties broken by original
//! order. The `taken` identifier set threads through successive selections
//! so repeated calls never hand out the same structure twice.

use std::collections::HashSet;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::model::structure::Structure;

/// Errors from dataset partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// More structures (or rows) were requested than remain available.
    #[error("requested {requested} structures but only {available} are available")]
    InsufficientData {
        /// How many were requested.
        requested: usize,
        /// How many remained.
        available: usize,
    },

    /// A split was requested with zero folds.
    #[error("nsplit must be at least 1")]
    EmptySplit,
}

/// A selected subset plus the identifiers it consumed.
#[derive(Debug, Clone)]
pub struct Subset {
    /// The selected structures, rank order.
    pub structures: Vec<Structure>,
    /// Identifiers excluded from further sampling.
    pub taken: HashSet<String>,
}

/// A training selection with its extracted target values.
#[derive(Debug, Clone)]
pub struct TrainSet {
    /// The selected structures, rank order.
    pub structures: Vec<Structure>,
    /// Target value per structure, parallel to `structures`.
    pub targets: Vec<f64>,
}

/// Indices of `structures` ordered by `key` descending, stable on ties.
fn ranked_indices<K>(structures: &[Structure], key: &K) -> Vec<usize>
where
    K: Fn(&Structure) -> f64,
{
    let mut indices: Vec<usize> = (0..structures.len()).collect();
    indices.sort_by(|&a, &b| {
        key(&structures[b])
            .partial_cmp(&key(&structures[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Selects the `size` top-ranked structures and records them as taken.
///
/// # Arguments
///
/// * `structures` — The labeled collection to sample from
/// * `size` — How many structures to select
/// * `key` — Scalar ranking key (higher ranks first)
///
/// # Errors
///
/// [`DatasetError::InsufficientData`] if fewer than `size` structures exist.
pub fn unique_subset<K>(
    structures: &[Structure],
    size: usize,
    key: K,
) -> Result<Subset, DatasetError>
where
    K: Fn(&Structure) -> f64,
{
    if structures.len() < size {
        return Err(DatasetError::InsufficientData {
            requested: size,
            available: structures.len(),
        });
    }
    let selected: Vec<Structure> = ranked_indices(structures, &key)
        .into_iter()
        .take(size)
        .map(|i| structures[i].clone())
        .collect();
    let taken = selected.iter().map(|s| s.unique_id.clone()).collect();
    Ok(Subset {
        structures: selected,
        taken,
    })
}

/// Selects `size` further top-ranked structures disjoint from `taken`,
/// extracting each selected structure's target via `key`.
///
/// # Errors
///
/// [`DatasetError::InsufficientData`] if fewer than `size` structures
/// remain outside `taken`.
pub fn train_subset<K>(
    structures: &[Structure],
    size: usize,
    taken: &HashSet<String>,
    key: K,
) -> Result<TrainSet, DatasetError>
where
    K: Fn(&Structure) -> f64,
{
    let selected: Vec<Structure> = ranked_indices(structures, &key)
        .into_iter()
        .filter(|&i| !taken.contains(&structures[i].unique_id))
        .take(size)
        .map(|i| structures[i].clone())
        .collect();
    if selected.len() < size {
        return Err(DatasetError::InsufficientData {
            requested: size,
            available: selected.len(),
        });
    }
    let targets = selected.iter().map(|s| key(s)).collect();
    Ok(TrainSet {
        structures: selected,
        targets,
    })
}

/// Splits a feature matrix into `nsplit` row groups for cross-validation.
///
/// Assignment is index-contiguous and deterministic: the first `rows %
/// nsplit` folds receive one extra row, so fold sizes differ by at most 1.
/// With `fix_size` every fold is truncated to exactly that many rows.
///
/// # Errors
///
/// [`DatasetError::EmptySplit`] for `nsplit == 0`;
/// [`DatasetError::InsufficientData`] if a fold would hold fewer than
/// `fix_size` rows.
pub fn k_fold(
    matrix: &DMatrix<f64>,
    nsplit: usize,
    fix_size: Option<usize>,
) -> Result<Vec<DMatrix<f64>>, DatasetError> {
    if nsplit == 0 {
        return Err(DatasetError::EmptySplit);
    }
    let rows = matrix.nrows();
    let base = rows / nsplit;
    let rem = rows % nsplit;

    if let Some(fix) = fix_size {
        if base < fix {
            return Err(DatasetError::InsufficientData {
                requested: fix,
                available: base,
            });
        }
    }

    let mut folds = Vec::with_capacity(nsplit);
    let mut start = 0;
    for i in 0..nsplit {
        let mut len = base + usize::from(i < rem);
        let full = len;
        if let Some(fix) = fix_size {
            len = fix;
        }
        folds.push(matrix.rows(start, len).into_owned());
        start += full;
    }
    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    fn collection(count: usize) -> Vec<Structure> {
        (0..count)
            .map(|i| {
                Structure::new(
                    vec![
                        Atom::new(78, [0.0, 0.0, 0.0]),
                        Atom::new(79, [2.7, 0.0, 0.0]),
                    ],
                    format!("cand-{i:03}"),
                    i as f64,
                )
            })
            .collect()
    }

    #[test]
    fn unique_subset_takes_top_ranked() {
        let all = collection(10);
        let subset = unique_subset(&all, 3, |s| s.score).unwrap();
        assert_eq!(subset.structures.len(), 3);
        assert_eq!(subset.taken.len(), 3);
        assert_eq!(subset.structures[0].unique_id, "cand-009");
        assert!(subset.taken.contains("cand-007"));
    }

    #[test]
    fn ties_break_by_original_order() {
        let mut all = collection(4);
        for s in &mut all {
            s.score = 1.0;
        }
        let subset = unique_subset(&all, 2, |s| s.score).unwrap();
        assert_eq!(subset.structures[0].unique_id, "cand-000");
        assert_eq!(subset.structures[1].unique_id, "cand-001");
    }

    #[test]
    fn train_subset_is_disjoint_from_taken() {
        let all = collection(10);
        let test = unique_subset(&all, 3, |s| s.score).unwrap();
        let train = train_subset(&all, 5, &test.taken, |s| s.score).unwrap();

        assert_eq!(train.structures.len(), 5);
        assert_eq!(train.targets.len(), 5);
        for s in &train.structures {
            assert!(!test.taken.contains(&s.unique_id));
        }
        // Union covers size + size distinct structures.
        let mut union: HashSet<&str> = test.taken.iter().map(String::as_str).collect();
        union.extend(train.structures.iter().map(|s| s.unique_id.as_str()));
        assert_eq!(union.len(), 8);
        // Targets follow the ranking key.
        assert_eq!(train.targets[0], 6.0);
    }

    #[test]
    fn selection_beyond_available_fails() {
        let all = collection(4);
        assert!(matches!(
            unique_subset(&all, 5, |s| s.score),
            Err(DatasetError::InsufficientData {
                requested: 5,
                available: 4
            })
        ));
        let test = unique_subset(&all, 3, |s| s.score).unwrap();
        assert!(matches!(
            train_subset(&all, 2, &test.taken, |s| s.score),
            Err(DatasetError::InsufficientData { .. })
        ));
    }

    #[test]
    fn k_fold_even_split() {
        let matrix = DMatrix::from_fn(50, 3, |r, c| (r * 3 + c) as f64);
        let folds = k_fold(&matrix, 5, None).unwrap();
        assert_eq!(folds.len(), 5);
        for fold in &folds {
            assert_eq!(fold.nrows(), 10);
        }
        // Concatenated folds reconstruct the input row count and content.
        assert_eq!(folds[0][(0, 0)], 0.0);
        assert_eq!(folds[4][(9, 2)], matrix[(49, 2)]);
    }

    #[test]
    fn k_fold_uneven_sizes_differ_by_at_most_one() {
        let matrix = DMatrix::from_element(52, 2, 1.0);
        let folds = k_fold(&matrix, 5, None).unwrap();
        let sizes: Vec<usize> = folds.iter().map(DMatrix::nrows).collect();
        assert_eq!(sizes, vec![11, 11, 10, 10, 10]);
        assert_eq!(sizes.iter().sum::<usize>(), 52);
    }

    #[test]
    fn k_fold_fix_size_truncates() {
        let matrix = DMatrix::from_element(50, 2, 1.0);
        let folds = k_fold(&matrix, 5, Some(5)).unwrap();
        assert_eq!(folds.len(), 5);
        for fold in &folds {
            assert_eq!(fold.nrows(), 5);
        }
    }

    #[test]
    fn k_fold_fix_size_beyond_fold_fails() {
        let matrix = DMatrix::from_element(10, 2, 1.0);
        assert!(matches!(
            k_fold(&matrix, 5, Some(3)),
            Err(DatasetError::InsufficientData {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn k_fold_rejects_zero_folds() {
        let matrix = DMatrix::from_element(10, 2, 1.0);
        assert!(matches!(k_fold(&matrix, 0, None), Err(DatasetError::EmptySplit)));
    }
}
