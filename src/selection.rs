//! Entry points
//!
//! [`select`] builds the configured objective over a dataset and runs the
//! greedy scheduler. The dataset is an n×d feature matrix, or the n×n
//! similarity matrix itself with [`SimilarityKernel::Precomputed`].
//!
//! [`SimilarityKernel::Precomputed`]: crate::matrix::SimilarityKernel::Precomputed

use crate::config::SelectionSpec;
use crate::errors::{Error, Result};
use crate::greedy::observer::{NoopObserver, SelectionObserver};
use crate::matrix::DenseMatrix;
use crate::objective::{FacilityLocation, FeatureBased, ObjectiveKind};
use crate::types::{Selection, SelectionConfig};

/// Select `config.k` rows of `dataset`.
///
/// ```
/// use rapid_subset::{select, DenseMatrix, ObjectiveKind, ConcaveTransform, SelectionConfig};
///
/// let data = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 4.0], [1.0, 1.0]]).unwrap();
/// let config = SelectionConfig::new(2, ObjectiveKind::feature_based(ConcaveTransform::Sqrt));
/// let selection = select(&data, &config).unwrap();
/// assert_eq!(selection.ranking, vec![1, 2]);
/// ```
pub fn select(dataset: &DenseMatrix, config: &SelectionConfig) -> Result<Selection> {
    select_observed(dataset, config, &mut NoopObserver)
}

/// [`select`] with an observer notified of phases and selections.
pub fn select_observed(
    dataset: &DenseMatrix,
    config: &SelectionConfig,
    observer: &mut impl SelectionObserver,
) -> Result<Selection> {
    if config.k > dataset.rows() {
        return Err(Error::config(format!(
            "cannot select {} items from {} rows",
            config.k,
            dataset.rows()
        )));
    }

    debug_event!(
        objective = config.objective.as_str(),
        rows = dataset.rows(),
        cols = dataset.cols(),
        k = config.k,
        n_greedy_samples = config.greedy_samples(),
        "starting selection"
    );

    let selector = config.selector();
    match &config.objective {
        ObjectiveKind::FacilityLocation { kernel } => {
            let objective = FacilityLocation::from_features(dataset, kernel)?;
            selector.run(&objective, observer)
        }
        ObjectiveKind::FeatureBased { transform } => {
            let objective = FeatureBased::new(dataset.clone(), transform.clone())?;
            selector.run(&objective, observer)
        }
    }
}

/// [`select`], also returning `labels` gathered in selection order.
///
/// `labels` must have one entry per row of `dataset`.
pub fn select_with_labels<T: Clone>(
    dataset: &DenseMatrix,
    labels: &[T],
    config: &SelectionConfig,
) -> Result<(Selection, Vec<T>)> {
    if labels.len() != dataset.rows() {
        return Err(Error::shape(format!(
            "{} labels for {} rows",
            labels.len(),
            dataset.rows()
        )));
    }
    let selection = select(dataset, config)?;
    let picked = selection.pick(labels)?;
    Ok((selection, picked))
}

/// [`select`] configured from a JSON [`SelectionSpec`].
pub fn select_from_spec(dataset: &DenseMatrix, spec_json: &str) -> Result<Selection> {
    let config = SelectionSpec::from_json(spec_json)?.to_config()?;
    select(dataset, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::greedy::observer::RecordingObserver;
    use crate::matrix::SimilarityKernel;
    use crate::objective::ConcaveTransform;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn precomputed(k: usize) -> SelectionConfig {
        SelectionConfig::new(k, ObjectiveKind::facility_location(SimilarityKernel::Precomputed))
    }

    fn random_rows(seed: u64, n: usize, d: usize) -> DenseMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..n * d).map(|_| rng.random_range(0.0..1.0)).collect();
        DenseMatrix::new(n, d, data).unwrap()
    }

    #[test]
    fn test_clusters_get_one_representative_each() {
        // {0, 1, 2} and {3, 4, 5}, strong inside, weak across
        let rows: Vec<Vec<f64>> = (0..6)
            .map(|i| {
                (0..6)
                    .map(|j| if i / 3 == j / 3 { 1.0 } else { 0.05 })
                    .collect()
            })
            .collect();
        let sim = DenseMatrix::from_rows(&rows).unwrap();
        let sel = select(&sim, &precomputed(2)).unwrap();
        assert_eq!(sel.len(), 2);
        assert_ne!(sel.ranking[0] / 3, sel.ranking[1] / 3);
    }

    #[test]
    fn test_pairs_tie_goes_to_lowest_index() {
        // With a zero diagonal the partner and the other pair gain equally
        // after the first pick.
        let sim = DenseMatrix::from_rows(&[
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ])
        .unwrap();
        let sel = select(&sim, &precomputed(2)).unwrap();
        assert_eq!(sel.ranking, vec![0, 1]);
        assert_eq!(sel.gains, vec![1.0, 1.0]);
    }

    #[test]
    fn test_dominant_column_wins_first() {
        let data = DenseMatrix::from_rows(&[[1.0, 0.1], [50.0, 0.2], [3.0, 0.3]]).unwrap();
        for transform in [
            ConcaveTransform::Sqrt,
            ConcaveTransform::Log1p,
            ConcaveTransform::Inverse,
        ] {
            let config = SelectionConfig::new(1, ObjectiveKind::feature_based(transform));
            assert_eq!(select(&data, &config).unwrap().ranking, vec![1]);
        }
    }

    #[test]
    fn test_k_equals_n_is_permutation() {
        let data = random_rows(1, 12, 3);
        for kernel in [
            SimilarityKernel::Correlation,
            SimilarityKernel::Cosine,
            SimilarityKernel::NegativeSquaredEuclidean,
        ] {
            let config = SelectionConfig::new(12, ObjectiveKind::facility_location(kernel));
            let mut ranking = select(&data, &config).unwrap().ranking;
            ranking.sort_unstable();
            assert_eq!(ranking, (0..12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_k_zero() {
        let data = random_rows(2, 5, 2);
        let sel = select(&data, &SelectionConfig::default().with_k(0)).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_k_above_rows_fails_before_building() {
        let data = random_rows(2, 5, 2);
        let err = select(&data, &SelectionConfig::default().with_k(6)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }

    #[test]
    fn test_negative_features_rejected() {
        let data = DenseMatrix::from_rows(&[[1.0, 2.0], [0.5, -0.1]]).unwrap();
        let config = SelectionConfig::new(1, ObjectiveKind::feature_based(ConcaveTransform::Sqrt));
        let err = select(&data, &config).unwrap_err();
        assert_eq!(
            err,
            Error::InputDomain {
                row: 1,
                col: 1,
                value: -0.1,
                reason: "is negative"
            }
        );
    }

    #[test]
    fn test_deterministic() {
        let data = random_rows(3, 40, 5);
        let config = SelectionConfig::default().with_k(10).with_greedy_samples(2);
        let a = select(&data, &config).unwrap();
        let b = select(&data, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lazy_matches_dense_end_to_end() {
        let data = random_rows(4, 60, 6);
        for objective in [
            ObjectiveKind::facility_location(SimilarityKernel::Cosine),
            ObjectiveKind::feature_based(ConcaveTransform::Sqrt),
        ] {
            let base = SelectionConfig::new(15, objective);
            let dense = select(&data, &base.clone().with_greedy_samples(15)).unwrap();
            let lazy = select(&data, &base.with_greedy_samples(0)).unwrap();
            assert_eq!(dense.ranking, lazy.ranking);
        }
    }

    #[test]
    fn test_custom_kernel_and_transform() {
        let data = random_rows(5, 20, 4);
        let kernel = SimilarityKernel::custom(|x: &DenseMatrix| {
            let n = x.rows();
            DenseMatrix::new(n, n, vec![1.0; n * n]).unwrap()
        });
        let sel = select(
            &data,
            &SelectionConfig::new(3, ObjectiveKind::facility_location(kernel)),
        )
        .unwrap();
        assert_eq!(sel.len(), 3);

        let cube_root = ConcaveTransform::custom(f64::cbrt);
        let sel = select(
            &data,
            &SelectionConfig::new(3, ObjectiveKind::feature_based(cube_root)),
        )
        .unwrap();
        for pair in sel.gains.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn test_log_transform_rejected_for_any_warm_start() {
        let data = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0], [0.0, 2.0]]).unwrap();
        for warm in [0, 2] {
            let log = ConcaveTransform::custom(f64::ln);
            let config = SelectionConfig::new(2, ObjectiveKind::feature_based(log))
                .with_greedy_samples(warm);
            let err = select(&data, &config).unwrap_err();
            assert_eq!(err.code(), ErrorCode::Configuration, "warm = {warm}");
        }
    }

    #[test]
    fn test_labels_follow_ranking() {
        let data = DenseMatrix::from_rows(&[[0.0, 1.0], [9.0, 0.0], [1.0, 1.0]]).unwrap();
        let labels = vec!["low", "high", "mid"];
        let config = SelectionConfig::new(2, ObjectiveKind::feature_based(ConcaveTransform::Sqrt));
        let (sel, picked) = select_with_labels(&data, &labels, &config).unwrap();
        assert_eq!(sel.ranking[0], 1);
        assert_eq!(picked[0], "high");
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_label_length_mismatch() {
        let data = random_rows(6, 4, 2);
        let err = select_with_labels(&data, &[1, 2, 3], &SelectionConfig::default().with_k(2))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputShape);
    }

    #[test]
    fn test_from_spec() {
        let data = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 4.0], [1.0, 1.0]]).unwrap();
        let sel = select_from_spec(
            &data,
            r#"{ "v": 1, "objective": "feature_based", "k": 2, "concave_transform": "sqrt" }"#,
        )
        .unwrap();
        assert_eq!(sel.ranking, vec![1, 2]);
    }

    #[test]
    fn test_from_spec_rejects_unknown_transform() {
        let data = random_rows(7, 4, 2);
        let err = select_from_spec(
            &data,
            r#"{ "v": 1, "objective": "feature_based", "concave_transform": "cube" }"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }

    #[test]
    fn test_observed_events_match_ranking() {
        let data = random_rows(8, 30, 4);
        let mut recorder = RecordingObserver::new();
        let config = SelectionConfig::default().with_k(6).with_greedy_samples(2);
        let sel = select_observed(&data, &config, &mut recorder).unwrap();
        let items: Vec<usize> = recorder.events().iter().map(|e| e.item).collect();
        assert_eq!(items, sel.ranking);
    }
}
