use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{PipelineError, Result};
use crate::ml::forest::{ForestConfig, RandomForest};
use crate::ml::metrics::{evaluation_report, EvaluationReport};

use super::balance::{augment, needs_augmentation};

// ---------------------------------------------------------------------------
// Classifier trainer – subsample, split, fit, evaluate, diagnose
// ---------------------------------------------------------------------------

/// Training never looks at more rows than this; larger recordings are
/// uniformly subsampled to bound fitting cost.
pub const SUBSAMPLE_CAP: usize = 1000;

/// Share of rows held out for evaluation on the normal path.
pub const TEST_FRACTION: f64 = 0.3;

/// Fixed seed: re-running the pipeline on the same input must reproduce
/// the same subsample, split, noise, model, and metrics.
pub const PIPELINE_SEED: u64 = 42;

/// What the trainer can say about quality. The degenerate single-class
/// case has no defined precision/recall, only a warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TrainReport {
    SingleClass { warning: String },
    Evaluated(EvaluationReport),
}

/// A completed training run: the fitted model, the headline diagnosis
/// code for row 0, and the quality summary. One model serves both
/// evaluation and diagnosis.
#[derive(Debug)]
pub struct TrainOutcome {
    pub model: RandomForest,
    pub diagnosis_code: i64,
    pub report: TrainReport,
}

/// Fit the ensemble on a loaded dataset and produce the report.
///
/// Fails with `EmptyDataset` before any load, `MissingLabel` when the
/// tabular input lacked a `label` column. Otherwise:
/// * more than [`SUBSAMPLE_CAP`] rows ⇒ a seeded uniform subsample of
///   exactly that many rows (without replacement) is drawn first, the
///   same indices applied to features and labels;
/// * one distinct class ⇒ the balance guard fabricates a contrast class,
///   the model fits on the augmented set, and the diagnosis comes from
///   predicting the original (non-augmented) rows, flagged low-confidence;
/// * two or more classes ⇒ deterministic 70/30 split, fit on the train
///   partition, per-class metrics on the test partition, and the headline
///   diagnosis from row 0 of the full original feature table.
pub fn train(dataset: &Dataset) -> Result<TrainOutcome> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }
    let all_labels = dataset.labels.as_ref().ok_or(PipelineError::MissingLabel)?;

    let mut rng = ChaCha8Rng::seed_from_u64(PIPELINE_SEED);
    let picked = subsample_indices(dataset.n_rows(), SUBSAMPLE_CAP, &mut rng);
    let rows: Vec<Vec<f64>> = picked.iter().map(|&i| dataset.rows[i].clone()).collect();
    let labels: Vec<i64> = picked.iter().map(|&i| all_labels[i]).collect();
    log::info!(
        "training on {} of {} rows, {} features, classes {:?}",
        rows.len(),
        dataset.n_rows(),
        dataset.n_features(),
        dataset.distinct_labels()
    );

    let config = ForestConfig {
        seed: PIPELINE_SEED,
        ..ForestConfig::default()
    };

    if needs_augmentation(&labels) {
        log::warn!("only one class in the data; fabricating a contrast class");
        let (aug_rows, aug_labels) = augment(&rows, &labels, &mut rng);
        let model = RandomForest::fit(&aug_rows, &aug_labels, &config)?;
        let predictions = model.predict_many(&rows)?;
        return Ok(TrainOutcome {
            diagnosis_code: predictions[0],
            model,
            report: TrainReport::SingleClass {
                warning: "Warning: only one class present in the data; a synthetic \
                          contrast class was used for training. Low-confidence result."
                    .into(),
            },
        });
    }

    let (train_idx, test_idx) = split_indices(rows.len(), TEST_FRACTION, &mut rng);
    let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let train_labels: Vec<i64> = train_idx.iter().map(|&i| labels[i]).collect();
    let model = RandomForest::fit(&train_rows, &train_labels, &config)?;

    let test_rows: Vec<Vec<f64>> = test_idx.iter().map(|&i| rows[i].clone()).collect();
    let y_true: Vec<i64> = test_idx.iter().map(|&i| labels[i]).collect();
    let y_pred = model.predict_many(&test_rows)?;
    let report = evaluation_report(&y_true, &y_pred);

    // Headline diagnosis: row 0 of the full original table, not the split.
    let diagnosis_code = model.predict(&dataset.rows[0])?;

    Ok(TrainOutcome {
        model,
        diagnosis_code,
        report: TrainReport::Evaluated(report),
    })
}

/// Raw classifier output for one dataset row.
pub fn predict_row(model: &RandomForest, dataset: &Dataset, row_index: usize) -> Result<i64> {
    if dataset.n_features() != model.n_features() {
        return Err(PipelineError::Prediction(format!(
            "dataset has {} features, model expects {}",
            dataset.n_features(),
            model.n_features()
        )));
    }
    let row = dataset.row(row_index).ok_or_else(|| {
        PipelineError::Prediction(format!(
            "row {row_index} out of range ({} rows loaded)",
            dataset.n_rows()
        ))
    })?;
    model.predict(row)
}

/// Pick `cap` distinct row indices uniformly (partial Fisher–Yates),
/// returned sorted so row order is preserved downstream. Identity when
/// the dataset already fits the cap.
pub fn subsample_indices(n: usize, cap: usize, rng: &mut impl Rng) -> Vec<usize> {
    if n <= cap {
        return (0..n).collect();
    }
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..cap {
        let j = rng.gen_range(i..n);
        pool.swap(i, j);
    }
    let mut picked = pool[..cap].to_vec();
    picked.sort_unstable();
    picked
}

/// Deterministic shuffled 70/30 split (no stratification). The test
/// partition gets `ceil(n * test_fraction)` rows, capped so the train
/// partition is never empty.
pub fn split_indices(
    n: usize,
    test_fraction: f64,
    rng: &mut impl Rng,
) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..n).collect();
    // Fisher–Yates over the seeded stream.
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
    let n_test = ((n as f64 * test_fraction).ceil() as usize)
        .min(n.saturating_sub(1))
        .max(1);
    let test = order[..n_test].to_vec();
    let train = order[n_test..].to_vec();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::resolve;

    fn labeled(rows: Vec<Vec<f64>>, labels: Vec<i64>) -> Dataset {
        let names = (0..rows[0].len()).map(|i| format!("f{i}")).collect();
        Dataset::new(names, rows, Some(labels)).unwrap()
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let ds = Dataset::new(vec!["f0".into()], vec![], Some(vec![])).unwrap();
        assert!(matches!(train(&ds).unwrap_err(), PipelineError::EmptyDataset));
    }

    #[test]
    fn missing_label_column_is_rejected() {
        let ds = Dataset::new(vec!["f0".into()], vec![vec![1.0]], None).unwrap();
        assert!(matches!(train(&ds).unwrap_err(), PipelineError::MissingLabel));
    }

    #[test]
    fn single_class_input_takes_degenerate_path() {
        // 10 rows, all label 1: the end-to-end degenerate scenario.
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, (i * 2) as f64]).collect();
        let outcome = train(&labeled(rows, vec![1; 10])).unwrap();

        match &outcome.report {
            TrainReport::SingleClass { warning } => {
                assert!(warning.contains("only one class"));
            }
            TrainReport::Evaluated(_) => panic!("expected single-class warning"),
        }
        // Diagnosis resolves via the augmented fit; no table is produced.
        assert!((0..4).contains(&outcome.diagnosis_code));
        assert_ne!(resolve(outcome.diagnosis_code), "");
    }

    #[test]
    fn multi_class_input_produces_full_report() {
        // Three separable classes, well over the 6-row minimum.
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let jitter = i as f64 * 0.01;
            rows.push(vec![0.0 + jitter, 0.0]);
            labels.push(0);
            rows.push(vec![10.0 + jitter, 10.0]);
            labels.push(1);
            rows.push(vec![20.0 + jitter, 20.0]);
            labels.push(2);
        }
        let outcome = train(&labeled(rows, labels)).unwrap();

        let TrainReport::Evaluated(report) = &outcome.report else {
            panic!("expected evaluated report");
        };
        let classes: Vec<i64> = report.per_class.keys().copied().collect();
        assert_eq!(classes, vec![0, 1, 2]);
        for m in report.per_class.values() {
            assert!((0.0..=1.0).contains(&m.precision));
            assert!((0.0..=1.0).contains(&m.recall));
            assert!((0.0..=1.0).contains(&m.f1));
        }
        assert!((0..4).contains(&outcome.diagnosis_code));
        // Row 0 sits squarely in the class-0 cluster.
        assert_eq!(outcome.diagnosis_code, 0);
    }

    #[test]
    fn training_twice_reports_identical_metrics() {
        let rows: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![i as f64, (i % 7) as f64])
            .collect();
        let labels: Vec<i64> = (0..30).map(|i| i64::from(i >= 15)).collect();
        let ds = labeled(rows, labels);

        let a = train(&ds).unwrap();
        let b = train(&ds).unwrap();
        assert_eq!(a.diagnosis_code, b.diagnosis_code);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn subsample_caps_large_datasets() {
        let mut rng = ChaCha8Rng::seed_from_u64(PIPELINE_SEED);
        let picked = subsample_indices(5000, SUBSAMPLE_CAP, &mut rng);
        assert_eq!(picked.len(), 1000);
        // Without replacement and in row order.
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&i| i < 5000));
    }

    #[test]
    fn subsample_is_identity_under_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(PIPELINE_SEED);
        let picked = subsample_indices(500, SUBSAMPLE_CAP, &mut rng);
        assert_eq!(picked, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn split_partitions_are_disjoint_and_complete() {
        let mut rng = ChaCha8Rng::seed_from_u64(PIPELINE_SEED);
        let (train_idx, test_idx) = split_indices(10, TEST_FRACTION, &mut rng);
        assert_eq!(test_idx.len(), 3);
        assert_eq!(train_idx.len(), 7);
        let mut all: Vec<usize> = train_idx.iter().chain(&test_idx).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn predict_row_rejects_out_of_range_index() {
        let ds = labeled(vec![vec![0.0], vec![1.0]], vec![0, 1]);
        let outcome = train(&ds).unwrap();
        let err = predict_row(&outcome.model, &ds, 99).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
    }

    #[test]
    fn predict_row_rejects_feature_shape_mismatch() {
        let ds = labeled(vec![vec![0.0, 0.0], vec![1.0, 1.0]], vec![0, 1]);
        let outcome = train(&ds).unwrap();
        // A dataset loaded later with a different column count.
        let other = labeled(vec![vec![0.0, 0.0, 0.0]], vec![0]);
        let err = predict_row(&outcome.model, &other, 0).unwrap_err();
        match err {
            PipelineError::Prediction(msg) => {
                assert!(msg.contains("3 features"));
                assert!(msg.contains("expects 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
