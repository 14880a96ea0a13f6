use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{PipelineError, Result};

use super::tree::{DecisionTree, TreeConfig};

// ---------------------------------------------------------------------------
// Random forest – bagged CART trees with majority voting
// ---------------------------------------------------------------------------

/// Forest hyper-parameters. The defaults mirror the pipeline contract:
/// 100 trees, unbounded depth, fixed seed for reproducibility.
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// A fitted ensemble. Owned by the pipeline run that produced it and
/// superseded whenever training is re-invoked; never persisted.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit the ensemble: one bootstrap sample and one ChaCha8 stream per
    /// tree, both derived from the forest seed, so a given (data, config)
    /// pair always produces the same model. Single-threaded: the pipeline
    /// contract is synchronous request/response.
    pub fn fit(rows: &[Vec<f64>], labels: &[i64], config: &ForestConfig) -> Result<Self> {
        if rows.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        let n_features = rows[0].len();
        let tree_config = TreeConfig {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            n_feature_candidates: (n_features as f64).sqrt().ceil() as usize,
        };

        let n = rows.len();
        let mut trees = Vec::with_capacity(config.n_trees);
        for t in 0..config.n_trees {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(t as u64));
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(
                rows,
                labels,
                &bootstrap,
                &tree_config,
                &mut rng,
            ));
        }

        Ok(RandomForest { trees, n_features })
    }

    /// Majority vote over all trees; ties break toward the smallest label.
    pub fn predict(&self, row: &[f64]) -> Result<i64> {
        if row.len() != self.n_features {
            return Err(PipelineError::Prediction(format!(
                "row has {} features, model expects {}",
                row.len(),
                self.n_features
            )));
        }
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(row)).or_insert(0) += 1;
        }
        let mut best = (0i64, 0usize);
        for (&label, &count) in &votes {
            if count > best.1 {
                best = (label, count);
            }
        }
        Ok(best.0)
    }

    /// Predictions for a batch of rows.
    pub fn predict_many(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    /// Feature-vector length this model was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<i64>) {
        // Two well-separated clusters in 2-D.
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.1;
            rows.push(vec![0.0 + jitter, 0.0 + jitter]);
            labels.push(0);
            rows.push(vec![10.0 + jitter, 10.0 + jitter]);
            labels.push(1);
        }
        (rows, labels)
    }

    #[test]
    fn learns_separable_clusters() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, &ForestConfig::default()).unwrap();
        assert_eq!(forest.predict(&[0.2, 0.1]).unwrap(), 0);
        assert_eq!(forest.predict(&[9.8, 10.3]).unwrap(), 1);
    }

    #[test]
    fn fit_is_deterministic_for_fixed_seed() {
        let (rows, labels) = separable();
        let config = ForestConfig {
            n_trees: 10,
            ..ForestConfig::default()
        };
        let a = RandomForest::fit(&rows, &labels, &config).unwrap();
        let b = RandomForest::fit(&rows, &labels, &config).unwrap();
        let probe: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 0.7; 2]).collect();
        assert_eq!(a.predict_many(&probe).unwrap(), b.predict_many(&probe).unwrap());
    }

    #[test]
    fn empty_fit_is_rejected() {
        let err = RandomForest::fit(&[], &[], &ForestConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }

    #[test]
    fn shape_mismatch_is_prediction_error() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, &ForestConfig::default()).unwrap();
        let err = forest.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
    }
}
