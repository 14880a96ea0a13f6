use std::collections::BTreeMap;

use rand::Rng;

// ---------------------------------------------------------------------------
// CART decision tree (Gini impurity)
// ---------------------------------------------------------------------------

/// Per-tree growth limits. The forest fills in `n_feature_candidates`
/// (√F, the usual classification default).
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub n_feature_candidates: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        label: i64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single classification tree over `f64` feature rows and `i64` labels.
/// Nodes live in a flat arena; index 0 is the root.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree on the rows selected by `indices` (bootstrap sample).
    /// `rng` drives the per-split feature subsampling.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[i64],
        indices: &[usize],
        config: &TreeConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut tree = DecisionTree { nodes: Vec::new() };
        tree.grow(rows, labels, indices, 0, config, rng);
        tree
    }

    /// Class prediction for one feature row.
    pub fn predict(&self, row: &[f64]) -> i64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Recursively grow the subtree for `indices`, returning its node index.
    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        labels: &[i64],
        indices: &[usize],
        depth: usize,
        config: &TreeConfig,
        rng: &mut impl Rng,
    ) -> usize {
        let counts = class_counts(labels, indices);
        let node_gini = gini(&counts, indices.len());

        let depth_capped = config.max_depth.is_some_and(|d| depth >= d);
        if node_gini == 0.0 || depth_capped || indices.len() < config.min_samples_split {
            return self.push_leaf(&counts);
        }

        let Some((feature, threshold)) =
            best_split(rows, labels, indices, node_gini, config, rng)
        else {
            return self.push_leaf(&counts);
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| rows[i][feature] <= threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return self.push_leaf(&counts);
        }

        // Reserve the split slot before recursing so children land after it.
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { label: 0 });
        let left = self.grow(rows, labels, &left_idx, depth + 1, config, rng);
        let right = self.grow(rows, labels, &right_idx, depth + 1, config, rng);
        self.nodes[at] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        at
    }

    fn push_leaf(&mut self, counts: &BTreeMap<i64, usize>) -> usize {
        self.nodes.push(Node::Leaf {
            label: majority(counts),
        });
        self.nodes.len() - 1
    }
}

fn class_counts(labels: &[i64], indices: &[usize]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &i in indices {
        *counts.entry(labels[i]).or_insert(0) += 1;
    }
    counts
}

/// Majority class; ties break toward the smallest label so a fitted tree
/// is deterministic regardless of insertion order.
fn majority(counts: &BTreeMap<i64, usize>) -> i64 {
    let mut best = (i64::MAX, 0usize);
    for (&label, &count) in counts {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}

fn gini(counts: &BTreeMap<i64, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Best `(feature, threshold)` among a random √F subset of features, or
/// `None` when no candidate improves on the node impurity.
fn best_split(
    rows: &[Vec<f64>],
    labels: &[i64],
    indices: &[usize],
    node_gini: f64,
    config: &TreeConfig,
    rng: &mut impl Rng,
) -> Option<(usize, f64)> {
    let n_features = rows[0].len();
    if n_features == 0 {
        return None;
    }
    let n_candidates = config.n_feature_candidates.clamp(1, n_features);
    let candidates = rand::seq::index::sample(rng, n_features, n_candidates);

    let n = indices.len() as f64;
    let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, impurity)

    for feature in candidates {
        // Sort the node's samples along this feature.
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left: BTreeMap<i64, usize> = BTreeMap::new();
        let mut right = class_counts(labels, indices);

        for w in 0..order.len() - 1 {
            let i = order[w];
            *left.entry(labels[i]).or_insert(0) += 1;
            if let Some(c) = right.get_mut(&labels[i]) {
                *c -= 1;
            }

            let (v, v_next) = (rows[i][feature], rows[order[w + 1]][feature]);
            if v == v_next {
                continue; // no threshold between equal values
            }
            let n_left = (w + 1) as f64;
            let n_right = n - n_left;
            let weighted = (n_left * gini(&left, w + 1)
                + n_right * gini(&right, order.len() - w - 1))
                / n;
            if weighted < best.map_or(node_gini - 1e-12, |(_, _, imp)| imp) {
                best = Some((feature, (v + v_next) / 2.0, weighted));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}
