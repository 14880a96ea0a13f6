// ---------------------------------------------------------------------------
// Dataset – the standardized in-memory table every format is reduced to
// ---------------------------------------------------------------------------

/// The uniform feature table produced by the loader.
///
/// Rows are samples (or epochs), columns are numeric features. The label
/// column, when the source carried one, is split out into `labels` so it
/// can never leak into the feature matrix.
///
/// Invariants maintained by the loader:
/// * every row has exactly `feature_names.len()` values;
/// * `labels`, when present, has one entry per row.
///
/// A new load replaces the whole value; there is no incremental merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Feature column names, in source order (excludes the label column).
    pub feature_names: Vec<String>,
    /// One feature vector per sample.
    pub rows: Vec<Vec<f64>>,
    /// Integer class label per sample. `None` when the source file had no
    /// `label` column; the trainer reports that case, not the loader.
    pub labels: Option<Vec<i64>>,
}

impl Dataset {
    /// Assemble a dataset, enforcing the constant-row-width invariant.
    /// Callers (the loaders) are expected to have produced rectangular data;
    /// this is the single choke point where it is checked.
    pub fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
        labels: Option<Vec<i64>>,
    ) -> crate::error::Result<Self> {
        let width = feature_names.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(crate::error::PipelineError::Parse(format!(
                    "row {i} has {} features, expected {width}",
                    row.len()
                )));
            }
        }
        if let Some(labels) = &labels {
            if labels.len() != rows.len() {
                return Err(crate::error::PipelineError::Parse(format!(
                    "{} labels for {} rows",
                    labels.len(),
                    rows.len()
                )));
            }
        }
        Ok(Dataset {
            feature_names,
            rows,
            labels,
        })
    }

    /// Number of samples.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns (label excluded).
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow one feature row.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Distinct label values, sorted. Empty when no label column exists.
    pub fn distinct_labels(&self) -> Vec<i64> {
        let mut seen: Vec<i64> = Vec::new();
        if let Some(labels) = &self.labels {
            for &l in labels {
                if !seen.contains(&l) {
                    seen.push(l);
                }
            }
        }
        seen.sort_unstable();
        seen
    }
}
