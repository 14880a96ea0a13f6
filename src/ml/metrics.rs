use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// EvaluationReport – per-class quality summary over a test partition
// ---------------------------------------------------------------------------

/// Precision / recall / F1 / support for one class (or aggregate row).
/// Ratios are stored already rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// The per-class quality summary, shaped like sklearn's
/// `classification_report`: one row per label observed in truth or
/// prediction, plus accuracy and macro / weighted averages.
/// Produced only when at least two real classes exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub per_class: BTreeMap<i64, ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Build the report from parallel truth/prediction vectors.
/// Zero-division (a class never predicted, or absent from the truth) is
/// treated as 0 rather than an error.
pub fn evaluation_report(y_true: &[i64], y_pred: &[i64]) -> EvaluationReport {
    debug_assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len();

    let mut labels: Vec<i64> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    let mut per_class = BTreeMap::new();
    let mut correct = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t == p {
            correct += 1;
        }
    }

    // Unrounded per-class figures feed the aggregates before rounding.
    let mut raw: Vec<(i64, f64, f64, f64, usize)> = Vec::with_capacity(labels.len());
    for &label in &labels {
        let tp = y_true
            .iter()
            .zip(y_pred)
            .filter(|(&t, &p)| t == label && p == label)
            .count();
        let predicted = y_pred.iter().filter(|&&p| p == label).count();
        let support = y_true.iter().filter(|&&t| t == label).count();

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        raw.push((label, precision, recall, f1, support));
    }

    let k = raw.len() as f64;
    let macro_avg = aggregate(&raw, n, |_| 1.0 / k);
    let weighted_avg = aggregate(&raw, n, |support| support as f64 / n.max(1) as f64);

    for (label, precision, recall, f1, support) in raw {
        per_class.insert(
            label,
            ClassMetrics {
                precision: round2(precision),
                recall: round2(recall),
                f1: round2(f1),
                support,
            },
        );
    }

    EvaluationReport {
        per_class,
        accuracy: round2(ratio(correct, n)),
        macro_avg,
        weighted_avg,
    }
}

fn aggregate(
    raw: &[(i64, f64, f64, f64, usize)],
    total: usize,
    weight: impl Fn(usize) -> f64,
) -> ClassMetrics {
    let mut metrics = ClassMetrics {
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
        support: total,
    };
    for &(_, precision, recall, f1, support) in raw {
        let w = weight(support);
        metrics.precision += w * precision;
        metrics.recall += w * recall;
        metrics.f1 += w * f1;
    }
    metrics.precision = round2(metrics.precision);
    metrics.recall = round2(metrics.recall);
    metrics.f1 = round2(metrics.f1);
    metrics
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (label, m) in &self.per_class {
            writeln!(
                f,
                "{label:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{name:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
