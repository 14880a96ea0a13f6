use rand::Rng;

use crate::diagnosis::NUM_CLASSES;

// ---------------------------------------------------------------------------
// Class-balance guard – rescue the degenerate single-class training case
// ---------------------------------------------------------------------------

/// Standard deviation of the per-value Gaussian perturbation.
pub const NOISE_STD: f64 = 0.5;

/// True iff the dataset cannot support supervised discrimination:
/// fewer than two distinct label values.
pub fn needs_augmentation(labels: &[i64]) -> bool {
    match labels.first() {
        None => true,
        Some(first) => labels.iter().all(|l| l == first),
    }
}

/// Fabricate a second class so the classifier never receives a
/// single-class fit request (most ensembles reject that or produce
/// meaningless probabilities).
///
/// Every original row gets a perturbed copy (independent Gaussian noise,
/// mean 0, std `NOISE_STD`, per feature value) labeled
/// `(original_label + 1) mod NUM_CLASSES`, always distinct from the
/// real label. Originals come first, synthetics after, labels in the same
/// order. Callers must flag this as a low-confidence path.
pub fn augment(
    rows: &[Vec<f64>],
    labels: &[i64],
    rng: &mut impl Rng,
) -> (Vec<Vec<f64>>, Vec<i64>) {
    let synthetic_label = labels
        .first()
        .map_or(0, |l| (l + 1).rem_euclid(NUM_CLASSES));

    let mut out_rows = rows.to_vec();
    let mut out_labels = labels.to_vec();
    for row in rows {
        out_rows.push(row.iter().map(|v| v + gauss(rng, 0.0, NOISE_STD)).collect());
        out_labels.push(synthetic_label);
    }
    (out_rows, out_labels)
}

/// Box–Muller transform over two uniform draws.
pub fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
