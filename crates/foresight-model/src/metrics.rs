//! Error metrics for regression evaluation.

/// Near-zero variance guard for the R² denominator.
const EPSILON: f64 = 1e-12;

/// Mean absolute error over paired observations and predictions.
pub fn mean_absolute_error(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    let total: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).abs())
        .sum();
    total / observed.len() as f64
}

/// Mean squared error over paired observations and predictions.
pub fn mean_squared_error(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    let total: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p) * (o - p))
        .sum();
    total / observed.len() as f64
}

/// Coefficient of determination.
///
/// A constant observed series has no variance to explain; the score is
/// 1.0 by convention in that case.
pub fn r2_score(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 1.0;
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let ss_tot: f64 = observed.iter().map(|o| (o - mean) * (o - mean)).sum();
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p) * (o - p))
        .sum();

    if ss_tot <= EPSILON {
        return 1.0;
    }
    1.0 - ss_res / ss_tot
}
