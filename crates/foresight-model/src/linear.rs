//! Least-squares linear regressor over the hourly features.

use crate::dataset::{FeatureRow, FEATURE_COUNT};

/// Pivots below this are treated as singular directions.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Linear regressor fit by ordinary least squares on centered features.
///
/// Centering is load-bearing: epoch-ms feature values are around 1e12 and
/// would swamp the calendar features in the normal equations otherwise.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: [f64; FEATURE_COUNT],
    feature_means: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearRegressor {
    /// Fit on feature rows and their targets.
    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Self {
        let n = rows.len();
        let mut feature_means = [0.0; FEATURE_COUNT];
        if n == 0 {
            return Self {
                coefficients: [0.0; FEATURE_COUNT],
                feature_means,
                intercept: 0.0,
            };
        }

        for row in rows {
            for k in 0..FEATURE_COUNT {
                feature_means[k] += row[k];
            }
        }
        for mean in &mut feature_means {
            *mean /= n as f64;
        }
        let intercept = targets.iter().sum::<f64>() / n as f64;

        let mut normal = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
        let mut moments = [0.0; FEATURE_COUNT];
        for (row, &y) in rows.iter().zip(targets) {
            let mut centered = [0.0; FEATURE_COUNT];
            for k in 0..FEATURE_COUNT {
                centered[k] = row[k] - feature_means[k];
            }
            for j in 0..FEATURE_COUNT {
                for k in 0..FEATURE_COUNT {
                    normal[j][k] += centered[j] * centered[k];
                }
                moments[j] += centered[j] * (y - intercept);
            }
        }

        Self {
            coefficients: solve_normal_equations(normal, moments),
            feature_means,
            intercept,
        }
    }

    /// Predicted target for one feature row.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let mut y = self.intercept;
        for k in 0..FEATURE_COUNT {
            y += self.coefficients[k] * (row[k] - self.feature_means[k]);
        }
        y
    }
}

/// Solve the 3x3 normal equations by Gauss-Jordan elimination with partial
/// pivoting. A near-zero pivot marks a singular direction (for example a
/// constant weekend column) and leaves that coefficient at zero.
fn solve_normal_equations(
    mut a: [[f64; FEATURE_COUNT]; FEATURE_COUNT],
    mut b: [f64; FEATURE_COUNT],
) -> [f64; FEATURE_COUNT] {
    let mut pivot_row_of: [Option<usize>; FEATURE_COUNT] = [None; FEATURE_COUNT];
    let mut row_used = [false; FEATURE_COUNT];

    for col in 0..FEATURE_COUNT {
        let mut pivot: Option<usize> = None;
        for row in 0..FEATURE_COUNT {
            if row_used[row] {
                continue;
            }
            if pivot.map_or(true, |p| a[row][col].abs() > a[p][col].abs()) {
                pivot = Some(row);
            }
        }
        let pivot = match pivot {
            Some(row) if a[row][col].abs() >= SINGULAR_EPSILON => row,
            _ => continue,
        };

        row_used[pivot] = true;
        pivot_row_of[col] = Some(pivot);
        for row in 0..FEATURE_COUNT {
            if row == pivot {
                continue;
            }
            let factor = a[row][col] / a[pivot][col];
            for k in 0..FEATURE_COUNT {
                a[row][k] -= factor * a[pivot][k];
            }
            b[row] -= factor * b[pivot];
        }
    }

    let mut solution = [0.0; FEATURE_COUNT];
    for col in 0..FEATURE_COUNT {
        if let Some(row) = pivot_row_of[col] {
            solution[col] = b[row] / a[row][col];
        }
    }
    solution
}
