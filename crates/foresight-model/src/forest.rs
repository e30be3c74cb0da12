//! Bootstrap-aggregated regression forest.

use crate::dataset::FeatureRow;
use crate::rng::Lcg;
use crate::tree::RegressionTree;

/// Random-forest regressor: bagged variance-minimizing trees.
///
/// Each tree fits an n-sample bootstrap resample, splits consider every
/// feature, and prediction is the unweighted mean over trees. A seeded
/// generator drives the resampling so runs are reproducible.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `tree_count` trees on the given samples.
    pub fn fit(rows: &[FeatureRow], targets: &[f64], tree_count: usize, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let n = rows.len();
        let mut trees = Vec::with_capacity(tree_count);
        for _ in 0..tree_count {
            let resample: Vec<usize> = (0..n).map(|_| rng.next_index(n)).collect();
            trees.push(RegressionTree::fit(rows, targets, &resample));
        }
        Self { trees }
    }

    /// Mean prediction over all trees.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }
}
