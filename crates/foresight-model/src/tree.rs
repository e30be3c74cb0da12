//! Single variance-minimizing regression tree.

use crate::dataset::{FeatureRow, FEATURE_COUNT};

/// Nodes stop splitting below this population.
const MIN_SAMPLES_SPLIT: usize = 2;

/// Tree nodes in a flat arena; child fields index into the same vec.
#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One regression tree grown greedily on squared-error reduction.
///
/// Every split considers every feature and every boundary between distinct
/// adjacent values; nodes grow until pure or below the split minimum. The
/// arena plus an explicit worklist keeps deep trees off the call stack.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit on the samples selected by `indices`. Duplicates are welcome;
    /// bootstrap resamples pass repeated indices.
    pub fn fit(rows: &[FeatureRow], targets: &[f64], indices: &[usize]) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut work = vec![(0usize, indices.to_vec())];

        while let Some((slot, members)) = work.pop() {
            match best_split(rows, targets, &members) {
                Some(choice) => {
                    let (left_members, right_members): (Vec<usize>, Vec<usize>) = members
                        .iter()
                        .copied()
                        .partition(|&i| rows[i][choice.feature] <= choice.threshold);
                    let left = nodes.len();
                    nodes.push(Node::Leaf { value: 0.0 });
                    let right = nodes.len();
                    nodes.push(Node::Leaf { value: 0.0 });
                    nodes[slot] = Node::Split {
                        feature: choice.feature,
                        threshold: choice.threshold,
                        left,
                        right,
                    };
                    work.push((left, left_members));
                    work.push((right, right_members));
                }
                None => {
                    nodes[slot] = Node::Leaf {
                        value: mean_target(targets, &members),
                    };
                }
            }
        }

        Self { nodes }
    }

    /// Predicted target for one feature row.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

struct SplitChoice {
    feature: usize,
    threshold: f64,
}

/// Lowest-cost split over all features, or None when the node is done.
fn best_split(rows: &[FeatureRow], targets: &[f64], members: &[usize]) -> Option<SplitChoice> {
    if members.len() < MIN_SAMPLES_SPLIT {
        return None;
    }
    let first = targets[members[0]];
    if members.iter().all(|&i| targets[i] == first) {
        return None;
    }

    let mut best: Option<(f64, SplitChoice)> = None;
    let mut order = members.to_vec();

    for feature in 0..FEATURE_COUNT {
        order.sort_by(|&a, &b| {
            rows[a][feature]
                .partial_cmp(&rows[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut prefix_sum = vec![0.0; order.len() + 1];
        let mut prefix_sq = vec![0.0; order.len() + 1];
        for (pos, &i) in order.iter().enumerate() {
            prefix_sum[pos + 1] = prefix_sum[pos] + targets[i];
            prefix_sq[pos + 1] = prefix_sq[pos] + targets[i] * targets[i];
        }
        let total = order.len();
        let total_sum = prefix_sum[total];
        let total_sq = prefix_sq[total];

        for pos in 1..total {
            let lower = rows[order[pos - 1]][feature];
            let upper = rows[order[pos]][feature];
            if lower == upper {
                continue;
            }

            // Summed squared error on each side, via prefix moments.
            let left_n = pos as f64;
            let right_n = (total - pos) as f64;
            let left_sum = prefix_sum[pos];
            let right_sum = total_sum - left_sum;
            let left_cost = prefix_sq[pos] - left_sum * left_sum / left_n;
            let right_cost = (total_sq - prefix_sq[pos]) - right_sum * right_sum / right_n;
            let cost = left_cost + right_cost;

            if best.as_ref().map_or(true, |(lowest, _)| cost < *lowest) {
                best = Some((
                    cost,
                    SplitChoice {
                        feature,
                        threshold: (lower + upper) / 2.0,
                    },
                ));
            }
        }
    }

    best.map(|(_, choice)| choice)
}

fn mean_target(targets: &[f64], members: &[usize]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members.iter().map(|&i| targets[i]).sum::<f64>() / members.len() as f64
}
