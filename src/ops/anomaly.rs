//! Unsupervised anomaly row filtering (isolation forest)

use crate::error::Result;
use crate::ops::{mean, OpOutput};
use crate::table::{ColumnKind, Table};
use ndarray::Array2;
use rand::prelude::*;

const N_ESTIMATORS: usize = 100;
const MAX_SAMPLES: usize = 256;

/// Isolation tree over a sample of the rows
#[derive(Debug, Clone)]
enum IsolationTree {
    Internal {
        feature: usize,
        threshold: f64,
        left: Box<IsolationTree>,
        right: Box<IsolationTree>,
    },
    External {
        size: usize,
    },
}

impl IsolationTree {
    fn build(
        x: &Array2<f64>,
        indices: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let n_samples = indices.len();
        if height >= max_height || n_samples <= 1 {
            return IsolationTree::External { size: n_samples };
        }

        let feature = rng.gen_range(0..x.ncols());
        let values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
        let min_val = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_val = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if (max_val - min_val).abs() < 1e-10 {
            return IsolationTree::External { size: n_samples };
        }

        let threshold = rng.gen_range(min_val..max_val);
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[[i, feature]] < threshold);
        if left_indices.is_empty() || right_indices.is_empty() {
            return IsolationTree::External { size: n_samples };
        }

        IsolationTree::Internal {
            feature,
            threshold,
            left: Box::new(Self::build(x, &left_indices, height + 1, max_height, rng)),
            right: Box::new(Self::build(x, &right_indices, height + 1, max_height, rng)),
        }
    }

    fn path_length(&self, sample: &[f64], current_height: usize) -> f64 {
        match self {
            IsolationTree::External { size } => current_height as f64 + Self::c(*size),
            IsolationTree::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] < *threshold {
                    left.path_length(sample, current_height + 1)
                } else {
                    right.path_length(sample, current_height + 1)
                }
            }
        }
    }

    /// Average path length of unsuccessful BST search,
    /// c(n) = 2 H(n-1) - 2(n-1)/n
    fn c(n: usize) -> f64 {
        if n <= 1 {
            0.0
        } else if n == 2 {
            1.0
        } else {
            let n_f = n as f64;
            2.0 * ((n_f - 1.0).ln() + 0.5772156649) - 2.0 * (n_f - 1.0) / n_f
        }
    }
}

/// Drop the rows an isolation forest over the numeric columns scores as
/// anomalous; the inlier/outlier label never appears in the output table.
///
/// `contamination` is the expected outlier proportion: the matching count
/// of highest-scoring rows is removed. Missing numeric cells are replaced
/// by the column mean for scoring only; the table cells are untouched.
/// Fallback (documented): with no numeric columns, or fewer than two rows,
/// the transform is a no-op.
pub fn apply(table: &Table, contamination: f64, seed: Option<u64>) -> Result<OpOutput> {
    let numeric = table.columns_of_kind(ColumnKind::Numeric);
    let n_rows = table.n_rows();
    if numeric.is_empty() || n_rows < 2 {
        return Ok(OpOutput::with_notes(
            table.clone(),
            vec!["no numeric columns or too few rows, anomaly filter skipped".to_string()],
        ));
    }
    let contamination = contamination.clamp(0.0, 0.5);

    // Score matrix: numeric cells, nulls mean-substituted for scoring only.
    let col_means: Vec<f64> = numeric
        .iter()
        .map(|name| {
            table
                .column(name)
                .map(|c| mean(&c.numeric_values()).unwrap_or(0.0))
                .unwrap_or(0.0)
        })
        .collect();
    let x = Array2::from_shape_fn((n_rows, numeric.len()), |(i, j)| {
        table
            .column(&numeric[j])
            .and_then(|c| c.values[i].as_f64())
            .unwrap_or(col_means[j])
    });

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let samples_per_tree = MAX_SAMPLES.min(n_rows);
    let max_height = (samples_per_tree as f64).log2().ceil() as usize;
    let trees: Vec<IsolationTree> = (0..N_ESTIMATORS)
        .map(|_| {
            let indices: Vec<usize> = (0..samples_per_tree)
                .map(|_| rng.gen_range(0..n_rows))
                .collect();
            IsolationTree::build(&x, &indices, 0, max_height, &mut rng)
        })
        .collect();

    let c_n = IsolationTree::c(samples_per_tree);
    let scores: Vec<f64> = x
        .rows()
        .into_iter()
        .map(|row| {
            let sample: Vec<f64> = row.iter().copied().collect();
            let avg_path: f64 = trees
                .iter()
                .map(|tree| tree.path_length(&sample, 0))
                .sum::<f64>()
                / trees.len() as f64;
            // s(x, n) = 2^(-E[h(x)] / c(n))
            2.0_f64.powf(-avg_path / c_n)
        })
        .collect();

    // Drop the contamination fraction with the highest scores. A flat
    // score distribution means the forest found no anomalous structure;
    // dropping arbitrary rows there would be noise, so skip instead.
    let min_score = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max_score - min_score < 1e-9 {
        return Ok(OpOutput::with_notes(
            table.clone(),
            vec!["scores are uniform, no anomalies to remove".to_string()],
        ));
    }

    let n_drop = (contamination * n_rows as f64) as usize;
    let mut order: Vec<usize> = (0..n_rows).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));
    let mut keep = vec![true; n_rows];
    for &i in order.iter().take(n_drop) {
        keep[i] = false;
    }
    let dropped = keep.iter().filter(|k| !**k).count();

    let mut result = table.clone();
    result.retain_rows(&keep);
    Ok(OpOutput::with_notes(
        result,
        vec![format!("removed {} anomalous row(s)", dropped)],
    ))
}
