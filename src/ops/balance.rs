//! Class balancing via synthetic minority oversampling (SMOTE)

use crate::error::{CleanError, Result};
use crate::ops::OpOutput;
use crate::table::{Cell, ColumnKind, Table};
use ndarray::Array2;
use rand::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Default number of nearest neighbors used when interpolating
pub const DEFAULT_K_NEIGHBORS: usize = 5;

/// Ordered float for BinaryHeap-based partial sort
#[derive(Debug, Clone, Copy)]
struct DistIdx(f64, usize);

impl PartialEq for DistIdx {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for DistIdx {}
impl PartialOrd for DistIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DistIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(ai, bi)| (ai - bi).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// k nearest same-class neighbors via BinaryHeap (O(n log k))
fn find_neighbors(point: &[f64], data: &[Vec<f64>], k: usize) -> Vec<usize> {
    let mut heap: BinaryHeap<DistIdx> = BinaryHeap::with_capacity(k + 1);
    for (i, d) in data.iter().enumerate() {
        let dist = distance(point, d);
        if dist <= 0.0 {
            continue; // exclude self and exact twins
        }
        if heap.len() < k {
            heap.push(DistIdx(dist, i));
        } else if let Some(&DistIdx(max_dist, _)) = heap.peek() {
            if dist < max_dist {
                heap.pop();
                heap.push(DistIdx(dist, i));
            }
        }
    }
    heap.into_iter().map(|DistIdx(_, i)| i).collect()
}

/// Uniform interpolation between a sample and one of its neighbors
fn generate_sample(point: &[f64], neighbor: &[f64], rng: &mut StdRng) -> Vec<f64> {
    let gap: f64 = rng.gen();
    point
        .iter()
        .zip(neighbor.iter())
        .map(|(&p, &n)| p + gap * (n - p))
        .collect()
}

/// Oversample minority classes of `target` up to the majority class count.
///
/// Requirements (ConfigError otherwise): the target column exists, at
/// least two distinct target values are present, and every remaining
/// column is numeric with no missing cells. Original rows come first in
/// the output; synthetic rows are appended carrying the class's original
/// target cell. A custom index, if set, is dropped with a note because
/// synthetic rows have no source identity.
pub fn apply(table: &Table, target: &str, k_neighbors: usize, seed: Option<u64>) -> Result<OpOutput> {
    let target_col = table
        .column(target)
        .ok_or_else(|| CleanError::Config(format!("target column '{}' not found", target)))?;

    let feature_names: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| c.name != target)
        .map(|c| c.name.clone())
        .collect();
    for name in &feature_names {
        let col = table.column(name).expect("name from table");
        if col.kind() != ColumnKind::Numeric {
            return Err(CleanError::Config(format!(
                "feature column '{}' is not numeric",
                name
            )));
        }
        if col.null_count() > 0 {
            return Err(CleanError::Config(format!(
                "feature column '{}' contains missing values",
                name
            )));
        }
    }

    let n_rows = table.n_rows();
    let n_features = feature_names.len();

    // Map distinct target cells to class codes in first-appearance order.
    let mut class_of_row = Vec::with_capacity(n_rows);
    let mut class_cells: Vec<Cell> = Vec::new();
    for cell in &target_col.values {
        let code = match class_cells.iter().position(|c| c == cell) {
            Some(p) => p,
            None => {
                class_cells.push(cell.clone());
                class_cells.len() - 1
            }
        };
        class_of_row.push(code);
    }
    if class_cells.len() < 2 {
        return Err(CleanError::Config(
            "target column needs at least 2 distinct classes".to_string(),
        ));
    }

    let x = Array2::from_shape_fn((n_rows, n_features), |(i, j)| {
        table
            .column(&feature_names[j])
            .and_then(|c| c.values[i].as_f64())
            .unwrap_or(0.0)
    });

    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut indices: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, &class) in class_of_row.iter().enumerate() {
        *counts.entry(class).or_insert(0) += 1;
        indices.entry(class).or_default().push(i);
    }
    let max_count = counts.values().copied().max().unwrap_or(0);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut synthetic_x: Vec<Vec<f64>> = Vec::new();
    let mut synthetic_class: Vec<usize> = Vec::new();
    let mut notes = Vec::new();

    // Deterministic class order: first appearance in the target column.
    for class in 0..class_cells.len() {
        let current = counts.get(&class).copied().unwrap_or(0);
        let n_to_generate = max_count.saturating_sub(current);
        if n_to_generate == 0 {
            continue;
        }

        let class_idx = &indices[&class];
        let class_samples: Vec<Vec<f64>> = class_idx
            .iter()
            .map(|&i| x.row(i).iter().copied().collect())
            .collect();

        if class_samples.len() < 2 {
            notes.push(format!(
                "class {} has a single sample, cannot interpolate; left as is",
                class_cells[class]
            ));
            continue;
        }
        let k = k_neighbors.min(class_samples.len() - 1).max(1);

        let mut generated = 0;
        let mut attempts = 0;
        while generated < n_to_generate {
            attempts += 1;
            if attempts > n_to_generate * 20 {
                // All samples in this class coincide; interpolation cannot
                // produce anything new.
                notes.push(format!(
                    "class {}: neighbor search exhausted after {} synthetic row(s)",
                    class_cells[class], generated
                ));
                break;
            }
            let idx = rng.gen_range(0..class_samples.len());
            let sample = &class_samples[idx];
            let neighbors = find_neighbors(sample, &class_samples, k);
            if neighbors.is_empty() {
                continue;
            }
            let neighbor = &class_samples[neighbors[rng.gen_range(0..neighbors.len())]];
            synthetic_x.push(generate_sample(sample, neighbor, &mut rng));
            synthetic_class.push(class);
            generated += 1;
        }
        if generated > 0 {
            notes.push(format!(
                "class {}: added {} synthetic row(s)",
                class_cells[class], generated
            ));
        }
    }

    // Assemble: original rows first, synthetic rows appended.
    let mut result = table.clone();
    if result.index().is_some() {
        result.reset_index();
        notes.push("explicit index dropped: synthetic rows have no source identity".to_string());
    }
    for (j, name) in feature_names.iter().enumerate() {
        let col = result.column_mut(name).expect("name from table");
        col.values
            .extend(synthetic_x.iter().map(|row| Cell::Float(row[j])));
    }
    let target_col = result.column_mut(target).expect("validated above");
    target_col
        .values
        .extend(synthetic_class.iter().map(|&c| class_cells[c].clone()));

    Ok(OpOutput::with_notes(result, notes))
}
