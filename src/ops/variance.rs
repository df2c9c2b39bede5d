//! Low-variance column pruning

use crate::error::Result;
use crate::ops::{sample_variance, OpOutput};
use crate::table::{ColumnKind, Table};

/// Drop numeric columns whose sample variance is strictly below the
/// threshold.
///
/// Policy for undefined variance (fewer than two non-missing values): the
/// column carries no usable signal, so it is treated as variance 0.0 and
/// dropped below any positive threshold.
pub fn apply(table: &Table, threshold: f64) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();

    let numeric = result.columns_of_kind(ColumnKind::Numeric);
    for name in numeric {
        let variance = result
            .column(&name)
            .map(|c| sample_variance(&c.numeric_values()).unwrap_or(0.0))
            .unwrap_or(0.0);
        if variance < threshold {
            result.remove_column(&name);
            notes.push(format!(
                "column '{}': variance {:.6} below threshold {}, dropped",
                name, variance, threshold
            ));
        }
    }

    Ok(OpOutput::with_notes(result, notes))
}
