//! z-score scaling of numeric columns

use crate::error::Result;
use crate::ops::{mean, sample_std, OpOutput};
use crate::table::{Cell, ColumnKind, Table};

/// Center and scale every numeric column: (x - mean) / std, with the
/// sample standard deviation (ddof = 1).
///
/// A zero-variance column, or one with fewer than two values, scales with
/// a unit divisor instead, so its cells all become 0.0 rather than NaN or
/// infinity. Missing cells stay missing.
pub fn apply(table: &Table) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();

    for col in result.columns_mut() {
        if col.kind() != ColumnKind::Numeric {
            continue;
        }
        let present = col.numeric_values();
        let center = match mean(&present) {
            Some(m) => m,
            None => continue,
        };
        let std = sample_std(&present).unwrap_or(0.0);
        let scale = if std == 0.0 {
            notes.push(format!(
                "column '{}': zero variance, scaled to all zeros",
                col.name
            ));
            1.0
        } else {
            std
        };

        for cell in col.values.iter_mut() {
            if let Some(v) = cell.as_f64() {
                *cell = Cell::Float((v - center) / scale);
            }
        }
    }

    Ok(OpOutput::with_notes(result, notes))
}
