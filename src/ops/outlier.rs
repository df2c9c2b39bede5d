//! IQR-based outlier row removal

use crate::error::Result;
use crate::ops::{quantile, OpOutput};
use crate::table::{ColumnKind, Table};

/// Drop rows lying outside [Q1 - f·IQR, Q3 + f·IQR] per numeric column.
///
/// Columns are processed left to right; each column's quartiles are
/// recomputed against the row set already filtered by the columns before
/// it. Missing cells never count as outliers. A column with fewer than
/// four non-missing values is skipped with a note (quartiles over so few
/// points are not meaningful). No numeric columns at all is a no-op.
pub fn apply(table: &Table, factor: f64) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();
    let numeric: Vec<String> = result.columns_of_kind(ColumnKind::Numeric);

    for name in numeric {
        // Re-fetch per column: the row set shrinks as we go.
        let col = match result.column(&name) {
            Some(c) => c,
            None => continue,
        };
        let present = col.numeric_values();
        if present.len() < 4 {
            notes.push(format!(
                "column '{}': fewer than 4 values, outlier bounds skipped",
                name
            ));
            continue;
        }

        let q1 = quantile(&present, 0.25).unwrap_or(0.0);
        let q3 = quantile(&present, 0.75).unwrap_or(0.0);
        let iqr = q3 - q1;
        let lo = q1 - factor * iqr;
        let hi = q3 + factor * iqr;

        let keep: Vec<bool> = col
            .values
            .iter()
            .map(|cell| match cell.as_f64() {
                Some(v) => v >= lo && v <= hi,
                None => true,
            })
            .collect();

        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped > 0 {
            notes.push(format!("column '{}': removed {} outlier row(s)", name, dropped));
            result.retain_rows(&keep);
        }
    }

    Ok(OpOutput::with_notes(result, notes))
}
