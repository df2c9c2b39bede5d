//! Derived-feature computation

use crate::error::Result;
use crate::ops::OpOutput;
use crate::table::{Cell, Column, ColumnKind, Table};

/// Name of the derived per-row sum column
pub const ROW_SUM: &str = "row_sum";

/// Append a `row_sum` column: the per-row sum over all numeric columns,
/// with missing cells contributing 0.0. When no numeric columns exist the
/// sum is 0.0 for every row. A pre-existing `row_sum` column is a
/// ConfigError.
pub fn add_row_sum(table: &Table) -> Result<OpOutput> {
    let numeric = table.columns_of_kind(ColumnKind::Numeric);
    let sums: Vec<Cell> = (0..table.n_rows())
        .map(|i| {
            let sum: f64 = numeric
                .iter()
                .filter_map(|name| table.column(name))
                .filter_map(|col| col.values[i].as_f64())
                .sum();
            Cell::Float(sum)
        })
        .collect();

    let mut result = table.clone();
    result.push_column(Column::new(ROW_SUM, sums))?;
    Ok(OpOutput::new(result))
}
