//! Missing-value filling

use crate::error::Result;
use crate::ops::{mean, median, OpOutput};
use crate::table::{Cell, ColumnKind, Table};
use serde::{Deserialize, Serialize};

/// Statistic used to fill numeric missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    #[default]
    Mean,
    Median,
}

/// Fill missing cells.
///
/// Numeric columns are filled with their step-local mean or median over the
/// non-missing values. Afterwards every remaining missing cell in any
/// column, including a numeric column whose values were all missing, is
/// replaced by the literal text "Unknown". Row count never changes.
pub fn apply(table: &Table, method: FillMethod) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();

    for col in result.columns_mut() {
        if col.kind() != ColumnKind::Numeric {
            continue;
        }
        let present = col.numeric_values();
        let fill = match method {
            FillMethod::Mean => mean(&present),
            FillMethod::Median => median(&present),
        };
        match fill {
            Some(value) => {
                for cell in col.values.iter_mut() {
                    if cell.is_null() {
                        *cell = Cell::Float(value);
                    }
                }
            }
            // All-missing numeric column: nothing to compute a statistic
            // from, the fallback below catches the cells.
            None => notes.push(format!(
                "column '{}': no non-missing values, fell back to \"Unknown\"",
                col.name
            )),
        }
    }

    let mut fallback = 0usize;
    for col in result.columns_mut() {
        for cell in col.values.iter_mut() {
            if cell.is_null() {
                *cell = Cell::Text("Unknown".to_string());
                fallback += 1;
            }
        }
    }
    if fallback > 0 {
        notes.push(format!("filled {} remaining cell(s) with \"Unknown\"", fallback));
    }

    Ok(OpOutput::with_notes(result, notes))
}
