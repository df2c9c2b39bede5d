//! Categorical label encoding

use crate::error::Result;
use crate::ops::OpOutput;
use crate::table::{Cell, ColumnKind, Table};
use std::collections::HashMap;

/// Replace each textual column by integer codes assigned in order of first
/// appearance (0..k-1).
///
/// A column that cannot be encoded, which here means it still contains
/// missing values, is left untouched with a per-column note rather than
/// dropped or partially converted.
pub fn apply(table: &Table) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();

    for col in result.columns_mut() {
        if col.kind() != ColumnKind::Textual {
            continue;
        }
        if col.null_count() > 0 {
            notes.push(format!(
                "column '{}': contains missing values, left unencoded",
                col.name
            ));
            continue;
        }

        let mut codes: HashMap<String, i64> = HashMap::new();
        let mut next = 0i64;
        for cell in &col.values {
            if let Cell::Text(s) = cell {
                if !codes.contains_key(s) {
                    codes.insert(s.clone(), next);
                    next += 1;
                }
            }
        }

        let encoded: Vec<Cell> = col
            .values
            .iter()
            .map(|cell| match cell {
                Cell::Text(s) => Cell::Int(codes[s.as_str()]),
                other => other.clone(),
            })
            .collect();
        col.values = encoded;
    }

    Ok(OpOutput::with_notes(result, notes))
}
