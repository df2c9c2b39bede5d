//! Textual normalization: inconsistency fixing and punctuation cleaning

use crate::error::{CleanError, Result};
use crate::ops::OpOutput;
use crate::table::{Cell, Column, ColumnKind, Table};

/// Trim leading/trailing whitespace and lowercase every text cell of every
/// textual column. Non-textual columns are untouched.
pub fn fix_inconsistencies(table: &Table) -> Result<OpOutput> {
    let mut result = table.clone();
    for col in result.columns_mut() {
        if col.kind() != ColumnKind::Textual {
            continue;
        }
        normalize_column(col, false);
    }
    Ok(OpOutput::new(result))
}

/// Strip punctuation, lowercase, and trim text cells.
///
/// With an explicit column subset only those columns are touched; every
/// named column must exist (otherwise the whole step is a ConfigError and
/// the table is unchanged). A named column that is not textual is skipped
/// with a note. Without a subset, all textual columns are cleaned.
pub fn clean_text(table: &Table, columns: Option<&[String]>) -> Result<OpOutput> {
    let targets: Vec<String> = match columns {
        Some(names) => {
            for name in names {
                if !table.has_column(name) {
                    return Err(CleanError::Config(format!("column '{}' not found", name)));
                }
            }
            names.to_vec()
        }
        None => table.columns_of_kind(ColumnKind::Textual),
    };

    let mut result = table.clone();
    let mut notes = Vec::new();
    for name in &targets {
        let col = result.column_mut(name).expect("validated above");
        if col.kind() != ColumnKind::Textual {
            notes.push(format!("column '{}': not textual, skipped", name));
            continue;
        }
        normalize_column(col, true);
    }

    Ok(OpOutput::with_notes(result, notes))
}

fn normalize_column(col: &mut Column, strip_punctuation: bool) {
    for cell in col.values.iter_mut() {
        if let Cell::Text(s) = cell {
            let cleaned: String = if strip_punctuation {
                s.chars().filter(|c| !c.is_ascii_punctuation()).collect()
            } else {
                s.clone()
            };
            *cell = Cell::Text(cleaned.trim().to_lowercase());
        }
    }
}
