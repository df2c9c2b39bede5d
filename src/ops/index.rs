//! Column renaming and row-index management

use crate::error::{CleanError, Result};
use crate::ops::OpOutput;
use crate::table::Table;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::Hasher;

/// Rename columns according to an explicit old → new mapping.
///
/// Every old name must exist and the resulting name set must be free of
/// duplicates; any violation is a ConfigError and the table stays
/// unchanged. Nothing is ever overwritten silently.
pub fn rename_columns(table: &Table, mapping: &HashMap<String, String>) -> Result<OpOutput> {
    for old in mapping.keys() {
        if !table.has_column(old) {
            return Err(CleanError::Config(format!("column '{}' not found", old)));
        }
    }

    let final_names: Vec<&str> = table
        .columns()
        .iter()
        .map(|c| mapping.get(&c.name).map_or(c.name.as_str(), String::as_str))
        .collect();
    let mut seen = HashSet::new();
    if let Some(idx) = table.index() {
        seen.insert(idx.name.as_str());
    }
    for name in &final_names {
        if !seen.insert(*name) {
            return Err(CleanError::Config(format!(
                "rename would produce duplicate column '{}'",
                name
            )));
        }
    }

    let mut result = table.clone();
    for col in result.columns_mut() {
        if let Some(new) = mapping.get(&col.name) {
            col.name = new.clone();
        }
    }
    Ok(OpOutput::new(result))
}

/// Discard any explicit row index, restoring the dense 0..n-1 positional
/// identity. Always succeeds and is idempotent.
pub fn reset_index(table: &Table) -> Result<OpOutput> {
    let mut result = table.clone();
    result.reset_index();
    Ok(OpOutput::new(result))
}

/// Promote the named column to the row index, removing it from the
/// ordinary column set.
///
/// Duplicate index values are permitted (no uniqueness requirement) but
/// are surfaced as a note so the caller can see the ambiguity.
pub fn set_index(table: &Table, column: &str) -> Result<OpOutput> {
    let mut result = table.clone();
    result.set_index(column)?;

    let mut notes = Vec::new();
    if let Some(idx) = result.index() {
        let mut seen = HashSet::new();
        let duplicated = idx
            .values
            .iter()
            .filter(|v| {
                let mut hasher = DefaultHasher::new();
                v.hash_into(&mut hasher);
                !seen.insert(hasher.finish())
            })
            .count();
        if duplicated > 0 {
            notes.push(format!(
                "index '{}' contains {} duplicated value(s)",
                column, duplicated
            ));
        }
    }

    Ok(OpOutput::with_notes(result, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Column};

    fn xz_table() -> Table {
        Table::new(vec![
            Column::new("x", vec![Cell::Int(1), Cell::Int(2)]),
            Column::new("z", vec![Cell::Int(3), Cell::Int(4)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_rename() {
        let mapping = HashMap::from([("x".to_string(), "y".to_string())]);
        let out = rename_columns(&xz_table(), &mapping).unwrap();
        assert_eq!(out.table.column_names(), vec!["y", "z"]);
    }

    #[test]
    fn test_rename_collision_rejected() {
        let table = xz_table();
        let mapping = HashMap::from([("x".to_string(), "z".to_string())]);
        let result = rename_columns(&table, &mapping);
        assert!(matches!(result, Err(CleanError::Config(_))));
    }

    #[test]
    fn test_rename_missing_column_rejected() {
        let mapping = HashMap::from([("nope".to_string(), "y".to_string())]);
        assert!(rename_columns(&xz_table(), &mapping).is_err());
    }

    #[test]
    fn test_rename_swap_allowed() {
        // Swapping two names produces no duplicates in the final set.
        let mapping = HashMap::from([
            ("x".to_string(), "z".to_string()),
            ("z".to_string(), "x".to_string()),
        ]);
        let out = rename_columns(&xz_table(), &mapping).unwrap();
        assert_eq!(out.table.column_names(), vec!["z", "x"]);
    }

    #[test]
    fn test_reset_index_idempotent() {
        let mut table = xz_table();
        table.set_index("x").unwrap();
        let once = reset_index(&table).unwrap().table;
        let twice = reset_index(&once).unwrap().table;
        assert_eq!(once, twice);
        assert!(once.index().is_none());
    }

    #[test]
    fn test_set_index_duplicates_noted() {
        let table = Table::new(vec![
            Column::new("id", vec![Cell::Int(1), Cell::Int(1)]),
            Column::new("v", vec![Cell::Int(3), Cell::Int(4)]),
        ])
        .unwrap();
        let out = set_index(&table, "id").unwrap();
        assert_eq!(out.notes.len(), 1);
        assert!(!out.table.has_column("id"));
    }

    #[test]
    fn test_set_index_missing_column() {
        let result = set_index(&xz_table(), "nope");
        assert!(matches!(result, Err(CleanError::Config(_))));
    }
}
