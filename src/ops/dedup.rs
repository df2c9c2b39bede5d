//! Exact-duplicate row removal

use crate::error::Result;
use crate::ops::OpOutput;
use crate::table::Table;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::Hasher;

/// Remove rows that exactly duplicate an earlier row across all columns.
/// The first occurrence survives; surviving row order is preserved.
pub fn apply(table: &Table) -> Result<OpOutput> {
    let n_rows = table.n_rows();
    if n_rows <= 1 {
        return Ok(OpOutput::new(table.clone()));
    }

    let mut seen: HashSet<u64> = HashSet::with_capacity(n_rows);
    let mut keep = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let mut hasher = DefaultHasher::new();
        for col in table.columns() {
            col.values[i].hash_into(&mut hasher);
        }
        keep.push(seen.insert(hasher.finish()));
    }

    let dropped = keep.iter().filter(|k| !**k).count();
    let mut result = table.clone();
    result.retain_rows(&keep);

    let notes = if dropped > 0 {
        vec![format!("removed {} duplicate row(s)", dropped)]
    } else {
        Vec::new()
    };
    Ok(OpOutput::with_notes(result, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Column};

    fn table_with_dupes() -> Table {
        Table::new(vec![
            Column::new(
                "name",
                vec![
                    Cell::Text("a".into()),
                    Cell::Text("a".into()),
                    Cell::Text("b".into()),
                ],
            ),
            Column::new("val", vec![Cell::Int(1), Cell::Int(1), Cell::Int(2)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_removes_exact_duplicates() {
        let out = apply(&table_with_dupes()).unwrap();
        assert_eq!(out.table.n_rows(), 2);
        assert_eq!(out.table.column("name").unwrap().values[0], Cell::Text("a".into()));
        assert_eq!(out.table.column("name").unwrap().values[1], Cell::Text("b".into()));
        assert_eq!(out.notes.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let once = apply(&table_with_dupes()).unwrap().table;
        let twice = apply(&once).unwrap().table;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_noop_on_single_row() {
        let table = Table::new(vec![Column::new("x", vec![Cell::Int(1)])]).unwrap();
        let out = apply(&table).unwrap();
        assert_eq!(out.table, table);
    }

    #[test]
    fn test_distinct_rows_untouched() {
        let table = Table::new(vec![Column::new(
            "x",
            vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)],
        )])
        .unwrap();
        let out = apply(&table).unwrap();
        assert_eq!(out.table.n_rows(), 3);
        assert!(out.notes.is_empty());
    }
}
