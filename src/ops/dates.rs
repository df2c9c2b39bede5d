//! Opportunistic datetime parsing

use crate::error::Result;
use crate::ops::OpOutput;
use crate::table::{Cell, Table};
use chrono::{NaiveDate, NaiveDateTime};

/// Formats attempted per cell, in order. Date-only formats normalize to
/// midnight.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert columns to datetime, all-or-nothing per column.
///
/// A column converts only when every non-missing cell is text that parses
/// under one of the supported formats; otherwise it is left exactly as it
/// was. Partial conversion never happens. Columns with no non-missing
/// cells, and columns already datetime, are left unchanged.
pub fn apply(table: &Table) -> Result<OpOutput> {
    let mut result = table.clone();
    let mut notes = Vec::new();

    for col in result.columns_mut() {
        let mut parsed: Vec<Cell> = Vec::with_capacity(col.len());
        let mut any = false;
        let mut all = true;
        for cell in &col.values {
            match cell {
                Cell::Null => parsed.push(Cell::Null),
                Cell::Text(s) => match parse_datetime(s) {
                    Some(dt) => {
                        parsed.push(Cell::DateTime(dt));
                        any = true;
                    }
                    None => {
                        all = false;
                        break;
                    }
                },
                _ => {
                    all = false;
                    break;
                }
            }
        }
        if any && all {
            col.values = parsed;
            notes.push(format!("column '{}': parsed as datetime", col.name));
        }
    }

    Ok(OpOutput::with_notes(result, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnKind};

    #[test]
    fn test_full_column_converts() {
        let table = Table::new(vec![Column::new(
            "d",
            vec![
                Cell::Text("2024-01-01".into()),
                Cell::Text("2024-06-15 12:30:00".into()),
                Cell::Null,
            ],
        )])
        .unwrap();
        let out = apply(&table).unwrap();
        let col = out.table.column("d").unwrap();
        assert_eq!(col.kind(), ColumnKind::Datetime);
        assert!(matches!(col.values[0], Cell::DateTime(_)));
        assert!(col.values[2].is_null());
    }

    #[test]
    fn test_one_bad_value_leaves_column_unchanged() {
        let table = Table::new(vec![Column::new(
            "d",
            vec![
                Cell::Text("2024-01-01".into()),
                Cell::Text("not a date".into()),
            ],
        )])
        .unwrap();
        let out = apply(&table).unwrap();
        assert_eq!(out.table, table);
        assert!(out.notes.is_empty());
    }

    #[test]
    fn test_numeric_column_unchanged() {
        let table = Table::new(vec![Column::new(
            "x",
            vec![Cell::Int(20240101), Cell::Int(20240102)],
        )])
        .unwrap();
        let out = apply(&table).unwrap();
        assert_eq!(out.table, table);
    }

    #[test]
    fn test_all_null_column_unchanged() {
        let table = Table::new(vec![Column::new("n", vec![Cell::Null, Cell::Null])]).unwrap();
        let out = apply(&table).unwrap();
        assert_eq!(out.table, table);
    }

    #[test]
    fn test_slash_formats() {
        assert!(parse_datetime("31/12/2023").is_some());
        assert!(parse_datetime("12/31/2023").is_some());
        assert!(parse_datetime("2023/12/31").is_some());
    }
}
