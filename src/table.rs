//! Core tabular data model: cells, columns, tables, and the column classifier

use crate::error::{CleanError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Missing value marker
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Whether this cell is the missing marker
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Feed the cell into a hasher for exact-duplicate detection.
    /// Floats hash by bit pattern so identical cells always collide.
    pub fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Cell::Null => 0u8.hash(state),
            Cell::Int(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Cell::Float(v) => {
                2u8.hash(state);
                v.to_bits().hash(state);
            }
            Cell::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Cell::DateTime(dt) => {
                4u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Semantic kind of a column, derived from its current cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Textual,
    Datetime,
    Unknown,
}

/// A named, ordered sequence of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Classify the column from its current cells.
    ///
    /// Numeric if every non-null cell is Int or Float, Textual if every
    /// non-null cell is Text, Datetime if every non-null cell is DateTime.
    /// Mixed content or no non-null cells at all classifies as Unknown.
    pub fn kind(&self) -> ColumnKind {
        let mut numeric = 0usize;
        let mut textual = 0usize;
        let mut datetime = 0usize;
        let mut non_null = 0usize;

        for cell in &self.values {
            match cell {
                Cell::Null => continue,
                Cell::Int(_) | Cell::Float(_) => numeric += 1,
                Cell::Text(_) => textual += 1,
                Cell::DateTime(_) => datetime += 1,
            }
            non_null += 1;
        }

        if non_null == 0 {
            ColumnKind::Unknown
        } else if numeric == non_null {
            ColumnKind::Numeric
        } else if textual == non_null {
            ColumnKind::Textual
        } else if datetime == non_null {
            ColumnKind::Datetime
        } else {
            ColumnKind::Unknown
        }
    }

    /// Non-null numeric values of the column
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Cell::as_f64).collect()
    }

    /// Count of null cells
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|c| c.is_null()).count()
    }
}

/// An in-memory tabular dataset: uniformly sized named columns plus an
/// optional explicit row index.
///
/// `index: None` means the implicit positional 0..n-1 identity. When a
/// column is promoted to the index (Set Index), it leaves the ordinary
/// column set; Reset Index returns to the positional identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    index: Option<Column>,
}

impl Table {
    /// Build a table, enforcing uniform column length and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(CleanError::Ingestion(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        if let Some(first) = columns.first() {
            let n = first.len();
            for col in &columns {
                if col.len() != n {
                    return Err(CleanError::Ingestion(format!(
                        "column '{}' has {} rows, expected {}",
                        col.name,
                        col.len(),
                        n
                    )));
                }
            }
        }
        Ok(Self {
            columns,
            index: None,
        })
    }

    /// Empty table (0 columns, 0 rows)
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: None,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of columns currently classified as the given kind
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    /// The explicit row index, if one was set
    pub fn index(&self) -> Option<&Column> {
        self.index.as_ref()
    }

    /// Discard any explicit index, restoring the positional identity.
    pub fn reset_index(&mut self) {
        self.index = None;
    }

    /// Promote an existing column to the row index. A previously set index
    /// is returned to the ordinary column set first.
    pub fn set_index(&mut self, name: &str) -> Result<()> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CleanError::Config(format!("index column '{}' not found", name)))?;
        if let Some(old) = self.index.take() {
            self.columns.insert(0, old);
            // Position may have shifted by the insert
            let pos = self
                .columns
                .iter()
                .position(|c| c.name == name)
                .expect("column present");
            self.index = Some(self.columns.remove(pos));
        } else {
            self.index = Some(self.columns.remove(pos));
        }
        Ok(())
    }

    /// Append a column; rejects name collisions and length mismatches.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) || self.index.as_ref().is_some_and(|i| i.name == column.name) {
            return Err(CleanError::Config(format!(
                "column '{}' already exists",
                column.name
            )));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(CleanError::Computation(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.n_rows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column by name, returning it if present.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let pos = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(pos))
    }

    /// The cells of row `i` in column order
    pub fn row(&self, i: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.values[i]).collect()
    }

    /// Keep only the rows where `keep[i]` is true. The explicit index, when
    /// set, is filtered in lockstep so row identity survives.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.n_rows());
        for col in &mut self.columns {
            let mut i = 0;
            col.values.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
        if let Some(idx) = &mut self.index {
            let mut i = 0;
            idx.values.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "name",
                vec![
                    Cell::Text("a".into()),
                    Cell::Text("b".into()),
                    Cell::Text("c".into()),
                ],
            ),
            Column::new("val", vec![Cell::Int(1), Cell::Float(2.5), Cell::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let t = sample_table();
        assert_eq!(t.shape(), (3, 2));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Table::new(vec![
            Column::new("x", vec![Cell::Int(1)]),
            Column::new("x", vec![Cell::Int(2)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = Table::new(vec![
            Column::new("x", vec![Cell::Int(1)]),
            Column::new("y", vec![Cell::Int(2), Cell::Int(3)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_numeric_with_nulls() {
        let t = sample_table();
        assert_eq!(t.column("val").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(t.column("name").unwrap().kind(), ColumnKind::Textual);
    }

    #[test]
    fn test_classify_mixed_is_unknown() {
        let col = Column::new("m", vec![Cell::Int(1), Cell::Text("x".into())]);
        assert_eq!(col.kind(), ColumnKind::Unknown);
    }

    #[test]
    fn test_classify_all_null_is_unknown() {
        let col = Column::new("n", vec![Cell::Null, Cell::Null]);
        assert_eq!(col.kind(), ColumnKind::Unknown);
    }

    #[test]
    fn test_retain_rows_filters_index_too() {
        let mut t = sample_table();
        t.set_index("name").unwrap();
        t.retain_rows(&[true, false, true]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.index().unwrap().len(), 2);
        assert_eq!(t.index().unwrap().values[1], Cell::Text("c".into()));
    }

    #[test]
    fn test_set_index_removes_column() {
        let mut t = sample_table();
        t.set_index("name").unwrap();
        assert!(!t.has_column("name"));
        assert_eq!(t.n_cols(), 1);
        assert_eq!(t.index().unwrap().name, "name");
    }

    #[test]
    fn test_set_index_twice_restores_previous() {
        let mut t = sample_table();
        t.set_index("name").unwrap();
        t.set_index("val").unwrap();
        assert!(t.has_column("name"));
        assert_eq!(t.index().unwrap().name, "val");
    }

    #[test]
    fn test_set_index_missing_column() {
        let mut t = sample_table();
        assert!(t.set_index("nope").is_err());
    }
}
