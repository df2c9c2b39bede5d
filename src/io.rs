//! Delimited-text ingestion and export
//!
//! Ingestion reads a header row plus records and infers one type per
//! column: integer if every non-empty field parses as i64, float if every
//! non-empty field parses as f64, text otherwise. Empty fields become the
//! missing marker. Export is the inverse: UTF-8 delimited text with empty
//! fields for missing cells.

use crate::error::{CleanError, Result};
use crate::table::{Cell, Column, Table};
use std::io::{Read, Write};

/// Options for reading and writing delimited payloads
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Write the explicit row index (when one is set) as the leading column
    pub include_index: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_index: true,
        }
    }
}

impl DelimitedOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_include_index(mut self, include: bool) -> Self {
        self.include_index = include;
        self
    }
}

/// Read a delimited payload into a [`Table`], inferring per-column types.
///
/// Fails with [`CleanError::Ingestion`] on ragged rows, duplicate header
/// names, or an unreadable payload.
pub fn read_table<R: Read>(reader: R, options: &DelimitedOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CleanError::Ingestion(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(CleanError::Ingestion("empty header row".to_string()));
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in csv_reader.records() {
        let record = record.map_err(|e| CleanError::Ingestion(e.to_string()))?;
        if record.len() != headers.len() {
            return Err(CleanError::Ingestion(format!(
                "row has {} fields, expected {}",
                record.len(),
                headers.len()
            )));
        }
        for (i, field) in record.iter().enumerate() {
            raw[i].push(field.to_string());
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(raw)
        .map(|(name, fields)| Column::new(name, infer_cells(&fields)))
        .collect();

    Table::new(columns)
}

/// Convert raw fields to typed cells: Int if every non-empty field parses
/// as i64, Float if every non-empty field parses as f64, Text otherwise.
fn infer_cells(fields: &[String]) -> Vec<Cell> {
    let non_empty: Vec<&str> = fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();

    let all_int = !non_empty.is_empty() && non_empty.iter().all(|f| f.parse::<i64>().is_ok());
    let all_float = !non_empty.is_empty() && non_empty.iter().all(|f| f.parse::<f64>().is_ok());

    fields
        .iter()
        .map(|f| {
            let t = f.trim();
            if t.is_empty() {
                Cell::Null
            } else if all_int {
                Cell::Int(t.parse().unwrap_or_default())
            } else if all_float {
                Cell::Float(t.parse().unwrap_or_default())
            } else {
                Cell::Text(f.clone())
            }
        })
        .collect()
}

/// Write a table as UTF-8 delimited text.
///
/// The positional identity index is never written; an explicit index (from
/// Set Index) is written as the leading column unless suppressed via
/// [`DelimitedOptions::include_index`].
pub fn write_table<W: Write>(table: &Table, writer: W, options: &DelimitedOptions) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let index = if options.include_index {
        table.index()
    } else {
        None
    };

    let mut header: Vec<&str> = Vec::with_capacity(table.n_cols() + 1);
    if let Some(idx) = index {
        header.push(idx.name.as_str());
    }
    header.extend(table.columns().iter().map(|c| c.name.as_str()));
    csv_writer
        .write_record(&header)
        .map_err(|e| CleanError::Serialization(e.to_string()))?;

    for i in 0..table.n_rows() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some(idx) = index {
            record.push(idx.values[i].to_string());
        }
        for col in table.columns() {
            record.push(col.values[i].to_string());
        }
        csv_writer
            .write_record(&record)
            .map_err(|e| CleanError::Serialization(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CleanError::Serialization(e.to_string()))?;
    Ok(())
}

/// Render the table to an in-memory delimited string.
pub fn to_delimited_string(table: &Table, options: &DelimitedOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| CleanError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;

    #[test]
    fn test_read_infers_types() {
        let payload = "name,age,score\nalice,30,1.5\nbob,25,2\n";
        let table = read_table(payload.as_bytes(), &DelimitedOptions::default()).unwrap();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.column("name").unwrap().kind(), ColumnKind::Textual);
        assert_eq!(table.column("age").unwrap().values[0], Cell::Int(30));
        // Mixed int/float fields infer as float
        assert_eq!(table.column("score").unwrap().values[1], Cell::Float(2.0));
    }

    #[test]
    fn test_read_empty_fields_become_null() {
        let payload = "a,b\n1,\n,x\n";
        let table = read_table(payload.as_bytes(), &DelimitedOptions::default()).unwrap();
        assert_eq!(table.column("b").unwrap().values[0], Cell::Null);
        assert_eq!(table.column("a").unwrap().values[1], Cell::Null);
        assert_eq!(table.column("a").unwrap().values[0], Cell::Int(1));
    }

    #[test]
    fn test_read_duplicate_headers_rejected() {
        let payload = "a,a\n1,2\n";
        assert!(read_table(payload.as_bytes(), &DelimitedOptions::default()).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let payload = "name,val\nalice,1\nbob,2\n";
        let options = DelimitedOptions::default();
        let table = read_table(payload.as_bytes(), &options).unwrap();
        let exported = to_delimited_string(&table, &options).unwrap();
        let reread = read_table(exported.as_bytes(), &options).unwrap();
        assert_eq!(table, reread);
    }

    #[test]
    fn test_export_null_as_empty_field() {
        let payload = "a,b\n1,\n2,x\n";
        let options = DelimitedOptions::default();
        let table = read_table(payload.as_bytes(), &options).unwrap();
        let exported = to_delimited_string(&table, &options).unwrap();
        let mut lines = exported.lines();
        assert_eq!(lines.next(), Some("a,b"));
        assert_eq!(lines.next(), Some("1,"));
        assert_eq!(lines.next(), Some("2,x"));
    }

    #[test]
    fn test_export_custom_index_as_leading_column() {
        let payload = "id,val\nr1,1\nr2,2\n";
        let options = DelimitedOptions::default();
        let mut table = read_table(payload.as_bytes(), &options).unwrap();
        table.set_index("id").unwrap();

        let exported = to_delimited_string(&table, &options).unwrap();
        assert!(exported.starts_with("id,val\n"));

        let suppressed = to_delimited_string(
            &table,
            &DelimitedOptions::default().with_include_index(false),
        )
        .unwrap();
        assert!(suppressed.starts_with("val\n"));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let payload = "a;b\n1;2\n";
        let options = DelimitedOptions::default().with_delimiter(b';');
        let table = read_table(payload.as_bytes(), &options).unwrap();
        assert_eq!(table.shape(), (1, 2));
    }
}
