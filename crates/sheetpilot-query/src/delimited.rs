//! Connections over delimited text files

use std::path::Path;

use sheetpilot_core::{CellValue, DataSourceHandle, Table};

use crate::address::SheetAddress;
use crate::error::{QueryError, Result};
use crate::executor::{ConnectionFactory, TabularConnection};

/// Options for reading a delimited text file
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field delimiter, `b','` by default
    pub delimiter: u8,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Builds connections that serve a delimited text file as a one-table source.
///
/// The file's stem is the table name, so `items.csv` answers to the address
/// `items$`. Sheet-name matching is case-insensitive, following the providers
/// this mirrors.
pub struct DelimitedConnectionFactory {
    options: DelimitedOptions,
}

impl DelimitedConnectionFactory {
    pub fn new() -> Self {
        Self {
            options: DelimitedOptions::default(),
        }
    }

    pub fn with_options(options: DelimitedOptions) -> Self {
        Self { options }
    }
}

impl Default for DelimitedConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionFactory for DelimitedConnectionFactory {
    type Conn = DelimitedConnection;

    fn open(&self, source: &DataSourceHandle) -> Result<DelimitedConnection> {
        let path = source.path();
        let unavailable = |reason: String| QueryError::DataSourceUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let table_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| unavailable("path has no file name".into()))?
            .to_string();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| unavailable(e.to_string()))?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| unavailable(e.to_string()))?;
            grid.push(record.iter().map(parse_field).collect::<Vec<CellValue>>());
        }

        Ok(DelimitedConnection {
            table_name,
            grid: Some(grid),
        })
    }
}

/// Interpret a raw field the way the tabular providers do: numbers stay
/// numeric, everything else is text.
fn parse_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(n) = field.parse::<f64>() {
        return CellValue::Number(n);
    }
    CellValue::Text(field.to_string())
}

/// A single-use connection over one delimited file, fully read at open time
pub struct DelimitedConnection {
    table_name: String,
    grid: Option<Vec<Vec<CellValue>>>,
}

impl TabularConnection for DelimitedConnection {
    fn select(&mut self, address: &SheetAddress) -> Result<Table> {
        let grid = self
            .grid
            .as_ref()
            .ok_or_else(|| QueryError::Statement("connection is closed".into()))?;
        if !address.sheet_name().eq_ignore_ascii_case(&self.table_name) {
            return Err(QueryError::Statement(format!(
                "no such table: {} (this source serves '{}')",
                address.sheet_name(),
                self.table_name
            )));
        }

        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let (first_row, last_row, first_col, last_col) = match address.range() {
            Some(range) => (
                range.start.row as usize,
                range.end.row as usize,
                range.start.col as usize,
                range.end.col as usize,
            ),
            None => {
                if grid.is_empty() || width == 0 {
                    return Ok(Table::default());
                }
                (0, grid.len() - 1, 0, width - 1)
            }
        };

        let cell = |row: usize, col: usize| -> CellValue {
            grid.get(row)
                .and_then(|r| r.get(col))
                .cloned()
                .unwrap_or_default()
        };

        let columns = (first_col..=last_col)
            .map(|col| {
                let value = cell(first_row, col);
                if value.is_empty() {
                    format!("F{}", col - first_col + 1)
                } else {
                    value.to_string()
                }
            })
            .collect();

        let mut table = Table::new(columns);
        for row in (first_row + 1)..=last_row {
            table.push_row((first_col..=last_col).map(|col| cell(row, col)).collect());
        }
        Ok(table)
    }

    fn close(&mut self) -> Result<()> {
        self.grid = None;
        Ok(())
    }
}

impl DelimitedConnection {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Convenience: read a whole delimited file as a table whose first row names
/// the columns.
pub fn read_delimited(path: impl AsRef<Path>, options: DelimitedOptions) -> Result<Table> {
    let handle = DataSourceHandle::new(path.as_ref());
    let mut conn = DelimitedConnectionFactory::with_options(options).open(&handle)?;
    let name = conn.table_name().to_string();
    let table = conn.select(&SheetAddress::sheet(name))?;
    conn.close()?;
    Ok(table)
}
