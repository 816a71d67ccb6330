//! Tabular query result

use crate::value::CellValue;

/// An in-memory table returned from a query.
///
/// Rows are ordered as the data source produced them; each row can be
/// addressed by column position or by the column names taken from the
/// source's header row. Ownership transfers to the caller on return.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a data row, padded or truncated to the column count
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name, if present
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a row view by index
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        if index < self.rows.len() {
            Some(Row { table: self, index })
        } else {
            None
        }
    }

    /// Iterate over row views in order
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// A view of one table row, addressable by column name or position
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let pos = self.table.column_position(column)?;
        self.table.cell(self.index, pos)
    }

    /// Get a value by column position
    pub fn get_at(&self, position: usize) -> Option<&'a CellValue> {
        self.table.cell(self.index, position)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.table.column_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec!["Name".into(), "Amount".into()]);
        table.push_row(vec!["widget".into(), 10.0.into()]);
        table.push_row(vec!["gadget".into()]);
        table
    }

    #[test]
    fn test_access_by_name_and_position() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);

        let row = table.row(0).unwrap();
        assert_eq!(row.get("Name"), Some(&CellValue::Text("widget".into())));
        assert_eq!(row.get_at(1), Some(&CellValue::Number(10.0)));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        let row = table.row(1).unwrap();
        assert_eq!(row.get("Amount"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_row_iteration_order() {
        let table = sample();
        let names: Vec<_> = table
            .rows()
            .map(|r| r.get("Name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["widget", "gadget"]);
    }
}
