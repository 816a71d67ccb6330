//! Connections over the shared in-memory document store

use sheetpilot_core::{CellValue, DataSourceHandle, DocumentStore, Table, Workbook};

use crate::address::SheetAddress;
use crate::error::{QueryError, Result};
use crate::executor::{ConnectionFactory, TabularConnection};

/// Builds connections that serve documents from a [`DocumentStore`].
///
/// Each sheet answers as one logical table; an address range restricts the
/// region, and the first row of the region supplies the column names. Columns
/// whose header cell is empty get provider-generated names (`F1`, `F2`, ...).
pub struct StoreConnectionFactory {
    store: DocumentStore,
}

impl StoreConnectionFactory {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

impl ConnectionFactory for StoreConnectionFactory {
    type Conn = StoreConnection;

    fn open(&self, source: &DataSourceHandle) -> Result<StoreConnection> {
        let workbook = self.store.get(source.path()).ok_or_else(|| {
            QueryError::DataSourceUnavailable {
                path: source.path().to_path_buf(),
                reason: "document not found".into(),
            }
        })?;
        Ok(StoreConnection {
            workbook: Some(workbook),
        })
    }
}

/// A single-use connection over one stored document
pub struct StoreConnection {
    /// Taken on close, so a released connection cannot serve statements
    workbook: Option<Workbook>,
}

impl TabularConnection for StoreConnection {
    fn select(&mut self, address: &SheetAddress) -> Result<Table> {
        let workbook = self
            .workbook
            .as_ref()
            .ok_or_else(|| QueryError::Statement("connection is closed".into()))?;
        let sheet = workbook
            .worksheet_by_name(address.sheet_name())
            .ok_or_else(|| {
                QueryError::Statement(format!("no such sheet: {}", address.sheet_name()))
            })?;

        let region = match address.range() {
            Some(range) => Some(*range),
            None => sheet.used_range(),
        };
        let Some(region) = region else {
            return Ok(Table::default());
        };

        let header_row = region.start.row;
        let columns = (region.start.col..=region.end.col)
            .map(|col| {
                let value = sheet.value_at(header_row, col);
                if value.is_empty() {
                    // Provider-generated column names for blank header cells
                    format!("F{}", col - region.start.col + 1)
                } else {
                    value.to_string()
                }
            })
            .collect();

        let mut table = Table::new(columns);
        for row in (header_row + 1)..=region.end.row {
            let values: Vec<CellValue> = (region.start.col..=region.end.col)
                .map(|col| sheet.value_at(row, col))
                .collect();
            table.push_row(values);
        }
        Ok(table)
    }

    fn close(&mut self) -> Result<()> {
        self.workbook = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetpilot_core::Workbook;

    fn store_with_sheet() -> DocumentStore {
        let store = DocumentStore::new();
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_value_at(0, 0, "Name");
        sheet.set_value_at(0, 1, "Amount");
        sheet.set_value_at(1, 0, "widget");
        sheet.set_value_at(1, 1, 10.0);
        sheet.set_value_at(2, 0, "gadget");
        sheet.set_value_at(2, 1, 20.0);
        store.insert("/docs/items.xlsx", wb);
        store
    }

    fn open(store: &DocumentStore) -> StoreConnection {
        StoreConnectionFactory::new(store.clone())
            .open(&DataSourceHandle::from("/docs/items.xlsx"))
            .unwrap()
    }

    #[test]
    fn test_whole_sheet_select() {
        let store = store_with_sheet();
        let mut conn = open(&store);
        let table = conn.select(&SheetAddress::sheet("Sheet1")).unwrap();
        assert_eq!(table.column_names(), ["Name", "Amount"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_range_restriction() {
        let store = store_with_sheet();
        let mut conn = open(&store);
        let addr = SheetAddress::parse("Sheet1$A1:A2").unwrap();
        let table = conn.select(&addr).unwrap();
        assert_eq!(table.column_names(), ["Name"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_blank_headers_get_generated_names() {
        let store = DocumentStore::new();
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_value_at(0, 1, "Known");
        sheet.set_value_at(1, 0, "a");
        sheet.set_value_at(1, 1, "b");
        store.insert("/docs/items.xlsx", wb);

        let mut conn = open(&store);
        let table = conn.select(&SheetAddress::sheet("Sheet1")).unwrap();
        assert_eq!(table.column_names(), ["F1", "Known"]);
    }

    #[test]
    fn test_missing_sheet_is_statement_error() {
        let store = store_with_sheet();
        let mut conn = open(&store);
        let err = conn.select(&SheetAddress::sheet("Nope")).unwrap_err();
        assert!(matches!(err, QueryError::Statement(_)));
    }

    #[test]
    fn test_missing_document_is_unavailable() {
        let store = DocumentStore::new();
        let err = StoreConnectionFactory::new(store)
            .open(&DataSourceHandle::from("/docs/absent.xlsx"))
            .err()
            .unwrap();
        assert!(matches!(err, QueryError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn test_select_after_close_fails() {
        let store = store_with_sheet();
        let mut conn = open(&store);
        conn.close().unwrap();
        assert!(conn.select(&SheetAddress::sheet("Sheet1")).is_err());
    }
}
