//! End-to-end query tests over the store and delimited providers

use std::io::Write;

use pretty_assertions::assert_eq;
use sheetpilot_core::{CellValue, DocumentStore, Workbook};
use sheetpilot_query::{
    DelimitedConnectionFactory, QueryCommand, QueryError, QueryExecutor, Result, SheetAddress,
    Statement, StoreConnectionFactory,
};

fn seeded_store() -> DocumentStore {
    let store = DocumentStore::new();
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_value_at(0, 0, "Name");
    sheet.set_value_at(0, 1, "Amount");
    for (i, (name, amount)) in [("widget", 10.0), ("gadget", 20.0), ("sprocket", 30.0)]
        .iter()
        .enumerate()
    {
        sheet.set_value_at(i as u32 + 1, 0, *name);
        sheet.set_value_at(i as u32 + 1, 1, *amount);
    }
    store.insert("/docs/items.xlsx", wb);
    store
}

#[test]
fn test_select_whole_sheet_through_executor() {
    let executor = QueryExecutor::new(StoreConnectionFactory::new(seeded_store()));
    let strategy = |command: &mut QueryCommand<'_>, statement: &Statement| command.run(statement);
    let statement = Statement::select(SheetAddress::parse("Sheet1$").unwrap());

    let table = executor
        .execute("/docs/items.xlsx", &strategy, &statement)
        .unwrap();

    assert_eq!(table.column_names(), ["Name", "Amount"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.row(2).unwrap().get("Name"),
        Some(&CellValue::Text("sprocket".into()))
    );
    assert_eq!(
        table.row(0).unwrap().get("Amount"),
        Some(&CellValue::Number(10.0))
    );
}

#[test]
fn test_select_ranged_region() {
    let executor = QueryExecutor::new(StoreConnectionFactory::new(seeded_store()));
    let strategy = |command: &mut QueryCommand<'_>, address: &SheetAddress| command.select(address);
    let address = SheetAddress::parse("Sheet1$A1:A3").unwrap();

    let table = executor
        .execute("/docs/items.xlsx", &strategy, &address)
        .unwrap();

    assert_eq!(table.column_names(), ["Name"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_strategy_can_run_several_statements() {
    let executor = QueryExecutor::new(StoreConnectionFactory::new(seeded_store()));
    // One connection serves both statements before release.
    let strategy = |command: &mut QueryCommand<'_>, _: &()| {
        let headers_only = command.select(&SheetAddress::parse("Sheet1$A1:B1").unwrap())?;
        assert_eq!(headers_only.row_count(), 0);
        command.select(&SheetAddress::sheet("Sheet1"))
    };

    let table = executor.execute("/docs/items.xlsx", &strategy, &()).unwrap();
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_unknown_document_is_unavailable() {
    let executor = QueryExecutor::new(StoreConnectionFactory::new(DocumentStore::new()));
    let strategy = |command: &mut QueryCommand<'_>, address: &SheetAddress| command.select(address);

    let err = executor
        .execute("/docs/absent.xlsx", &strategy, &SheetAddress::sheet("Sheet1"))
        .unwrap_err();
    assert!(matches!(err, QueryError::DataSourceUnavailable { .. }));
}

#[test]
fn test_unknown_sheet_is_statement_error() {
    let executor = QueryExecutor::new(StoreConnectionFactory::new(seeded_store()));
    let strategy = |command: &mut QueryCommand<'_>, address: &SheetAddress| command.select(address);

    let err = executor
        .execute("/docs/items.xlsx", &strategy, &SheetAddress::sheet("Nope"))
        .unwrap_err();
    assert!(matches!(err, QueryError::Statement(_)));
}

#[test]
fn test_delimited_file_through_executor() -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("orders-")
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(b"Id,Total\n1,9.5\n2,12\n").unwrap();
    file.flush().unwrap();
    let table_name = file
        .path()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap()
        .to_string();

    let executor = QueryExecutor::new(DelimitedConnectionFactory::new());
    let strategy = |command: &mut QueryCommand<'_>, address: &SheetAddress| command.select(address);

    let table = executor.execute(file.path(), &strategy, &SheetAddress::sheet(table_name))?;
    assert_eq!(table.column_names(), ["Id", "Total"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.row(1).unwrap().get("Total"),
        Some(&CellValue::Number(12.0))
    );
    Ok(())
}
