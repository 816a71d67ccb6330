//! # sheetpilot-query
//!
//! Connection-scoped query execution over tabular documents.
//!
//! A document (one logical table per sheet) is opened through a
//! [`ConnectionFactory`], and a caller-supplied [`StatementStrategy`] runs one
//! statement against the bound [`QueryCommand`]. The [`QueryExecutor`] owns
//! the connection lifecycle: it is opened once per call and released on every
//! exit path, whether the strategy returns or fails.
//!
//! # Example
//!
//! ```rust
//! use sheetpilot_core::{DocumentStore, Workbook};
//! use sheetpilot_query::{QueryCommand, QueryExecutor, Result, SheetAddress, StoreConnectionFactory};
//!
//! let store = DocumentStore::new();
//! let mut wb = Workbook::new();
//! let sheet = wb.worksheet_mut(0).unwrap();
//! sheet.set_value_at(0, 0, "Name");
//! sheet.set_value_at(1, 0, "widget");
//! store.insert("/docs/items.xlsx", wb);
//!
//! let executor = QueryExecutor::new(StoreConnectionFactory::new(store));
//! let strategy = |command: &mut QueryCommand<'_>, address: &SheetAddress| command.select(address);
//! let table = executor
//!     .execute("/docs/items.xlsx", &strategy, &SheetAddress::parse("Sheet1$")?)
//!     .unwrap();
//! assert_eq!(table.column_names(), ["Name"]);
//! # Ok::<(), sheetpilot_query::QueryError>(())
//! ```

pub mod address;
pub mod delimited;
pub mod error;
pub mod executor;
pub mod store;

pub use address::{SheetAddress, Statement};
pub use delimited::{DelimitedConnectionFactory, DelimitedOptions};
pub use error::{QueryError, Result};
pub use executor::{
    ConnectionFactory, QueryCommand, QueryExecutor, StatementStrategy, TabularConnection,
};
pub use store::StoreConnectionFactory;
