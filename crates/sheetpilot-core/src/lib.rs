//! # sheetpilot-core
//!
//! Core data structures for the sheetpilot document automation library.
//!
//! This crate provides the types shared by the query and automation crates:
//! - [`CellValue`] - Cell values (numbers, strings, booleans, empty)
//! - [`CellAddress`] and [`CellRange`] - A1-notation addressing
//! - [`SheetLocator`] - Sheet references by name or 1-based position
//! - [`MutationRequest`] - The tagged set of document mutation operations
//! - [`Table`] - An in-memory tabular query result
//! - [`Workbook`], [`Worksheet`] - The in-memory document model
//! - [`DocumentStore`] - A shared path-addressed document collection
//!
//! ## Example
//!
//! ```rust
//! use sheetpilot_core::{CellValue, Workbook};
//!
//! let mut wb = Workbook::new();
//! let sheet = wb.worksheet_mut(0).unwrap();
//! sheet.set_value_at(0, 0, "Hello");
//! sheet.set_value_at(0, 1, 42.0);
//! assert_eq!(sheet.value_at(0, 1), CellValue::Number(42.0));
//! ```

pub mod address;
pub mod error;
pub mod locator;
pub mod request;
pub mod source;
pub mod store;
pub mod table;
pub mod value;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use address::{CellAddress, CellRange, ColumnRange, RowRange};
pub use error::{Error, Result};
pub use locator::SheetLocator;
pub use request::{CellWrite, MutationRequest, SaveFormat};
pub use source::DataSourceHandle;
pub use store::DocumentStore;
pub use table::{Row, Table};
pub use value::CellValue;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
