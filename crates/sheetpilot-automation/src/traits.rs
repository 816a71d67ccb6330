//! Seams between the transaction logic and the editing application.
//!
//! The session never talks to an application directly; it goes through these
//! three traits so the engine can be a COM-style helper process, a headless
//! office suite, or the in-memory engine used in tests. Implementations are
//! synchronous: the underlying applications serialize everything onto one
//! automation thread anyway, so an async surface would only pretend
//! otherwise.

use std::path::{Path, PathBuf};

use sheetpilot_core::{CellValue, ColumnRange, RowRange, SaveFormat, SheetLocator};

use crate::error::Result;

/// How the application is started for one transaction.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Show the application window. Off by default: these transactions run
    /// unattended, and a visible window invites interference.
    pub visible: bool,
    /// Suppress interactive prompts (overwrite confirmations, recovery
    /// dialogs) that would otherwise hang an unattended run
    pub suppress_alerts: bool,
    /// Extra engine-specific launch arguments
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            visible: false,
            suppress_alerts: true,
            extra_args: Vec::new(),
        }
    }
}

impl LaunchOptions {
    /// Options for a visible, interactive run (debugging aid)
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }
}

/// Starts one application instance per transaction.
///
/// Injected into the session so the engine can be substituted without
/// touching transaction logic.
pub trait ApplicationLauncher {
    type Process: AutomationProcess;

    fn launch(&self, options: &LaunchOptions) -> Result<Self::Process>;
}

/// A running application instance.
pub trait AutomationProcess {
    type Document: OpenDocument;

    /// Open the document at `path` inside this instance
    fn open_document(&mut self, path: &Path) -> Result<Self::Document>;

    /// Terminate the instance. Must be safe to call more than once.
    fn quit(&mut self) -> Result<()>;
}

/// A document opened inside a running application instance.
///
/// Rows and columns are 1-based here, matching how the editing application
/// numbers them; implementations convert to their own storage convention.
pub trait OpenDocument {
    /// Names of the document's sheets, in tab order
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Write one cell
    fn set_cell(
        &mut self,
        sheet: &SheetLocator,
        row: u32,
        column: u32,
        value: &CellValue,
    ) -> Result<()>;

    /// Last row of the contiguous populated block anchored at the sheet's A1
    /// cell, 1-based; `None` when A1 itself is empty
    fn last_contiguous_row(&self, sheet: &SheetLocator) -> Result<Option<u32>>;

    /// Delete a whole-row range; rows below shift up
    fn delete_rows(&mut self, sheet: &SheetLocator, rows: &RowRange) -> Result<()>;

    /// Delete a whole-column range; columns to the right shift left
    fn delete_columns(&mut self, sheet: &SheetLocator, columns: &ColumnRange) -> Result<()>;

    /// Save the document in place
    fn save(&mut self) -> Result<()>;

    /// Save a copy at `target` in the given format, returning the written path
    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<PathBuf>;

    /// Paginated fixed-layout export of the first sheet, returning the
    /// written path
    fn export_fixed_format(&mut self, target: &Path) -> Result<PathBuf>;

    /// Close the document without saving. Must be safe to call more than
    /// once.
    fn close(&mut self) -> Result<()>;
}
