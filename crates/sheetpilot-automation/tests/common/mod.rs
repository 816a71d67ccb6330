//! Counting engine doubles shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sheetpilot_automation::{
    ApplicationLauncher, AutomationProcess, Error, LaunchOptions, MemoryDocument, MemoryLauncher,
    MemoryProcess, OpenDocument, Result,
};
use sheetpilot_core::{CellValue, ColumnRange, DocumentStore, RowRange, SaveFormat, SheetLocator};

/// Lifecycle counters recorded by the counting engine
#[derive(Debug, Default)]
pub struct EngineLog {
    pub launches: u32,
    pub opens: u32,
    pub document_closes: u32,
    pub process_quits: u32,
}

pub type SharedLog = Arc<Mutex<EngineLog>>;

/// Which cleanup steps the engine should refuse
#[derive(Debug, Default, Clone, Copy)]
pub struct FailurePlan {
    pub fail_document_close: bool,
    pub fail_process_quit: bool,
}

/// Wraps the in-memory engine, counting every lifecycle call and optionally
/// injecting cleanup failures.
pub struct CountingLauncher {
    inner: MemoryLauncher,
    log: SharedLog,
    plan: FailurePlan,
}

impl CountingLauncher {
    pub fn new(store: DocumentStore) -> (Self, SharedLog) {
        Self::with_plan(store, FailurePlan::default())
    }

    pub fn with_plan(store: DocumentStore, plan: FailurePlan) -> (Self, SharedLog) {
        let log: SharedLog = Arc::default();
        (
            Self {
                inner: MemoryLauncher::new(store),
                log: log.clone(),
                plan,
            },
            log,
        )
    }
}

impl ApplicationLauncher for CountingLauncher {
    type Process = CountingProcess;

    fn launch(&self, options: &LaunchOptions) -> Result<CountingProcess> {
        let process = self.inner.launch(options)?;
        self.log.lock().unwrap().launches += 1;
        Ok(CountingProcess {
            inner: process,
            log: self.log.clone(),
            plan: self.plan,
        })
    }
}

pub struct CountingProcess {
    inner: MemoryProcess,
    log: SharedLog,
    plan: FailurePlan,
}

impl AutomationProcess for CountingProcess {
    type Document = CountingDocument;

    fn open_document(&mut self, path: &Path) -> Result<CountingDocument> {
        let document = self.inner.open_document(path)?;
        self.log.lock().unwrap().opens += 1;
        Ok(CountingDocument {
            inner: document,
            log: self.log.clone(),
            plan: self.plan,
        })
    }

    fn quit(&mut self) -> Result<()> {
        self.log.lock().unwrap().process_quits += 1;
        if self.plan.fail_process_quit {
            return Err(Error::Mutation("engine refused to quit".into()));
        }
        self.inner.quit()
    }
}

pub struct CountingDocument {
    inner: MemoryDocument,
    log: SharedLog,
    plan: FailurePlan,
}

impl OpenDocument for CountingDocument {
    fn sheet_names(&self) -> Result<Vec<String>> {
        self.inner.sheet_names()
    }

    fn set_cell(
        &mut self,
        sheet: &SheetLocator,
        row: u32,
        column: u32,
        value: &CellValue,
    ) -> Result<()> {
        self.inner.set_cell(sheet, row, column, value)
    }

    fn last_contiguous_row(&self, sheet: &SheetLocator) -> Result<Option<u32>> {
        self.inner.last_contiguous_row(sheet)
    }

    fn delete_rows(&mut self, sheet: &SheetLocator, rows: &RowRange) -> Result<()> {
        self.inner.delete_rows(sheet, rows)
    }

    fn delete_columns(&mut self, sheet: &SheetLocator, columns: &ColumnRange) -> Result<()> {
        self.inner.delete_columns(sheet, columns)
    }

    fn save(&mut self) -> Result<()> {
        self.inner.save()
    }

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<PathBuf> {
        self.inner.save_as(target, format)
    }

    fn export_fixed_format(&mut self, target: &Path) -> Result<PathBuf> {
        self.inner.export_fixed_format(target)
    }

    fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().document_closes += 1;
        if self.plan.fail_document_close {
            return Err(Error::Mutation("document refused to close".into()));
        }
        self.inner.close()
    }
}

/// A store holding one document with a header row and `data_rows` data rows
/// in column A/B of "Sheet1"
pub fn seeded_store(path: &str, data_rows: u32) -> DocumentStore {
    let store = DocumentStore::new();
    let mut wb = sheetpilot_core::Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_value_at(0, 0, "Name");
    sheet.set_value_at(0, 1, "Amount");
    for row in 1..=data_rows {
        sheet.set_value_at(row, 0, format!("item{row}"));
        sheet.set_value_at(row, 1, row as f64);
    }
    store.insert(path, wb);
    store
}
