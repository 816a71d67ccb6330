//! In-memory automation engine backed by a [`DocumentStore`].
//!
//! Gives the session a real engine to drive without an external application:
//! documents live in the shared store, an "open" takes a working copy, and
//! only an explicit save publishes changes back. Delimited and fixed-layout
//! exports are written to the real filesystem, the same as the external
//! engines do.

use std::path::{Path, PathBuf};

use sheetpilot_core::{
    CellValue, ColumnRange, DocumentStore, RowRange, SaveFormat, SheetLocator, Workbook, Worksheet,
    MAX_COLS, MAX_ROWS,
};

use crate::error::{Error, Result};
use crate::traits::{ApplicationLauncher, AutomationProcess, LaunchOptions, OpenDocument};

/// Launches in-memory engine instances over a shared document store
#[derive(Debug, Clone)]
pub struct MemoryLauncher {
    store: DocumentStore,
}

impl MemoryLauncher {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

impl ApplicationLauncher for MemoryLauncher {
    type Process = MemoryProcess;

    fn launch(&self, options: &LaunchOptions) -> Result<MemoryProcess> {
        tracing::debug!(visible = options.visible, "starting in-memory engine");
        Ok(MemoryProcess {
            store: self.store.clone(),
            running: true,
        })
    }
}

/// One running in-memory engine instance
#[derive(Debug)]
pub struct MemoryProcess {
    store: DocumentStore,
    running: bool,
}

impl AutomationProcess for MemoryProcess {
    type Document = MemoryDocument;

    fn open_document(&mut self, path: &Path) -> Result<MemoryDocument> {
        if !self.running {
            return Err(Error::DocumentOpen {
                path: path.to_path_buf(),
                reason: "engine is not running".into(),
            });
        }
        let workbook = self.store.get(path).ok_or_else(|| Error::DocumentOpen {
            path: path.to_path_buf(),
            reason: "document not found".into(),
        })?;
        Ok(MemoryDocument {
            store: self.store.clone(),
            path: path.to_path_buf(),
            workbook,
            open: true,
        })
    }

    fn quit(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }
}

/// An open working copy of one stored document.
///
/// Mutations touch only the copy; `save` and `save_as` publish it. Closing
/// drops the copy, so an abandoned transaction leaves the store untouched.
#[derive(Debug)]
pub struct MemoryDocument {
    store: DocumentStore,
    path: PathBuf,
    workbook: Workbook,
    open: bool,
}

impl MemoryDocument {
    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Mutation("document is closed".into()))
        }
    }

    fn first_sheet(&self) -> Result<&Worksheet> {
        Ok(self.workbook.resolve(&SheetLocator::ByIndex(1))?)
    }

    fn write_tabular_text(&self, target: &Path) -> Result<PathBuf> {
        let export_err = |e: String| Error::SaveOrExport(format!("{}: {e}", target.display()));
        let sheet = self.first_sheet()?;
        let mut writer = csv::WriterBuilder::new()
            .from_path(target)
            .map_err(|e| export_err(e.to_string()))?;

        if let Some(region) = sheet.used_range() {
            // Exports always start at A1, whatever the used range is.
            for row in 0..=region.end.row {
                let record: Vec<String> = (0..=region.end.col)
                    .map(|col| sheet.value_at(row, col).to_string())
                    .collect();
                writer
                    .write_record(&record)
                    .map_err(|e| export_err(e.to_string()))?;
            }
        }
        writer.flush().map_err(|e| export_err(e.to_string()))?;
        Ok(target.to_path_buf())
    }

    fn write_fixed_format(&self, target: &Path) -> Result<PathBuf> {
        let sheet = self.first_sheet()?;
        let mut rendered = format!("{}\n{}\n", sheet.name(), "=".repeat(sheet.name().len()));
        if let Some(region) = sheet.used_range() {
            for row in 0..=region.end.row {
                let line: Vec<String> = (0..=region.end.col)
                    .map(|col| sheet.value_at(row, col).to_string())
                    .collect();
                rendered.push_str(&line.join(" | "));
                rendered.push('\n');
            }
        }
        std::fs::write(target, rendered)
            .map_err(|e| Error::SaveOrExport(format!("{}: {e}", target.display())))?;
        Ok(target.to_path_buf())
    }
}

impl OpenDocument for MemoryDocument {
    fn sheet_names(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self.workbook.sheet_names())
    }

    fn set_cell(
        &mut self,
        sheet: &SheetLocator,
        row: u32,
        column: u32,
        value: &CellValue,
    ) -> Result<()> {
        self.ensure_open()?;
        if row == 0 || column == 0 {
            return Err(Error::Mutation(
                "cell coordinates are 1-based".into(),
            ));
        }
        if row > MAX_ROWS || column > MAX_COLS as u32 {
            return Err(Error::Mutation(format!(
                "cell coordinates out of range: row {row}, column {column}"
            )));
        }
        let worksheet = self.workbook.resolve_mut(sheet)?;
        worksheet.set_value_at(row - 1, (column - 1) as u16, value.clone());
        Ok(())
    }

    fn last_contiguous_row(&self, sheet: &SheetLocator) -> Result<Option<u32>> {
        self.ensure_open()?;
        let worksheet = self.workbook.resolve(sheet)?;
        Ok(worksheet.last_contiguous_row(0, 0).map(|row| row + 1))
    }

    fn delete_rows(&mut self, sheet: &SheetLocator, rows: &RowRange) -> Result<()> {
        self.ensure_open()?;
        if rows.start == 0 {
            return Err(Error::Mutation("row numbers are 1-based".into()));
        }
        let worksheet = self.workbook.resolve_mut(sheet)?;
        worksheet.delete_rows(rows.start - 1, rows.end - 1)?;
        Ok(())
    }

    fn delete_columns(&mut self, sheet: &SheetLocator, columns: &ColumnRange) -> Result<()> {
        self.ensure_open()?;
        let worksheet = self.workbook.resolve_mut(sheet)?;
        worksheet.delete_columns(columns.start, columns.end)?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.store.insert(self.path.clone(), self.workbook.clone());
        Ok(())
    }

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<PathBuf> {
        self.ensure_open()?;
        match format {
            SaveFormat::Workbook => {
                self.store.insert(target, self.workbook.clone());
                Ok(target.to_path_buf())
            }
            SaveFormat::TabularText => self.write_tabular_text(target),
            SaveFormat::FixedFormat => self.write_fixed_format(target),
        }
    }

    fn export_fixed_format(&mut self, target: &Path) -> Result<PathBuf> {
        self.ensure_open()?;
        self.write_fixed_format(target)
    }

    fn close(&mut self) -> Result<()> {
        // Drops the working copy; unsaved changes are discarded.
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seeded() -> (DocumentStore, PathBuf) {
        let store = DocumentStore::new();
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_value_at(0, 0, "Name");
        sheet.set_value_at(1, 0, "widget");
        store.insert("/docs/report.xlsx", wb);
        (store, PathBuf::from("/docs/report.xlsx"))
    }

    fn open(store: &DocumentStore, path: &Path) -> MemoryDocument {
        let mut process = MemoryLauncher::new(store.clone())
            .launch(&LaunchOptions::default())
            .unwrap();
        process.open_document(path).unwrap()
    }

    #[test]
    fn test_open_missing_document() {
        let store = DocumentStore::new();
        let mut process = MemoryLauncher::new(store)
            .launch(&LaunchOptions::default())
            .unwrap();
        let err = process
            .open_document(Path::new("/docs/absent.xlsx"))
            .unwrap_err();
        assert!(matches!(err, Error::DocumentOpen { .. }));
    }

    #[test]
    fn test_mutations_publish_only_on_save() {
        let (store, path) = seeded();
        let mut document = open(&store, &path);

        document
            .set_cell(&SheetLocator::ByIndex(1), 3, 1, &"gadget".into())
            .unwrap();
        assert!(store
            .get(&path)
            .unwrap()
            .worksheet(0)
            .unwrap()
            .value_at(2, 0)
            .is_empty());

        document.save().unwrap();
        assert_eq!(
            store.get(&path).unwrap().worksheet(0).unwrap().value_at(2, 0),
            CellValue::Text("gadget".into())
        );
    }

    #[test]
    fn test_close_discards_unsaved_changes() {
        let (store, path) = seeded();
        let mut document = open(&store, &path);

        document
            .delete_rows(&SheetLocator::ByIndex(1), &RowRange::single(1).unwrap())
            .unwrap();
        document.close().unwrap();

        let stored = store.get(&path).unwrap();
        assert_eq!(stored.worksheet(0).unwrap().value_at(0, 0), "Name".into());
        assert!(document.save().is_err());
    }

    #[test]
    fn test_last_contiguous_row_is_one_based() {
        let (store, path) = seeded();
        let document = open(&store, &path);
        assert_eq!(
            document
                .last_contiguous_row(&SheetLocator::ByIndex(1))
                .unwrap(),
            Some(2)
        );
    }

    #[test]
    fn test_unknown_sheet_maps_to_sheet_not_found() {
        let (store, path) = seeded();
        let document = open(&store, &path);
        let err = document
            .last_contiguous_row(&SheetLocator::ByName("Nope".into()))
            .unwrap_err();
        assert!(matches!(err, Error::SheetNotFound(_)));
    }

    #[test]
    fn test_tabular_text_export() {
        let (store, path) = seeded();
        let mut document = open(&store, &path);

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.csv");
        let written = document
            .save_as(&target, SaveFormat::TabularText)
            .unwrap();

        let contents = std::fs::read_to_string(written).unwrap();
        assert_eq!(contents, "Name\nwidget\n");
    }
}
