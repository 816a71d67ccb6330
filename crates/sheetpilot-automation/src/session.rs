//! Scoped automation transactions over one document

use std::path::{Path, PathBuf};

use sheetpilot_core::{CellWrite, ColumnRange, MutationRequest, RowRange, SaveFormat, SheetLocator};

use crate::error::{Error, Result};
use crate::traits::{ApplicationLauncher, AutomationProcess, LaunchOptions, OpenDocument};

type DocumentOf<L> = <<L as ApplicationLauncher>::Process as AutomationProcess>::Document;

/// Runs document mutations as scoped transactions against an external
/// editing application.
///
/// Every transaction launches a fresh application instance, opens the
/// document, hands it to the caller's mutation logic, and then releases the
/// document and the instance in that order — on success, on error, and on
/// panic alike. Cleanup runs at most once per resource; a second pass finds
/// nothing left to release.
///
/// When the transaction body fails, its error is what the caller gets:
/// cleanup failures on that path are logged, not returned, so they cannot
/// mask the original problem.
pub struct DocumentAutomationSession<L: ApplicationLauncher> {
    launcher: L,
    options: LaunchOptions,
}

impl<L: ApplicationLauncher> DocumentAutomationSession<L> {
    /// Create a session launching the application hidden with alerts
    /// suppressed
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            options: LaunchOptions::default(),
        }
    }

    pub fn with_options(launcher: L, options: LaunchOptions) -> Self {
        Self { launcher, options }
    }

    /// Launch the application, open `path`, run `mutate` against the open
    /// document, and release the document and the application instance.
    ///
    /// The document is closed before the application quits. If `mutate`
    /// succeeds but cleanup fails, the first cleanup failure is returned so
    /// a leaked instance does not pass silently.
    pub fn run_transaction<T, F>(&self, path: impl AsRef<Path>, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut DocumentOf<L>) -> Result<T>,
    {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "starting automation transaction");
        let mut process = self.launcher.launch(&self.options)?;

        let document = match process.open_document(path) {
            Ok(document) => document,
            Err(err) => {
                // The instance was already running, so it still has to go.
                if let Err(quit_err) = process.quit() {
                    tracing::warn!(error = %quit_err, "application quit failed after open error");
                }
                return Err(err);
            }
        };

        let mut guard = TransactionGuard {
            process: Some(process),
            document: Some(document),
        };
        let result = guard.mutate_with(mutate);
        let mut failures = guard.cleanup().into_iter();

        match result {
            Ok(value) => match failures.next() {
                None => {
                    tracing::debug!(path = %path.display(), "transaction complete");
                    Ok(value)
                }
                Some(first) => {
                    for failure in failures {
                        tracing::warn!(error = %failure, "additional cleanup failure");
                    }
                    Err(first)
                }
            },
            Err(err) => {
                for failure in failures {
                    tracing::warn!(error = %failure, "cleanup failure after transaction error");
                }
                Err(err)
            }
        }
    }

    /// Run a batch of mutation requests as one transaction, returning the
    /// paths of any saved copies or exports in request order.
    ///
    /// All by-name sheet locators in the batch are validated against the
    /// document before any request runs, so a misspelled sheet name late in
    /// a batch cannot leave earlier mutations half-applied. Requests then
    /// execute strictly in caller order, and in-place changes are saved once
    /// at the end of the batch.
    pub fn apply(
        &self,
        path: impl AsRef<Path>,
        requests: &[MutationRequest],
    ) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        self.run_transaction(path, |document| {
            validate_sheets(document, requests)?;

            let mut outputs = Vec::new();
            let mut dirty = false;
            for request in requests {
                dirty = dirty || request.mutates_in_place();
                match request {
                    MutationRequest::SetCell(write) => {
                        document.set_cell(&write.sheet, write.row, write.column, &write.value)?;
                    }
                    MutationRequest::DeleteTrailingRows { sheet, count } => {
                        for _ in 0..*count {
                            // The block end moves after every deletion, so it
                            // is re-resolved per row, not computed once.
                            let Some(last) = document.last_contiguous_row(sheet)? else {
                                break;
                            };
                            document.delete_rows(sheet, &RowRange::single(last)?)?;
                        }
                    }
                    MutationRequest::DeleteRows { sheet, rows } => {
                        document.delete_rows(sheet, rows)?;
                    }
                    MutationRequest::DeleteColumns { sheet, columns } => {
                        document.delete_columns(sheet, columns)?;
                    }
                    MutationRequest::SaveAs { format } => {
                        outputs.push(save_copy(document, path, *format)?);
                    }
                    MutationRequest::SaveAsTabularText {
                        eliminate_first_row,
                    } => {
                        if *eliminate_first_row {
                            // Shapes the export only; this deletion is not
                            // what marks the document dirty.
                            document
                                .delete_rows(&SheetLocator::ByIndex(1), &RowRange::single(1)?)?;
                        }
                        outputs.push(save_copy(document, path, SaveFormat::TabularText)?);
                    }
                    MutationRequest::ExportFixedFormat => {
                        outputs.push(save_copy(document, path, SaveFormat::FixedFormat)?);
                    }
                }
            }

            if dirty {
                document.save()?;
            }
            Ok(outputs)
        })
    }

    // === Convenience operations ===

    /// Save a copy of the document next to the source in the given format
    pub fn save_as(&self, path: impl AsRef<Path>, format: SaveFormat) -> Result<PathBuf> {
        let path = path.as_ref();
        self.run_transaction(path, |document| save_copy(document, path, format))
    }

    /// Delimited-text export of the first sheet, optionally dropping its
    /// first row beforehand
    pub fn save_as_tabular_text(
        &self,
        path: impl AsRef<Path>,
        eliminate_first_row: bool,
    ) -> Result<PathBuf> {
        let path = path.as_ref();
        self.run_transaction(path, |document| {
            if eliminate_first_row {
                document.delete_rows(&SheetLocator::ByIndex(1), &RowRange::single(1)?)?;
            }
            save_copy(document, path, SaveFormat::TabularText)
        })
    }

    /// Paginated fixed-layout export of the first sheet
    pub fn save_as_fixed_format(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        self.save_as(path, SaveFormat::FixedFormat)
    }

    /// Apply a batch of cell writes and save the document in place
    pub fn apply_cell_writes(&self, path: impl AsRef<Path>, writes: &[CellWrite]) -> Result<()> {
        let requests: Vec<MutationRequest> = writes
            .iter()
            .cloned()
            .map(MutationRequest::SetCell)
            .collect();
        self.apply(path, &requests)?;
        Ok(())
    }

    /// Remove the last `count` rows of the contiguous block anchored at A1,
    /// per sheet, and save in place
    pub fn delete_trailing_rows(
        &self,
        path: impl AsRef<Path>,
        per_sheet: &[(SheetLocator, u32)],
    ) -> Result<()> {
        let requests: Vec<MutationRequest> = per_sheet
            .iter()
            .cloned()
            .map(|(sheet, count)| MutationRequest::DeleteTrailingRows { sheet, count })
            .collect();
        self.apply(path, &requests)?;
        Ok(())
    }

    /// Delete whole-row ranges (e.g. "3:5"), per sheet, and save in place
    pub fn delete_rows_by_range(
        &self,
        path: impl AsRef<Path>,
        per_sheet: &[(SheetLocator, RowRange)],
    ) -> Result<()> {
        let requests: Vec<MutationRequest> = per_sheet
            .iter()
            .cloned()
            .map(|(sheet, rows)| MutationRequest::DeleteRows { sheet, rows })
            .collect();
        self.apply(path, &requests)?;
        Ok(())
    }

    /// Delete whole-column ranges (e.g. "B:D"), per sheet, and save in place
    pub fn delete_columns_by_range(
        &self,
        path: impl AsRef<Path>,
        per_sheet: &[(SheetLocator, ColumnRange)],
    ) -> Result<()> {
        let requests: Vec<MutationRequest> = per_sheet
            .iter()
            .cloned()
            .map(|(sheet, columns)| MutationRequest::DeleteColumns { sheet, columns })
            .collect();
        self.apply(path, &requests)?;
        Ok(())
    }
}

/// Owns the open document and the running instance for the span of one
/// transaction, so an unwind still releases both in order.
struct TransactionGuard<P: AutomationProcess> {
    process: Option<P>,
    document: Option<P::Document>,
}

impl<P: AutomationProcess> TransactionGuard<P> {
    fn mutate_with<T>(&mut self, f: impl FnOnce(&mut P::Document) -> Result<T>) -> Result<T> {
        match self.document.as_mut() {
            Some(document) => f(document),
            None => Err(Error::Mutation("document already released".into())),
        }
    }

    /// Release the document, then the instance. Each resource is taken out
    /// of the guard first, so a repeated call finds nothing to do.
    fn cleanup(&mut self) -> Vec<Error> {
        let mut failures = Vec::new();
        if let Some(mut document) = self.document.take() {
            if let Err(err) = document.close() {
                failures.push(Error::Cleanup {
                    step: "close the document",
                    reason: err.to_string(),
                });
            }
        }
        if let Some(mut process) = self.process.take() {
            if let Err(err) = process.quit() {
                failures.push(Error::Cleanup {
                    step: "quit the application",
                    reason: err.to_string(),
                });
            }
        }
        failures
    }
}

impl<P: AutomationProcess> Drop for TransactionGuard<P> {
    fn drop(&mut self) {
        for failure in self.cleanup() {
            tracing::warn!(error = %failure, "cleanup failure during unwind");
        }
    }
}

fn validate_sheets<D: OpenDocument>(document: &D, requests: &[MutationRequest]) -> Result<()> {
    let named: Vec<&str> = requests
        .iter()
        .filter_map(|request| request.sheet().and_then(SheetLocator::name))
        .collect();
    if named.is_empty() {
        return Ok(());
    }
    let names = document.sheet_names()?;
    for name in named {
        if !names.iter().any(|n| n == name) {
            return Err(Error::SheetNotFound(name.to_string()));
        }
    }
    Ok(())
}

fn save_copy<D: OpenDocument>(
    document: &mut D,
    source: &Path,
    format: SaveFormat,
) -> Result<PathBuf> {
    let target = source.with_extension(format.extension());
    match format {
        SaveFormat::FixedFormat => document.export_fixed_format(&target),
        SaveFormat::Workbook | SaveFormat::TabularText => document.save_as(&target, format),
    }
}
