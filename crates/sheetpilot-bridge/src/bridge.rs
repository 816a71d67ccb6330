//! Subprocess management for the helper that owns the editing application

use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::Arc;

use sheetpilot_automation::{
    ApplicationLauncher, AutomationProcess, Error, LaunchOptions, OpenDocument, Result,
};
use sheetpilot_core::{CellValue, ColumnRange, RowRange, SaveFormat, SheetLocator};
use sheetpilot_protocol::{Command, ResponseData};

use crate::io::{HelperIo, IoError};

/// Prefix the helper uses when a command names a sheet the document does not
/// have; the remainder of the message is the sheet name.
const SHEET_NOT_FOUND_PREFIX: &str = "sheet not found: ";

/// Configuration for the helper-process engine.
pub struct HelperConfig {
    /// Path to the helper executable. Defaults to `sheetpilot-helper` on the
    /// PATH.
    pub helper_path: PathBuf,

    /// Extra arguments appended to every launch.
    pub extra_args: Vec<String>,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            helper_path: PathBuf::from("sheetpilot-helper"),
            extra_args: Vec::new(),
        }
    }
}

/// Launches one helper process (and with it one application instance) per
/// transaction.
pub struct HelperLauncher {
    config: HelperConfig,
}

impl HelperLauncher {
    pub fn new(config: HelperConfig) -> Self {
        Self { config }
    }
}

impl Default for HelperLauncher {
    fn default() -> Self {
        Self::new(HelperConfig::default())
    }
}

/// Arguments passed to the helper for one launch.
fn helper_args(config: &HelperConfig, options: &LaunchOptions) -> Vec<String> {
    let mut args = Vec::new();
    if !options.visible {
        args.push("--hidden".to_string());
    }
    if options.suppress_alerts {
        args.push("--no-alerts".to_string());
    }
    args.extend(config.extra_args.iter().cloned());
    args.extend(options.extra_args.iter().cloned());
    args
}

impl ApplicationLauncher for HelperLauncher {
    type Process = HelperProcess;

    fn launch(&self, options: &LaunchOptions) -> Result<HelperProcess> {
        let mut cmd = std::process::Command::new(&self.config.helper_path);
        cmd.args(helper_args(&self.config, options));
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit()); // Helper diagnostics go to our stderr

        tracing::debug!(helper = %self.config.helper_path.display(), "spawning helper process");
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Launch(format!(
                    "helper not found: {}",
                    self.config.helper_path.display()
                ))
            } else {
                Error::Launch(e.to_string())
            }
        })?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        let io = Arc::new(HelperIo::new(stdin, stdout));

        // The handshake starts the application inside the helper.
        io.send(Command::Init)
            .map_err(|e| Error::Launch(e.to_string()))?;

        Ok(HelperProcess { child, io })
    }
}

/// A running helper process holding one application instance.
#[derive(Debug)]
pub struct HelperProcess {
    child: Child,
    io: Arc<HelperIo>,
}

impl AutomationProcess for HelperProcess {
    type Document = HelperDocument;

    fn open_document(&mut self, path: &Path) -> Result<HelperDocument> {
        let data = self
            .io
            .send(Command::OpenDocument {
                path: path.display().to_string(),
            })
            .map_err(|e| Error::DocumentOpen {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        match data {
            Some(ResponseData::DocumentHandle { document }) => Ok(HelperDocument {
                io: self.io.clone(),
                handle: document,
            }),
            _ => Err(Error::DocumentOpen {
                path: path.to_path_buf(),
                reason: IoError::UnexpectedResponse.to_string(),
            }),
        }
    }

    fn quit(&mut self) -> Result<()> {
        // Ask politely first; a helper that stopped answering gets killed.
        if let Err(err) = self.io.send(Command::Shutdown) {
            tracing::warn!(error = %err, "helper did not acknowledge shutdown");
            if let Err(kill_err) = self.child.kill() {
                tracing::warn!(error = %kill_err, "failed to kill helper process");
            }
        }
        self.child.wait().map_err(|e| Error::Cleanup {
            step: "quit the application",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// One document opened inside the helper, addressed by handle.
pub struct HelperDocument {
    io: Arc<HelperIo>,
    handle: u64,
}

fn mutation_error(err: IoError) -> Error {
    if let IoError::Remote(message) = &err {
        if let Some(name) = message.strip_prefix(SHEET_NOT_FOUND_PREFIX) {
            return Error::SheetNotFound(name.to_string());
        }
    }
    Error::Mutation(err.to_string())
}

impl HelperDocument {
    fn expect_saved_path(data: Option<ResponseData>) -> Result<PathBuf> {
        match data {
            Some(ResponseData::SavedPath { path }) => Ok(PathBuf::from(path)),
            _ => Err(Error::SaveOrExport(
                IoError::UnexpectedResponse.to_string(),
            )),
        }
    }
}

impl OpenDocument for HelperDocument {
    fn sheet_names(&self) -> Result<Vec<String>> {
        let data = self
            .io
            .send(Command::SheetNames {
                document: self.handle,
            })
            .map_err(mutation_error)?;
        match data {
            Some(ResponseData::SheetNames { names }) => Ok(names),
            _ => Err(Error::Mutation(IoError::UnexpectedResponse.to_string())),
        }
    }

    fn set_cell(
        &mut self,
        sheet: &SheetLocator,
        row: u32,
        column: u32,
        value: &CellValue,
    ) -> Result<()> {
        self.io
            .send(Command::SetCell {
                document: self.handle,
                sheet: sheet.clone(),
                row,
                column,
                value: value.clone(),
            })
            .map_err(mutation_error)?;
        Ok(())
    }

    fn last_contiguous_row(&self, sheet: &SheetLocator) -> Result<Option<u32>> {
        let data = self
            .io
            .send(Command::LastContiguousRow {
                document: self.handle,
                sheet: sheet.clone(),
            })
            .map_err(mutation_error)?;
        match data {
            Some(ResponseData::Row { row }) => Ok(row),
            _ => Err(Error::Mutation(IoError::UnexpectedResponse.to_string())),
        }
    }

    fn delete_rows(&mut self, sheet: &SheetLocator, rows: &RowRange) -> Result<()> {
        self.io
            .send(Command::DeleteRows {
                document: self.handle,
                sheet: sheet.clone(),
                rows: rows.to_string(),
            })
            .map_err(mutation_error)?;
        Ok(())
    }

    fn delete_columns(&mut self, sheet: &SheetLocator, columns: &ColumnRange) -> Result<()> {
        self.io
            .send(Command::DeleteColumns {
                document: self.handle,
                sheet: sheet.clone(),
                columns: columns.to_string(),
            })
            .map_err(mutation_error)?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.io
            .send(Command::Save {
                document: self.handle,
            })
            .map_err(|e| Error::SaveOrExport(e.to_string()))?;
        Ok(())
    }

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<PathBuf> {
        let data = self
            .io
            .send(Command::SaveAs {
                document: self.handle,
                path: target.display().to_string(),
                format,
            })
            .map_err(|e| Error::SaveOrExport(e.to_string()))?;
        Self::expect_saved_path(data)
    }

    fn export_fixed_format(&mut self, target: &Path) -> Result<PathBuf> {
        let data = self
            .io
            .send(Command::ExportFixedFormat {
                document: self.handle,
                path: target.display().to_string(),
            })
            .map_err(|e| Error::SaveOrExport(e.to_string()))?;
        Self::expect_saved_path(data)
    }

    fn close(&mut self) -> Result<()> {
        self.io
            .send(Command::CloseDocument {
                document: self.handle,
            })
            .map_err(|e| Error::Cleanup {
                step: "close the document",
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HelperConfig::default();
        assert_eq!(config.helper_path, PathBuf::from("sheetpilot-helper"));
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn test_helper_args_for_unattended_run() {
        let config = HelperConfig::default();
        let args = helper_args(&config, &LaunchOptions::default());
        assert_eq!(args, vec!["--hidden", "--no-alerts"]);
    }

    #[test]
    fn test_helper_args_for_visible_run() {
        let config = HelperConfig {
            extra_args: vec!["--profile=test".into()],
            ..HelperConfig::default()
        };
        let args = helper_args(&config, &LaunchOptions::visible());
        assert_eq!(args, vec!["--no-alerts", "--profile=test"]);
    }

    #[test]
    fn test_missing_helper_is_a_launch_error() {
        let launcher = HelperLauncher::new(HelperConfig {
            helper_path: PathBuf::from("/nonexistent/sheetpilot-helper"),
            ..HelperConfig::default()
        });
        let err = launcher.launch(&LaunchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Launch(reason) if reason.contains("helper not found")));
    }

    #[test]
    fn test_remote_sheet_errors_map_to_sheet_not_found() {
        let err = mutation_error(IoError::Remote("sheet not found: Data".into()));
        assert!(matches!(err, Error::SheetNotFound(name) if name == "Data"));

        let err = mutation_error(IoError::Remote("range is locked".into()));
        assert!(matches!(err, Error::Mutation(_)));
    }
}
