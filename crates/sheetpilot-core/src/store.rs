//! Shared path-addressed document collection

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::workbook::Workbook;

/// A shared collection of workbooks addressed by path.
///
/// Stands in for the filesystem for the embedded automation engine and the
/// in-memory query factory: documents are stored and retrieved by the same
/// paths the external application would use, and a "save" replaces the stored
/// copy wholesale. Cloning the store clones the handle, not the contents.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<Mutex<HashMap<PathBuf, Workbook>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a workbook at a path, replacing any existing document
    pub fn insert(&self, path: impl Into<PathBuf>, workbook: Workbook) {
        self.documents.lock().unwrap().insert(path.into(), workbook);
    }

    /// Retrieve a copy of the document at a path
    pub fn get(&self, path: &Path) -> Option<Workbook> {
        self.documents.lock().unwrap().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.lock().unwrap().contains_key(path)
    }

    pub fn remove(&self, path: &Path) -> Option<Workbook> {
        self.documents.lock().unwrap().remove(path)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().unwrap().is_empty()
    }
}
