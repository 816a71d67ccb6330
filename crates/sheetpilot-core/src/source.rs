//! Data source handle

use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a tabular document by path.
///
/// This is only a reference handed to a connection factory; it is not a live
/// resource and holds nothing open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSourceHandle {
    path: PathBuf,
}

impl DataSourceHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl From<&Path> for DataSourceHandle {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for DataSourceHandle {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for DataSourceHandle {
    fn from(path: &str) -> Self {
        Self::new(PathBuf::from(path))
    }
}

impl fmt::Display for DataSourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
