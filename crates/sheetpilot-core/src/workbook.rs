//! Workbook type - the in-memory document structure

use crate::error::{Error, Result};
use crate::locator::SheetLocator;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// A workbook holds an ordered collection of worksheets addressed by name or
/// by 1-based position through [`SheetLocator`].
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1")],
        }
    }

    /// Create a workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by 0-based index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by 0-based index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// The live set of sheet names, in tab order
    pub fn sheet_names(&self) -> Vec<String> {
        self.worksheets.iter().map(|ws| ws.name().to_string()).collect()
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Resolve a locator to a worksheet
    pub fn resolve(&self, locator: &SheetLocator) -> Result<&Worksheet> {
        match locator {
            SheetLocator::ByName(name) => self
                .worksheet_by_name(name)
                .ok_or_else(|| Error::SheetNotFound(name.clone())),
            SheetLocator::ByIndex(position) => {
                // Positions are 1-based at the automation surface
                if *position == 0 {
                    return Err(Error::SheetOutOfBounds(*position, self.worksheets.len()));
                }
                self.worksheets
                    .get(*position as usize - 1)
                    .ok_or(Error::SheetOutOfBounds(*position, self.worksheets.len()))
            }
        }
    }

    /// Resolve a locator to a mutable worksheet
    pub fn resolve_mut(&mut self, locator: &SheetLocator) -> Result<&mut Worksheet> {
        let count = self.worksheets.len();
        match locator {
            SheetLocator::ByName(name) => self
                .worksheet_by_name_mut(name)
                .ok_or_else(|| Error::SheetNotFound(name.clone())),
            SheetLocator::ByIndex(position) => {
                if *position == 0 {
                    return Err(Error::SheetOutOfBounds(*position, count));
                }
                self.worksheets
                    .get_mut(*position as usize - 1)
                    .ok_or(Error::SheetOutOfBounds(*position, count))
            }
        }
    }

    /// Add a new worksheet at the end
    pub fn add_worksheet(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;
        let index = self.worksheets.len();
        self.worksheets.push(Worksheet::new(name));
        Ok(index)
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("sheet name cannot be empty".into()));
        }
        if name.len() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "sheet name too long (max {MAX_SHEET_NAME_LEN} characters)"
            )));
        }
        // Duplicate check is case-insensitive, matching the editing application
        let lower = name.to_lowercase();
        if self.worksheets.iter().any(|ws| ws.name().to_lowercase() == lower) {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}
