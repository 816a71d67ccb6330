//! Sheet addressing grammar for the query provider

use std::fmt;
use std::str::FromStr;

use sheetpilot_core::CellRange;

use crate::error::{QueryError, Result};

/// A sheet address in the provider's grammar: `Sheet1$` or `Sheet1$A1:C7`.
///
/// The `$` suffix marks a sheet-level table; an optional A1-notation range
/// after it restricts the addressed region. The first row of the addressed
/// region is always treated as the header row — the query path exposes no
/// switch for this, unlike the export path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetAddress {
    sheet: String,
    range: Option<CellRange>,
}

impl SheetAddress {
    /// Address a whole sheet
    pub fn sheet(name: impl Into<String>) -> Self {
        Self {
            sheet: name.into(),
            range: None,
        }
    }

    /// Address a cell-range restriction of a sheet
    pub fn sheet_range(name: impl Into<String>, range: CellRange) -> Self {
        Self {
            sheet: name.into(),
            range: Some(range),
        }
    }

    /// Parse from the provider grammar: `Sheet1$` or `Sheet1$A1:C7`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (sheet, rest) = s
            .split_once('$')
            .ok_or_else(|| QueryError::Statement(format!("missing '$' in sheet address '{s}'")))?;
        if sheet.is_empty() {
            return Err(QueryError::Statement(format!(
                "missing sheet name in address '{s}'"
            )));
        }
        let range = if rest.is_empty() {
            None
        } else {
            Some(CellRange::parse(rest)?)
        };
        Ok(Self {
            sheet: sheet.to_string(),
            range,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    pub fn range(&self) -> Option<&CellRange> {
        self.range.as_ref()
    }
}

impl fmt::Display for SheetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}${range}", self.sheet),
            None => write!(f, "{}$", self.sheet),
        }
    }
}

impl FromStr for SheetAddress {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One statement a command can run against an open connection.
///
/// The underlying provider treats documents as read-only relational sources;
/// row and cell deletion are not expressible there, so selection over a sheet
/// address is the whole statement surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select { address: SheetAddress },
}

impl Statement {
    pub fn select(address: SheetAddress) -> Self {
        Statement::Select { address }
    }
}
