//! Mutation requests and save formats

use crate::address::{ColumnRange, RowRange};
use crate::locator::SheetLocator;
use crate::value::CellValue;

/// Output formats a document can be saved or exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SaveFormat {
    /// The application's native workbook format
    Workbook,
    /// Delimited-text export of the first sheet
    TabularText,
    /// Paginated, layout-preserving export of the first sheet
    FixedFormat,
}

impl SaveFormat {
    /// Target file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Workbook => "xlsx",
            SaveFormat::TabularText => "csv",
            SaveFormat::FixedFormat => "pdf",
        }
    }
}

/// One cell write: sheet, 1-based row and column, and the new value.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub sheet: SheetLocator,
    pub row: u32,
    pub column: u32,
    pub value: CellValue,
}

impl CellWrite {
    pub fn new(
        sheet: impl Into<SheetLocator>,
        row: u32,
        column: u32,
        value: impl Into<CellValue>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            column,
            value: value.into(),
        }
    }
}

/// A single document mutation operation.
///
/// Requests carry their target locator and payload explicitly so a batch can
/// be validated before any of it runs, and executed strictly in caller order.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    /// Write one cell
    SetCell(CellWrite),
    /// Remove the last `count` rows of the contiguous block anchored at A1,
    /// re-resolving the block end before each single-row deletion
    DeleteTrailingRows { sheet: SheetLocator, count: u32 },
    /// Delete a whole-row range (e.g. "3:5")
    DeleteRows { sheet: SheetLocator, rows: RowRange },
    /// Delete a whole-column range (e.g. "B:D")
    DeleteColumns {
        sheet: SheetLocator,
        columns: ColumnRange,
    },
    /// Save a copy in the given format next to the source document
    SaveAs { format: SaveFormat },
    /// Delimited-text export, optionally dropping the first row of the
    /// first sheet beforehand
    SaveAsTabularText { eliminate_first_row: bool },
    /// Paginated fixed-layout export of the first sheet
    ExportFixedFormat,
}

impl MutationRequest {
    /// The sheet this request targets, if it targets one
    pub fn sheet(&self) -> Option<&SheetLocator> {
        match self {
            MutationRequest::SetCell(write) => Some(&write.sheet),
            MutationRequest::DeleteTrailingRows { sheet, .. } => Some(sheet),
            MutationRequest::DeleteRows { sheet, .. } => Some(sheet),
            MutationRequest::DeleteColumns { sheet, .. } => Some(sheet),
            MutationRequest::SaveAs { .. }
            | MutationRequest::SaveAsTabularText { .. }
            | MutationRequest::ExportFixedFormat => None,
        }
    }

    /// Whether this request changes the document in place (and therefore
    /// requires an in-place save at the end of the transaction)
    pub fn mutates_in_place(&self) -> bool {
        matches!(
            self,
            MutationRequest::SetCell(_)
                | MutationRequest::DeleteTrailingRows { .. }
                | MutationRequest::DeleteRows { .. }
                | MutationRequest::DeleteColumns { .. }
        )
    }
}
