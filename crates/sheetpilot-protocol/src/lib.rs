//! Shared protocol types for communication between the client and the
//! automation helper process that owns the real editing application.
//!
//! The protocol is JSON-over-stdio: one JSON object per line in each
//! direction. Sheet references and cell values reuse the core types, which
//! serialize untagged so the wire stays close to what the helper's own
//! automation API takes.

use serde::{Deserialize, Serialize};

use sheetpilot_core::{CellValue, SaveFormat, SheetLocator};

/// A command sent from the client to the helper process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Monotonically increasing request ID for correlating responses.
    pub id: u64,
    /// The command to execute.
    #[serde(flatten)]
    pub command: Command,
}

/// Commands the client can send to the helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum Command {
    /// Start the editing application inside the helper.
    Init,

    /// Open an existing document from a file path. Returns a document handle.
    OpenDocument { path: String },

    /// Get the document's sheet names, in tab order.
    SheetNames { document: u64 },

    /// Set a cell's value. Row and column are 1-based.
    SetCell {
        document: u64,
        sheet: SheetLocator,
        row: u32,
        column: u32,
        value: CellValue,
    },

    /// Last row of the contiguous populated block anchored at A1, 1-based.
    LastContiguousRow { document: u64, sheet: SheetLocator },

    /// Delete a whole-row range, e.g. "3:5".
    DeleteRows {
        document: u64,
        sheet: SheetLocator,
        rows: String,
    },

    /// Delete a whole-column range, e.g. "B:D".
    DeleteColumns {
        document: u64,
        sheet: SheetLocator,
        columns: String,
    },

    /// Save the document in place.
    Save { document: u64 },

    /// Save a copy at a path in the given format. Returns the written path.
    SaveAs {
        document: u64,
        path: String,
        format: SaveFormat,
    },

    /// Paginated fixed-layout export of the first sheet. Returns the written
    /// path.
    ExportFixedFormat { document: u64, path: String },

    /// Close a document without saving.
    CloseDocument { document: u64 },

    /// Shut down the helper: close all documents and quit the application.
    Shutdown,
}

/// A response sent from the helper back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The request ID this response corresponds to.
    pub id: u64,
    /// The result of the command.
    #[serde(flatten)]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ResponseResult {
    #[serde(rename = "ok")]
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<ResponseData>,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Data returned in successful responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Handle to a newly opened document.
    DocumentHandle { document: u64 },
    /// The document's sheet names.
    SheetNames { names: Vec<String> },
    /// A 1-based row number; absent when the anchor cell is empty.
    Row { row: Option<u32> },
    /// The path a copy or export was written to.
    SavedPath { path: String },
}
