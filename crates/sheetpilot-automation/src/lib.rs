//! # sheetpilot-automation
//!
//! Scoped document automation transactions.
//!
//! A [`DocumentAutomationSession`] drives an external editing application
//! through one transaction at a time: launch the application hidden, open the
//! document, run the caller's mutations, and release the document and the
//! application on every exit path, in that order. The engine behind a session
//! is pluggable through [`ApplicationLauncher`]; [`MemoryLauncher`] provides
//! an embedded engine over a [`DocumentStore`](sheetpilot_core::DocumentStore)
//! for tests and local runs.
//!
//! # Example
//!
//! ```rust
//! use sheetpilot_automation::{DocumentAutomationSession, MemoryLauncher};
//! use sheetpilot_core::{CellWrite, DocumentStore, Workbook};
//!
//! let store = DocumentStore::new();
//! store.insert("/docs/report.xlsx", Workbook::new());
//!
//! let session = DocumentAutomationSession::new(MemoryLauncher::new(store.clone()));
//! session.apply_cell_writes(
//!     "/docs/report.xlsx",
//!     &[CellWrite::new(1u32, 1, 1, "total"), CellWrite::new(1u32, 1, 2, 42)],
//! )?;
//!
//! let saved = store.get("/docs/report.xlsx".as_ref()).unwrap();
//! assert_eq!(saved.worksheet(0).unwrap().value_at(0, 1), 42.into());
//! # Ok::<(), sheetpilot_automation::Error>(())
//! ```

pub mod error;
pub mod memory;
pub mod session;
pub mod traits;

pub use error::{Error, Result};
pub use memory::{MemoryDocument, MemoryLauncher, MemoryProcess};
pub use session::DocumentAutomationSession;
pub use traits::{ApplicationLauncher, AutomationProcess, LaunchOptions, OpenDocument};
