//! # sheetpilot-bridge
//!
//! Helper-process engine for
//! [`DocumentAutomationSession`](sheetpilot_automation::DocumentAutomationSession).
//!
//! The real editing application is owned by a small helper executable that
//! speaks the [`sheetpilot_protocol`] JSON-over-stdio protocol. This crate
//! spawns that helper, keeps the pipe plumbing, and adapts the protocol to
//! the automation traits, so a session can drive the external application the
//! same way it drives the in-memory engine.

pub mod bridge;
mod io;

pub use bridge::{HelperConfig, HelperDocument, HelperLauncher, HelperProcess};
pub use io::IoError;
