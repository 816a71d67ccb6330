//! Sheet locator type

use std::fmt;

/// A reference to a worksheet, by name or by 1-based position.
///
/// The automation surface accepts both forms everywhere the editing
/// application does. Positions are 1-based to match how the application
/// numbers its sheet tabs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SheetLocator {
    ByIndex(u32),
    ByName(String),
}

impl SheetLocator {
    /// The sheet name, if this locator is by name.
    pub fn name(&self) -> Option<&str> {
        match self {
            SheetLocator::ByName(name) => Some(name),
            SheetLocator::ByIndex(_) => None,
        }
    }
}

impl From<&str> for SheetLocator {
    fn from(name: &str) -> Self {
        SheetLocator::ByName(name.to_string())
    }
}

impl From<String> for SheetLocator {
    fn from(name: String) -> Self {
        SheetLocator::ByName(name)
    }
}

impl From<u32> for SheetLocator {
    fn from(position: u32) -> Self {
        SheetLocator::ByIndex(position)
    }
}

impl fmt::Display for SheetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetLocator::ByName(name) => write!(f, "{name}"),
            SheetLocator::ByIndex(position) => write!(f, "#{position}"),
        }
    }
}
