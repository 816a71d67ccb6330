//! Cell, row, and column addressing

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address in A1 notation (e.g., "A1", "C7")
///
/// Rows and columns are 0-based internally and 1-based in display, the same
/// convention the worksheet storage uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetpilot_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B2").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{s}'")));
        }

        let col = Self::letters_to_column(&s[..pos])?;

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{s}'")));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{s}'")))?;

        // Displayed rows are 1-based
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{s}'"
            )));
        }

        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{c}'")));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        let col = col - 1;
        if col >= MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(col as u16, MAX_COLS - 1));
        }

        Ok(col as u16)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Self::column_to_letters(self.col),
            self.row + 1
        )
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "A1:C7")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new range, normalized so start is top-left
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Parse a range from "A1:C7" notation; a single address is a 1x1 range
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once(':') {
            Ok(Self::new(CellAddress::parse(start)?, CellAddress::parse(end)?))
        } else {
            let addr = CellAddress::parse(s)?;
            Ok(Self { start: addr, end: addr })
        }
    }

    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A whole-row range spec (e.g., "3:5"), 1-based inclusive
///
/// This is the row form the editing application's deletion API takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row, 1-based
    pub start: u32,
    /// Last row, 1-based inclusive
    pub end: u32,
}

impl RowRange {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start == 0 || end == 0 {
            return Err(Error::InvalidRange("row numbers are 1-based".into()));
        }
        Ok(Self {
            start: start.min(end),
            end: start.max(end),
        })
    }

    /// A single-row range; rejects row 0 like [`RowRange::new`]
    pub fn single(row: u32) -> Result<Self> {
        Self::new(row, row)
    }

    /// Parse from "3:5" or a single row "3"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse_row = |part: &str| -> Result<u32> {
            part.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidRange(format!("invalid row range '{s}'")))
        };
        if let Some((a, b)) = s.split_once(':') {
            Self::new(parse_row(a)?, parse_row(b)?)
        } else {
            Self::new(parse_row(s)?, parse_row(s)?)
        }
    }

    pub fn row_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for RowRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A whole-column range spec (e.g., "B:D"), by letter, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    /// First column, 0-based
    pub start: u16,
    /// Last column, 0-based inclusive
    pub end: u16,
}

impl ColumnRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A single-column range
    pub fn single(col: u16) -> Self {
        Self { start: col, end: col }
    }

    /// Parse from "B:D" or a single column "B"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((a, b)) = s.split_once(':') {
            Ok(Self::new(
                CellAddress::letters_to_column(a.trim())?,
                CellAddress::letters_to_column(b.trim())?,
            ))
        } else {
            Ok(Self::single(CellAddress::letters_to_column(s)?))
        }
    }

    pub fn col_count(&self) -> u16 {
        self.end - self.start + 1
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            CellAddress::column_to_letters(self.start),
            CellAddress::column_to_letters(self.end)
        )
    }
}

impl FromStr for ColumnRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
