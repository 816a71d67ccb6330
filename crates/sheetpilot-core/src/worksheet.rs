//! Worksheet type - a single sheet of sparse cells

use std::collections::BTreeMap;

use crate::address::CellRange;
use crate::error::{Error, Result};
use crate::value::CellValue;
use crate::{MAX_COLS, MAX_ROWS};

/// A single worksheet with sparse cell storage.
///
/// Rows and columns are 0-based here; the automation surface converts from
/// the editing application's 1-based coordinates at the boundary.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl Worksheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    // === Cell access ===

    /// Set a cell value; an `Empty` value clears the cell
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) {
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// Get a cell value, `Empty` if the cell is unset
    pub fn value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        self.cells.remove(&(row, col));
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Range operations ===

    /// Bounds of all populated cells, if any
    pub fn used_range(&self) -> Option<CellRange> {
        let mut iter = self.cells.keys();
        let &(first_row, first_col) = iter.next()?;
        let (mut min_row, mut max_row) = (first_row, first_row);
        let (mut min_col, mut max_col) = (first_col, first_col);
        for &(row, col) in iter {
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }
        Some(CellRange::from_indices(min_row, min_col, max_row, max_col))
    }

    // === Row / column structure ===

    /// Delete one row; rows below shift up by one
    pub fn delete_row(&mut self, row: u32) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        let mut shifted = BTreeMap::new();
        for ((r, c), value) in std::mem::take(&mut self.cells) {
            match r.cmp(&row) {
                std::cmp::Ordering::Less => {
                    shifted.insert((r, c), value);
                }
                std::cmp::Ordering::Equal => {}
                std::cmp::Ordering::Greater => {
                    shifted.insert((r - 1, c), value);
                }
            }
        }
        self.cells = shifted;
        Ok(())
    }

    /// Delete a contiguous span of rows (0-based, inclusive); lower rows shift up
    pub fn delete_rows(&mut self, start: u32, end: u32) -> Result<()> {
        // Deleting bottom-up keeps the remaining indices stable.
        for row in (start..=end).rev() {
            self.delete_row(row)?;
        }
        Ok(())
    }

    /// Delete one column; columns to the right shift left by one
    pub fn delete_column(&mut self, col: u16) -> Result<()> {
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        let mut shifted = BTreeMap::new();
        for ((r, c), value) in std::mem::take(&mut self.cells) {
            match c.cmp(&col) {
                std::cmp::Ordering::Less => {
                    shifted.insert((r, c), value);
                }
                std::cmp::Ordering::Equal => {}
                std::cmp::Ordering::Greater => {
                    shifted.insert((r, c - 1), value);
                }
            }
        }
        self.cells = shifted;
        Ok(())
    }

    /// Delete a contiguous span of columns (0-based, inclusive)
    pub fn delete_columns(&mut self, start: u16, end: u16) -> Result<()> {
        for col in (start..=end).rev() {
            self.delete_column(col)?;
        }
        Ok(())
    }

    /// Last row of the contiguous populated run downward from an anchor cell.
    ///
    /// This is the "jump to the end of the block" movement the editing
    /// application performs from a fixed anchor: starting at `(anchor_row,
    /// anchor_col)`, walk down while cells stay populated and return the last
    /// populated row of that run. `None` if the anchor itself is empty.
    pub fn last_contiguous_row(&self, anchor_row: u32, anchor_col: u16) -> Option<u32> {
        if self.cell_at(anchor_row, anchor_col).is_none() {
            return None;
        }
        let mut row = anchor_row;
        while row + 1 < MAX_ROWS && self.cell_at(row + 1, anchor_col).is_some() {
            row += 1;
        }
        Some(row)
    }
}
