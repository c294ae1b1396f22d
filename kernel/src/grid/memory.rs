// In-Memory Grid
//
// Rectangular grid that grows on write, used for local runs and tests.

use super::store::GridStore;
use crate::provider::StoreError;

/// Per-cell ceiling of the hosted spreadsheet, in UTF-16 units.
pub const DEFAULT_CELL_LIMIT: usize = 50_000;

/// Shape of one accepted `write_range` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWrite {
    pub start_row: usize,
    pub start_col: usize,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug)]
pub struct InMemoryGrid {
    cells: Vec<Vec<String>>,
    width: usize,
    cell_limit: usize,
    reads: usize,
    writes: Vec<RangeWrite>,
    unavailable: bool,
}

impl Default for InMemoryGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGrid {
    pub fn new() -> Self {
        Self::with_cell_limit(DEFAULT_CELL_LIMIT)
    }

    pub fn with_cell_limit(cell_limit: usize) -> Self {
        Self {
            cells: Vec::new(),
            width: 0,
            cell_limit,
            reads: 0,
            writes: Vec::new(),
            unavailable: false,
        }
    }

    /// Seed a grid with existing rows. Short rows are padded.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        let mut grid = Self::new();
        grid.cells = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        grid.width = grid.cells.iter().map(Vec::len).max().unwrap_or(0);
        grid.pad_rows();
        grid
    }

    /// Cell text at a 1-indexed position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if row == 0 || col == 0 {
            return None;
        }
        self.cells
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map(String::as_str)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn read_calls(&self) -> usize {
        self.reads
    }

    /// Every accepted range write, oldest first.
    pub fn writes(&self) -> &[RangeWrite] {
        &self.writes
    }

    pub fn last_write(&self) -> Option<RangeWrite> {
        self.writes.last().copied()
    }

    /// Make every subsequent call fail until reset.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("grid offline".into()));
        }
        Ok(())
    }

    fn pad_rows(&mut self) {
        for row in &mut self.cells {
            row.resize(self.width, String::new());
        }
    }

    fn validate(
        &self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
        values: &[Vec<String>],
    ) -> Result<(), StoreError> {
        if start_row == 0 || start_col == 0 {
            return Err(StoreError::InvalidRange(format!(
                "ranges are 1-indexed, got ({start_row}, {start_col})"
            )));
        }
        if values.len() != rows {
            return Err(StoreError::InvalidRange(format!(
                "expected {rows} rows, got {}",
                values.len()
            )));
        }
        for (r, row) in values.iter().enumerate() {
            if row.len() != cols {
                return Err(StoreError::InvalidRange(format!(
                    "row {} has {} cells, expected {cols}",
                    start_row + r,
                    row.len()
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                let len = cell.encode_utf16().count();
                if len > self.cell_limit {
                    return Err(StoreError::CellTooLarge {
                        row: start_row + r,
                        col: start_col + c,
                        len,
                        limit: self.cell_limit,
                    });
                }
            }
        }
        Ok(())
    }
}

impl GridStore for InMemoryGrid {
    fn read_all(&mut self) -> Result<Vec<Vec<String>>, StoreError> {
        self.check_available()?;
        self.reads += 1;
        Ok(self.cells.clone())
    }

    fn write_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
        values: &[Vec<String>],
    ) -> Result<(), StoreError> {
        self.check_available()?;
        self.validate(start_row, start_col, rows, cols, values)?;

        let height = self.cells.len().max(start_row - 1 + rows);
        self.cells.resize_with(height, Vec::new);
        self.width = self.width.max(start_col - 1 + cols);
        self.pad_rows();

        for (r, row) in values.iter().enumerate() {
            let target = &mut self.cells[start_row - 1 + r];
            for (c, cell) in row.iter().enumerate() {
                target[start_col - 1 + c] = cell.clone();
            }
        }

        self.writes.push(RangeWrite {
            start_row,
            start_col,
            rows,
            cols,
        });
        Ok(())
    }

    fn column_count(&mut self) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn write_grows_grid_and_pads_rows() {
        let mut grid = InMemoryGrid::from_rows(&[&["a", "1"]]);

        grid.write_range(3, 1, 1, 3, &[row(&["c", "x", "y"])]).unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows().len(), 3);
        assert_eq!(grid.cell(1, 3), Some(""));
        assert_eq!(grid.cell(2, 1), Some(""));
        assert_eq!(grid.cell(3, 3), Some("y"));
        assert_eq!(grid.column_count().unwrap(), 3);
    }

    #[test]
    fn mismatched_block_is_rejected() {
        let mut grid = InMemoryGrid::new();
        let err = grid.write_range(1, 1, 1, 3, &[row(&["a", "b"])]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRange(_)));
        assert!(grid.writes().is_empty());
    }

    #[test]
    fn zero_anchor_is_rejected() {
        let mut grid = InMemoryGrid::new();
        let err = grid.write_range(0, 1, 1, 1, &[row(&["a"])]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRange(_)));
    }

    #[test]
    fn oversized_cell_is_rejected() {
        let mut grid = InMemoryGrid::with_cell_limit(3);
        let err = grid
            .write_range(1, 1, 1, 2, &[row(&["k", "abcd"])])
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::CellTooLarge {
                row: 1,
                col: 2,
                len: 4,
                limit: 3
            }
        );
        assert!(grid.rows().is_empty());
    }

    #[test]
    fn empty_grid_has_no_columns() {
        let mut grid = InMemoryGrid::new();
        assert_eq!(grid.column_count().unwrap(), 0);
        assert!(grid.read_all().unwrap().is_empty());
        assert_eq!(grid.read_calls(), 1);
    }
}
