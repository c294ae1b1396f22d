// Grid Store Abstraction
//
// Defines the contract for a durable two-dimensional grid of text cells.
// Implementations may be spreadsheets, databases, files, etc.
//
// This module defines *interfaces only*.

use crate::provider::StoreError;

/// Durable grid used by the tabular cache provider.
///
/// Rows and columns are 1-indexed in `write_range`.
///
/// Properties required from implementations:
/// - `read_all` returns rows in physical order
/// - Rows returned by `read_all` all have `column_count()` cells
/// - A range write is all-or-nothing
///
/// Implementations own the per-cell text ceiling, measured in UTF-16
/// code units, and report violations as `StoreError::CellTooLarge`.
pub trait GridStore {
    /// Read every populated row.
    fn read_all(&mut self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Overwrite a `rows x cols` block anchored at `(start_row, start_col)`.
    ///
    /// `values` must hold exactly `rows` rows of `cols` cells.
    fn write_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
        values: &[Vec<String>],
    ) -> Result<(), StoreError>;

    /// Index of the last populated column, 0 for an empty grid.
    fn column_count(&mut self) -> Result<usize, StoreError>;
}
