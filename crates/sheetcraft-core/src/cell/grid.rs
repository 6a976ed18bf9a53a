//! Sparse random-access cell storage
//!
//! Only written cells are stored, in a row-based `BTreeMap` structure, so
//! traversal is always row-major then column-major.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::address::{check_coordinates, write_cell_ref};
use super::{CellData, CellRange};
use crate::error::Result;
use crate::row::RowOptions;

/// One row: its settings and its cells keyed by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    row_num: u32,
    pub(crate) options: RowOptions,
    /// Resolved row format
    pub(crate) xf_index: Option<u32>,
    cells: BTreeMap<u16, CellData>,
}

impl Row {
    pub fn new(row_num: u32) -> Self {
        Self {
            row_num,
            ..Self::default()
        }
    }

    pub fn row_num(&self) -> u32 {
        self.row_num
    }

    pub fn options(&self) -> &RowOptions {
        &self.options
    }

    pub fn xf_index(&self) -> Option<u32> {
        self.xf_index
    }

    pub fn cell(&self, col: u16) -> Option<&CellData> {
        self.cells.get(&col)
    }

    /// Cells in column order
    pub fn cells(&self) -> impl DoubleEndedIterator<Item = (u16, &CellData)> + '_ {
        self.cells.iter().map(|(&col, cell)| (col, cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First and last occupied column
    pub fn span(&self) -> Option<(u16, u16)> {
        let first = *self.cells.keys().next()?;
        let last = *self.cells.keys().next_back()?;
        Some((first, last))
    }

    pub(crate) fn insert(&mut self, col: u16, cell: CellData) -> Option<CellData> {
        self.cells.insert(col, cell)
    }
}

/// Sparse cell grid: `BTreeMap<row, Row>`
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    rows: BTreeMap<u32, Row>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the row, inserting an empty one if needed.
    pub fn get_or_create_row(&mut self, row_num: u32) -> Result<&mut Row> {
        check_coordinates(row_num, 0)?;
        Ok(self
            .rows
            .entry(row_num)
            .or_insert_with(|| Row::new(row_num)))
    }

    pub fn find_row(&self, row_num: u32) -> Option<&Row> {
        self.rows.get(&row_num)
    }

    pub fn find_cell(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.cell(col))
    }

    /// Store `cell` at `(row, col)`, returning the cell it replaced.
    ///
    /// Out-of-range coordinates leave the grid untouched.
    pub fn insert_cell(&mut self, row: u32, col: u16, cell: CellData) -> Result<Option<CellData>> {
        check_coordinates(row, col)?;
        Ok(self.get_or_create_row(row)?.insert(col, cell))
    }

    /// Rows in ascending order
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &Row> + '_ {
        self.rows.values()
    }

    /// All cells, row-major then column-major
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&row, r)| r.cells().map(move |(col, cell)| (row, col, cell)))
    }

    /// Cells inside `range`, using ordered range queries on both levels
    pub fn cells_in_range(
        &self,
        range: CellRange,
    ) -> impl Iterator<Item = (u32, u16, &CellData)> + '_ {
        let cols = (
            Bound::Included(range.first.col),
            Bound::Included(range.last.col),
        );
        self.rows
            .range(range.first.row..=range.last.row)
            .flat_map(move |(&row, r)| {
                r.cells
                    .range(cols)
                    .map(move |(&col, cell)| (row, col, cell))
            })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(Row::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Running bounds of a worksheet's used area.
///
/// Row and column bounds are tracked independently: row settings only
/// widen the rows, column settings only widen the columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    rows: Option<(u32, u32)>,
    cols: Option<(u16, u16)>,
}

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, row: u32, col: u16) {
        self.extend_rows(row);
        self.extend_cols(col);
    }

    pub fn extend_rows(&mut self, row: u32) {
        self.rows = Some(match self.rows {
            Some((min, max)) => (min.min(row), max.max(row)),
            None => (row, row),
        });
    }

    pub fn extend_cols(&mut self, col: u16) {
        self.cols = Some(match self.cols {
            Some((min, max)) => (min.min(col), max.max(col)),
            None => (col, col),
        });
    }

    /// `(first, last)` row, if any row was touched
    pub fn rows(&self) -> Option<(u32, u32)> {
        self.rows
    }

    pub fn cols(&self) -> Option<(u16, u16)> {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_none() && self.cols.is_none()
    }

    /// Reference for the sheet dimension, e.g. `B2:D10`, or `A1` when empty
    pub fn to_ref(&self) -> String {
        let (first_row, last_row) = self.rows.unwrap_or((0, 0));
        let (first_col, last_col) = self.cols.unwrap_or((0, 0));

        let mut out = String::with_capacity(16);
        write_cell_ref(&mut out, first_row, first_col);
        if (first_row, first_col) != (last_row, last_col) {
            out.push(':');
            write_cell_ref(&mut out, last_row, last_col);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::error::Error;
    use crate::{COL_MAX, ROW_MAX};

    fn number(n: f64) -> CellData {
        CellData::new(CellValue::Number(n))
    }

    #[test]
    fn test_insert_and_find() {
        let mut grid = CellGrid::new();
        assert!(grid.insert_cell(3, 2, number(1.5)).unwrap().is_none());
        assert_eq!(grid.find_cell(3, 2), Some(&number(1.5)));
        assert!(grid.find_cell(3, 3).is_none());
        assert_eq!(grid.find_row(3).unwrap().row_num(), 3);
        assert!(grid.find_row(2).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut grid = CellGrid::new();
        grid.insert_cell(0, 0, number(1.0)).unwrap();
        let old = grid.insert_cell(0, 0, number(2.0)).unwrap();
        assert_eq!(old, Some(number(1.0)));
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.find_cell(0, 0), Some(&number(2.0)));
    }

    #[test]
    fn test_out_of_range_leaves_grid_untouched() {
        let mut grid = CellGrid::new();
        assert!(matches!(
            grid.insert_cell(ROW_MAX, 0, number(1.0)),
            Err(Error::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            grid.insert_cell(0, COL_MAX, number(1.0)),
            Err(Error::CoordinateOutOfRange { .. })
        ));
        assert!(grid.is_empty());
        assert!(grid.insert_cell(ROW_MAX - 1, COL_MAX - 1, number(1.0)).is_ok());
    }

    #[test]
    fn test_row_major_order() {
        let mut grid = CellGrid::new();
        for (row, col) in [(5, 1), (0, 9), (5, 0), (0, 2), (2, 4)] {
            grid.insert_cell(row, col, number(row as f64)).unwrap();
        }
        let order: Vec<_> = grid.cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 2), (0, 9), (2, 4), (5, 0), (5, 1)]);
    }

    #[test]
    fn test_cells_in_range() {
        let mut grid = CellGrid::new();
        for row in 0..5 {
            for col in 0..5 {
                grid.insert_cell(row, col, number(0.0)).unwrap();
            }
        }
        let range = CellRange::new(1, 1, 2, 3);
        let hits: Vec<_> = grid.cells_in_range(range).map(|(r, c, _)| (r, c)).collect();
        assert_eq!(hits, vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_dimensions() {
        let mut dims = Dimensions::new();
        assert_eq!(dims.to_ref(), "A1");

        dims.extend(1, 1);
        assert_eq!(dims.to_ref(), "B2");

        dims.extend(9, 3);
        assert_eq!(dims.to_ref(), "B2:D10");

        dims.extend_rows(20);
        assert_eq!(dims.cols(), Some((1, 3)));
        assert_eq!(dims.rows(), Some((1, 20)));
    }

    #[test]
    fn test_column_only_dimensions() {
        let mut dims = Dimensions::new();
        dims.extend_cols(2);
        dims.extend_cols(4);
        assert_eq!(dims.to_ref(), "C1:E1");
    }
}
