//! Constant-memory row buffer
//!
//! Only one row is resident at a time. Writing to a later row serializes
//! the buffered row to an anonymous temp file; writing to an earlier row
//! is rejected. The temp file is removed by the OS when the controller is
//! dropped, on every exit path.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use super::address::check_coordinates;
use super::{CellAddress, CellData, CellValue};
use crate::error::{Error, Result};
use crate::hyperlink::Hyperlink;
use crate::row::RowOptions;
use crate::xml;
use crate::COL_MAX;

pub struct StreamingRowController {
    buffered_row_num: u32,
    /// One slot per column
    cells: Box<[Option<Box<CellData>>]>,
    /// First and last occupied slot
    span: Option<(u16, u16)>,
    options: RowOptions,
    xf_index: Option<u32>,
    row_changed: bool,
    data_changed: bool,
    sink: BufWriter<File>,
    scratch: String,
    rows_flushed: u32,
    /// Hyperlinks from rows already flushed, in write order
    hyperlinks: Vec<(CellAddress, Hyperlink)>,
}

impl std::fmt::Debug for StreamingRowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingRowController")
            .field("buffered_row_num", &self.buffered_row_num)
            .field("span", &self.span)
            .field("row_changed", &self.row_changed)
            .field("data_changed", &self.data_changed)
            .field("rows_flushed", &self.rows_flushed)
            .finish_non_exhaustive()
    }
}

impl StreamingRowController {
    /// Create a controller whose temp file lives in `tmpdir`, or in the
    /// system temp directory when `None`.
    pub fn new(tmpdir: Option<&Path>) -> Result<Self> {
        let file = match tmpdir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        let cells = std::iter::repeat_with(|| None)
            .take(COL_MAX as usize)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            buffered_row_num: 0,
            cells,
            span: None,
            options: RowOptions::default(),
            xf_index: None,
            row_changed: false,
            data_changed: false,
            sink: BufWriter::new(file),
            scratch: String::with_capacity(4096),
            rows_flushed: 0,
            hyperlinks: Vec::new(),
        })
    }

    pub fn buffered_row_num(&self) -> u32 {
        self.buffered_row_num
    }

    /// A cell of the buffered row
    pub fn buffered_cell(&self, col: u16) -> Option<&CellData> {
        self.cells.get(col as usize)?.as_deref()
    }

    /// Number of rows written to the temp file so far
    pub fn rows_flushed(&self) -> u32 {
        self.rows_flushed
    }

    /// Store `cell` in the buffered row, flushing first if `row` is later.
    pub fn insert(&mut self, row: u32, col: u16, cell: CellData) -> Result<()> {
        check_coordinates(row, col)?;
        self.advance_to(row)?;

        self.cells[col as usize] = Some(Box::new(cell));
        self.span = Some(match self.span {
            Some((first, last)) => (first.min(col), last.max(col)),
            None => (col, col),
        });
        self.data_changed = true;
        Ok(())
    }

    /// Set the options of `row`, which must not be behind the buffered row.
    pub fn set_row_options(
        &mut self,
        row: u32,
        options: RowOptions,
        xf_index: Option<u32>,
    ) -> Result<()> {
        check_coordinates(row, 0)?;
        self.advance_to(row)?;

        self.row_changed = xf_index.is_some() || options.has_custom_settings();
        self.options = options;
        self.xf_index = xf_index;
        Ok(())
    }

    fn advance_to(&mut self, row: u32) -> Result<()> {
        if row < self.buffered_row_num {
            return Err(Error::OrderingViolation {
                row,
                buffered_row: self.buffered_row_num,
            });
        }
        if row > self.buffered_row_num {
            self.flush()?;
            self.buffered_row_num = row;
        }
        Ok(())
    }

    /// Write the buffered row to the temp file if it holds cells or row
    /// settings, then clear it. Does nothing on an unchanged buffer.
    pub fn flush(&mut self) -> Result<()> {
        if !self.row_changed && !self.data_changed {
            return Ok(());
        }

        let row = self.buffered_row_num;
        let (first, last) = self.span.unwrap_or((1, 0));
        let cells = &self.cells;
        let occupied = (first..=last)
            .filter_map(|col| cells[col as usize].as_deref().map(|cell| (col, cell)));

        self.scratch.clear();
        xml::write_row(&mut self.scratch, row, &self.options, self.xf_index, occupied);
        self.sink.write_all(self.scratch.as_bytes())?;

        let mut cell_count = 0;
        if let Some((first, last)) = self.span.take() {
            for col in first..=last {
                let Some(cell) = self.cells[col as usize].take() else {
                    continue;
                };
                cell_count += 1;
                if let CellValue::Hyperlink(link) = cell.value {
                    self.hyperlinks.push((CellAddress::new(row, col), *link));
                }
            }
        }

        self.options = RowOptions::default();
        self.xf_index = None;
        self.row_changed = false;
        self.data_changed = false;
        self.rows_flushed += 1;
        log::trace!("flushed row {} with {} cells", row + 1, cell_count);
        Ok(())
    }

    /// Hyperlinks of every flushed row
    pub fn hyperlinks(&self) -> &[(CellAddress, Hyperlink)] {
        &self.hyperlinks
    }

    /// Flush, then copy every serialized row into `out`.
    ///
    /// The temp file stays open, so later rows are appended after the
    /// copied data.
    pub fn fold_into<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        self.flush()?;
        self.sink.flush()?;

        let file = self.sink.get_mut();
        file.seek(SeekFrom::Start(0))?;
        let copied = io::copy(file, out)?;
        file.seek(SeekFrom::End(0))?;
        Ok(copied)
    }
}
