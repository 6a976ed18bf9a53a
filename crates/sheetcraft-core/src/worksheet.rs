//! Worksheet storage and metadata

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::cell::{
    check_coordinates, CellAddress, CellData, CellGrid, CellRange, CellValue, Dimensions, Row,
    StreamingRowController,
};
use crate::column::ColumnSpan;
use crate::error::{Error, Result};
use crate::hyperlink::Hyperlink;
use crate::row::RowOptions;
use crate::xml;
use crate::MAX_PAGE_BREAKS;

/// Where a worksheet keeps its cells; fixed when the sheet is created
#[derive(Debug)]
enum CellStore {
    Grid(CellGrid),
    Streaming(StreamingRowController),
}

/// A single worksheet
///
/// Cells are written through a [`SheetWriter`](crate::SheetWriter); the
/// worksheet itself exposes the read side used by the serializer.
#[derive(Debug)]
pub struct Worksheet {
    name: String,
    store: CellStore,
    dims: Dimensions,
    /// Column settings keyed by first column
    columns: BTreeMap<u16, ColumnSpan>,
    merged_ranges: Vec<CellRange>,
    hyperlink_count: usize,
    h_pagebreaks: Vec<u32>,
    v_pagebreaks: Vec<u16>,
}

impl Worksheet {
    /// Create a random-access worksheet
    pub(crate) fn new<S: Into<String>>(name: S) -> Self {
        Self::with_store(name.into(), CellStore::Grid(CellGrid::new()))
    }

    /// Create a constant-memory worksheet backed by a temp file
    pub(crate) fn new_streaming<S: Into<String>>(name: S, tmpdir: Option<&Path>) -> Result<Self> {
        let controller = StreamingRowController::new(tmpdir)?;
        Ok(Self::with_store(name.into(), CellStore::Streaming(controller)))
    }

    fn with_store(name: String, store: CellStore) -> Self {
        Self {
            name,
            store,
            dims: Dimensions::new(),
            columns: BTreeMap::new(),
            merged_ranges: Vec::new(),
            hyperlink_count: 0,
            h_pagebreaks: Vec::new(),
            v_pagebreaks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constant_memory(&self) -> bool {
        matches!(self.store, CellStore::Streaming(_))
    }

    /// The cell grid, unless the sheet is in constant-memory mode
    pub fn grid(&self) -> Option<&CellGrid> {
        match &self.store {
            CellStore::Grid(grid) => Some(grid),
            CellStore::Streaming(_) => None,
        }
    }

    /// Always `None` in constant-memory mode, where written rows are no
    /// longer resident.
    pub fn find_row(&self, row: u32) -> Option<&Row> {
        self.grid()?.find_row(row)
    }

    /// Always `None` in constant-memory mode.
    pub fn find_cell(&self, row: u32, col: u16) -> Option<&CellData> {
        self.grid()?.find_cell(row, col)
    }

    /// Rows in ascending order; empty in constant-memory mode
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.grid().into_iter().flat_map(CellGrid::rows)
    }

    /// Cells row-major then column-major; empty in constant-memory mode
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> + '_ {
        self.grid().into_iter().flat_map(CellGrid::cells)
    }

    /// Read back the cells of a range, e.g. for a cached-data snapshot
    pub fn cells_in_range(
        &self,
        range: CellRange,
    ) -> impl Iterator<Item = (u32, u16, &CellData)> + '_ {
        self.grid()
            .into_iter()
            .flat_map(move |grid| grid.cells_in_range(range))
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Used-area reference, `A1` for an empty sheet
    pub fn dimension_ref(&self) -> String {
        self.dims.to_ref()
    }

    /// Column settings in column order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpan> + '_ {
        self.columns.values()
    }

    pub fn merged_ranges(&self) -> &[CellRange] {
        &self.merged_ranges
    }

    /// Hyperlinks in row-major order
    pub fn hyperlinks(&self) -> Vec<(CellAddress, &Hyperlink)> {
        match &self.store {
            CellStore::Grid(grid) => grid
                .cells()
                .filter_map(|(row, col, cell)| match &cell.value {
                    CellValue::Hyperlink(link) => Some((CellAddress::new(row, col), &**link)),
                    _ => None,
                })
                .collect(),
            CellStore::Streaming(controller) => controller
                .hyperlinks()
                .iter()
                .map(|(addr, link)| (*addr, link))
                .collect(),
        }
    }

    pub fn hyperlink_count(&self) -> usize {
        self.hyperlink_count
    }

    pub fn h_pagebreaks(&self) -> &[u32] {
        &self.h_pagebreaks
    }

    pub fn v_pagebreaks(&self) -> &[u16] {
        &self.v_pagebreaks
    }

    /// Fail early for a write that would be rejected by the store, so no
    /// format or string is interned for it.
    pub(crate) fn check_writable(&self, row: u32, col: u16) -> Result<()> {
        check_coordinates(row, col)?;
        if let CellStore::Streaming(controller) = &self.store {
            if row < controller.buffered_row_num() {
                return Err(Error::OrderingViolation {
                    row,
                    buffered_row: controller.buffered_row_num(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn store_cell(&mut self, row: u32, col: u16, cell: CellData) -> Result<()> {
        let is_link = matches!(cell.value, CellValue::Hyperlink(_));
        match &mut self.store {
            CellStore::Grid(grid) => {
                grid.insert_cell(row, col, cell)?;
            }
            CellStore::Streaming(controller) => controller.insert(row, col, cell)?,
        }
        if is_link {
            self.hyperlink_count += 1;
        }
        self.dims.extend(row, col);
        Ok(())
    }

    pub(crate) fn set_row(&mut self, row: u32, options: RowOptions, xf_index: Option<u32>) -> Result<()> {
        match &mut self.store {
            CellStore::Grid(grid) => {
                let entry = grid.get_or_create_row(row)?;
                entry.options = options;
                entry.xf_index = xf_index;
            }
            CellStore::Streaming(controller) => {
                controller.set_row_options(row, options, xf_index)?
            }
        }
        self.dims.extend_rows(row);
        Ok(())
    }

    pub(crate) fn set_column(&mut self, span: ColumnSpan, extend_dims: bool) {
        if extend_dims {
            self.dims.extend_cols(span.first);
            self.dims.extend_cols(span.last);
        }
        self.columns.insert(span.first, span);
    }

    pub(crate) fn check_merge(&self, range: &CellRange) -> Result<()> {
        if self.is_constant_memory() {
            return Err(Error::UnsupportedInConstantMemory("merge_range"));
        }
        if range.is_single_cell() {
            return Err(Error::InvalidRange(format!(
                "cannot merge a single cell: {range}"
            )));
        }
        self.check_writable(range.first.row, range.first.col)?;
        self.check_writable(range.last.row, range.last.col)?;
        if self.merged_ranges.iter().any(|merged| merged.overlaps(range)) {
            return Err(Error::MergedRangeOverlap(range.to_string()));
        }
        Ok(())
    }

    pub(crate) fn add_merged_range(&mut self, range: CellRange) {
        self.merged_ranges.push(range);
    }

    pub(crate) fn set_h_pagebreaks(&mut self, breaks: &[u32]) {
        self.h_pagebreaks = clamp_breaks(breaks, "horizontal");
    }

    pub(crate) fn set_v_pagebreaks(&mut self, breaks: &[u16]) {
        self.v_pagebreaks = clamp_breaks(breaks, "vertical");
    }

    /// Flush the buffered row of a constant-memory sheet
    pub(crate) fn flush(&mut self) -> Result<()> {
        match &mut self.store {
            CellStore::Grid(_) => Ok(()),
            CellStore::Streaming(controller) => controller.flush(),
        }
    }

    /// Write the sheet's `<row>` elements to `out` in ascending order,
    /// returning the number of bytes written.
    pub fn write_sheet_data<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        match &mut self.store {
            CellStore::Streaming(controller) => controller.fold_into(out),
            CellStore::Grid(grid) => {
                let mut buf = String::with_capacity(4096);
                let mut written = 0;
                for row in grid.rows() {
                    if row.is_empty()
                        && row.xf_index().is_none()
                        && !row.options().has_custom_settings()
                    {
                        continue;
                    }
                    buf.clear();
                    xml::write_row(&mut buf, row.row_num(), row.options(), row.xf_index(), row.cells());
                    out.write_all(buf.as_bytes())?;
                    written += buf.len() as u64;
                }
                Ok(written)
            }
        }
    }
}

fn clamp_breaks<T: Copy + Ord>(breaks: &[T], direction: &str) -> Vec<T> {
    let mut breaks = breaks.to_vec();
    breaks.sort_unstable();
    breaks.dedup();
    if breaks.len() > MAX_PAGE_BREAKS {
        log::warn!(
            "{} {} page breaks given, keeping the first {}",
            breaks.len(),
            direction,
            MAX_PAGE_BREAKS
        );
        breaks.truncate(MAX_PAGE_BREAKS);
    }
    breaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::COL_MAX;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grid_sheet_reads_back() {
        let mut sheet = Worksheet::new("Data");
        sheet
            .store_cell(2, 3, CellData::new(CellValue::Number(1.0)))
            .unwrap();
        assert_eq!(sheet.find_cell(2, 3).unwrap().value, CellValue::Number(1.0));
        assert_eq!(sheet.dimension_ref(), "D3");
        assert!(!sheet.is_constant_memory());
    }

    #[test]
    fn test_streaming_sheet_hides_rows() {
        let mut sheet = Worksheet::new_streaming("Data", None).unwrap();
        sheet
            .store_cell(0, 0, CellData::new(CellValue::Number(1.0)))
            .unwrap();
        assert!(sheet.find_cell(0, 0).is_none());
        assert!(sheet.find_row(0).is_none());
        assert_eq!(sheet.cells().count(), 0);
        assert_eq!(sheet.dimension_ref(), "A1");
    }

    #[test]
    fn test_check_writable() {
        let mut sheet = Worksheet::new_streaming("Data", None).unwrap();
        sheet
            .store_cell(4, 0, CellData::new(CellValue::Boolean(true)))
            .unwrap();
        assert!(sheet.check_writable(4, 1).is_ok());
        assert!(matches!(
            sheet.check_writable(3, 0),
            Err(Error::OrderingViolation { .. })
        ));
        assert!(matches!(
            sheet.check_writable(5, COL_MAX),
            Err(Error::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_page_breaks_are_sorted_and_clamped() {
        let mut sheet = Worksheet::new("Data");
        sheet.set_h_pagebreaks(&[20, 10, 10]);
        assert_eq!(sheet.h_pagebreaks(), &[10, 20]);

        let many: Vec<u16> = (1..=2000).collect();
        sheet.set_v_pagebreaks(&many);
        assert_eq!(sheet.v_pagebreaks().len(), MAX_PAGE_BREAKS);
        assert_eq!(sheet.v_pagebreaks()[0], 1);
    }

    #[test]
    fn test_grid_sheet_data_skips_bare_rows() {
        let mut sheet = Worksheet::new("Data");
        sheet
            .store_cell(1, 0, CellData::new(CellValue::Number(2.0)))
            .unwrap();
        sheet.set_row(3, RowOptions::new(), None).unwrap();
        sheet
            .set_row(5, RowOptions::new().with_height(20.0), None)
            .unwrap();

        let mut out = Vec::new();
        sheet.write_sheet_data(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<row r="2"><c r="A2"><v>2</v></c></row><row r="6" ht="20" customHeight="1"/>"#
        );
    }
}
