//! Workbook - owns the worksheets and the tables they share

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::cell::{check_coordinates, CellData, CellInput, CellRange, CellValue};
use crate::column::{ColumnOptions, ColumnSpan};
use crate::datetime::datetime_to_serial;
use crate::error::{Error, Result};
use crate::hyperlink::{self, DisplayText, Hyperlink};
use crate::row::RowOptions;
use crate::shared_strings::SharedStringTable;
use crate::style::{Format, FormatId, FormatInterner};
use crate::worksheet::Worksheet;
use crate::{MAX_HYPERLINKS, MAX_SHEET_NAME_LEN, MAX_STRING_LEN};

/// Workbook-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookOptions {
    /// Keep one row per sheet in memory and stream the rest to a temp file
    pub constant_memory: bool,
    /// Directory for temp files (system default when `None`)
    pub tmpdir: Option<PathBuf>,
    /// Date system: false = 1900, true = 1904
    pub date_1904: bool,
}

impl WorkbookOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant_memory(mut self, enabled: bool) -> Self {
        self.constant_memory = enabled;
        self
    }

    pub fn tmpdir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.tmpdir = Some(dir.into());
        self
    }

    pub fn date_1904(mut self, enabled: bool) -> Self {
        self.date_1904 = enabled;
        self
    }
}

/// A workbook being written
///
/// ```rust
/// use sheetcraft_core::{Format, Workbook};
///
/// let mut workbook = Workbook::new();
/// let bold = workbook.add_format(Format::new().bold(true));
/// let index = workbook.add_worksheet_with_name("Report").unwrap();
///
/// let mut sheet = workbook.worksheet_mut(index).unwrap();
/// sheet.write_string(0, 0, "Total", Some(bold)).unwrap();
/// sheet.write_number(0, 1, 42.0, None).unwrap();
///
/// let prepared = workbook.close().unwrap();
/// assert_eq!(prepared.shared_strings().unique_count(), 1);
/// ```
#[derive(Debug)]
pub struct Workbook {
    options: WorkbookOptions,
    worksheets: Vec<Worksheet>,
    formats: FormatInterner,
    strings: SharedStringTable,
    /// Used by hyperlinks written without a format
    hyperlink_format: FormatId,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// Create an empty workbook with default options
    pub fn new() -> Self {
        Self::with_options(WorkbookOptions::default())
    }

    pub fn with_options(options: WorkbookOptions) -> Self {
        let mut formats = FormatInterner::new();
        let hyperlink_format = formats.register(Format::hyperlink());
        Self {
            options,
            worksheets: Vec::new(),
            formats,
            strings: SharedStringTable::new(),
            hyperlink_format,
        }
    }

    pub fn options(&self) -> &WorkbookOptions {
        &self.options
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Add a worksheet named `SheetN`
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{n}");
            if self.validate_sheet_name(&name).is_ok() {
                return self.add_worksheet_with_name(&name);
            }
            n += 1;
        }
    }

    /// Add a worksheet and return its index
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;

        let worksheet = if self.options.constant_memory {
            Worksheet::new_streaming(name, self.options.tmpdir.as_deref())?
        } else {
            Worksheet::new(name)
        };
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return Err(Error::InvalidSheetName(
                "Sheet name cannot start or end with an apostrophe".into(),
            ));
        }

        let name_lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }

    /// Register a format for use by cells, rows and columns
    pub fn add_format(&mut self, format: Format) -> FormatId {
        self.formats.register(format)
    }

    pub fn format(&self, id: FormatId) -> Option<&Format> {
        self.formats.get(id)
    }

    pub fn formats(&self) -> &FormatInterner {
        &self.formats
    }

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.strings
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Writer for the worksheet at `index`
    pub fn worksheet_mut(&mut self, index: usize) -> Option<SheetWriter<'_>> {
        let sheet = self.worksheets.get_mut(index)?;
        Some(SheetWriter {
            sheet,
            formats: &mut self.formats,
            strings: &mut self.strings,
            hyperlink_format: self.hyperlink_format,
            date_1904: self.options.date_1904,
        })
    }

    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<SheetWriter<'_>> {
        let index = self.worksheets.iter().position(|ws| ws.name() == name)?;
        self.worksheet_mut(index)
    }

    /// Finish the write phase.
    ///
    /// Flushes buffered rows and resolves every used format to its style
    /// records. Only I/O failures are reported here.
    pub fn close(mut self) -> Result<PreparedWorkbook> {
        for sheet in &mut self.worksheets {
            sheet.flush()?;
        }
        self.formats.prepare();

        log::debug!(
            "closed workbook: {} sheets, {} unique strings ({} total), {} xf records",
            self.worksheets.len(),
            self.strings.unique_count(),
            self.strings.string_count(),
            self.formats.xf_count()
        );

        Ok(PreparedWorkbook {
            options: self.options,
            worksheets: self.worksheets,
            formats: self.formats,
            strings: self.strings,
        })
    }
}

/// Write access to one worksheet plus the workbook tables it feeds
///
/// Every write validates its coordinates and resolves its format before
/// any string is interned, so a rejected write leaves no trace.
#[derive(Debug)]
pub struct SheetWriter<'a> {
    sheet: &'a mut Worksheet,
    formats: &'a mut FormatInterner,
    strings: &'a mut SharedStringTable,
    hyperlink_format: FormatId,
    date_1904: bool,
}

impl<'a> SheetWriter<'a> {
    pub fn worksheet(&self) -> &Worksheet {
        &*self.sheet
    }

    /// Write any supported value
    pub fn write_cell<V: Into<CellInput>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
        format: Option<FormatId>,
    ) -> Result<()> {
        match value.into() {
            CellInput::Number(n) => self.write_number(row, col, n, format),
            CellInput::Text(text) => self.write_string(row, col, &text, format),
            CellInput::Formula(formula) => self.write_formula(row, col, &formula, format),
            CellInput::Boolean(b) => self.write_boolean(row, col, b, format),
            CellInput::DateTime(dt) => self.write_datetime(row, col, dt, format),
            CellInput::Blank => self.write_blank(row, col, format),
        }
    }

    fn store(&mut self, row: u32, col: u16, value: CellValue, format: Option<FormatId>) -> Result<()> {
        let xf_index = self.formats.resolve(format)?;
        self.store_resolved(row, col, value, format, xf_index)
    }

    fn store_resolved(
        &mut self,
        row: u32,
        col: u16,
        value: CellValue,
        format: Option<FormatId>,
        xf_index: u32,
    ) -> Result<()> {
        self.sheet
            .store_cell(row, col, CellData::with_format(value, format, xf_index))
    }

    pub fn write_number(
        &mut self,
        row: u32,
        col: u16,
        number: f64,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.sheet.check_writable(row, col)?;
        check_finite(number)?;
        self.store(row, col, CellValue::Number(number), format)
    }

    /// Write text. An empty string is written as a blank cell.
    pub fn write_string(
        &mut self,
        row: u32,
        col: u16,
        text: &str,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.sheet.check_writable(row, col)?;
        if text.is_empty() {
            return self.write_blank(row, col, format);
        }
        check_string_len(text)?;
        let xf_index = self.formats.resolve(format)?;

        let value = if self.sheet.is_constant_memory() {
            CellValue::InlineString(text.to_string())
        } else {
            CellValue::SharedString(self.strings.get_or_create(text))
        };
        self.store_resolved(row, col, value, format, xf_index)
    }

    /// Write a formula with a cached result of 0
    pub fn write_formula(
        &mut self,
        row: u32,
        col: u16,
        formula: &str,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.write_formula_num(row, col, formula, format, 0.0)
    }

    pub fn write_formula_num(
        &mut self,
        row: u32,
        col: u16,
        formula: &str,
        format: Option<FormatId>,
        result: f64,
    ) -> Result<()> {
        self.sheet.check_writable(row, col)?;
        check_finite(result)?;
        let formula = formula.strip_prefix('=').unwrap_or(formula).to_string();
        self.store(row, col, CellValue::Formula { formula, result }, format)
    }

    /// Write an array formula over `range`, anchored at its top-left cell.
    ///
    /// Surrounding `{}` and a leading `=` are removed. Outside
    /// constant-memory mode the rest of the range is filled with formatted
    /// zeroes.
    pub fn write_array_formula(
        &mut self,
        range: CellRange,
        formula: &str,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.write_array_formula_num(range, formula, format, 0.0)
    }

    pub fn write_array_formula_num(
        &mut self,
        range: CellRange,
        formula: &str,
        format: Option<FormatId>,
        result: f64,
    ) -> Result<()> {
        let (first, last) = (range.first, range.last);
        self.sheet.check_writable(first.row, first.col)?;
        self.sheet.check_writable(last.row, last.col)?;
        check_finite(result)?;

        let formula = formula
            .strip_prefix('{')
            .and_then(|f| f.strip_suffix('}'))
            .unwrap_or(formula);
        let formula = formula.strip_prefix('=').unwrap_or(formula).to_string();

        let value = CellValue::ArrayFormula {
            formula,
            range,
            result,
        };
        self.store(first.row, first.col, value, format)?;

        if !self.sheet.is_constant_memory() {
            for addr in range.cells().skip(1) {
                self.store(addr.row, addr.col, CellValue::Number(0.0), format)?;
            }
        }
        Ok(())
    }

    /// Write a formatted empty cell. Without a format nothing is written
    /// and no error is reported.
    pub fn write_blank(&mut self, row: u32, col: u16, format: Option<FormatId>) -> Result<()> {
        if format.is_none() {
            return Ok(());
        }
        self.sheet.check_writable(row, col)?;
        self.store(row, col, CellValue::Blank, format)
    }

    pub fn write_boolean(
        &mut self,
        row: u32,
        col: u16,
        value: bool,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.sheet.check_writable(row, col)?;
        self.store(row, col, CellValue::Boolean(value), format)
    }

    /// Write a date/time as a serial number. Use a date number format to
    /// display it as a date.
    pub fn write_datetime(
        &mut self,
        row: u32,
        col: u16,
        datetime: NaiveDateTime,
        format: Option<FormatId>,
    ) -> Result<()> {
        let serial = datetime_to_serial(datetime, self.date_1904);
        self.write_number(row, col, serial, format)
    }

    /// Write a hyperlink showing the URL itself
    pub fn write_url(
        &mut self,
        row: u32,
        col: u16,
        url: &str,
        format: Option<FormatId>,
    ) -> Result<()> {
        self.write_url_with(row, col, url, format, None, None)
    }

    /// Write a hyperlink with optional display text and tooltip.
    ///
    /// Without a format the workbook's hyperlink format is used. Past the
    /// per-sheet hyperlink limit only the display text is written.
    pub fn write_url_with(
        &mut self,
        row: u32,
        col: u16,
        url: &str,
        format: Option<FormatId>,
        display: Option<&str>,
        tooltip: Option<&str>,
    ) -> Result<()> {
        self.sheet.check_writable(row, col)?;
        let parsed = hyperlink::parse_url(url)?;
        if let Some(tooltip) = tooltip {
            hyperlink::check_tooltip(tooltip)?;
        }
        let text = display.unwrap_or(&parsed.default_display);
        check_string_len(text)?;

        if self.sheet.hyperlink_count() >= MAX_HYPERLINKS {
            log::warn!(
                "sheet '{}' has {} hyperlinks, writing {} as plain text",
                self.sheet.name(),
                MAX_HYPERLINKS,
                url
            );
            return self.write_string(row, col, text, format);
        }

        let format = Some(format.unwrap_or(self.hyperlink_format));
        let xf_index = self.formats.resolve(format)?;
        let display = if self.sheet.is_constant_memory() {
            DisplayText::Inline(text.to_string())
        } else {
            DisplayText::Shared(self.strings.get_or_create(text))
        };
        let link = Hyperlink {
            kind: parsed.kind,
            target: parsed.target,
            location: parsed.location,
            display,
            tooltip: tooltip.map(str::to_string),
        };
        self.store_resolved(row, col, CellValue::Hyperlink(Box::new(link)), format, xf_index)
    }

    /// Merge `range` and write `text` to its top-left cell. The other
    /// cells get `format` so borders and fills cover the whole range.
    pub fn merge_range(&mut self, range: CellRange, text: &str, format: Option<FormatId>) -> Result<()> {
        self.sheet.check_merge(&range)?;
        check_string_len(text)?;

        self.write_string(range.first.row, range.first.col, text, format)?;
        for addr in range.cells().skip(1) {
            self.write_blank(addr.row, addr.col, format)?;
        }
        self.sheet.add_merged_range(range);
        Ok(())
    }

    /// Set row height, visibility, outline level or format.
    ///
    /// Only the row bounds of the sheet dimensions are affected.
    pub fn set_row(&mut self, row: u32, options: RowOptions) -> Result<()> {
        self.sheet.check_writable(row, 0)?;
        let xf_index = match options.format {
            Some(id) => Some(self.formats.xf_index(id)?),
            None => None,
        };
        self.sheet.set_row(row, options, xf_index)
    }

    /// Set options for columns `first..=last` (given in either order).
    pub fn set_column(&mut self, first: u16, last: u16, options: ColumnOptions) -> Result<()> {
        let (first, last) = if first > last { (last, first) } else { (first, last) };
        check_coordinates(0, last)?;

        let xf_index = match options.format {
            Some(id) => Some(self.formats.xf_index(id)?),
            None => None,
        };
        let extend_dims = options.format.is_some() || (options.width.is_some() && options.hidden);
        self.sheet.set_column(
            ColumnSpan {
                first,
                last,
                options,
                xf_index,
            },
            extend_dims,
        );
        Ok(())
    }

    /// Set row page breaks (zero-based rows above which a page starts)
    pub fn set_h_pagebreaks(&mut self, breaks: &[u32]) {
        self.sheet.set_h_pagebreaks(breaks);
    }

    pub fn set_v_pagebreaks(&mut self, breaks: &[u16]) {
        self.sheet.set_v_pagebreaks(breaks);
    }
}

fn check_finite(number: f64) -> Result<()> {
    if !number.is_finite() {
        return Err(Error::NonFiniteNumber(number));
    }
    Ok(())
}

fn check_string_len(text: &str) -> Result<()> {
    let length = text.chars().count();
    if length > MAX_STRING_LEN {
        return Err(Error::capacity("String", MAX_STRING_LEN, length));
    }
    Ok(())
}

/// A closed workbook: resolved formats and frozen sheets, ready to be
/// serialized
#[derive(Debug)]
pub struct PreparedWorkbook {
    options: WorkbookOptions,
    worksheets: Vec<Worksheet>,
    formats: FormatInterner,
    strings: SharedStringTable,
}

impl PreparedWorkbook {
    pub fn options(&self) -> &WorkbookOptions {
        &self.options
    }

    pub fn worksheets(&self) -> &[Worksheet] {
        &self.worksheets
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    pub fn formats(&self) -> &FormatInterner {
        &self.formats
    }

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.strings
    }

    /// Write the `<row>` elements of sheet `index` to `out`
    pub fn write_sheet_data<W: Write>(&mut self, index: usize, out: &mut W) -> Result<u64> {
        let count = self.worksheets.len();
        self.worksheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))?
            .write_sheet_data(out)
    }
}
