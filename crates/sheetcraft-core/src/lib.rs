//! # sheetcraft-core
//!
//! In-memory engine of the sheetcraft spreadsheet writer.
//!
//! This crate turns a stream of typed cell writes into the deduplicated
//! structures a spreadsheet serializer needs:
//! - [`CellGrid`] - sparse random-access cell storage
//! - [`StreamingRowController`] - constant-memory, forward-only row buffer
//! - [`FormatInterner`] - workbook-wide style records (xf, fonts, borders,
//!   fills, number formats)
//! - [`SharedStringTable`] - workbook-wide string table
//! - [`InternTable`] - the insertion-ordered interning map behind both
//!
//! ## Example
//!
//! ```rust
//! use sheetcraft_core::{CellValue, Format, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let red = workbook.add_format(Format::new().font_color(sheetcraft_core::Color::RED));
//! workbook.add_worksheet().unwrap();
//!
//! let mut sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.write_cell(0, 0, 123.0, None).unwrap();
//! sheet.write_cell(0, 0, "Foo", Some(red)).unwrap();
//!
//! let cell = workbook.worksheet(0).unwrap().find_cell(0, 0).unwrap();
//! assert_eq!(cell.value, CellValue::SharedString(0));
//! assert_eq!(cell.xf_index, 1);
//! ```

pub mod cell;
pub mod column;
pub mod datetime;
pub mod error;
pub mod hyperlink;
pub mod intern;
pub mod row;
pub mod shared_strings;
pub mod style;
pub mod workbook;
pub mod worksheet;
pub mod xml;

// Re-exports for convenience
pub use cell::{
    CellAddress, CellData, CellGrid, CellInput, CellRange, CellValue, Dimensions, Row,
    StreamingRowController,
};
pub use column::{ColumnOptions, ColumnSpan};
pub use error::{Error, Result};
pub use hyperlink::{DisplayText, Hyperlink, HyperlinkKind};
pub use intern::{InternTable, Interned};
pub use row::RowOptions;
pub use shared_strings::SharedStringTable;
pub use workbook::{PreparedWorkbook, SheetWriter, Workbook, WorkbookOptions};
pub use worksheet::Worksheet;

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontScript, FontStyle,
    Format, FormatId, FormatInterner, HorizontalAlignment, NumberFormat, PatternType, Protection,
    ResolvedFormat, Underline, VerticalAlignment,
};

/// Number of rows in a worksheet
pub const ROW_MAX: u32 = 1_048_576;

/// Number of columns in a worksheet
pub const COL_MAX: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum characters in a cell string
pub const MAX_STRING_LEN: usize = 32_767;

/// Maximum characters in a hyperlink target plus location
pub const MAX_URL_LENGTH: usize = 2_079;

/// Maximum characters in a hyperlink tooltip
pub const MAX_TOOLTIP_LENGTH: usize = 255;

/// Maximum hyperlinks per worksheet
pub const MAX_HYPERLINKS: usize = 65_530;

/// Maximum horizontal or vertical page breaks per worksheet
pub const MAX_PAGE_BREAKS: usize = 1_023;
