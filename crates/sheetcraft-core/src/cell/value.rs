//! Cell value types

use chrono::NaiveDateTime;

use super::CellRange;
use crate::hyperlink::Hyperlink;
use crate::style::FormatId;

/// The value stored in a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric value (all numbers stored as f64, including dates)
    Number(f64),

    /// Index into the workbook's shared string table
    SharedString(u32),

    /// Text kept with the cell; used in constant-memory mode
    InlineString(String),

    /// Formula (without the leading `=`) with its cached result
    Formula { formula: String, result: f64 },

    /// Array formula anchored at this cell
    ArrayFormula {
        formula: String,
        range: CellRange,
        result: f64,
    },

    /// Formatted empty cell
    Blank,

    Boolean(bool),

    Hyperlink(Box<Hyperlink>),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Formula { result, .. } | CellValue::ArrayFormula { result, .. } => {
                Some(*result)
            }
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::SharedString(_) => "shared string",
            CellValue::InlineString(_) => "inline string",
            CellValue::Formula { .. } => "formula",
            CellValue::ArrayFormula { .. } => "array formula",
            CellValue::Blank => "blank",
            CellValue::Boolean(_) => "boolean",
            CellValue::Hyperlink(_) => "hyperlink",
        }
    }
}

/// A stored cell: value plus the format it was written with
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    pub value: CellValue,
    pub format: Option<FormatId>,
    /// Resolved xf index (0 = default format)
    pub xf_index: u32,
}

impl CellData {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            format: None,
            xf_index: 0,
        }
    }

    pub fn with_format(value: CellValue, format: Option<FormatId>, xf_index: u32) -> Self {
        Self {
            value,
            format,
            xf_index,
        }
    }
}

/// A value handed to `write_cell`, before strings are interned and
/// formats resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Number(f64),
    Text(String),
    /// Formula text, with or without a leading `=`
    Formula(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Blank,
}

impl From<f64> for CellInput {
    fn from(n: f64) -> Self {
        CellInput::Number(n)
    }
}

impl From<i32> for CellInput {
    fn from(n: i32) -> Self {
        CellInput::Number(n as f64)
    }
}

impl From<i64> for CellInput {
    fn from(n: i64) -> Self {
        CellInput::Number(n as f64)
    }
}

impl From<u32> for CellInput {
    fn from(n: u32) -> Self {
        CellInput::Number(n as f64)
    }
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        CellInput::Text(s.to_string())
    }
}

impl From<String> for CellInput {
    fn from(s: String) -> Self {
        CellInput::Text(s)
    }
}

impl From<bool> for CellInput {
    fn from(b: bool) -> Self {
        CellInput::Boolean(b)
    }
}

impl From<NaiveDateTime> for CellInput {
    fn from(dt: NaiveDateTime) -> Self {
        CellInput::DateTime(dt)
    }
}
