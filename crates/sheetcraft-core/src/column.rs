//! Column metadata

use crate::row::MAX_OUTLINE_LEVEL;
use crate::style::FormatId;

/// Column settings given to `set_column`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnOptions {
    /// Width in character units (None = default)
    pub width: Option<f64>,
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    pub collapsed: bool,
    pub format: Option<FormatId>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.outline_level = level.min(MAX_OUTLINE_LEVEL);
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn with_format(mut self, format: FormatId) -> Self {
        self.format = Some(format);
        self
    }
}

/// A run of columns sharing one set of options
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpan {
    pub first: u16,
    pub last: u16,
    pub options: ColumnOptions,
    /// Resolved column format
    pub xf_index: Option<u32>,
}

impl ColumnSpan {
    pub fn contains(&self, col: u16) -> bool {
        (self.first..=self.last).contains(&col)
    }
}
