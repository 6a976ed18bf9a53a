//! Row metadata

use crate::style::FormatId;

/// Maximum outline (grouping) level
pub const MAX_OUTLINE_LEVEL: u8 = 7;

/// Row settings given to `set_row`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowOptions {
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    pub collapsed: bool,
    /// Row-level format
    pub format: Option<FormatId>,
}

impl RowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set the outline level, clamped to 7
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

    /// Check if this row has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some()
            || self.hidden
            || self.outline_level > 0
            || self.collapsed
            || self.format.is_some()
    }
}
