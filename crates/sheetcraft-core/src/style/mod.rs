//! Cell formats
//!
//! A [`Format`] bundles everything that affects how a cell is displayed:
//! - [`FontStyle`] - font settings
//! - [`FillStyle`] - background pattern and colors
//! - [`BorderStyle`] - cell borders
//! - [`NumberFormat`] - number display code
//! - [`Alignment`] and [`Protection`]
//!
//! Formats are registered with a [`FormatInterner`], which hands out a
//! [`FormatId`] and later resolves each distinct format to its style
//! record indices.

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod interner;
mod number_format;

pub use alignment::{Alignment, HorizontalAlignment, ReadingOrder, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle, DiagonalDirection};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontScript, FontStyle, Underline};
pub use interner::{FormatId, FormatInterner, ResolvedFormat};
pub use number_format::{builtin_format_string, NumberFormat};

/// Complete cell format
///
/// Equality and hashing cover every attribute, so two separately built
/// formats with the same settings resolve to the same style record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
    pub protection: Protection,
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    pub fn underline(mut self, underline: Underline) -> Self {
        self.font.underline = underline;
        self
    }

    pub fn strikethrough(mut self, strikethrough: bool) -> Self {
        self.font.strikethrough = strikethrough;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = font::canonical_size(size);
        self
    }

    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    pub fn font_script(mut self, script: FontScript) -> Self {
        self.font.script = script;
        self
    }

    /// Solid background fill
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::solid(color);
        self
    }

    pub fn pattern(mut self, pattern: PatternType) -> Self {
        self.fill.pattern = pattern;
        self
    }

    pub fn bg_color(mut self, color: Color) -> Self {
        self.fill.background = color;
        self
    }

    pub fn fg_color(mut self, color: Color) -> Self {
        self.fill.foreground = color;
        self
    }

    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set a custom number format code
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = NumberFormat::Custom(format.into());
        self
    }

    /// Use a built-in number format by id
    pub fn number_format_id(mut self, id: u32) -> Self {
        self.number_format = NumberFormat::BuiltIn(id);
        self
    }

    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment.horizontal = align;
        self
    }

    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment.vertical = align;
        self
    }

    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.alignment.wrap_text = wrap;
        self
    }

    pub fn indent(mut self, indent: u8) -> Self {
        self.alignment.indent = indent;
        self
    }

    pub fn rotation(mut self, degrees: i16) -> Self {
        self.alignment.rotation = degrees;
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.protection.locked = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.protection.hidden = true;
        self
    }

    /// Default hyperlink look: blue with a single underline
    pub fn hyperlink() -> Self {
        Self::new()
            .font_color(Color::HYPERLINK)
            .underline(Underline::Single)
    }
}

/// Cell protection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Protection {
    /// Cell is locked (protected when sheet is protected)
    pub locked: bool,
    /// Formula is hidden when sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_content_is_equal_format() {
        let a = Format::new().bold(true).font_size(14.0);
        let b = Format::new().font_size(14.0).bold(true);
        assert_eq!(a, b);
        assert_ne!(a, Format::new().bold(true));
    }

    #[test]
    fn test_default_protection_is_locked() {
        assert!(Format::new().protection.locked);
        assert!(!Format::new().unlocked().protection.locked);
    }
}
