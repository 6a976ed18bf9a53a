//! Font style types

use super::Color;

/// Font attributes of a format.
///
/// This is also the deduplication key for font records: two formats with
/// equal `FontStyle` share one font index.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points. Compared by bit pattern; set it through
    /// [`with_size`](Self::with_size) to fold `-0.0` and NaN payloads.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub outline: bool,
    pub shadow: bool,
    /// Superscript/subscript
    pub script: FontScript,
    /// Font family class (2 = swiss)
    pub family: u8,
    pub charset: u8,
    pub condense: bool,
    pub extend: bool,
    pub color: Color,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            outline: false,
            shadow: false,
            script: FontScript::Baseline,
            family: 2,
            charset: 0,
            condense: false,
            extend: false,
            color: Color::Auto,
        }
    }
}

impl FontStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = canonical_size(size);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.outline.hash(state);
        self.shadow.hash(state);
        self.script.hash(state);
        self.family.hash(state);
        self.charset.hash(state);
        self.condense.hash(state);
        self.extend.hash(state);
        self.color.hash(state);
    }
}

impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.outline == other.outline
            && self.shadow == other.shadow
            && self.script == other.script
            && self.family == other.family
            && self.charset == other.charset
            && self.condense == other.condense
            && self.extend == other.extend
            && self.color == other.color
    }
}

impl Eq for FontStyle {}

/// Single representation for sizes that display the same
pub(crate) fn canonical_size(size: f64) -> f64 {
    if size.is_nan() {
        f64::NAN
    } else if size == 0.0 {
        0.0
    } else {
        size
    }
}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    /// Single accounting underline (extends to cell width)
    SingleAccounting,
    DoubleAccounting,
}

/// Superscript/subscript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontScript {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;

    fn hash_of(font: &FontStyle) -> u64 {
        ahash::RandomState::with_seeds(1, 2, 3, 4).hash_one(font)
    }

    #[test]
    fn test_equality_agrees_with_hash() {
        let zero = FontStyle::new().with_size(0.0);
        let negative_zero = FontStyle::new().with_size(-0.0);
        assert_eq!(zero, negative_zero);
        assert_eq!(hash_of(&zero), hash_of(&negative_zero));

        let nan = FontStyle::new().with_size(f64::NAN);
        let other_nan = FontStyle::new().with_size(-f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan, other_nan);
        assert_eq!(hash_of(&nan), hash_of(&other_nan));

        assert_ne!(FontStyle::new().with_size(11.0), FontStyle::new().with_size(11.5));
    }
}
