//! Color representation

/// Color used by fonts, fills and borders.
///
/// [`Color::Auto`] means "not set": the serializer omits the attribute and
/// fill normalization treats it as an absent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// Theme color with tint stored as a signed percentage
    Theme { index: u8, tint: i8 },

    /// Legacy palette index
    Indexed(u8),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    /// Default hyperlink blue
    pub const HYPERLINK: Color = Color::rgb(0x00, 0x00, 0xFF);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create a theme color
    pub const fn theme(index: u8, tint: i8) -> Self {
        Color::Theme { index, tint }
    }

    /// Create from a packed `0xRRGGBB` value
    pub const fn from_rgb_u32(value: u32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Create from a hex string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_rgb_u32)
    }

    /// ARGB hex string as written in styles, e.g. `FFFF0000` for red.
    ///
    /// Returns `None` for [`Color::Auto`] and non-RGB colors, which are
    /// written with their own attributes.
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{:02X}{:02X}{:02X}", r, g, b)),
            _ => None,
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    pub fn is_set(&self) -> bool {
        !self.is_auto()
    }
}
