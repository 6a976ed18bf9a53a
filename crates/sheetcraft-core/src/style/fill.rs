//! Fill/background style types

use super::Color;

/// Pattern fill of a cell background.
///
/// Unset colors are [`Color::Auto`]. The stored fill is what the caller
/// asked for; the normalized form used for fill records comes from
/// [`FillStyle::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillStyle {
    pub pattern: PatternType,
    pub foreground: Color,
    pub background: Color,
}

impl FillStyle {
    /// A solid fill. Solid patterns paint with the foreground color.
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: PatternType::Solid,
            foreground: color,
            background: Color::Auto,
        }
    }

    pub fn pattern(pattern: PatternType, foreground: Color, background: Color) -> Self {
        Self {
            pattern,
            foreground,
            background,
        }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        self.pattern == PatternType::None
            && self.foreground.is_auto()
            && self.background.is_auto()
    }

    /// The fill as it will be written to the fill table.
    ///
    /// Callers commonly set only a background color for a plain colored
    /// cell; that is promoted to a solid foreground fill.
    pub fn normalized(&self) -> FillStyle {
        let mut fill = *self;
        let plain = matches!(fill.pattern, PatternType::None | PatternType::Solid);

        if fill.pattern == PatternType::Solid
            && fill.foreground.is_set()
            && fill.background.is_set()
        {
            std::mem::swap(&mut fill.foreground, &mut fill.background);
        }

        if plain && fill.background.is_set() && fill.foreground.is_auto() {
            fill.foreground = fill.background;
            fill.background = Color::Auto;
            fill.pattern = PatternType::Solid;
        }

        if plain && fill.foreground.is_set() && fill.background.is_auto() {
            fill.pattern = PatternType::Solid;
        }

        fill
    }
}

/// Pattern fill types, numbered the way fill records expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternType {
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    /// 12.5% gray, reserved as fill record 1
    Gray125,
    Gray0625,
}
