//! Border style types

use super::Color;

/// Borders of a cell; also the deduplication key for border records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
    pub diagonal: BorderEdge,
    pub diagonal_direction: DiagonalDirection,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same edge on left, right, top and bottom
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = BorderEdge::new(style, color);
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
            ..Self::default()
        }
    }

    pub fn with_left(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.left = BorderEdge::new(style, color);
        self
    }

    pub fn with_right(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.right = BorderEdge::new(style, color);
        self
    }

    pub fn with_top(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.top = BorderEdge::new(style, color);
        self
    }

    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = BorderEdge::new(style, color);
        self
    }

    pub fn with_diagonal(
        mut self,
        style: BorderLineStyle,
        color: Color,
        direction: DiagonalDirection,
    ) -> Self {
        self.diagonal = BorderEdge::new(style, color);
        self.diagonal_direction = direction;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    /// Hair line (very thin)
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

/// Diagonal border direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalDirection {
    #[default]
    None,
    /// Bottom-left to top-right
    Up,
    /// Top-left to bottom-right
    Down,
    Both,
}
