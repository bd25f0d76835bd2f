//! Vector, colour and alignment arguments for draw calls.

/// A 2D size or position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A 3D vertex; `z` orders primitives in the 2D scenes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Depth
    pub z: f64,
}

impl Vec3 {
    /// Create a new vertex
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// RGBA colour with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
    /// Alpha
    pub a: f64,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Create a colour from all four components
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<(f64, f64, f64, f64)> for Color {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<[f64; 4]> for Color {
    fn from([r, g, b, a]: [f64; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

/// Horizontal text anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// Anchor on the left edge (`"L"`)
    #[default]
    Left,
    /// Anchor on the centre (`"C"`)
    Center,
    /// Anchor on the right edge (`"R"`)
    Right,
}

impl HorizontalAlign {
    /// Short code understood by the host
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Center => "C",
            Self::Right => "R",
        }
    }
}

/// Vertical text anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    /// Anchor on the top edge (`"T"`)
    Top,
    /// Anchor on the centre (`"C"`)
    Center,
    /// Anchor on the bottom edge (`"B"`)
    #[default]
    Bottom,
}

impl VerticalAlign {
    /// Short code understood by the host
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Top => "T",
            Self::Center => "C",
            Self::Bottom => "B",
        }
    }
}
