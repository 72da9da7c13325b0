//! Appearance state carried by render targets

use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::from_rgb_u32(value))
    }

    /// Build from a packed `0xRRGGBB` value
    pub fn from_rgb_u32(value: u32) -> Self {
        let channel = |shift: u32| f32::from(((value >> shift) & 0xff) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How the host shades a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Diffuse-lit mesh material
    Lambert,
    /// Camera-facing sprite material
    Sprite,
}

/// Per-target appearance state
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Shading model
    pub shading: Shading,
    /// Base color
    pub color: Color,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether the host should blend this material
    pub transparent: bool,
    /// Screen-space roll, only meaningful for sprite shading
    pub rotation: f32,
}

impl Material {
    /// Opaque lit material
    pub fn lambert(color: Color) -> Self {
        Self {
            shading: Shading::Lambert,
            color,
            opacity: 1.0,
            transparent: false,
            rotation: 0.0,
        }
    }

    /// Opaque sprite material
    pub fn sprite(color: Color) -> Self {
        Self {
            shading: Shading::Sprite,
            ..Self::lambert(color)
        }
    }
}
