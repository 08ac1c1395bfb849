use std::{fmt, str::FromStr};

use crate::foundation::error::{OverlayError, OverlayResult};

pub use kurbo::{Point, Rect};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Channels as an `[r, g, b, a]` array.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Horizontal placement of the text block (and of each line inside it).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Flush against the left padding.
    Left,
    /// Centered on the canvas.
    #[default]
    Center,
    /// Flush against the right padding.
    Right,
}

/// Vertical placement of the text block.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Flush against the top padding.
    Top,
    /// Centered on the canvas.
    Middle,
    /// Flush against the bottom padding.
    #[default]
    Bottom,
}

impl HAlign {
    /// Lowercase name used in params files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl VAlign {
    /// Lowercase name used in params files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for HAlign {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(OverlayError::validation(format!(
                "horizontal alignment must be left, center or right (got '{other}')"
            ))),
        }
    }
}

impl FromStr for VAlign {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(OverlayError::validation(format!(
                "vertical alignment must be top, middle or bottom (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for HAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable pixel surface in straight RGBA8, row-major, tightly packed.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba8_len", &self.rgba8.len())
            .finish()
    }
}

impl Canvas {
    /// Create a canvas filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let px = (width as usize) * (height as usize);
        let mut rgba8 = Vec::with_capacity(px * 4);
        for _ in 0..px {
            rgba8.extend_from_slice(&color.to_array());
        }
        Self {
            width,
            height,
            rgba8,
        }
    }

    /// Create a fully transparent canvas.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba8: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap existing straight RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> OverlayResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8.len() != expected {
            return Err(OverlayError::validation(format!(
                "canvas byte len {} does not match {width}x{height} RGBA8 ({expected})",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Mutable pixel bytes.
    pub fn as_rgba8_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8
    }

    /// Read one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8[i..i + 4];
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
