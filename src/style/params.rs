use crate::foundation::core::{HAlign, VAlign};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::style::color::parse_color;

/// Inclusive font size range in pixels.
pub const FONT_SIZE_RANGE: (u32, u32) = (1, 9999);
/// Largest accepted padding in pixels.
pub const MAX_PADDING: u32 = 128;
/// Largest accepted absolute x/y shift in pixels.
pub const MAX_SHIFT: i32 = 128;
/// Largest accepted extra spacing between lines in pixels.
pub const MAX_LINE_SPACING: f64 = 50.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Styling for one overlay: font, colors, stroke, padding, alignment and offsets.
///
/// Colors stay as hex strings here and are parsed on every render call, so the same style can be
/// re-colored between frames without touching the cached layout.
pub struct StyleSpec {
    /// Font identity: a file name in the font directory, a path, or a family name.
    /// Empty selects the backend default font.
    pub font: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// Fill color as hex.
    pub fill_color_hex: String,
    /// Stroke color as hex.
    pub stroke_color_hex: String,
    /// Stroke width as a fraction of the font size (`0.0..=1.0`).
    pub stroke_thickness: f64,
    /// Stroke alpha when the stroke color carries none (`0.0..=1.0`).
    pub stroke_opacity: f64,
    /// Distance kept from the canvas edges, in pixels.
    pub padding: u32,
    /// Horizontal alignment of the block and of each line within it.
    pub horizontal_alignment: HAlign,
    /// Vertical alignment of the block.
    pub vertical_alignment: VAlign,
    /// Horizontal offset applied after alignment.
    pub x_shift: i32,
    /// Vertical offset applied after alignment.
    pub y_shift: i32,
    /// Extra pixels between consecutive lines.
    pub line_spacing: f64,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            font: String::new(),
            font_size: 32,
            fill_color_hex: "#FFFFFF".to_string(),
            stroke_color_hex: "#000000".to_string(),
            stroke_thickness: 0.2,
            stroke_opacity: 0.4,
            padding: 16,
            horizontal_alignment: HAlign::Center,
            vertical_alignment: VAlign::Bottom,
            x_shift: 0,
            y_shift: 0,
            line_spacing: 4.0,
        }
    }
}

impl StyleSpec {
    /// Check every field against its declared range, including both colors.
    pub fn validate(&self) -> OverlayResult<()> {
        let (min_size, max_size) = FONT_SIZE_RANGE;
        if !(min_size..=max_size).contains(&self.font_size) {
            return Err(OverlayError::validation(format!(
                "font_size must be in {min_size}..={max_size} (got {})",
                self.font_size
            )));
        }
        unit_fraction("stroke_thickness", self.stroke_thickness)?;
        unit_fraction("stroke_opacity", self.stroke_opacity)?;
        if self.padding > MAX_PADDING {
            return Err(OverlayError::validation(format!(
                "padding must be <= {MAX_PADDING} (got {})",
                self.padding
            )));
        }
        for (name, v) in [("x_shift", self.x_shift), ("y_shift", self.y_shift)] {
            if !(-MAX_SHIFT..=MAX_SHIFT).contains(&v) {
                return Err(OverlayError::validation(format!(
                    "{name} must be in -{MAX_SHIFT}..={MAX_SHIFT} (got {v})"
                )));
            }
        }
        if !self.line_spacing.is_finite()
            || self.line_spacing < 0.0
            || self.line_spacing > MAX_LINE_SPACING
        {
            return Err(OverlayError::validation(format!(
                "line_spacing must be in 0..={MAX_LINE_SPACING} (got {})",
                self.line_spacing
            )));
        }
        parse_color(&self.fill_color_hex, 1.0)?;
        parse_color(&self.stroke_color_hex, self.stroke_opacity)?;
        Ok(())
    }

    /// Stroke width in whole pixels: `round(font_size * stroke_thickness * 0.5)`.
    pub fn stroke_width_px(&self) -> u32 {
        (f64::from(self.font_size) * self.stroke_thickness * 0.5)
            .round()
            .max(0.0) as u32
    }
}

fn unit_fraction(name: &str, v: f64) -> OverlayResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(OverlayError::validation(format!(
            "{name} must be in 0.0..=1.0 (got {v})"
        )));
    }
    Ok(())
}

fn default_text() -> String {
    "Hello".to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Full parameter set for one overlay run: the text plus its style.
///
/// Serialized flat, so a params file reads like
/// `{"text": "Hi", "font_size": 48, "vertical_alignment": "top"}`; omitted keys take defaults.
pub struct OverlayParams {
    /// Text to draw; `\n` forces a line break.
    #[serde(default = "default_text")]
    pub text: String,
    /// Styling applied to `text`.
    #[serde(flatten)]
    pub style: StyleSpec,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            text: default_text(),
            style: StyleSpec::default(),
        }
    }
}

impl OverlayParams {
    /// Validate the style.
    pub fn validate(&self) -> OverlayResult<()> {
        self.style.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/params.rs"]
mod tests;
