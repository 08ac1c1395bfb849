use crate::foundation::core::{HAlign, Point, Rect, VAlign};
use crate::style::params::StyleSpec;

/// Alignment, padding and offsets that position a measured text block on a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Distance kept from the aligned canvas edge.
    pub padding: u32,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
    /// Offset added to x after alignment.
    pub x_shift: i32,
    /// Offset added to y after alignment.
    pub y_shift: i32,
}

impl From<&StyleSpec> for Placement {
    fn from(style: &StyleSpec) -> Self {
        Self {
            padding: style.padding,
            h_align: style.horizontal_alignment,
            v_align: style.vertical_alignment,
            x_shift: style.x_shift,
            y_shift: style.y_shift,
        }
    }
}

/// Draw origin for a text block whose measured bounds are `bounds`.
///
/// Only the block's extent (`bounds.width()`, `bounds.height()`) matters. Centered axes ignore
/// padding. The result is not clamped: large shifts or padding on a small canvas may put the
/// text partly or fully off-canvas.
pub fn place_text(bounds: Rect, canvas_size: (u32, u32), placement: &Placement) -> Point {
    let (canvas_w, canvas_h) = (f64::from(canvas_size.0), f64::from(canvas_size.1));
    let padding = f64::from(placement.padding);
    let text_w = bounds.width();
    let text_h = bounds.height();

    let x = match placement.h_align {
        HAlign::Left => padding,
        HAlign::Center => (canvas_w - text_w) / 2.0,
        HAlign::Right => canvas_w - text_w - padding,
    };
    let y = match placement.v_align {
        VAlign::Top => padding,
        VAlign::Middle => (canvas_h - text_h) / 2.0,
        VAlign::Bottom => canvas_h - text_h - padding,
    };

    Point::new(
        x + f64::from(placement.x_shift),
        y + f64::from(placement.y_shift),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/place.rs"]
mod tests;
