use crate::foundation::core::Rgba8;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive).
///
/// Short forms are expanded by doubling each nibble. When the expanded string carries an alpha
/// byte it wins; otherwise alpha is `round(255 * opacity)` with `opacity` clamped to `[0, 1]`.
pub fn parse_color(hex: &str, opacity: f64) -> OverlayResult<Rgba8> {
    let s = hex.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    if !matches!(s.len(), 3 | 4 | 6 | 8) {
        return Err(OverlayError::invalid_color(format!(
            "'{hex}' must have 3, 4, 6 or 8 hex digits"
        )));
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(OverlayError::invalid_color(format!(
            "'{hex}' contains non-hex digits"
        )));
    }

    let expanded: String = if s.len() <= 4 {
        s.chars().flat_map(|c| [c, c]).collect()
    } else {
        s.to_owned()
    };

    let hex_byte = |i: usize| -> OverlayResult<u8> {
        let pair = &expanded[i * 2..i * 2 + 2];
        u8::from_str_radix(pair, 16)
            .map_err(|_| OverlayError::invalid_color(format!("invalid hex byte \"{pair}\"")))
    };

    let r = hex_byte(0)?;
    let g = hex_byte(1)?;
    let b = hex_byte(2)?;
    let a = if expanded.len() == 8 {
        hex_byte(3)?
    } else {
        opacity_to_alpha(opacity)
    };

    Ok(Rgba8::new(r, g, b, a))
}

fn opacity_to_alpha(opacity: f64) -> u8 {
    let o = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };
    (255.0 * o).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
