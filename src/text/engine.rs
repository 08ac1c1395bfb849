use std::sync::Arc;

use crate::foundation::core::{HAlign, Rect};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::layout::wrap::TextMeasure;
use crate::text::font::ResolvedFont;

/// One shaped line of a [`TextBlock`], glyphs already in block coordinates.
#[derive(Clone)]
pub struct BlockLine {
    /// Line text.
    pub text: String,
    /// Advance width of the line in pixels.
    pub width: f32,
    /// Glyphs positioned relative to the block's top-left corner (y is the baseline).
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// Wrapped text shaped into lines, with its bounding box.
///
/// `bounds` starts at the origin and already includes the stroke on every side, so drawing the
/// block at an origin `p` keeps all ink inside `bounds + p`.
#[derive(Clone)]
pub struct TextBlock {
    /// Wrapped text, lines separated by `\n`.
    pub text: String,
    /// Shaped lines in order.
    pub lines: Vec<BlockLine>,
    /// Block extent including stroke.
    pub bounds: Rect,
    /// Font size the block was shaped at.
    pub font_size: f32,
    /// Stroke width in pixels the bounds account for.
    pub stroke_px: u32,
}

impl std::fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBlock")
            .field("text", &self.text)
            .field("lines", &self.lines.len())
            .field("bounds", &self.bounds)
            .field("font_size", &self.font_size)
            .field("stroke_px", &self.stroke_px)
            .finish()
    }
}

/// One face registered with the Parley collection under its own family name.
#[derive(Clone)]
struct RegisteredFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
    stack_name: String,
    weight: parley::fontique::FontWeight,
    style: parley::fontique::FontStyle,
    width: parley::fontique::FontWidth,
}

struct BoundFont {
    face: RegisteredFace,
    family: String,
    size_px: f32,
}

/// Stateful helper for shaping and measuring text with Parley.
///
/// Bind a font with [`TextLayoutEngine::set_font`] before measuring. Each distinct font file and
/// face index is registered with the font collection once, under a family name no other face
/// shares, so shaping always uses exactly the bound face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: Vec<RegisteredFace>,
    current: Option<BoundFont>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
            current: None,
        }
    }

    /// Family name of the bound font, if any.
    pub fn family(&self) -> Option<&str> {
        self.current.as_ref().map(|f| f.family.as_str())
    }

    /// Use `font` at `size_px` for subsequent measuring and shaping.
    pub fn set_font(&mut self, font: &ResolvedFont, size_px: f32) -> OverlayResult<()> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(OverlayError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let face = match self
            .registered
            .iter()
            .find(|f| Arc::ptr_eq(&f.bytes, &font.bytes) && f.index == font.index)
        {
            Some(face) => face.clone(),
            None => {
                let face = self.register(font)?;
                self.registered.push(face.clone());
                face
            }
        };

        self.current = Some(BoundFont {
            face,
            family: font.family.clone(),
            size_px,
        });
        Ok(())
    }

    fn register(&mut self, font: &ResolvedFont) -> OverlayResult<RegisteredFace> {
        let stack_name = format!("textoverlay-face-{}", self.registered.len());
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            Some(parley::fontique::FontInfoOverride {
                family_name: Some(stack_name.as_str()),
                ..Default::default()
            }),
        );

        // Collections register every face; keep the attributes of the requested one so the
        // family query lands on it.
        let info = families
            .iter()
            .flat_map(|(_, infos)| infos.iter())
            .find(|info| info.index() == font.index)
            .ok_or_else(|| {
                OverlayError::font(format!(
                    "face {} of '{}' could not be registered",
                    font.index, font.requested
                ))
            })?;

        Ok(RegisteredFace {
            bytes: font.bytes.clone(),
            index: font.index,
            weight: info.weight(),
            style: info.style(),
            width: info.width(),
            stack_name,
        })
    }

    /// Shape `text` as a single unwrapped line with the bound font.
    pub fn layout_line(&mut self, text: &str) -> OverlayResult<parley::Layout<()>> {
        let font = self
            .current
            .as_ref()
            .ok_or_else(|| OverlayError::font("no font bound to text layout engine"))?;
        let face = &font.face;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(
                std::borrow::Cow::Owned(face.stack_name.clone()),
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style));
        builder.push_default(parley::style::StyleProperty::FontWidth(face.width));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Shape `wrapped` (lines separated by `\n`) into a [`TextBlock`].
    ///
    /// Lines are aligned against the widest line with `align`. Consecutive baselines are one
    /// line height plus `2 * stroke_px` plus `line_spacing` apart, so stroked lines never touch
    /// at zero spacing.
    pub fn layout_block(
        &mut self,
        wrapped: &str,
        align: HAlign,
        line_spacing: f32,
        stroke_px: u32,
    ) -> OverlayResult<TextBlock> {
        let font_size = self
            .current
            .as_ref()
            .map(|f| f.size_px)
            .ok_or_else(|| OverlayError::font("no font bound to text layout engine"))?;
        let stroke = stroke_px as f32;
        let line_height = self.layout_line("A")?.height();
        let pitch = line_height + 2.0 * stroke + line_spacing.max(0.0);

        let mut shaped = Vec::<(String, f32, parley::Layout<()>)>::new();
        for text in wrapped.split('\n') {
            let layout = self.layout_line(text)?;
            shaped.push((text.to_owned(), layout.width(), layout));
        }
        let block_w = shaped.iter().map(|(_, w, _)| *w).fold(0.0f32, f32::max);

        let mut lines = Vec::with_capacity(shaped.len());
        for (i, (text, width, layout)) in shaped.into_iter().enumerate() {
            let dx = stroke
                + match align {
                    HAlign::Left => 0.0,
                    HAlign::Center => (block_w - width) / 2.0,
                    HAlign::Right => block_w - width,
                };
            let dy = stroke + (i as f32) * pitch;

            let mut glyphs = Vec::new();
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x + dx,
                        y: g.y + dy,
                    }));
                }
            }
            lines.push(BlockLine {
                text,
                width,
                glyphs,
            });
        }

        let n = lines.len().max(1) as f32;
        let height = n * line_height + (n - 1.0) * (pitch - line_height) + 2.0 * stroke;
        let width = block_w + 2.0 * stroke;

        Ok(TextBlock {
            text: wrapped.to_owned(),
            lines,
            bounds: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            font_size,
            stroke_px,
        })
    }
}

impl TextMeasure for TextLayoutEngine {
    fn advance_width(&mut self, text: &str) -> f32 {
        self.layout_line(text).map(|l| l.width()).unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
