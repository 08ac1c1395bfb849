use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::OverlayResult;
use crate::io::tensor::ImageTensor;
use crate::layout::place::{Placement, place_text};
use crate::layout::wrap::{TextMeasure, wrap_text};
use crate::render::raster::{GlyphRasterizer, TextPaint, font_data};
use crate::style::color::parse_color;
use crate::style::params::{OverlayParams, StyleSpec};
use crate::text::engine::{TextBlock, TextLayoutEngine};
use crate::text::font::{FontResolver, ResolvedFont};

/// Whether [`TextOverlay::draw_text`] may reuse the previous call's layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutReuse {
    /// Resolve the font, wrap, measure and place from scratch.
    #[default]
    Recompute,
    /// Reuse the font, wrapped text and origin of the previous call.
    ///
    /// Only valid when canvas size, text and style (colors aside) are unchanged since that call;
    /// the overlay does not check. Falls back to recomputing when nothing is cached.
    ReuseLast,
}

struct LayoutCache {
    font: ResolvedFont,
    font_data: vello_cpu::peniko::FontData,
    block: TextBlock,
    origin: Point,
}

/// Draws styled, wrapped text onto canvases.
///
/// Holds the font resolver, the shaping engine and an optional cached layout. Not meant to be
/// shared between independent render streams; give each its own instance.
pub struct TextOverlay {
    fonts: FontResolver,
    engine: TextLayoutEngine,
    raster: GlyphRasterizer,
    cache: Option<LayoutCache>,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self::new(FontResolver::from_env())
    }
}

impl TextOverlay {
    /// Overlay resolving fonts through `fonts`.
    pub fn new(fonts: FontResolver) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            raster: GlyphRasterizer::new(),
            cache: None,
        }
    }

    /// Font resolver in use.
    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// Layout and origin used by the most recent draw that got past layout.
    pub fn last_layout(&self) -> Option<(&TextBlock, Point)> {
        self.cache.as_ref().map(|c| (&c.block, c.origin))
    }

    /// Font used by the most recent draw that got past layout.
    pub fn last_font(&self) -> Option<&ResolvedFont> {
        self.cache.as_ref().map(|c| &c.font)
    }

    /// Draw `text` onto `canvas` with `style`, returning the same canvas.
    ///
    /// Colors are parsed on every call, including when the layout is reused.
    pub fn draw_text<'c>(
        &mut self,
        canvas: &'c mut Canvas,
        text: &str,
        style: &StyleSpec,
        reuse: LayoutReuse,
    ) -> OverlayResult<&'c mut Canvas> {
        style.validate()?;

        let layout = match (reuse, self.cache.take()) {
            (LayoutReuse::ReuseLast, Some(cache)) => {
                tracing::trace!("reusing cached text layout");
                cache
            }
            _ => self.compute_layout(canvas.size(), text, style)?,
        };

        let paint = TextPaint {
            fill: parse_color(&style.fill_color_hex, 1.0)?,
            stroke: parse_color(&style.stroke_color_hex, style.stroke_opacity)?,
            stroke_px: layout.block.stroke_px,
        };
        let drawn = self.raster.draw_block(
            canvas,
            &layout.block,
            &layout.font_data,
            layout.origin,
            paint,
        );
        self.cache = Some(layout);
        drawn?;
        Ok(canvas)
    }

    /// Draw the same text and style onto every canvas in order.
    ///
    /// The first canvas computes the layout; each later canvas reuses it when it has the same
    /// size as the canvas before it, and recomputes otherwise.
    ///
    /// A canvas that fails to draw does not stop the batch. Every canvas is attempted and the
    /// first error is returned once the batch is done; failed canvases are left as they were.
    #[tracing::instrument(skip_all, fields(canvases = canvases.len()))]
    pub fn render_batch(
        &mut self,
        canvases: &mut [Canvas],
        text: &str,
        style: &StyleSpec,
    ) -> OverlayResult<()> {
        let mut prev_size = None;
        let mut first_err = None;
        for (i, canvas) in canvases.iter_mut().enumerate() {
            let size = canvas.size();
            let reuse = if prev_size == Some(size) {
                LayoutReuse::ReuseLast
            } else {
                LayoutReuse::Recompute
            };
            prev_size = Some(size);
            if let Err(err) = self.draw_text(canvas, text, style, reuse) {
                tracing::warn!(index = i, error = %err, "text overlay failed for canvas");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Draw `params` onto every image of a float tensor, returning a tensor of the same shape.
    pub fn apply(
        &mut self,
        images: &ImageTensor,
        params: &OverlayParams,
    ) -> OverlayResult<ImageTensor> {
        params.validate()?;
        let mut canvases = images.to_canvases()?;
        self.render_batch(&mut canvases, &params.text, &params.style)?;
        ImageTensor::from_canvases(&canvases, images.channels(), images.is_batched())
    }

    fn compute_layout(
        &mut self,
        canvas_size: (u32, u32),
        text: &str,
        style: &StyleSpec,
    ) -> OverlayResult<LayoutCache> {
        let font = self.fonts.resolve(&style.font)?;
        self.engine.set_font(&font, style.font_size as f32)?;

        let stroke_px = style.stroke_width_px();
        let max_width = canvas_size.0 as f32 - 2.0 * style.padding as f32;
        let engine = &mut self.engine;
        let mut stroked_width =
            |line: &str| engine.advance_width(line) + 2.0 * stroke_px as f32;
        let wrapped = wrap_text(text, &mut stroked_width, max_width);

        let block = self.engine.layout_block(
            &wrapped,
            style.horizontal_alignment,
            style.line_spacing as f32,
            stroke_px,
        )?;
        let origin = place_text(block.bounds, canvas_size, &Placement::from(style));
        tracing::debug!(
            lines = block.lines.len(),
            width = block.bounds.width(),
            height = block.bounds.height(),
            x = origin.x,
            y = origin.y,
            "computed text layout"
        );

        Ok(LayoutCache {
            font_data: font_data(&font.bytes, font.index),
            font,
            block,
            origin,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
