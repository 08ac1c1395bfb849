use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::{mul_div255_u8, unpremul_u8};
use crate::text::engine::TextBlock;

/// Paint for one text draw: fill and stroke colors drawn together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPaint {
    /// Glyph fill color.
    pub fill: Rgba8,
    /// Outline color.
    pub stroke: Rgba8,
    /// Outline width in pixels, measured outward from the glyph edge.
    pub stroke_px: u32,
}

/// CPU glyph rasterizer powered by `vello_cpu`.
///
/// Stroke and fill are rendered into one transparent layer, which is then composited onto the
/// canvas in a single source-over pass.
#[derive(Default)]
pub struct GlyphRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl GlyphRasterizer {
    /// Construct a rasterizer; the render context is allocated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `block` with its top-left corner at `origin`.
    pub fn draw_block(
        &mut self,
        canvas: &mut Canvas,
        block: &TextBlock,
        font: &vello_cpu::peniko::FontData,
        origin: Point,
        paint: TextPaint,
    ) -> OverlayResult<()> {
        let (width, height) = canvas.size();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| OverlayError::render("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| OverlayError::render("canvas height exceeds u16"))?;

        let mut layer = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

            if paint.stroke_px > 0 && paint.stroke.a > 0 {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(
                    2.0 * f64::from(paint.stroke_px),
                ));
                ctx.set_paint(to_cpu_color(paint.stroke));
                for line in &block.lines {
                    ctx.glyph_run(font)
                        .font_size(block.font_size)
                        .stroke_glyphs(line.glyphs.iter().cloned());
                }
            }

            if paint.fill.a > 0 {
                ctx.set_paint(to_cpu_color(paint.fill));
                for line in &block.lines {
                    ctx.glyph_run(font)
                        .font_size(block.font_size)
                        .fill_glyphs(line.glyphs.iter().cloned());
                }
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut layer);
        });

        premul_over_straight_in_place(canvas.as_rgba8_mut(), layer.data_as_u8_slice())
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

/// Font handle for `vello_cpu` built from raw font bytes.
pub fn font_data(bytes: &[u8], index: u32) -> vello_cpu::peniko::FontData {
    vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), index)
}

fn to_cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Source-over of premultiplied `src` onto straight-alpha `dst`, both RGBA8.
pub(crate) fn premul_over_straight_in_place(dst: &mut [u8], src: &[u8]) -> OverlayResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(OverlayError::render(
            "premul_over_straight_in_place expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d[0] = s[0];
            d[1] = s[1];
            d[2] = s[2];
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - u16::from(sa);
        let da = d[3];
        let out_a = sa.saturating_add(mul_div255_u8(u16::from(da), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), u16::from(da));
            let out = s[c].saturating_add(mul_div255_u8(u16::from(dc), inv));
            d[c] = unpremul_u8(out, out_a);
        }
        d[3] = out_a;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
