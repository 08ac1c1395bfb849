//! Styled multi-line text overlays for images and image batches.
//!
//! Text is word-wrapped against the canvas width, shaped with Parley, placed by alignment,
//! padding and shift, and rasterized on the CPU with `vello_cpu` (stroke under fill).
//!
//! ```no_run
//! use textoverlay::{Canvas, LayoutReuse, Rgba8, StyleSpec, TextOverlay};
//!
//! let mut overlay = TextOverlay::default();
//! let mut canvas = Canvas::filled(640, 360, Rgba8::new(20, 20, 20, 255));
//! overlay.draw_text(&mut canvas, "Hello there", &StyleSpec::default(), LayoutReuse::Recompute)?;
//! # Ok::<(), textoverlay::OverlayError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod io;
mod layout;
mod render;
mod style;
mod text;

pub use foundation::core::{Canvas, HAlign, Point, Rect, Rgba8, VAlign};
pub use foundation::error::{OverlayError, OverlayResult};
pub use io::decode::{
    canvas_from_image, decode_canvas, image_from_canvas, load_canvas, save_canvas,
};
pub use io::tensor::ImageTensor;
pub use layout::place::{Placement, place_text};
pub use layout::wrap::{TextMeasure, wrap_text};
pub use render::overlay::{LayoutReuse, TextOverlay};
pub use render::raster::{GlyphRasterizer, TextPaint, font_data};
pub use style::color::parse_color;
pub use style::params::{
    FONT_SIZE_RANGE, MAX_LINE_SPACING, MAX_PADDING, MAX_SHIFT, OverlayParams, StyleSpec,
};
pub use text::engine::{BlockLine, TextBlock, TextLayoutEngine};
pub use text::font::{FONTS_DIR_ENV, FontResolver, FontSource, ResolvedFont, list_fonts};
