use crate::foundation::core::Canvas;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Float image batch in `[n, h, w, c]` (or unbatched `[h, w, c]`) layout with values in `0..=1`.
///
/// `c` is 3 (RGB) or 4 (RGBA). RGB images are treated as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageTensor {
    batched: bool,
    count: usize,
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Wrap `data` with `shape`, which must be `[h, w, c]` or `[n, h, w, c]`.
    pub fn new(shape: &[usize], data: Vec<f32>) -> OverlayResult<Self> {
        let (batched, count, height, width, channels) = match *shape {
            [h, w, c] => (false, 1, h, w, c),
            [n, h, w, c] => (true, n, h, w, c),
            _ => {
                return Err(OverlayError::validation(format!(
                    "image tensor must have rank 3 or 4 (got shape {shape:?})"
                )));
            }
        };
        if channels != 3 && channels != 4 {
            return Err(OverlayError::validation(format!(
                "image tensor must have 3 or 4 channels (got {channels})"
            )));
        }
        // Per-image size must fit even when the batch is empty.
        let expected = image_len(height, width, channels)
            .and_then(|v| v.checked_mul(count))
            .ok_or_else(|| OverlayError::validation("image tensor shape overflows"))?;
        if data.len() != expected {
            return Err(OverlayError::validation(format!(
                "image tensor data has {} values, shape {shape:?} needs {expected}",
                data.len()
            )));
        }

        Ok(Self {
            batched,
            count,
            height,
            width,
            channels,
            data,
        })
    }

    /// Shape as passed to [`ImageTensor::new`].
    pub fn shape(&self) -> Vec<usize> {
        if self.batched {
            vec![self.count, self.height, self.width, self.channels]
        } else {
            vec![self.height, self.width, self.channels]
        }
    }

    /// Whether the tensor carries a leading batch dimension.
    pub fn is_batched(&self) -> bool {
        self.batched
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when the batch holds no images.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Channels per pixel (3 or 4).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Flat values in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Convert every image to an RGBA8 canvas.
    ///
    /// Values are clamped to `0..=1`, scaled by 255 and truncated.
    pub fn to_canvases(&self) -> OverlayResult<Vec<Canvas>> {
        let w = u32::try_from(self.width)
            .map_err(|_| OverlayError::validation("image width exceeds u32"))?;
        let h = u32::try_from(self.height)
            .map_err(|_| OverlayError::validation("image height exceeds u32"))?;
        let len = image_len(self.height, self.width, self.channels)
            .ok_or_else(|| OverlayError::validation("image tensor shape overflows"))?;

        let mut out = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let image = &self.data[i * len..(i + 1) * len];
            let mut rgba8 = Vec::with_capacity(len / self.channels * 4);
            for px in image.chunks_exact(self.channels) {
                rgba8.extend(px[..3].iter().map(|&v| unit_to_u8(v)));
                rgba8.push(if self.channels == 4 {
                    unit_to_u8(px[3])
                } else {
                    255
                });
            }
            out.push(Canvas::from_rgba8(w, h, rgba8)?);
        }
        Ok(out)
    }

    /// Build a tensor from equally sized canvases, dividing each byte by 255.
    ///
    /// An unbatched tensor needs exactly one canvas. With 3 channels alpha is dropped.
    pub fn from_canvases(
        canvases: &[Canvas],
        channels: usize,
        batched: bool,
    ) -> OverlayResult<Self> {
        if !batched && canvases.len() != 1 {
            return Err(OverlayError::validation(format!(
                "unbatched image tensor needs exactly one image (got {})",
                canvases.len()
            )));
        }
        let (w, h) = canvases.first().map(Canvas::size).unwrap_or((0, 0));
        if let Some(c) = canvases.iter().find(|c| c.size() != (w, h)) {
            return Err(OverlayError::validation(format!(
                "image batch mixes sizes {w}x{h} and {}x{}",
                c.width(),
                c.height()
            )));
        }

        let mut data = Vec::new();
        for canvas in canvases {
            for px in canvas.as_rgba8().chunks_exact(4) {
                data.extend(px[..channels.min(4)].iter().map(|&b| f32::from(b) / 255.0));
            }
        }

        let (h, w) = (h as usize, w as usize);
        let shape: Vec<usize> = if batched {
            vec![canvases.len(), h, w, channels]
        } else {
            vec![h, w, channels]
        };
        Self::new(&shape, data)
    }
}

fn image_len(height: usize, width: usize, channels: usize) -> Option<usize> {
    height.checked_mul(width)?.checked_mul(channels)
}

fn unit_to_u8(v: f32) -> u8 {
    // NaN falls through clamp and casts to 0.
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/io/tensor.rs"]
mod tests;
