use crate::effects::composite::{fill_rect_over, premul_over_in_place};
use crate::foundation::core::{Rgba8, Rgba8Premul};
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::foundation::math::div_alpha_u8;

/// Row-major premultiplied RGBA8 raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(width: u32, height: u32) -> LowerThirdResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Layer filled with a straight-alpha color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> LowerThirdResult<Self> {
        let len = byte_len(width, height)?;
        let px = color.premultiply().to_array();
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&px);
        }
        Ok(Self {
            width,
            height,
            data,
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

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the layer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    /// Source-over a straight-alpha color into a rectangle, clipped to the layer.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgba8) {
        let clip = |v: i64, max: u32| v.clamp(0, i64::from(max)) as u32;
        let rect = (
            clip(x, self.width),
            clip(y, self.height),
            clip(x.saturating_add(w), self.width),
            clip(y.saturating_add(h), self.height),
        );
        fill_rect_over(&mut self.data, self.width, rect, color.premultiply());
    }

    /// Source-over `src` onto this layer.
    pub fn composite_over(&mut self, src: &Layer) -> LowerThirdResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(LowerThirdError::generation(format!(
                "cannot composite {}x{} layer onto {}x{}",
                src.width, src.height, self.width, self.height
            )));
        }
        premul_over_in_place(&mut self.data, &src.data)
    }

    /// Inclusive bounding box `(x0, y0, x1, y1)` of pixels with non-zero alpha.
    pub fn alpha_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> LowerThirdResult<image::RgbaImage> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            out.extend_from_slice(&[
                div_alpha_u8(px[0], a),
                div_alpha_u8(px[1], a),
                div_alpha_u8(px[2], a),
                a,
            ]);
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| LowerThirdError::generation("layer buffer does not match its size"))
    }
}

fn byte_len(width: u32, height: u32) -> LowerThirdResult<usize> {
    if width == 0 || height == 0 {
        return Err(LowerThirdError::generation("layer dimensions must be non-zero"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LowerThirdError::generation("layer buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
