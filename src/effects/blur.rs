use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::render::layer::Layer;

/// Maps the 1..=100 user blur scale onto a Gaussian sigma in pixels.
///
/// Three linear segments: `[1, 20] -> [0.3, 2.0]`, `[20, 70] -> [2.0, 10.0]` and
/// `[70, 100] -> [10.0, 30.0]`. Out-of-range input is clamped first.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlurConverter;

const SEGMENTS: [(f32, f32, f32, f32); 3] = [
    (1.0, 20.0, 0.3, 2.0),
    (20.0, 70.0, 2.0, 10.0),
    (70.0, 100.0, 10.0, 30.0),
];

impl BlurConverter {
    /// Convert a blur value to a sigma.
    pub fn convert(value: u32) -> f32 {
        let v = value.clamp(1, 100) as f32;
        for (in0, in1, out0, out1) in SEGMENTS {
            if v <= in1 {
                let t = (v - in0) / (in1 - in0);
                return out0 + t * (out1 - out0);
            }
        }
        SEGMENTS[2].3
    }

    /// Kernel half-width covering three standard deviations.
    pub fn kernel_radius(sigma: f32) -> u32 {
        if !sigma.is_finite() || sigma <= 0.0 {
            return 0;
        }
        (sigma * 3.0).ceil() as u32
    }
}

/// Gaussian blur of a whole layer in place.
///
/// Only the alpha bounding box grown by the kernel radius is convolved; everything farther
/// away is transparent before and after the blur.
pub fn blur_layer(layer: &mut Layer, sigma: f32) -> LowerThirdResult<()> {
    let Some(kernel) = GaussianKernel::new(sigma) else {
        return Ok(());
    };
    let Some((bx0, by0, bx1, by1)) = layer.alpha_bounds() else {
        return Ok(());
    };
    let radius = kernel.radius as u32;
    let (w, h) = (layer.width(), layer.height());
    let x0 = bx0.saturating_sub(radius);
    let y0 = by0.saturating_sub(radius);
    let x1 = bx1.saturating_add(radius).min(w - 1);
    let y1 = by1.saturating_add(radius).min(h - 1);
    let (cw, ch) = (x1 - x0 + 1, y1 - y0 + 1);

    let stride = w as usize * 4;
    let row_len = cw as usize * 4;
    let mut crop = Vec::with_capacity(row_len * ch as usize);
    for y in y0..=y1 {
        let start = y as usize * stride + x0 as usize * 4;
        crop.extend_from_slice(&layer.data()[start..start + row_len]);
    }

    let blurred = kernel.apply(&crop, cw as usize, ch as usize);

    let data = layer.data_mut();
    for (row, y) in blurred.chunks_exact(row_len).zip(y0..=y1) {
        let start = y as usize * stride + x0 as usize * 4;
        data[start..start + row_len].copy_from_slice(row);
    }
    Ok(())
}

/// Separable Gaussian blur over a premultiplied RGBA8 buffer with clamp-to-edge sampling.
///
/// The kernel spans [`BlurConverter::kernel_radius`] taps each side; a sigma too small to
/// reach a neighbor returns the input unchanged.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> LowerThirdResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LowerThirdError::generation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LowerThirdError::generation(format!(
            "blur buffer holds {} bytes, expected {expected_len} for {width}x{height}",
            src.len()
        )));
    }
    Ok(match GaussianKernel::new(sigma) {
        Some(kernel) if expected_len > 0 => kernel.apply(src, width as usize, height as usize),
        _ => src.to_vec(),
    })
}

/// Symmetric Q16 taps summing to exactly `1 << 16`.
struct GaussianKernel {
    radius: usize,
    taps: Vec<u32>,
}

impl GaussianKernel {
    const ONE: u32 = 1 << 16;

    fn new(sigma: f32) -> Option<Self> {
        let radius = BlurConverter::kernel_radius(sigma) as usize;
        if radius == 0 {
            return None;
        }
        let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
        let half: Vec<f64> = (0..=radius)
            .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
            .collect();
        let total = half[0] + 2.0 * half[1..].iter().sum::<f64>();

        let side: Vec<u32> = half[1..]
            .iter()
            .map(|v| (v / total * f64::from(Self::ONE)).round() as u32)
            .collect();
        let center = Self::ONE.saturating_sub(2 * side.iter().sum::<u32>());

        let taps = side
            .iter()
            .rev()
            .chain(std::iter::once(&center))
            .chain(side.iter())
            .copied()
            .collect();
        Some(Self { radius, taps })
    }

    /// Horizontal then vertical pass over a `width` x `height` RGBA buffer.
    fn apply(&self, src: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut rows = vec![0u8; src.len()];
        self.convolve_lines(src, &mut rows, height, width, width, 1);
        let mut out = vec![0u8; src.len()];
        self.convolve_lines(&rows, &mut out, width, height, 1, width);
        out
    }

    /// Convolve `lines` runs of `len` pixels; line `n` starts at pixel `n * line_step` and
    /// consecutive pixels along it are `px_step` apart.
    fn convolve_lines(
        &self,
        src: &[u8],
        dst: &mut [u8],
        lines: usize,
        len: usize,
        line_step: usize,
        px_step: usize,
    ) {
        let last = len - 1;
        for line in 0..lines {
            let base = line * line_step;
            for i in 0..len {
                let mut acc = [0u64; 4];
                for (k, &tap) in self.taps.iter().enumerate() {
                    let j = (i + k).saturating_sub(self.radius).min(last);
                    let idx = (base + j * px_step) * 4;
                    for (a, &v) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                        *a += u64::from(tap) * u64::from(v);
                    }
                }
                let out = (base + i * px_step) * 4;
                for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                    *d = ((a + u64::from(Self::ONE / 2)) >> 16).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
