use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, RgbaImage, Rgba};

use crate::config::model::{OutputConfig, OutputFormat};
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::foundation::math::widen_u8_to_u16;

/// Writes finished images according to an [`OutputConfig`].
///
/// Opaque output and JPEG drop the alpha channel; 16-bit output widens every channel by 257.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSaver {
    output: OutputConfig,
}

impl ImageSaver {
    /// Saver for `output`.
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Output settings in use.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// `<dir>/<stem>.<ext>`.
    pub fn output_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}.{}", self.output.format.extension()))
    }

    /// Whether `path` exists and existing outputs should be left alone.
    pub fn should_skip(&self, path: &Path) -> bool {
        self.output.skip_existing && path.exists()
    }

    /// Encode `image` to `<dir>/<stem>.<ext>`, creating `dir` if needed.
    ///
    /// With `skip_existing` set, an existing file is left untouched and its path returned.
    pub fn save(&self, image: &RgbaImage, dir: &Path, stem: &str) -> LowerThirdResult<PathBuf> {
        let path = self.output_path(dir, stem);
        if self.should_skip(&path) {
            tracing::debug!(path = %path.display(), "output exists, not overwriting");
            return Ok(path);
        }
        let fail = |msg: String| {
            LowerThirdError::save(path.display().to_string(), self.output.format.to_string(), msg)
        };

        std::fs::create_dir_all(dir)
            .map_err(|e| fail(format!("cannot create output directory: {e}")))?;

        let encoded = self.convert(image);
        encoded
            .save_with_format(&path, image_format(self.output.format))
            .map_err(|e| fail(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            format = %self.output.format,
            bit_depth = self.output.bit_depth,
            transparent = self.keeps_alpha(),
            "image saved"
        );
        Ok(path)
    }

    /// Whether encoded files carry an alpha channel.
    pub fn keeps_alpha(&self) -> bool {
        self.output.transparent && self.output.format != OutputFormat::Jpg
    }

    fn sixteen_bit(&self) -> bool {
        self.output.bit_depth == 16 && self.output.format != OutputFormat::Jpg
    }

    fn convert(&self, image: &RgbaImage) -> DynamicImage {
        let (w, h) = image.dimensions();
        match (self.keeps_alpha(), self.sixteen_bit()) {
            (true, false) => DynamicImage::ImageRgba8(image.clone()),
            (true, true) => DynamicImage::ImageRgba16(ImageBuffer::from_fn(w, h, |x, y| {
                Rgba(image.get_pixel(x, y).0.map(widen_u8_to_u16))
            })),
            (false, false) => DynamicImage::ImageRgb8(ImageBuffer::from_fn(w, h, |x, y| {
                let [r, g, b, _] = image.get_pixel(x, y).0;
                Rgb([r, g, b])
            })),
            (false, true) => DynamicImage::ImageRgb16(ImageBuffer::from_fn(w, h, |x, y| {
                let [r, g, b, _] = image.get_pixel(x, y).0;
                Rgb([r, g, b].map(widen_u8_to_u16))
            })),
        }
    }
}

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpg => ImageFormat::Jpeg,
        OutputFormat::Tiff => ImageFormat::Tiff,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/saver.rs"]
mod tests;
