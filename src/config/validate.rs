use std::path::Path;

use crate::config::model::{
    Configuration, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH, MAX_OUTLINE_WIDTH, MIN_IMAGE_HEIGHT,
    MIN_IMAGE_WIDTH, OutputFormat,
};
use crate::foundation::error::{LowerThirdError, LowerThirdResult};

const LARGE_FONT_SIZE: u32 = 500;
const LARGE_LETTER_SPACING: i32 = 100;

/// Range and consistency checks for [`Configuration`].
///
/// Checks fail fast on the first hard error. Soft problems (very large fonts, extreme letter
/// spacing, format/bit-depth combinations that get normalized) are logged as warnings.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run every check and return the normalized configuration.
    pub fn validate(mut config: Configuration) -> LowerThirdResult<Configuration> {
        Self::validate_dimensions(&config)?;
        Self::validate_text(&config)?;
        Self::validate_bar(&config)?;
        Self::validate_output(&config)?;
        Self::normalize_output(&mut config);
        Ok(config)
    }

    /// Canvas size bounds.
    pub fn validate_dimensions(config: &Configuration) -> LowerThirdResult<()> {
        if config.width < MIN_IMAGE_WIDTH {
            return Err(LowerThirdError::configuration(
                "width",
                config.width,
                format!("image width too small (minimum: {MIN_IMAGE_WIDTH}px)"),
            ));
        }
        if config.width > MAX_IMAGE_WIDTH {
            return Err(LowerThirdError::configuration(
                "width",
                config.width,
                format!("image width too large (maximum: {MAX_IMAGE_WIDTH}px)"),
            ));
        }
        if config.height < MIN_IMAGE_HEIGHT {
            return Err(LowerThirdError::configuration(
                "height",
                config.height,
                format!("image height too small (minimum: {MIN_IMAGE_HEIGHT}px)"),
            ));
        }
        if config.height > MAX_IMAGE_HEIGHT {
            return Err(LowerThirdError::configuration(
                "height",
                config.height,
                format!("image height too large (maximum: {MAX_IMAGE_HEIGHT}px)"),
            ));
        }
        tracing::debug!(
            width = config.width,
            height = config.height,
            "dimensions validated"
        );
        Ok(())
    }

    /// Font sizes, spacing, wrap and effect parameters.
    pub fn validate_text(config: &Configuration) -> LowerThirdResult<()> {
        let text = &config.text;
        for (key, size) in [
            ("text.main_font_size", text.main_font_size),
            ("text.secondary_font_size", text.secondary_font_size),
        ] {
            let Some(size) = size else { continue };
            if size == 0 {
                return Err(LowerThirdError::configuration(
                    key,
                    size,
                    "font size must be positive",
                ));
            }
            if size > LARGE_FONT_SIZE {
                tracing::warn!(key, size, "font size is very large, layout may suffer");
            }
        }

        if text.letter_spacing.abs() > LARGE_LETTER_SPACING {
            tracing::warn!(
                letter_spacing = text.letter_spacing,
                "letter spacing is very large, layout may suffer"
            );
        }

        if text.wrap_text && text.wrap_padding.is_none() {
            return Err(LowerThirdError::configuration(
                "text.wrap_padding",
                "null",
                "wrap_padding is required when wrap_text is enabled",
            ));
        }
        if let Some(p) = text.wrap_padding
            && p < 1
        {
            return Err(LowerThirdError::configuration(
                "text.wrap_padding",
                p,
                "wrap_padding must be at least 1",
            ));
        }

        if !(1..=100).contains(&text.shadow.blur) {
            return Err(LowerThirdError::configuration(
                "text.shadow.blur",
                text.shadow.blur,
                "shadow blur must be between 1 and 100",
            ));
        }
        if text.outline.width > MAX_OUTLINE_WIDTH {
            return Err(LowerThirdError::configuration(
                "text.outline.width",
                text.outline.width,
                format!("outline width must be at most {MAX_OUTLINE_WIDTH}px"),
            ));
        }
        tracing::debug!("text configuration validated");
        Ok(())
    }

    /// Bar geometry.
    pub fn validate_bar(config: &Configuration) -> LowerThirdResult<()> {
        if let Some(h) = config.bar.height
            && h > config.height
        {
            return Err(LowerThirdError::configuration(
                "bar.height",
                h,
                format!(
                    "bar height ({h}px) exceeds image height ({}px)",
                    config.height
                ),
            ));
        }
        let ratio = config.bar.y_position_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(LowerThirdError::configuration(
                "bar.y_position_ratio",
                ratio,
                "bar y_position_ratio must be between 0.0 and 1.0",
            ));
        }
        tracing::debug!("bar configuration validated");
        Ok(())
    }

    /// Output format and bit depth.
    pub fn validate_output(config: &Configuration) -> LowerThirdResult<()> {
        let out = &config.output;
        if !matches!(out.bit_depth, 8 | 16) {
            return Err(LowerThirdError::configuration(
                "output.bit_depth",
                out.bit_depth,
                "bit depth must be 8 or 16",
            ));
        }
        tracing::debug!(format = %out.format, "output configuration validated");
        Ok(())
    }

    /// Check that `dir` is usable as an output directory, optionally creating it.
    pub fn validate_output_dir(dir: &Path, create: bool) -> LowerThirdResult<()> {
        if dir.exists() && !dir.is_dir() {
            return Err(LowerThirdError::configuration(
                "output_dir",
                dir.display(),
                "output path exists but is not a directory",
            ));
        }
        if !dir.exists() {
            if !create {
                return Err(LowerThirdError::configuration(
                    "output_dir",
                    dir.display(),
                    "output directory does not exist",
                ));
            }
            std::fs::create_dir_all(dir).map_err(|e| {
                LowerThirdError::configuration(
                    "output_dir",
                    dir.display(),
                    format!("cannot create output directory: {e}"),
                )
            })?;
            tracing::info!(dir = %dir.display(), "created output directory");
        }
        Ok(())
    }

    fn normalize_output(config: &mut Configuration) {
        let out = &mut config.output;
        if out.format == OutputFormat::Jpg {
            if out.transparent {
                tracing::warn!("JPEG does not support transparency, writing opaque output");
                out.transparent = false;
            }
            if out.bit_depth != 8 {
                tracing::warn!(
                    bit_depth = out.bit_depth,
                    "JPEG is always 8-bit, using 8-bit"
                );
                out.bit_depth = 8;
            }
        } else if out.bit_depth == 16 && out.format != OutputFormat::Tiff {
            tracing::warn!(format = %out.format, "16-bit depth is only written for TIFF, using 8-bit");
            out.bit_depth = 8;
        }
    }
}

impl Configuration {
    /// Validate and normalize. See [`ConfigValidator::validate`].
    pub fn validate(self) -> LowerThirdResult<Self> {
        ConfigValidator::validate(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/validate.rs"]
mod tests;
