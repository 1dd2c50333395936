use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::text::transform::TextTransform;

/// Smallest accepted canvas width.
pub const MIN_IMAGE_WIDTH: u32 = 320;
/// Largest accepted canvas width.
pub const MAX_IMAGE_WIDTH: u32 = 7680;
/// Smallest accepted canvas height.
pub const MIN_IMAGE_HEIGHT: u32 = 240;
/// Largest accepted canvas height.
pub const MAX_IMAGE_HEIGHT: u32 = 4320;
/// Widest outline stroke; each extra pixel adds a ring of text copies.
pub const MAX_OUTLINE_WIDTH: u32 = 20;

/// Drop shadow settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Draw a shadow under the text.
    pub enabled: bool,
    /// Horizontal shadow offset in pixels.
    pub offset_x: i32,
    /// Vertical shadow offset in pixels.
    pub offset_y: i32,
    /// Softness on a 1..=100 scale, mapped through [`crate::BlurConverter`].
    pub blur: u32,
    /// Shadow color text.
    pub color: String,
    /// Shadow opacity.
    pub opacity: u8,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            offset_x: 2,
            offset_y: 2,
            blur: 20,
            color: "black".to_owned(),
            opacity: 128,
        }
    }
}

/// Text outline settings. A width of zero disables the outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Stroke width in pixels.
    pub width: u32,
    /// Outline color text.
    pub color: String,
    /// Outline opacity.
    pub opacity: u8,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            width: 0,
            color: "black".to_owned(),
            opacity: 255,
        }
    }
}

impl OutlineConfig {
    /// Whether the outline draws anything.
    pub fn enabled(&self) -> bool {
        self.width > 0
    }

    /// Parse `"WIDTH,COLOR[,OPACITY]"`. Malformed numeric fields keep their defaults and
    /// widths above [`MAX_OUTLINE_WIDTH`] are capped.
    pub fn from_spec(spec: &str) -> Self {
        let mut out = Self::default();
        if spec.trim().is_empty() {
            return out;
        }
        let mut parts = spec.split(',').map(str::trim);

        if let Some(w) = parts.next() {
            match w.parse::<u32>() {
                Ok(v) if v > MAX_OUTLINE_WIDTH => {
                    tracing::warn!(width = v, max = MAX_OUTLINE_WIDTH, "outline width capped");
                    out.width = MAX_OUTLINE_WIDTH;
                }
                Ok(v) => out.width = v,
                Err(_) => tracing::warn!(width = w, "invalid outline width"),
            }
        }
        if let Some(c) = parts.next().filter(|c| !c.is_empty()) {
            out.color = c.to_owned();
        }
        if let Some(o) = parts.next() {
            match o.parse::<u8>() {
                Ok(v) => out.opacity = v,
                Err(_) => tracing::warn!(opacity = o, "invalid outline opacity"),
            }
        }
        out
    }
}

/// Text appearance defaults applied to every row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Main font name, path, or `"random"`.
    pub main_font: String,
    /// Secondary font; `None` reuses the main font spec.
    pub secondary_font: Option<String>,
    /// Main font size; `None` derives it from the canvas height.
    pub main_font_size: Option<u32>,
    /// Secondary font size; `None` derives it from the canvas height.
    pub secondary_font_size: Option<u32>,
    /// Main text color.
    pub text_color: String,
    /// Secondary text color; `None` reuses `text_color`.
    pub secondary_text_color: Option<String>,
    /// Extra pixels between characters (negative tightens).
    pub letter_spacing: i32,
    /// Gap between main and secondary text; `None` uses half the main font size.
    pub vertical_spacing: Option<u32>,
    /// Case transform applied before measuring.
    pub text_transform: TextTransform,
    /// Drop shadow.
    pub shadow: ShadowConfig,
    /// Outline stroke.
    pub outline: OutlineConfig,
    /// Wrap lines to the canvas width minus `wrap_padding` on each side.
    pub wrap_text: bool,
    /// Horizontal safe zone for wrapped text.
    pub wrap_padding: Option<u32>,
    /// Additive horizontal offset applied after placement.
    pub position_offset_x: i32,
    /// Additive vertical offset applied after placement.
    pub position_offset_y: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            main_font: "Arial".to_owned(),
            secondary_font: None,
            main_font_size: None,
            secondary_font_size: None,
            text_color: "white".to_owned(),
            secondary_text_color: None,
            letter_spacing: 0,
            vertical_spacing: None,
            text_transform: TextTransform::None,
            shadow: ShadowConfig::default(),
            outline: OutlineConfig::default(),
            wrap_text: false,
            wrap_padding: None,
            position_offset_x: 0,
            position_offset_y: 0,
        }
    }
}

/// Horizontal band drawn behind the text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Bar color, optionally with alpha (`"black,128"`).
    pub color: String,
    /// Bar height; `None` uses a sixth of the canvas height.
    pub height: Option<u32>,
    /// Opacity override; wins over any alpha in `color`.
    pub opacity: Option<u8>,
    /// Top edge of the bar as a fraction of the canvas height.
    pub y_position_ratio: f64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            color: "black,0".to_owned(),
            height: None,
            opacity: None,
            y_position_ratio: 0.75,
        }
    }
}

/// Encoded output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG, 8- or 16-bit, optional alpha.
    #[default]
    Png,
    /// JPEG, always 8-bit opaque.
    #[serde(alias = "jpeg")]
    Jpg,
    /// TIFF, 8- or 16-bit, optional alpha.
    #[serde(alias = "tif")]
    Tiff,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Tiff => "tiff",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output encoding settings handed to the saver alongside each image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Encoded format.
    pub format: OutputFormat,
    /// Bits per channel: 8 or 16.
    pub bit_depth: u8,
    /// Keep an alpha channel in the output.
    pub transparent: bool,
    /// Leave already existing output files untouched.
    pub skip_existing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            bit_depth: 16,
            transparent: false,
            skip_existing: false,
        }
    }
}

/// Canvas-derived defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
}

impl Dimensions {
    /// Build from canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Default main font size (`height / 18`).
    pub fn main_font_size(self) -> u32 {
        self.height / 18
    }

    /// Default secondary font size (`height / 25`).
    pub fn secondary_font_size(self) -> u32 {
        self.height / 25
    }

    /// Default edge padding (`2 * floor(0.02 * height)`).
    pub fn padding(self) -> u32 {
        (self.height / 50) * 2
    }

    /// Default bar height (`height / 6`).
    pub fn bar_height(self) -> u32 {
        self.height / 6
    }

    /// Inner padding between the bar top and the text (`floor(0.02 * height)`).
    pub fn bar_padding(self) -> u32 {
        self.height / 50
    }

    /// Default gap between main and secondary text.
    pub fn vertical_spacing(main_font_size: u32) -> u32 {
        main_font_size / 2
    }
}

/// Run-wide configuration, read-only during a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background color.
    pub bg_color: String,
    /// Edge padding; `None` derives it from the canvas height.
    pub padding: Option<u32>,
    /// Placement used when a row leaves justification empty.
    pub default_justification: String,
    /// Text settings.
    pub text: TextConfig,
    /// Bar settings.
    pub bar: BarConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Force debug-level logging.
    pub debug: bool,
    /// Log level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`).
    pub log_level: String,
    /// Optional log file path.
    pub log_file: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            bg_color: "black".to_owned(),
            padding: None,
            default_justification: "lower left".to_owned(),
            text: TextConfig::default(),
            bar: BarConfig::default(),
            output: OutputConfig::default(),
            debug: false,
            log_level: "INFO".to_owned(),
            log_file: None,
        }
    }
}

impl Configuration {
    /// Canvas-derived defaults for this configuration.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Edge padding, explicit or derived.
    pub fn resolved_padding(&self) -> u32 {
        self.padding
            .unwrap_or_else(|| self.dimensions().padding())
    }

    /// Main font size, explicit or derived.
    pub fn main_font_size(&self) -> u32 {
        self.text
            .main_font_size
            .unwrap_or_else(|| self.dimensions().main_font_size())
    }

    /// Secondary font size, explicit or derived.
    pub fn secondary_font_size(&self) -> u32 {
        self.text
            .secondary_font_size
            .unwrap_or_else(|| self.dimensions().secondary_font_size())
    }

    /// Bar height, explicit or derived.
    pub fn bar_height(&self) -> u32 {
        self.bar
            .height
            .unwrap_or_else(|| self.dimensions().bar_height())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> LowerThirdResult<Self> {
        serde_json::from_str(s).map_err(|e| {
            LowerThirdError::config_message(format!("configuration json parse failed: {e}"))
        })
    }

    /// Parse JSON from a reader.
    pub fn from_reader(mut r: impl Read) -> LowerThirdResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)
            .context("read configuration json")?;
        Self::from_json_str(&s)
    }

    /// Load JSON from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> LowerThirdResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open configuration '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> LowerThirdResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LowerThirdError::config_message(format!("configuration json serialize failed: {e}"))
        })
    }

    /// Write pretty JSON to a file path, creating parent directories.
    pub fn to_path(&self, path: impl AsRef<Path>) -> LowerThirdResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config dir '{}'", parent.display()))?;
        }
        std::fs::write(path, self.to_json_string()?)
            .with_context(|| format!("write configuration '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
