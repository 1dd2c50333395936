//! Lowerthird composes broadcast lower-third graphics: two lines of styled text placed on a
//! canvas, optionally over a translucent bar, with drop shadow and outline effects.
//!
//! One [`RowData`] plus a validated [`Configuration`] produce one image:
//!
//! - Build a [`LowerThirdGenerator`] once per run
//! - Call [`LowerThirdGenerator::generate_from_row`] per row, or
//!   [`LowerThirdGenerator::generate_batch`] to render and save rows in parallel
//! - Encode results with an [`ImageSaver`]
//!
//! Rendering is CPU only. Text is shaped with `parley` and rasterized with `vello_cpu`;
//! compositing happens in premultiplied RGBA8.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod effects;
mod encode;
mod fonts;
mod foundation;
mod layout;
mod render;
mod scene;
mod text;

pub use crate::foundation::core::{PixelPoint, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{COLOR_FORMAT_HINT, LowerThirdError, LowerThirdResult};

pub use crate::assets::color::{Color, ColorParser, ParseOptions};
pub use crate::config::model::{
    BarConfig, Configuration, Dimensions, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH, MAX_OUTLINE_WIDTH,
    MIN_IMAGE_HEIGHT, MIN_IMAGE_WIDTH, OutlineConfig, OutputConfig, OutputFormat, ShadowConfig,
    TextConfig,
};
pub use crate::config::validate::ConfigValidator;
pub use crate::effects::blur::{BlurConverter, blur_layer, blur_rgba8_premul};
pub use crate::effects::outline::OutlineEffect;
pub use crate::effects::shadow::ShadowEffect;
pub use crate::encode::saver::ImageSaver;
pub use crate::fonts::discovery::{FONT_EXTENSIONS, FontDiscovery, is_font_file};
pub use crate::fonts::loader::{BUILTIN_FONT_SIZE, FontLoader, FontSource, LoadedFont};
pub use crate::layout::position::{
    Justification, Placement, TextDimensions, available_justifications,
};
pub use crate::render::builder::{BuildStage, LowerThirdBuilder};
pub use crate::render::generator::{BatchReport, LowerThirdGenerator};
pub use crate::render::layer::Layer;
pub use crate::render::resolve::{
    ColorChoice, FontChoice, LayoutChoice, ResolvedStyle, first_present,
};
pub use crate::scene::row::{RowData, sanitize_file_stem};
pub use crate::text::engine::{TextEngine, TextExtent, TextMeasure, TextPainter, TextSurface};
pub use crate::text::renderer::{TextFragment, TextRenderer};
pub use crate::text::transform::TextTransform;
