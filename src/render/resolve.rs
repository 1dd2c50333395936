use crate::assets::color::{ColorParser, ParseOptions};
use crate::config::model::{Configuration, Dimensions};
use crate::effects::outline::OutlineEffect;
use crate::effects::shadow::ShadowEffect;
use crate::foundation::core::{PixelPoint, Rgba8};
use crate::layout::position::Justification;
use crate::scene::row::RowData;
use crate::text::renderer::TextRenderer;

/// First present value of row, config and computed default.
pub fn first_present<T>(row: Option<T>, config: Option<T>, computed: impl FnOnce() -> T) -> T {
    row.or(config).unwrap_or_else(computed)
}

/// Font specs and pixel sizes for both text blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontChoice {
    /// Main font spec; `None` selects the system default.
    pub main_spec: Option<String>,
    /// Secondary font spec; `None` reuses the main spec.
    pub secondary_spec: Option<String>,
    /// Main font size in pixels.
    pub main_size: u32,
    /// Secondary font size in pixels.
    pub secondary_size: u32,
}

impl FontChoice {
    /// Resolve fonts for one row.
    ///
    /// A row that names only a main font uses it for both blocks; the configured secondary
    /// font applies only when the row names no fonts. Zero sizes count as unset.
    pub fn resolve(config: &Configuration, row: &RowData) -> Self {
        let dims = config.dimensions();
        let nonzero = |v: Option<u32>| v.filter(|&s| s > 0);
        let main_spec = first_present(
            non_empty(row.main_font.as_deref()),
            non_empty(Some(config.text.main_font.as_str())),
            || "Arial",
        )
        .to_owned();
        let secondary_spec = match (
            non_empty(row.secondary_font.as_deref()),
            non_empty(row.main_font.as_deref()),
        ) {
            (Some(s), _) => Some(s.to_owned()),
            (None, Some(_)) => None,
            (None, None) => non_empty(config.text.secondary_font.as_deref()).map(str::to_owned),
        };
        Self {
            main_spec: Some(main_spec),
            secondary_spec,
            main_size: first_present(
                nonzero(row.main_font_size),
                nonzero(config.text.main_font_size),
                || dims.main_font_size(),
            ),
            secondary_size: first_present(
                nonzero(row.secondary_font_size),
                nonzero(config.text.secondary_font_size),
                || dims.secondary_font_size(),
            ),
        }
    }
}

/// Resolved colors, in straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorChoice {
    /// Canvas fill.
    pub background: Rgba8,
    /// Bar fill.
    pub bar: Rgba8,
    /// Main text.
    pub main_text: Rgba8,
    /// Secondary text.
    pub secondary_text: Rgba8,
}

impl ColorChoice {
    /// Resolve colors for one row.
    ///
    /// Opaque output forces an opaque background; transparent output keeps the alpha given in
    /// the background spec and treats a bare color as fully transparent. The bar takes
    /// `bar.opacity` first, then the alpha in its spec, then opaque.
    pub fn resolve(config: &Configuration, row: &RowData) -> Self {
        let bg_spec = row.bg_color.as_deref().unwrap_or(&config.bg_color);
        let background = if config.output.transparent {
            ColorParser::parse_lenient(Some(bg_spec), ParseOptions::with_default_alpha(0))
                .to_rgba8()
        } else {
            ColorParser::parse(bg_spec).to_rgba8().with_alpha(255)
        };

        let bar_spec = row.bar_color.as_deref().unwrap_or(&config.bar.color);
        let bar_color = ColorParser::parse(bar_spec);
        let bar = match config.bar.opacity {
            Some(a) => ColorParser::add_alpha(bar_color, a),
            None => bar_color.to_rgba8(),
        };

        let main_spec = row.main_color.as_deref().unwrap_or(&config.text.text_color);
        let secondary_spec = row.secondary_color.as_deref().unwrap_or_else(|| {
            config
                .text
                .secondary_text_color
                .as_deref()
                .unwrap_or(&config.text.text_color)
        });
        Self {
            background,
            bar,
            main_text: ColorParser::parse(main_spec).to_rgba8(),
            secondary_text: ColorParser::parse(secondary_spec).to_rgba8(),
        }
    }
}

/// Layout inputs other than measured text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutChoice {
    /// Placement keyword.
    pub justification: Justification,
    /// Edge padding.
    pub padding: u32,
    /// Wrap safe zone when wrapping is active.
    pub wrap_padding: Option<u32>,
    /// Additive offset applied after placement.
    pub offset: PixelPoint,
    /// Top edge of the bar.
    pub bar_y: i32,
    /// Bar height.
    pub bar_height: u32,
    /// Gap between the bar top and lower placements.
    pub bar_padding: u32,
}

impl LayoutChoice {
    /// Resolve layout inputs for one row.
    ///
    /// Wrapping is active when enabled (row over config) with a non-zero wrap padding that
    /// leaves some width to wrap into.
    pub fn resolve(config: &Configuration, row: &RowData) -> Self {
        let dims = config.dimensions();
        let justification = if row.justification.trim().is_empty() {
            Justification::parse(&config.default_justification)
        } else {
            Justification::parse(&row.justification)
        };
        let wrap = row.wrap_text.unwrap_or(config.text.wrap_text);
        let wrap_padding = row
            .wrap_padding
            .or(config.text.wrap_padding)
            .filter(|&p| wrap && p > 0 && u64::from(p) * 2 < u64::from(config.width));
        Self {
            justification,
            padding: first_present(row.padding, config.padding, || dims.padding()),
            wrap_padding,
            offset: PixelPoint::new(
                row.position_offset_x.unwrap_or(config.text.position_offset_x),
                row.position_offset_y.unwrap_or(config.text.position_offset_y),
            ),
            bar_y: bar_top(config),
            bar_height: config.bar_height(),
            bar_padding: dims.bar_padding(),
        }
    }

    /// Width available to wrapped lines.
    pub fn max_width(&self, canvas_width: u32) -> Option<u32> {
        self.wrap_padding
            .map(|p| canvas_width.saturating_sub(p.saturating_mul(2)))
    }
}

/// Everything a builder needs to know about one row, resolved once.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Fonts and sizes.
    pub fonts: FontChoice,
    /// Colors.
    pub colors: ColorChoice,
    /// Placement inputs.
    pub layout: LayoutChoice,
    /// Explicit gap between blocks; `None` derives it from the loaded main font size.
    pub vertical_spacing: Option<u32>,
    /// Case transform and letter spacing.
    pub renderer: TextRenderer,
    /// Drop shadow.
    pub shadow: ShadowEffect,
    /// Outline stroke.
    pub outline: OutlineEffect,
}

impl ResolvedStyle {
    /// Resolve all attribute groups for `row`.
    pub fn resolve(config: &Configuration, row: &RowData) -> Self {
        let mut shadow_cfg = config.text.shadow.clone();
        shadow_cfg.enabled |= row.text_shadow;
        Self {
            width: config.width,
            height: config.height,
            fonts: FontChoice::resolve(config, row),
            colors: ColorChoice::resolve(config, row),
            layout: LayoutChoice::resolve(config, row),
            vertical_spacing: config.text.vertical_spacing,
            renderer: TextRenderer::new(config.text.text_transform, config.text.letter_spacing),
            shadow: ShadowEffect::new(&shadow_cfg, non_empty(row.shadow_color.as_deref())),
            outline: OutlineEffect::resolve(&config.text.outline, row.text_outline.as_deref()),
        }
    }

    /// Gap between blocks for a loaded main font of `main_size` pixels.
    pub fn vertical_spacing_for(&self, main_size: u32) -> u32 {
        self.vertical_spacing
            .unwrap_or_else(|| Dimensions::vertical_spacing(main_size))
    }
}

fn bar_top(config: &Configuration) -> i32 {
    let y = (f64::from(config.height) * config.bar.y_position_ratio).floor();
    y.clamp(0.0, f64::from(config.height)) as i32
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/render/resolve.rs"]
mod tests;
