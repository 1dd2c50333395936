use crate::assets::color::ColorParser;
use crate::config::model::ShadowConfig;
use crate::effects::blur::{BlurConverter, blur_layer};
use crate::foundation::core::{PixelPoint, Rgba8};
use crate::foundation::error::LowerThirdResult;
use crate::render::layer::Layer;
use crate::text::engine::{TextEngine, TextPainter, TextSurface};
use crate::text::renderer::TextFragment;

/// Blurred, offset copy of the text drawn in the shadow color.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowEffect {
    enabled: bool,
    offset: PixelPoint,
    blur: u32,
    color: Rgba8,
}

impl ShadowEffect {
    /// Resolve a shadow from its configuration; `color_override` replaces the configured color.
    pub fn new(config: &ShadowConfig, color_override: Option<&str>) -> Self {
        let spec = color_override.unwrap_or(&config.color);
        let color = ColorParser::add_alpha(ColorParser::parse(spec), config.opacity);
        Self {
            enabled: config.enabled,
            offset: PixelPoint::new(config.offset_x, config.offset_y),
            blur: config.blur,
            color,
        }
    }

    /// Whether the shadow draws anything.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Shadow color including opacity.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Gaussian sigma for the configured blur value.
    pub fn sigma(&self) -> f32 {
        BlurConverter::convert(self.blur)
    }

    /// Draw every fragment translated by the shadow offset. Returns the number of draws.
    pub fn draw<S: TextSurface>(
        &self,
        surface: &mut S,
        fragments: &[TextFragment],
    ) -> LowerThirdResult<usize> {
        if !self.enabled {
            return Ok(0);
        }
        for fragment in fragments {
            surface.fill_text(fragment, self.offset, self.color)?;
        }
        Ok(fragments.len())
    }

    /// Render the blurred shadow into a fresh canvas-sized layer.
    ///
    /// A disabled shadow yields a fully transparent layer.
    pub fn render(
        &self,
        engine: &mut TextEngine,
        fragments: &[TextFragment],
        width: u32,
        height: u32,
    ) -> LowerThirdResult<Layer> {
        let mut layer = Layer::transparent(width, height)?;
        if !self.enabled {
            return Ok(layer);
        }
        let mut painter = TextPainter::new(engine, width, height)?;
        self.draw(&mut painter, fragments)?;
        painter.finish(&mut layer)?;
        blur_layer(&mut layer, self.sigma())?;
        tracing::debug!(
            fragments = fragments.len(),
            sigma = self.sigma(),
            "shadow rendered"
        );
        Ok(layer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
