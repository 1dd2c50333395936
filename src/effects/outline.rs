use crate::assets::color::ColorParser;
use crate::config::model::{MAX_OUTLINE_WIDTH, OutlineConfig};
use crate::foundation::core::{PixelPoint, Rgba8};
use crate::foundation::error::LowerThirdResult;
use crate::text::engine::TextSurface;
use crate::text::renderer::TextFragment;

/// Stroke made of copies of the text at every integer offset within `width`.
///
/// The `(0, 0)` copy is left for the fill drawn afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEffect {
    width: u32,
    color: Rgba8,
}

impl OutlineEffect {
    /// Resolve an outline from its configuration, capping the width at
    /// [`MAX_OUTLINE_WIDTH`].
    pub fn new(config: &OutlineConfig) -> Self {
        Self {
            width: config.width.min(MAX_OUTLINE_WIDTH),
            color: ColorParser::add_alpha(ColorParser::parse(&config.color), config.opacity),
        }
    }

    /// Row outline spec (`"WIDTH,COLOR[,OPACITY]"`) when present, else the configured outline.
    pub fn resolve(config: &OutlineConfig, row_spec: Option<&str>) -> Self {
        match row_spec.filter(|s| !s.trim().is_empty()) {
            Some(spec) => Self::new(&OutlineConfig::from_spec(spec)),
            None => Self::new(config),
        }
    }

    /// Whether the outline draws anything.
    pub fn enabled(&self) -> bool {
        self.width > 0
    }

    /// Stroke width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Outline color including opacity.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Offsets visited for each fragment, row by row.
    pub fn offsets(&self) -> impl Iterator<Item = PixelPoint> + '_ {
        let w = i32::try_from(self.width).unwrap_or(i32::MAX);
        (-w..=w)
            .flat_map(move |dy| (-w..=w).map(move |dx| PixelPoint::new(dx, dy)))
            .filter(|p| *p != PixelPoint::default())
    }

    /// Draw the stroke for every fragment. Returns the number of draws.
    pub fn draw<S: TextSurface>(
        &self,
        surface: &mut S,
        fragments: &[TextFragment],
    ) -> LowerThirdResult<usize> {
        if !self.enabled() {
            return Ok(0);
        }
        let mut calls = 0;
        for fragment in fragments {
            for offset in self.offsets() {
                surface.fill_text(fragment, offset, self.color)?;
                calls += 1;
            }
        }
        Ok(calls)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/outline.rs"]
mod tests;
