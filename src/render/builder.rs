use std::sync::Arc;

use crate::config::model::Configuration;
use crate::fonts::loader::{FontLoader, LoadedFont};
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::layout::position::{Placement, TextDimensions};
use crate::render::layer::Layer;
use crate::render::resolve::ResolvedStyle;
use crate::scene::row::RowData;
use crate::text::engine::{TextEngine, TextPainter};
use crate::text::renderer::TextFragment;

/// Progress of a [`LowerThirdBuilder`]. Each stage method requires the previous stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStage {
    /// Nothing done yet.
    New,
    /// Background allocated.
    Canvas,
    /// Bar drawn.
    Bar,
    /// Fonts resolved.
    Fonts,
    /// Text measured and placed.
    Layout,
    /// Text layer allocated.
    TextLayer,
    /// Shadow applied (or skipped).
    Shadow,
    /// Outline applied (or skipped).
    Outline,
    /// Text filled.
    Text,
    /// Text layer composited onto the background.
    Composited,
}

impl BuildStage {
    fn method(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Canvas => "create_canvas",
            Self::Bar => "draw_bar",
            Self::Fonts => "load_fonts",
            Self::Layout => "calculate_layout",
            Self::TextLayer => "create_text_layer",
            Self::Shadow => "apply_shadow",
            Self::Outline => "apply_outline",
            Self::Text => "render_text",
            Self::Composited => "composite_layers",
        }
    }
}

/// Step-by-step construction of one lower third.
///
/// ```text
/// create_canvas -> draw_bar -> load_fonts -> calculate_layout -> create_text_layer
///   -> apply_shadow -> apply_outline -> render_text -> composite_layers -> build
/// ```
///
/// Every stage consumes the builder and hands it back, so a full run reads as one chain.
/// Calling a stage out of order is an [`LowerThirdError::ImageGeneration`] error.
pub struct LowerThirdBuilder<'a> {
    row: &'a RowData,
    loader: &'a FontLoader,
    engine: &'a mut TextEngine,
    style: ResolvedStyle,
    stage: BuildStage,
    canvas: Option<Layer>,
    text_layer: Option<Layer>,
    main_font: Option<Arc<LoadedFont>>,
    secondary_font: Option<Arc<LoadedFont>>,
    dimensions: Option<TextDimensions>,
    placement: Option<Placement>,
}

impl std::fmt::Debug for LowerThirdBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LowerThirdBuilder")
            .field("main_text", &self.row.main_text)
            .field("stage", &self.stage)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl<'a> LowerThirdBuilder<'a> {
    /// Builder for `row` under `config`.
    pub fn new(
        config: &Configuration,
        row: &'a RowData,
        fonts: &'a FontLoader,
        engine: &'a mut TextEngine,
    ) -> Self {
        Self {
            row,
            loader: fonts,
            engine,
            style: ResolvedStyle::resolve(config, row),
            stage: BuildStage::New,
            canvas: None,
            text_layer: None,
            main_font: None,
            secondary_font: None,
            dimensions: None,
            placement: None,
        }
    }

    /// Run every stage in order.
    pub fn run(self) -> LowerThirdResult<image::RgbaImage> {
        self.create_canvas()?
            .draw_bar()?
            .load_fonts()?
            .calculate_layout()?
            .create_text_layer()?
            .apply_shadow()?
            .apply_outline()?
            .render_text()?
            .composite_layers()?
            .build()
    }

    /// Last completed stage.
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Resolved row style.
    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// Measured blocks, available after `calculate_layout`.
    pub fn dimensions(&self) -> Option<&TextDimensions> {
        self.dimensions.as_ref()
    }

    /// Final block origins, available after `calculate_layout`.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Loaded main and secondary fonts, available after `load_fonts`.
    pub fn fonts(&self) -> Option<(&Arc<LoadedFont>, &Arc<LoadedFont>)> {
        self.main_font.as_ref().zip(self.secondary_font.as_ref())
    }

    /// Allocate the background filled with the resolved background color.
    pub fn create_canvas(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::New, BuildStage::Canvas)?;
        tracing::debug!(width = self.style.width, height = self.style.height, "creating canvas");
        self.canvas = Some(Layer::filled(
            self.style.width,
            self.style.height,
            self.style.colors.background,
        )?);
        Ok(self.advance(BuildStage::Canvas))
    }

    /// Fill the full-width bar band.
    pub fn draw_bar(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Canvas, BuildStage::Bar)?;
        let layout = self.style.layout;
        let color = self.style.colors.bar;
        let canvas = stage_state(self.canvas.as_mut(), BuildStage::Bar)?;
        tracing::debug!(y = layout.bar_y, height = layout.bar_height, ?color, "drawing bar");
        canvas.fill_rect(
            0,
            i64::from(layout.bar_y),
            i64::from(canvas.width()),
            i64::from(layout.bar_height),
            color,
        );
        Ok(self.advance(BuildStage::Bar))
    }

    /// Resolve both fonts, falling back to the default font.
    pub fn load_fonts(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Bar, BuildStage::Fonts)?;
        let choice = &self.style.fonts;
        tracing::debug!(
            main = ?choice.main_spec,
            secondary = ?choice.secondary_spec,
            main_size = choice.main_size,
            secondary_size = choice.secondary_size,
            "loading fonts"
        );
        let (main, secondary) = self.loader.load_font_pair(
            choice.main_spec.as_deref(),
            choice.secondary_spec.as_deref(),
            choice.main_size,
            choice.secondary_size,
        )?;
        self.main_font = Some(main);
        self.secondary_font = Some(secondary);
        Ok(self.advance(BuildStage::Fonts))
    }

    /// Measure both blocks, place them, then apply the wrap clamp and position offset.
    pub fn calculate_layout(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Fonts, BuildStage::Layout)?;
        let (main_font, secondary_font) = self.loaded_fonts(BuildStage::Layout)?;
        let layout = self.style.layout;
        let max_width = layout.max_width(self.style.width);
        let renderer = self.style.renderer;

        let main = renderer.measure_text(&mut *self.engine, &self.row.main_text, &main_font, max_width)?;
        let secondary = renderer.measure_text(
            &mut *self.engine,
            &self.row.secondary_text,
            &secondary_font,
            max_width,
        )?;
        let dims = TextDimensions {
            main_width: main.width,
            main_height: main.height,
            secondary_width: secondary.width,
            secondary_height: secondary.height,
            padding: layout.padding,
            vertical_spacing: self.style.vertical_spacing_for(main_font.size()),
        };

        let mut placement = layout.justification.place(
            &dims,
            self.style.width,
            self.style.height,
            layout.bar_y,
            layout.bar_padding,
        );
        if let Some(wrap_padding) = layout.wrap_padding {
            let min_x = i32::try_from(wrap_padding).unwrap_or(i32::MAX);
            placement.main.x = placement.main.x.max(min_x);
            placement.secondary.x = placement.secondary.x.max(min_x);
        }
        placement.main = placement.main.offset(layout.offset.x, layout.offset.y);
        placement.secondary = placement.secondary.offset(layout.offset.x, layout.offset.y);

        tracing::debug!(?dims, ?placement, "layout calculated");
        self.dimensions = Some(dims);
        self.placement = Some(placement);
        Ok(self.advance(BuildStage::Layout))
    }

    /// Allocate the transparent layer that receives outline and text.
    pub fn create_text_layer(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Layout, BuildStage::TextLayer)?;
        self.text_layer = Some(Layer::transparent(self.style.width, self.style.height)?);
        Ok(self.advance(BuildStage::TextLayer))
    }

    /// Composite the blurred shadow onto the background. No-op when disabled.
    pub fn apply_shadow(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::TextLayer, BuildStage::Shadow)?;
        if self.style.shadow.enabled() {
            let fragments = self.fragments(BuildStage::Shadow)?;
            let shadow = self.style.shadow.render(
                &mut *self.engine,
                &fragments,
                self.style.width,
                self.style.height,
            )?;
            stage_state(self.canvas.as_mut(), BuildStage::Shadow)?.composite_over(&shadow)?;
        }
        Ok(self.advance(BuildStage::Shadow))
    }

    /// Stroke the outline onto the text layer. No-op when the width is zero.
    pub fn apply_outline(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Shadow, BuildStage::Outline)?;
        if self.style.outline.enabled() {
            let fragments = self.fragments(BuildStage::Outline)?;
            let layer = stage_state(self.text_layer.as_mut(), BuildStage::Outline)?;
            let mut painter = TextPainter::new(&mut *self.engine, layer.width(), layer.height())?;
            let calls = self.style.outline.draw(&mut painter, &fragments)?;
            painter.finish(layer)?;
            tracing::debug!(width = self.style.outline.width(), calls, "outline drawn");
        }
        Ok(self.advance(BuildStage::Outline))
    }

    /// Fill both blocks in their final colors.
    pub fn render_text(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Outline, BuildStage::Text)?;
        let (main_font, secondary_font) = self.loaded_fonts(BuildStage::Text)?;
        let placement = self.placed(BuildStage::Text)?;
        let max_width = self.style.layout.max_width(self.style.width);
        let renderer = self.style.renderer;
        let colors = self.style.colors;

        let layer = stage_state(self.text_layer.as_mut(), BuildStage::Text)?;
        let mut painter = TextPainter::new(&mut *self.engine, layer.width(), layer.height())?;
        for (text, origin, font, color) in [
            (&self.row.main_text, placement.main, &main_font, colors.main_text),
            (&self.row.secondary_text, placement.secondary, &secondary_font, colors.secondary_text),
        ] {
            if text.is_empty() {
                continue;
            }
            renderer.draw_text(&mut painter, text, origin, font, color, max_width)?;
        }
        painter.finish(layer)?;
        Ok(self.advance(BuildStage::Text))
    }

    /// Composite the text layer over the background.
    pub fn composite_layers(mut self) -> LowerThirdResult<Self> {
        self.require(BuildStage::Text, BuildStage::Composited)?;
        let text = self.text_layer.take();
        let text = stage_state(text.as_ref(), BuildStage::Composited)?;
        stage_state(self.canvas.as_mut(), BuildStage::Composited)?.composite_over(text)?;
        Ok(self.advance(BuildStage::Composited))
    }

    /// Finished straight-alpha image.
    pub fn build(self) -> LowerThirdResult<image::RgbaImage> {
        if self.stage != BuildStage::Composited {
            return Err(LowerThirdError::generation_at(
                "build",
                format!(
                    "image not constructed: composite_layers must run before build (last stage: {})",
                    self.stage.method()
                ),
            ));
        }
        let canvas = stage_state(self.canvas.as_ref(), BuildStage::Composited)?;
        let image = canvas.to_rgba_image()?;
        tracing::info!(main_text = %self.row.main_text, "lower third built");
        Ok(image)
    }

    fn require(&self, needed: BuildStage, running: BuildStage) -> LowerThirdResult<()> {
        if self.stage == needed {
            return Ok(());
        }
        Err(LowerThirdError::generation_at(
            running.method(),
            format!(
                "{} must run after {} (last stage: {})",
                running.method(),
                needed.method(),
                self.stage.method()
            ),
        ))
    }

    fn advance(mut self, stage: BuildStage) -> Self {
        self.stage = stage;
        self
    }

    fn loaded_fonts(&self, running: BuildStage) -> LowerThirdResult<(Arc<LoadedFont>, Arc<LoadedFont>)> {
        self.fonts()
            .map(|(m, s)| (m.clone(), s.clone()))
            .ok_or_else(|| missing(running, "fonts"))
    }

    fn placed(&self, running: BuildStage) -> LowerThirdResult<Placement> {
        self.placement.ok_or_else(|| missing(running, "layout"))
    }

    // Fragments of both blocks as the fill will draw them.
    fn fragments(&mut self, running: BuildStage) -> LowerThirdResult<Vec<TextFragment>> {
        let (main_font, secondary_font) = self.loaded_fonts(running)?;
        let placement = self.placed(running)?;
        let max_width = self.style.layout.max_width(self.style.width);
        let renderer = self.style.renderer;

        let mut out = Vec::new();
        for (text, origin, font) in [
            (&self.row.main_text, placement.main, &main_font),
            (&self.row.secondary_text, placement.secondary, &secondary_font),
        ] {
            if text.is_empty() {
                continue;
            }
            out.extend(renderer.prepare_text_positions(&mut *self.engine, text, origin, font, max_width)?);
        }
        Ok(out)
    }
}

fn stage_state<T>(value: Option<T>, running: BuildStage) -> LowerThirdResult<T> {
    value.ok_or_else(|| missing(running, "canvas"))
}

fn missing(running: BuildStage, what: &str) -> LowerThirdError {
    LowerThirdError::generation_at(running.method(), format!("{what} not available"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/builder.rs"]
mod tests;
