use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::fonts::loader::{FontSource, LoadedFont};
use crate::foundation::core::{PixelPoint, Rgba8};
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::effects::composite::premul_over_in_place;
use crate::render::layer::Layer;
use crate::text::renderer::TextFragment;

/// Pixel extent of a laid out string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    /// Advance width, rounded up.
    pub width: u32,
    /// Line height, rounded up.
    pub height: u32,
}

/// Measures a single line of text in a given font.
pub trait TextMeasure {
    /// Extent of `text` laid out on one line. Empty text measures `0 x 0`.
    fn measure(&mut self, text: &str, font: &LoadedFont) -> LowerThirdResult<TextExtent>;
}

/// Receives positioned text to rasterize.
pub trait TextSurface {
    /// Fill `fragment` translated by `offset` in `color`.
    fn fill_text(
        &mut self,
        fragment: &TextFragment,
        offset: PixelPoint,
        color: Rgba8,
    ) -> LowerThirdResult<()>;
}

/// Stateful helper for building Parley text layouts from loaded fonts.
///
/// Registered font families are remembered per file, so an engine reused across rows only
/// registers each font once.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<PathBuf, String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    /// Construct a new engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Shape and lay out one line of plain text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &LoadedFont,
        brush: Rgba8,
    ) -> LowerThirdResult<parley::Layout<Rgba8>> {
        let size_px = font.size() as f32;
        if size_px <= 0.0 {
            return Err(LowerThirdError::generation("font size must be > 0"));
        }

        let stack = self.font_stack(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(stack),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if let FontSource::File { weight, italic, .. } = font.source() {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::new(f32::from(*weight)),
            ));
            if *italic {
                builder.push_default(parley::style::StyleProperty::FontStyle(
                    parley::style::FontStyle::Italic,
                ));
            }
        }

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn font_stack(&mut self, font: &LoadedFont) -> LowerThirdResult<Cow<'static, str>> {
        let FontSource::File { path, data, .. } = font.source() else {
            return Ok(Cow::Borrowed("sans-serif"));
        };
        if let Some(name) = self.families.get(path) {
            return Ok(Cow::Owned(name.clone()));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(data.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LowerThirdError::generation(format!(
                "no font families registered from '{}'",
                path.display()
            ))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LowerThirdError::generation("registered font family has no name"))?
            .to_string();

        self.families.insert(path.clone(), family_name.clone());
        Ok(Cow::Owned(family_name))
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, text: &str, font: &LoadedFont) -> LowerThirdResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let layout = self.layout_line(text, font, Rgba8::default())?;
        Ok(TextExtent {
            width: layout.width().max(0.0).ceil() as u32,
            height: layout.height().max(0.0).ceil() as u32,
        })
    }
}

/// Rasterizes text fragments with `vello_cpu` and composites the result onto a [`Layer`].
///
/// Draws are batched in one render context and flushed by [`TextPainter::finish`], which
/// preserves submission order (outline strokes first, fill on top).
pub struct TextPainter<'e> {
    engine: &'e mut TextEngine,
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    draw_calls: usize,
}

impl<'e> TextPainter<'e> {
    /// Painter for a `width x height` target.
    pub fn new(engine: &'e mut TextEngine, width: u32, height: u32) -> LowerThirdResult<Self> {
        let w = u16::try_from(width)
            .map_err(|_| LowerThirdError::generation("canvas width exceeds u16"))?;
        let h = u16::try_from(height)
            .map_err(|_| LowerThirdError::generation("canvas height exceeds u16"))?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.reset();
        Ok(Self {
            engine,
            ctx,
            width: w,
            height: h,
            fonts: HashMap::new(),
            draw_calls: 0,
        })
    }

    /// Number of [`TextSurface::fill_text`] calls so far.
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Render everything submitted so far and composite it over `layer`.
    pub fn finish(mut self, layer: &mut Layer) -> LowerThirdResult<()> {
        if layer.width() != u32::from(self.width) || layer.height() != u32::from(self.height) {
            return Err(LowerThirdError::generation(
                "text painter and target layer sizes differ",
            ));
        }
        if self.draw_calls == 0 {
            return Ok(());
        }
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        premul_over_in_place(layer.data_mut(), pixmap.data_as_u8_slice())
    }

    fn draw_layout(&mut self, layout: &parley::Layout<Rgba8>, x: f64, y: f64) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let Rgba8 { r, g, b, a } = run.style().brush;
                let run_font = run.run().font();
                let font = self.vello_font((run_font.data.id(), run_font.index), run_font.data.data());
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    r, g, b, a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn vello_font(&mut self, key: (u64, u32), bytes: &[u8]) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), key.1)
            })
            .clone()
    }
}

impl TextMeasure for TextPainter<'_> {
    fn measure(&mut self, text: &str, font: &LoadedFont) -> LowerThirdResult<TextExtent> {
        self.engine.measure(text, font)
    }
}

impl TextSurface for TextPainter<'_> {
    fn fill_text(
        &mut self,
        fragment: &TextFragment,
        offset: PixelPoint,
        color: Rgba8,
    ) -> LowerThirdResult<()> {
        self.draw_calls += 1;
        if fragment.text.is_empty() || color.a == 0 {
            return Ok(());
        }

        let origin = fragment.origin.offset(offset.x, offset.y);

        if fragment.tracking >= 0 {
            let layout = self.engine.layout_line(&fragment.text, &fragment.font, color)?;
            self.draw_layout(&layout, f64::from(origin.x), f64::from(origin.y));
            return Ok(());
        }

        let mut x = i64::from(origin.x);
        let mut buf = [0u8; 4];
        for c in fragment.text.chars() {
            let ch: &str = c.encode_utf8(&mut buf);
            let layout = self.engine.layout_line(ch, &fragment.font, color)?;
            self.draw_layout(&layout, x as f64, f64::from(origin.y));
            let advance = layout.width().max(0.0).ceil() as i64;
            x += advance + i64::from(fragment.tracking);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
