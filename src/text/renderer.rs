use std::sync::Arc;

use crate::fonts::loader::LoadedFont;
use crate::foundation::core::{PixelPoint, Rgba8};
use crate::foundation::error::LowerThirdResult;
use crate::text::engine::{TextExtent, TextMeasure, TextSurface};
use crate::text::transform::TextTransform;

/// One positioned run of text, ready to draw.
///
/// `text` is already transformed and, for positive letter spacing, space-expanded. A negative
/// `tracking` asks the surface to draw character by character, adding `tracking` between
/// consecutive glyphs.
#[derive(Clone, Debug)]
pub struct TextFragment {
    /// Top-left corner of the line box.
    pub origin: PixelPoint,
    /// Text to draw.
    pub text: String,
    /// Font to draw with.
    pub font: Arc<LoadedFont>,
    /// Per-character tracking (only negative values are meaningful).
    pub tracking: i32,
}

/// Letter-spacing, case-transform and wrapping aware text measurement and drawing.
///
/// Positive spacing is approximated by inserting a space between every character. Negative
/// spacing measures each character separately and adds the spacing between neighbours, never
/// after the last one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextRenderer {
    transform: TextTransform,
    letter_spacing: i32,
}

impl TextRenderer {
    /// Renderer with the given transform and letter spacing.
    pub fn new(transform: TextTransform, letter_spacing: i32) -> Self {
        Self {
            transform,
            letter_spacing,
        }
    }

    /// Configured letter spacing.
    pub fn letter_spacing(&self) -> i32 {
        self.letter_spacing
    }

    /// Configured case transform.
    pub fn transform(&self) -> TextTransform {
        self.transform
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Explicit newlines are kept; blank lines become empty entries. Words are packed greedily
    /// and a single word wider than `max_width` is emitted on its own line unbroken.
    pub fn wrap_text(
        &self,
        measure: &mut impl TextMeasure,
        text: &str,
        font: &LoadedFont,
        max_width: u32,
    ) -> LowerThirdResult<Vec<String>> {
        let transformed = self.transform.apply(text);
        let mut lines = Vec::new();

        for logical in transformed.split('\n') {
            let words: Vec<&str> = logical.split_whitespace().collect();
            if words.is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in words {
                let candidate = if current.is_empty() {
                    word.to_owned()
                } else {
                    format!("{current} {word}")
                };
                if self.measure_line(measure, &candidate, font)?.width <= max_width {
                    current = candidate;
                } else if current.is_empty() {
                    lines.push(word.to_owned());
                } else {
                    lines.push(std::mem::replace(&mut current, word.to_owned()));
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        Ok(lines)
    }

    /// Measure `text`, wrapping to `max_width` when given.
    ///
    /// Wrapped text reports the widest line and the summed line heights.
    pub fn measure_text(
        &self,
        measure: &mut impl TextMeasure,
        text: &str,
        font: &LoadedFont,
        max_width: Option<u32>,
    ) -> LowerThirdResult<TextExtent> {
        let Some(max_width) = max_width else {
            let transformed = self.transform.apply(text);
            return self.measure_line(measure, &transformed, font);
        };

        let mut out = TextExtent::default();
        for line in self.wrap_text(measure, text, font, max_width)? {
            let e = self.measure_line(measure, &line, font)?;
            out.width = out.width.max(e.width);
            out.height = out.height.saturating_add(e.height);
        }
        Ok(out)
    }

    /// Measure one already transformed line, honoring letter spacing.
    pub fn measure_line(
        &self,
        measure: &mut impl TextMeasure,
        line: &str,
        font: &LoadedFont,
    ) -> LowerThirdResult<TextExtent> {
        if self.letter_spacing > 0 {
            return measure.measure(&space_out(line), font);
        }
        if self.letter_spacing < 0 && line.chars().count() > 1 {
            let mut width: i64 = 0;
            let mut height = 0;
            let mut buf = [0u8; 4];
            for c in line.chars() {
                let e = measure.measure(c.encode_utf8(&mut buf), font)?;
                width += i64::from(e.width) + i64::from(self.letter_spacing);
                height = height.max(e.height);
            }
            width -= i64::from(self.letter_spacing);
            return Ok(TextExtent {
                width: width.max(0) as u32,
                height,
            });
        }
        measure.measure(line, font)
    }

    /// Positioned fragments for `text` at `origin`: one per wrapped line, or one in total.
    ///
    /// Shadow, outline and the final fill all draw from this list so their glyph placement
    /// is identical.
    pub fn prepare_text_positions(
        &self,
        measure: &mut impl TextMeasure,
        text: &str,
        origin: PixelPoint,
        font: &Arc<LoadedFont>,
        max_width: Option<u32>,
    ) -> LowerThirdResult<Vec<TextFragment>> {
        let Some(max_width) = max_width else {
            let transformed = self.transform.apply(text);
            return Ok(vec![self.fragment(origin, &transformed, font)]);
        };

        let mut out = Vec::new();
        let mut y = origin.y;
        for line in self.wrap_text(measure, text, font, max_width)? {
            let h = self.measure_line(measure, &line, font)?.height;
            out.push(self.fragment(PixelPoint::new(origin.x, y), &line, font));
            y = y.saturating_add(i32::try_from(h).unwrap_or(i32::MAX));
        }
        Ok(out)
    }

    /// Draw `text` at `origin` in `color`, wrapping to `max_width` when given.
    pub fn draw_text<S: TextMeasure + TextSurface>(
        &self,
        surface: &mut S,
        text: &str,
        origin: PixelPoint,
        font: &Arc<LoadedFont>,
        color: Rgba8,
        max_width: Option<u32>,
    ) -> LowerThirdResult<()> {
        for fragment in self.prepare_text_positions(surface, text, origin, font, max_width)? {
            surface.fill_text(&fragment, PixelPoint::default(), color)?;
        }
        Ok(())
    }

    fn fragment(&self, origin: PixelPoint, line: &str, font: &Arc<LoadedFont>) -> TextFragment {
        let (text, tracking) = match self.letter_spacing {
            s if s > 0 => (space_out(line), 0),
            s if s < 0 && line.chars().count() > 1 => (line.to_owned(), s),
            _ => (line.to_owned(), 0),
        };
        TextFragment {
            origin,
            text,
            font: font.clone(),
            tracking,
        }
    }
}

fn space_out(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    for (i, c) in line.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/renderer.rs"]
mod tests;
