use super::*;

/// Monospace fake: every char is 10px wide, every non-empty line 20px tall.
struct Mono;

impl TextMeasure for Mono {
    fn measure(&mut self, text: &str, _font: &LoadedFont) -> LowerThirdResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        Ok(TextExtent {
            width: text.chars().count() as u32 * 10,
            height: 20,
        })
    }
}

#[derive(Default)]
struct Recorder {
    calls: Vec<(PixelPoint, String, i32, Rgba8)>,
}

impl TextMeasure for Recorder {
    fn measure(&mut self, text: &str, font: &LoadedFont) -> LowerThirdResult<TextExtent> {
        Mono.measure(text, font)
    }
}

impl TextSurface for Recorder {
    fn fill_text(
        &mut self,
        fragment: &TextFragment,
        offset: PixelPoint,
        color: Rgba8,
    ) -> LowerThirdResult<()> {
        self.calls.push((
            fragment.origin.offset(offset.x, offset.y),
            fragment.text.clone(),
            fragment.tracking,
            color,
        ));
        Ok(())
    }
}

fn font() -> Arc<LoadedFont> {
    Arc::new(LoadedFont::builtin())
}

#[test]
fn plain_measure() {
    let r = TextRenderer::default();
    let e = r.measure_text(&mut Mono, "Jane", &font(), None).unwrap();
    assert_eq!(e, TextExtent { width: 40, height: 20 });
}

#[test]
fn positive_spacing_inserts_spaces() {
    let r = TextRenderer::new(TextTransform::None, 5);
    let e = r.measure_text(&mut Mono, "abc", &font(), None).unwrap();
    assert_eq!(e.width, 50);
    let frags = r
        .prepare_text_positions(&mut Mono, "abc", PixelPoint::new(1, 2), &font(), None)
        .unwrap();
    assert_eq!(frags[0].text, "a b c");
    assert_eq!(frags[0].tracking, 0);
}

#[test]
fn negative_spacing_sums_between_characters_only() {
    let r = TextRenderer::new(TextTransform::None, -2);
    let e = r.measure_text(&mut Mono, "abcd", &font(), None).unwrap();
    assert_eq!(e.width, 4 * 10 - 3 * 2);
    let single = r.measure_text(&mut Mono, "a", &font(), None).unwrap();
    assert_eq!(single.width, 10);

    let frags = r
        .prepare_text_positions(&mut Mono, "abcd", PixelPoint::default(), &font(), None)
        .unwrap();
    assert_eq!(frags[0].tracking, -2);
}

#[test]
fn transform_applies_before_measuring() {
    let r = TextRenderer::new(TextTransform::Upper, 0);
    let frags = r
        .prepare_text_positions(&mut Mono, "jane doe", PixelPoint::default(), &font(), None)
        .unwrap();
    assert_eq!(frags[0].text, "JANE DOE");
}

#[test]
fn wrap_packs_words_greedily() {
    let r = TextRenderer::default();
    let lines = r
        .wrap_text(&mut Mono, "the quick brown fox jumps", &font(), 100)
        .unwrap();
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    for line in &lines {
        assert!(r.measure_line(&mut Mono, line, &font()).unwrap().width <= 100);
    }
}

#[test]
fn wrap_keeps_explicit_breaks_and_blank_lines() {
    let r = TextRenderer::default();
    let lines = r
        .wrap_text(&mut Mono, "one\n\ntwo three", &font(), 1000)
        .unwrap();
    assert_eq!(lines, vec!["one", "", "two three"]);
}

#[test]
fn wrap_emits_overlong_word_alone() {
    let r = TextRenderer::default();
    let lines = r
        .wrap_text(&mut Mono, "a supercalifragilistic b", &font(), 50)
        .unwrap();
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn wrap_is_idempotent() {
    let r = TextRenderer::new(TextTransform::None, 3);
    let text = "Executive producer of the evening news and weekend specials";
    let first = r.wrap_text(&mut Mono, text, &font(), 240).unwrap();
    let again = r
        .wrap_text(&mut Mono, &first.join("\n"), &font(), 240)
        .unwrap();
    assert_eq!(first, again);
}

#[test]
fn wrap_of_empty_text_is_one_blank_line() {
    let r = TextRenderer::default();
    assert_eq!(r.wrap_text(&mut Mono, "", &font(), 10).unwrap(), vec![""]);
}

#[test]
fn wrapped_measure_is_max_width_and_summed_height() {
    let r = TextRenderer::default();
    let e = r
        .measure_text(&mut Mono, "the quick brown fox jumps", &font(), Some(100))
        .unwrap();
    assert_eq!(e, TextExtent { width: 90, height: 60 });
}

#[test]
fn wrapped_positions_advance_by_line_height() {
    let r = TextRenderer::default();
    let frags = r
        .prepare_text_positions(
            &mut Mono,
            "the quick brown fox",
            PixelPoint::new(30, 100),
            &font(),
            Some(100),
        )
        .unwrap();
    let origins: Vec<_> = frags.iter().map(|f| f.origin).collect();
    assert_eq!(origins, vec![PixelPoint::new(30, 100), PixelPoint::new(30, 120)]);
}

#[test]
fn draw_text_fills_each_fragment_in_color() {
    let r = TextRenderer::default();
    let mut rec = Recorder::default();
    let red = Rgba8::opaque(255, 0, 0);
    r.draw_text(
        &mut rec,
        "the quick brown fox",
        PixelPoint::new(5, 5),
        &font(),
        red,
        Some(100),
    )
    .unwrap();
    assert_eq!(rec.calls.len(), 2);
    assert!(rec.calls.iter().all(|c| c.3 == red));
    assert_eq!(rec.calls[1].0, PixelPoint::new(5, 25));
}
