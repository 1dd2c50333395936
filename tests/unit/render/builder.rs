use std::sync::Arc;

use super::*;
use crate::fonts::discovery::FontDiscovery;
use crate::foundation::core::Rgba8;

fn loader() -> FontLoader {
    FontLoader::new(Arc::new(FontDiscovery::with_directories(Vec::new(), Vec::new())))
}

fn small_config() -> Configuration {
    Configuration {
        width: 320,
        height: 240,
        ..Configuration::default()
    }
}

fn row() -> RowData {
    RowData::new("Jane Doe", "Director", "lower left").unwrap()
}

fn assert_generation_error(err: LowerThirdError, stage: &str) {
    match err {
        LowerThirdError::ImageGeneration { stage: Some(s), .. } => assert_eq!(s, stage),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn draw_bar_before_canvas_is_an_error() {
    let (config, row, fonts) = (small_config(), row(), loader());
    let mut engine = TextEngine::new();
    let err = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .draw_bar()
        .unwrap_err();
    assert_generation_error(err, "draw_bar");
}

#[test]
fn build_before_composite_is_an_error() {
    let (config, row, fonts) = (small_config(), row(), loader());
    let mut engine = TextEngine::new();
    let err = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .build()
        .unwrap_err();
    assert_generation_error(err, "build");

    let mut engine = TextEngine::new();
    let err = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .build()
        .unwrap_err();
    assert_generation_error(err, "build");
}

#[test]
fn stages_cannot_be_repeated_or_skipped() {
    let (config, row, fonts) = (small_config(), row(), loader());
    let mut engine = TextEngine::new();
    let err = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .create_canvas()
        .unwrap_err();
    assert_generation_error(err, "create_canvas");

    let mut engine = TextEngine::new();
    let err = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .load_fonts()
        .unwrap_err();
    assert_generation_error(err, "load_fonts");
}

#[test]
fn full_chain_produces_canvas_sized_image() {
    let (mut config, row, fonts) = (small_config(), row(), loader());
    config.bar.color = "blue".to_owned();
    let mut engine = TextEngine::new();
    let b = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .load_fonts()
        .unwrap()
        .calculate_layout()
        .unwrap();
    assert_eq!(b.stage(), BuildStage::Layout);
    let (main, _) = b.fonts().unwrap();
    assert!(main.is_builtin());

    let img = b
        .create_text_layer()
        .unwrap()
        .apply_shadow()
        .unwrap()
        .apply_outline()
        .unwrap()
        .render_text()
        .unwrap()
        .composite_layers()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(img.dimensions(), (320, 240));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(319, 200).0, [0, 0, 255, 255]);
}

#[test]
fn lower_left_layout_matches_padding_and_stacking() {
    let (config, row, fonts) = (Configuration::default(), row(), loader());
    let mut engine = TextEngine::new();
    let b = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .load_fonts()
        .unwrap()
        .calculate_layout()
        .unwrap();
    let p = *b.placement().unwrap();
    let d = *b.dimensions().unwrap();
    assert_eq!(p.main.x, 42);
    assert_eq!(p.secondary.x, 42);
    assert_eq!(
        p.secondary.y,
        p.main.y + (d.main_height + d.vertical_spacing) as i32
    );
}

#[test]
fn wrap_padding_clamps_and_offsets_apply() {
    let (mut config, mut row, fonts) = (small_config(), row(), loader());
    config.padding = Some(5);
    config.text.wrap_text = true;
    config.text.wrap_padding = Some(30);
    row.position_offset_x = Some(4);
    row.position_offset_y = Some(-6);

    let mut engine = TextEngine::new();
    let b = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .load_fonts()
        .unwrap()
        .calculate_layout()
        .unwrap();
    let p = b.placement().unwrap();
    assert_eq!(p.main.x, 34);
    assert_eq!(p.secondary.x, 34);
}

#[test]
fn transparent_output_keeps_alpha() {
    let (mut config, row, fonts) = (small_config(), row(), loader());
    config.output.transparent = true;
    let mut engine = TextEngine::new();
    let img = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .run()
        .unwrap();
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
}

#[test]
fn shadow_lands_on_background() {
    let (mut config, row, fonts) = (small_config(), row(), loader());
    config.bg_color = "white".to_owned();
    config.text.shadow.enabled = true;
    config.text.shadow.color = "red".to_owned();
    config.text.shadow.opacity = 255;
    config.text.shadow.blur = 1;
    config.text.shadow.offset_x = 30;
    config.text.shadow.offset_y = 0;
    let mut engine = TextEngine::new();
    let b = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .load_fonts()
        .unwrap()
        .calculate_layout()
        .unwrap()
        .create_text_layer()
        .unwrap()
        .apply_shadow()
        .unwrap();
    assert_eq!(b.stage(), BuildStage::Shadow);
    assert_eq!(b.style().shadow.color(), Rgba8::new(255, 0, 0, 255));

    let text = b.text_layer.as_ref().unwrap();
    assert!(text.data().iter().all(|&v| v == 0));

    let canvas = b.canvas.as_ref().unwrap();
    let mut tinted = Vec::new();
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let px = canvas.pixel(x, y).unwrap();
            assert_eq!((px.r, px.a), (255, 255));
            if px.g < 200 {
                tinted.push((x, y));
            }
        }
    }
    if FontDiscovery::system().default_font().is_none() {
        eprintln!("skipping pixel placement: no system font available");
        return;
    }
    assert!(!tinted.is_empty(), "no shadow pixels on the canvas");
    let main_x = b.placement().unwrap().main.x;
    assert!(tinted.iter().all(|&(x, _)| x as i32 >= main_x + 20));
    for &(x, y) in &tinted {
        assert_eq!(text.pixel(x, y).unwrap().a, 0);
    }
}

#[test]
fn huge_position_offset_saturates() {
    let (config, mut row, fonts) = (small_config(), row(), loader());
    row.position_offset_x = Some(i32::MAX);
    row.position_offset_y = Some(i32::MIN);
    let mut engine = TextEngine::new();
    let b = LowerThirdBuilder::new(&config, &row, &fonts, &mut engine)
        .create_canvas()
        .unwrap()
        .draw_bar()
        .unwrap()
        .load_fonts()
        .unwrap()
        .calculate_layout()
        .unwrap();
    assert_eq!(b.placement().unwrap().main.x, i32::MAX);
    assert_eq!(b.placement().unwrap().main.y, i32::MIN);

    let img = b
        .create_text_layer()
        .unwrap()
        .apply_shadow()
        .unwrap()
        .apply_outline()
        .unwrap()
        .render_text()
        .unwrap()
        .composite_layers()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(img.dimensions(), (320, 240));
}
