use super::*;

#[test]
fn named_colors_are_case_insensitive() {
    assert_eq!(ColorParser::parse("Red"), Color::rgb(255, 0, 0));
    assert_eq!(ColorParser::parse("  SKY BLUE "), Color::rgb(135, 206, 235));
    assert_eq!(ColorParser::parse("transparent"), Color::rgba(0, 0, 0, 0));
}

#[test]
fn hex_with_and_without_hash() {
    assert_eq!(ColorParser::parse("#00ff00"), Color::rgb(0, 255, 0));
    assert_eq!(ColorParser::parse("00FF00"), Color::rgb(0, 255, 0));
    assert_eq!(ColorParser::parse("#abc").alpha, None);
}

#[test]
fn rgb_triplets() {
    assert_eq!(ColorParser::parse("10,20,30"), Color::rgb(10, 20, 30));
    assert_eq!(ColorParser::parse("rgb(10, 20, 30)"), Color::rgb(10, 20, 30));
    assert!(ColorParser::parse_strict("256,0,0").is_err());
}

#[test]
fn alpha_suffix_recurses_into_any_form() {
    assert_eq!(ColorParser::parse("red,128"), Color::rgba(255, 0, 0, 128));
    assert_eq!(ColorParser::parse("#0000FF, 64"), Color::rgba(0, 0, 255, 64));
    assert_eq!(ColorParser::parse("255,0,0,128"), Color::rgba(255, 0, 0, 128));
    assert_eq!(ColorParser::parse("black,0"), Color::rgba(0, 0, 0, 0));
    assert!(ColorParser::parse_strict("red,300").is_err());
}

#[test]
fn unknown_color_falls_back_to_black() {
    assert_eq!(ColorParser::parse("not-a-color"), Color::rgb(0, 0, 0));
}

#[test]
fn unknown_color_uses_supplied_fallback() {
    let opts = ParseOptions {
        fallback: Some(Color::rgb(1, 2, 3)),
        ..ParseOptions::default()
    };
    let c = ColorParser::parse_with(Some("???"), opts).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
    let c = ColorParser::parse_with(None, opts).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
}

#[test]
fn strict_mode_reports_spec_and_hint() {
    let err = ColorParser::parse_strict("not-a-color").unwrap_err();
    match err {
        LowerThirdError::ColorParse { spec, expected } => {
            assert_eq!(spec, "not-a-color");
            assert!(expected.contains("#RRGGBB"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn default_alpha_is_appended_to_rgb_only() {
    let opts = ParseOptions::with_default_alpha(0);
    assert_eq!(
        ColorParser::parse_with(Some("white"), opts).unwrap(),
        Color::rgba(255, 255, 255, 0)
    );
    assert_eq!(
        ColorParser::parse_with(Some("white,200"), opts).unwrap(),
        Color::rgba(255, 255, 255, 200)
    );
    assert_eq!(
        ColorParser::parse_with(Some("white"), ParseOptions::default()).unwrap(),
        Color::rgb(255, 255, 255)
    );
}

#[test]
fn hex_round_trip_is_stable() {
    for (r, g, b) in [(0, 0, 0), (255, 255, 255), (18, 52, 86), (171, 205, 239)] {
        let hex = ColorParser::to_hex(Color::rgb(r, g, b));
        let again = ColorParser::to_hex(ColorParser::parse(&hex));
        assert_eq!(hex, again);
    }
    assert_eq!(ColorParser::to_hex(Color::rgb(255, 0, 0)), "#FF0000");
}

#[test]
fn name_helpers() {
    assert!(ColorParser::is_valid_name("Dark Grey"));
    assert!(!ColorParser::is_valid_name("blurple"));
    let names = ColorParser::available_names();
    assert!(names.len() >= 40);
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        ColorParser::add_alpha(Color::rgb(1, 2, 3), 4),
        Rgba8::new(1, 2, 3, 4)
    );
}
