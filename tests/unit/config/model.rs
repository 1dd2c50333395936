use super::*;

#[test]
fn defaults_match_broadcast_hd() {
    let c = Configuration::default();
    assert_eq!((c.width, c.height), (1920, 1080));
    assert_eq!(c.default_justification, "lower left");
    assert_eq!(c.text.main_font, "Arial");
    assert_eq!(c.bar.color, "black,0");
    assert_eq!(c.output.format, OutputFormat::Png);
    assert_eq!(c.output.bit_depth, 16);
}

#[test]
fn derived_dimensions_at_1080p() {
    let c = Configuration::default();
    assert_eq!(c.main_font_size(), 60);
    assert_eq!(c.secondary_font_size(), 43);
    assert_eq!(c.resolved_padding(), 42);
    assert_eq!(c.bar_height(), 180);
    assert_eq!(c.dimensions().bar_padding(), 21);
    assert_eq!(Dimensions::vertical_spacing(60), 30);
}

#[test]
fn explicit_values_override_derived() {
    let mut c = Configuration::default();
    c.padding = Some(10);
    c.text.main_font_size = Some(72);
    c.bar.height = Some(50);
    assert_eq!(c.resolved_padding(), 10);
    assert_eq!(c.main_font_size(), 72);
    assert_eq!(c.bar_height(), 50);
}

#[test]
fn partial_json_fills_defaults() {
    let c = Configuration::from_json_str(
        r#"{ "width": 1280, "height": 720, "text": { "text_color": "yellow", "shadow": { "enabled": true } }, "output": { "format": "jpeg" } }"#,
    )
    .unwrap();
    assert_eq!(c.width, 1280);
    assert_eq!(c.text.text_color, "yellow");
    assert_eq!(c.text.main_font, "Arial");
    assert!(c.text.shadow.enabled);
    assert_eq!(c.text.shadow.blur, 20);
    assert_eq!(c.output.format, OutputFormat::Jpg);
}

#[test]
fn bad_json_is_configuration_error() {
    let err = Configuration::from_json_str("{ \"width\": \"wide\" }").unwrap_err();
    assert!(matches!(err, LowerThirdError::Configuration { .. }));
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let mut c = Configuration::default();
    c.text.letter_spacing = -3;
    c.output.format = OutputFormat::Tiff;
    c.to_path(&path).unwrap();
    let back = Configuration::from_path(&path).unwrap();
    assert_eq!(back, c);
}

#[test]
fn outline_spec_parsing() {
    let o = OutlineConfig::from_spec("2,red,128");
    assert_eq!((o.width, o.color.as_str(), o.opacity), (2, "red", 128));

    let o = OutlineConfig::from_spec("3, blue");
    assert_eq!((o.width, o.color.as_str(), o.opacity), (3, "blue", 255));

    let o = OutlineConfig::from_spec("wide,white,999");
    assert_eq!((o.width, o.color.as_str(), o.opacity), (0, "white", 255));
    assert!(!o.enabled());

    assert_eq!(OutlineConfig::from_spec(""), OutlineConfig::default());
}

#[test]
fn outline_spec_width_is_capped() {
    let o = OutlineConfig::from_spec("99999,red");
    assert_eq!(o.width, MAX_OUTLINE_WIDTH);
    assert_eq!(o.color, "red");
    assert_eq!(OutlineConfig::from_spec("20,red").width, 20);
}

#[test]
fn output_format_extensions() {
    assert_eq!(OutputFormat::Png.extension(), "png");
    assert_eq!(OutputFormat::Jpg.extension(), "jpg");
    assert_eq!(OutputFormat::Tiff.extension(), "tiff");
    let f: OutputFormat = serde_json::from_str("\"tif\"").unwrap();
    assert_eq!(f, OutputFormat::Tiff);
}
