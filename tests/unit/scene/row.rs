use super::*;

#[test]
fn new_trims_and_normalizes() {
    let row = RowData::new("  Jane Doe ", "\tDirector", "  Lower Left ").unwrap();
    assert_eq!(row.main_text, "Jane Doe");
    assert_eq!(row.secondary_text, "Director");
    assert_eq!(row.justification, "lower left");
}

#[test]
fn empty_row_is_rejected() {
    let err = RowData::new("   ", "", "lower left").unwrap_err();
    assert!(matches!(err, LowerThirdError::InvalidRow(_)));
}

#[test]
fn single_text_is_enough() {
    assert!(RowData::new("", "Only secondary", "").is_ok());
}

#[test]
fn override_flags() {
    let mut row = RowData::new("A", "B", "").unwrap();
    assert!(!row.has_color_overrides());
    assert!(!row.has_font_size_overrides());
    assert!(!row.has_effect_overrides());
    row.bar_color = Some("red".to_owned());
    row.secondary_font_size = Some(20);
    row.text_shadow = true;
    assert!(row.has_color_overrides());
    assert!(row.has_font_size_overrides());
    assert!(row.has_effect_overrides());
}

#[test]
fn output_stem_precedence_and_sanitizing() {
    let mut row = RowData::new("John/Doe", "Director", "").unwrap();
    assert_eq!(row.output_stem().as_deref(), Some("John_Doe"));

    row.file_name = Some("custom name!.v2".to_owned());
    assert_eq!(row.output_stem().as_deref(), Some("customname.v2"));

    let row = RowData::new("", "Producer", "").unwrap();
    assert_eq!(row.output_stem().as_deref(), Some("Producer"));

    let row = RowData::new("???", "", "").unwrap();
    assert_eq!(row.output_stem(), None);
}

#[test]
fn json_rows_with_overrides() {
    let rows = RowData::list_from_json_str(
        r#"[
            { "main_text": "Jane Doe", "secondary_text": "Director", "justification": "Upper Right" },
            { "main_text": "Sam", "main_color": "red,200", "text_shadow": true, "position_offset_x": -5 }
        ]"#,
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].justification, "upper right");
    assert_eq!(rows[1].main_color.as_deref(), Some("red,200"));
    assert!(rows[1].text_shadow);
    assert_eq!(rows[1].position_offset_x, Some(-5));
}

#[test]
fn json_rows_report_bad_index() {
    let err = RowData::list_from_json_str(r#"[{ "main_text": "ok" }, { "main_text": " " }]"#)
        .unwrap_err();
    assert!(err.to_string().contains("row 1"));
}
