use super::*;

fn image() -> RgbaImage {
    RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8 * 60, y as u8 * 80, 10, 200]))
}

fn saver(format: OutputFormat, bit_depth: u8, transparent: bool) -> ImageSaver {
    ImageSaver::new(OutputConfig {
        format,
        bit_depth,
        transparent,
        skip_existing: false,
    })
}

#[test]
fn output_path_uses_format_extension() {
    let dir = Path::new("/tmp/out");
    assert_eq!(
        saver(OutputFormat::Tiff, 8, false).output_path(dir, "jane"),
        dir.join("jane.tiff")
    );
    assert_eq!(
        saver(OutputFormat::Jpg, 8, false).output_path(dir, "jane"),
        dir.join("jane.jpg")
    );
}

#[test]
fn transparent_png_keeps_alpha() {
    let tmp = tempfile::tempdir().unwrap();
    let path = saver(OutputFormat::Png, 8, true)
        .save(&image(), tmp.path(), "a")
        .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgba8);
    assert_eq!(back.to_rgba8().get_pixel(1, 1).0, [60, 80, 10, 200]);
}

#[test]
fn opaque_png_drops_alpha() {
    let tmp = tempfile::tempdir().unwrap();
    let path = saver(OutputFormat::Png, 8, false)
        .save(&image(), tmp.path(), "b")
        .unwrap();
    assert_eq!(image::open(&path).unwrap().color(), image::ColorType::Rgb8);
}

#[test]
fn sixteen_bit_tiff_widens_channels() {
    let tmp = tempfile::tempdir().unwrap();
    let path = saver(OutputFormat::Tiff, 16, false)
        .save(&image(), tmp.path(), "c")
        .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb16);
    let px = back.to_rgb16().get_pixel(3, 2).0;
    assert_eq!(px, [180 * 257, 160 * 257, 10 * 257]);
}

#[test]
fn jpeg_is_always_opaque() {
    let s = saver(OutputFormat::Jpg, 16, true);
    assert!(!s.keeps_alpha());
    let tmp = tempfile::tempdir().unwrap();
    let path = s.save(&image(), &tmp.path().join("nested"), "d").unwrap();
    assert!(path.exists());
    assert_eq!(image::open(&path).unwrap().color(), image::ColorType::Rgb8);
}

#[test]
fn skip_existing_only_when_enabled() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("e.png");
    std::fs::write(&path, b"x").unwrap();
    assert!(!saver(OutputFormat::Png, 8, false).should_skip(&path));
    let skipping = ImageSaver::new(OutputConfig {
        skip_existing: true,
        ..OutputConfig::default()
    });
    assert!(skipping.should_skip(&path));
    assert!(!skipping.should_skip(&tmp.path().join("missing.png")));
}

#[test]
fn save_leaves_existing_file_when_skipping() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("kept.png");
    std::fs::write(&path, b"keep").unwrap();
    let skipping = ImageSaver::new(OutputConfig {
        skip_existing: true,
        ..OutputConfig::default()
    });
    assert_eq!(skipping.save(&image(), tmp.path(), "kept").unwrap(), path);
    assert_eq!(std::fs::read(&path).unwrap(), b"keep");

    let fresh = skipping.save(&image(), tmp.path(), "fresh").unwrap();
    assert!(image::open(&fresh).is_ok());

    saver(OutputFormat::Png, 8, true)
        .save(&image(), tmp.path(), "kept")
        .unwrap();
    assert_ne!(std::fs::read(&path).unwrap(), b"keep");
}
