use super::*;

#[test]
fn premultiply_scales_color_channels() {
    let p = Rgba8::new(255, 128, 0, 128).premultiply();
    assert_eq!(p, Rgba8Premul { r: 128, g: 64, b: 0, a: 128 });
}

#[test]
fn premultiply_opaque_is_identity() {
    let p = Rgba8::opaque(12, 34, 56).premultiply();
    assert_eq!(p.to_array(), [12, 34, 56, 255]);
}

#[test]
fn with_alpha_keeps_rgb() {
    let c = Rgba8::opaque(1, 2, 3).with_alpha(9);
    assert_eq!(c, Rgba8::new(1, 2, 3, 9));
}

#[test]
fn pixel_point_offset() {
    assert_eq!(PixelPoint::new(10, 20).offset(-3, 4), PixelPoint::new(7, 24));
}

#[test]
fn pixel_point_offset_saturates() {
    assert_eq!(
        PixelPoint::new(10, -10).offset(i32::MAX, i32::MIN),
        PixelPoint::new(i32::MAX, i32::MIN)
    );
}
