use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn converter_hits_segment_boundaries() {
    assert!((BlurConverter::convert(1) - 0.3).abs() < 1e-6);
    assert!((BlurConverter::convert(20) - 2.0).abs() < 1e-6);
    assert!((BlurConverter::convert(70) - 10.0).abs() < 1e-6);
    assert!((BlurConverter::convert(100) - 30.0).abs() < 1e-6);
}

#[test]
fn converter_clamps_out_of_range_input() {
    assert_eq!(BlurConverter::convert(0), BlurConverter::convert(1));
    assert_eq!(BlurConverter::convert(500), BlurConverter::convert(100));
}

#[test]
fn converter_is_monotonic() {
    let mut prev = BlurConverter::convert(1);
    for v in 2..=100 {
        let cur = BlurConverter::convert(v);
        assert!(cur >= prev, "convert({v}) = {cur} < {prev}");
        prev = cur;
    }
}

#[test]
fn converter_interpolates_inside_segment() {
    assert!((BlurConverter::convert(45) - 6.0).abs() < 1e-5);
    assert!((BlurConverter::convert(85) - 20.0).abs() < 1e-5);
}

#[test]
fn kernel_radius_covers_three_sigma() {
    assert_eq!(BlurConverter::kernel_radius(2.0), 6);
    assert_eq!(BlurConverter::kernel_radius(0.3), 1);
    assert_eq!(BlurConverter::kernel_radius(0.0), 0);
}

#[test]
fn blur_without_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0.0).unwrap(), src);
    assert_eq!(blur_rgba8_premul(&src, 1, 2, f32::NAN).unwrap(), src);
}

#[test]
fn kernel_taps_are_symmetric_and_sum_to_one() {
    for sigma in [0.3f32, 1.0, 2.0, 6.5, 30.0] {
        let k = GaussianKernel::new(sigma).unwrap();
        assert_eq!(k.taps.len(), 2 * k.radius + 1);
        assert_eq!(k.taps.iter().sum::<u32>(), GaussianKernel::ONE);
        assert!(k.taps.iter().eq(k.taps.iter().rev()));
        assert!(k.taps[k.radius] >= k.taps[0]);
    }
    assert!(GaussianKernel::new(0.0).is_none());
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1.0).is_err());
}

#[test]
fn layer_blur_spreads_single_pixel_and_keeps_energy() {
    let mut layer = Layer::transparent(21, 21).unwrap();
    layer.fill_rect(10, 10, 1, 1, Rgba8::opaque(255, 255, 255));
    blur_layer(&mut layer, 1.2).unwrap();

    let (x0, y0, x1, y1) = layer.alpha_bounds().unwrap();
    assert!(x0 < 10 && y0 < 10 && x1 > 10 && y1 > 10);
    let sum_a: u32 = layer.data().chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8);
}

#[test]
fn layer_blur_of_empty_layer_is_noop() {
    let mut layer = Layer::transparent(8, 8).unwrap();
    blur_layer(&mut layer, 5.0).unwrap();
    assert_eq!(layer.alpha_bounds(), None);
}

#[test]
fn cropped_blur_matches_full_buffer_blur() {
    let mut layer = Layer::transparent(40, 30).unwrap();
    layer.fill_rect(18, 12, 4, 3, Rgba8::new(200, 10, 10, 180));
    let full = blur_rgba8_premul(layer.data(), 40, 30, 2.0).unwrap();
    blur_layer(&mut layer, 2.0).unwrap();
    assert_eq!(layer.data(), &full[..]);
}
