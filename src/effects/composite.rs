use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::foundation::math::mul_div255_u8;

/// Source-over of one premultiplied pixel.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul) -> Rgba8Premul {
    if src.a == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src.a);
    Rgba8Premul {
        r: add_sat_u8(src.r, mul_div255_u8(u16::from(dst.r), inv)),
        g: add_sat_u8(src.g, mul_div255_u8(u16::from(dst.g), inv)),
        b: add_sat_u8(src.b, mul_div255_u8(u16::from(dst.b), inv)),
        a: add_sat_u8(src.a, mul_div255_u8(u16::from(dst.a), inv)),
    }
}

/// Source-over of two equally sized premultiplied RGBA8 buffers, in place on `dst`.
pub fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> LowerThirdResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LowerThirdError::generation(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
    Ok(())
}

/// Source-over a solid premultiplied color into the `[x0, x1) x [y0, y1)` region of a
/// `width`-wide buffer. The region must already be clipped to the buffer.
pub fn fill_rect_over(
    dst: &mut [u8],
    width: u32,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    color: Rgba8Premul,
) {
    if color.a == 0 || x0 >= x1 || y0 >= y1 {
        return;
    }
    let stride = width as usize * 4;
    for y in y0 as usize..y1 as usize {
        let row = &mut dst[y * stride + x0 as usize * 4..y * stride + x1 as usize * 4];
        for px in row.chunks_exact_mut(4) {
            let out = over(Rgba8Premul { r: px[0], g: px[1], b: px[2], a: px[3] }, color);
            px.copy_from_slice(&out.to_array());
        }
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
