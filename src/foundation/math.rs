pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Undo premultiplication of one channel, rounding to nearest.
pub(crate) fn div_alpha_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

/// Scale an 8-bit channel to 16 bits (`0xff -> 0xffff`).
pub(crate) fn widen_u8_to_u16(v: u8) -> u16 {
    u16::from(v) * 257
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
