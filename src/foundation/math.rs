pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Source-over blend of one straight-alpha channel onto an opaque destination channel.
pub(crate) fn blend_channel_over(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    let v = mul_div255_u16(u16::from(src), a) + mul_div255_u16(u16::from(dst), 255 - a);
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
