use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};

/// Write one horizontal wipe frame into `out`.
///
/// The current image is shifted left by `offset_px` columns and the freed right edge shows the
/// leading `offset_px` columns of the next image. Offset 0 reproduces `current`, offset `width`
/// reproduces `next`; larger offsets are clamped to `width`.
pub fn wipe_frame(
    current: &FrameRGBA,
    next: &FrameRGBA,
    offset_px: u32,
    out: &mut FrameRGBA,
) -> ReelResult<()> {
    if current.width != next.width
        || current.height != next.height
        || out.width != current.width
        || out.height != current.height
    {
        return Err(ReelError::validation(format!(
            "wipe frame size mismatch: current {}x{}, next {}x{}, out {}x{}",
            current.width, current.height, next.width, next.height, out.width, out.height
        )));
    }

    let stride = current.width as usize * 4;
    let shift = offset_px.min(current.width) as usize * 4;
    let keep = stride - shift;

    for ((dst, cur), nxt) in out
        .data
        .chunks_exact_mut(stride)
        .zip(current.data.chunks_exact(stride))
        .zip(next.data.chunks_exact(stride))
    {
        dst[..keep].copy_from_slice(&cur[shift..]);
        dst[keep..].copy_from_slice(&nxt[..shift]);
    }
    Ok(())
}

/// Pixel offset of wipe frame `k` (0-based) out of `slide_frames`.
pub fn wipe_offset(k: u64, slide_frames: u64, width: u32) -> u32 {
    if slide_frames == 0 {
        return 0;
    }
    let num = u128::from(k) * u128::from(width);
    let den = u128::from(slide_frames);
    let px = (num + den / 2) / den;
    px.min(u128::from(width)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/compose/wipe.rs"]
mod tests;
