use std::path::Path;

use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::blend_channel_over;

/// Scale `img` to cover `canvas` and center-crop the overflow.
///
/// Never letterboxes. Transparent source pixels are flattened over black, so the result is
/// always opaque.
pub fn fit_to_canvas(img: &image::DynamicImage, canvas: Canvas) -> FrameRGBA {
    let filled = if img.width() == canvas.width && img.height() == canvas.height {
        img.to_rgba8()
    } else {
        img.resize_to_fill(canvas.width, canvas.height, FilterType::Lanczos3)
            .to_rgba8()
    };

    let mut data = filled.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a != 255 {
            px[0] = blend_channel_over(px[0], 0, a);
            px[1] = blend_channel_over(px[1], 0, a);
            px[2] = blend_channel_over(px[2], 0, a);
            px[3] = 255;
        }
    }

    FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    }
}

/// Decode encoded image bytes and normalize them to `canvas`.
pub fn decode_to_canvas(bytes: &[u8], canvas: Canvas) -> ReelResult<FrameRGBA> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(fit_to_canvas(&img, canvas))
}

/// Load a scene image from disk and normalize it to `canvas`.
///
/// A file that does not exist is [`ReelError::MissingAsset`].
pub fn load_scene_image(path: &Path, canvas: Canvas) -> ReelResult<FrameRGBA> {
    if !path.is_file() {
        return Err(ReelError::missing_asset(path));
    }
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(fit_to_canvas(&img, canvas))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
