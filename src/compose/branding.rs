use std::path::Path;

use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::blend_channel_over;
use crate::settings::{BrandingSettings, Corner};

/// A logo scaled once for the output canvas and pinned to a fixed position.
#[derive(Clone, Debug)]
pub struct Logo {
    rgba: image::RgbaImage,
    x: i64,
    y: i64,
}

impl Logo {
    /// Load the configured logo, or `None` when branding is off.
    pub fn from_settings(branding: &BrandingSettings, canvas: Canvas) -> ReelResult<Option<Self>> {
        match branding.logo.as_deref() {
            Some(path) => Self::prepare(path, branding, canvas).map(Some),
            None => Ok(None),
        }
    }

    /// Load a logo image from disk.
    pub fn prepare(path: &Path, branding: &BrandingSettings, canvas: Canvas) -> ReelResult<Self> {
        if !path.is_file() {
            return Err(ReelError::missing_asset(path));
        }
        let img = image::open(path).with_context(|| format!("decode logo '{}'", path.display()))?;
        Self::from_image(&img, branding, canvas)
    }

    /// Scale `img` to `logo_scale * canvas.height` pixels tall, keeping its aspect ratio.
    pub fn from_image(
        img: &image::DynamicImage,
        branding: &BrandingSettings,
        canvas: Canvas,
    ) -> ReelResult<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(ReelError::validation("logo image is empty"));
        }
        let h = ((f64::from(canvas.height) * branding.logo_scale).round() as u32).max(1);
        let w = ((f64::from(img.width()) * f64::from(h) / f64::from(img.height())).round() as u32)
            .max(1);
        let rgba = image::imageops::resize(&img.to_rgba8(), w, h, FilterType::Lanczos3);

        let (x, y) = anchor_position(branding, canvas, w, h);
        tracing::debug!(w, h, x, y, "prepared branding logo");
        Ok(Self { rgba, x, y })
    }

    /// Scaled logo size.
    pub fn size(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    /// Top-left position on the canvas (may be negative or overflow; drawing clips).
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Source-over composite the logo onto an opaque frame.
    pub fn apply(&self, frame: &mut FrameRGBA) {
        let (lw, lh) = self.rgba.dimensions();
        let fw = i64::from(frame.width);
        let fh = i64::from(frame.height);

        for ly in 0..lh {
            let fy = self.y + i64::from(ly);
            if fy < 0 || fy >= fh {
                continue;
            }
            for lx in 0..lw {
                let fx = self.x + i64::from(lx);
                if fx < 0 || fx >= fw {
                    continue;
                }
                let src = self.rgba.get_pixel(lx, ly).0;
                let a = src[3];
                if a == 0 {
                    continue;
                }
                let i = ((fy * fw + fx) * 4) as usize;
                let dst = &mut frame.data[i..i + 4];
                dst[0] = blend_channel_over(src[0], dst[0], a);
                dst[1] = blend_channel_over(src[1], dst[1], a);
                dst[2] = blend_channel_over(src[2], dst[2], a);
                dst[3] = 255;
            }
        }
    }
}

fn anchor_position(branding: &BrandingSettings, canvas: Canvas, w: u32, h: u32) -> (i64, i64) {
    let ox = i64::from(branding.logo_x);
    let oy = i64::from(branding.logo_y);
    let right = i64::from(canvas.width) - i64::from(w) - ox;
    let bottom = i64::from(canvas.height) - i64::from(h) - oy;
    match branding.corner {
        Corner::TopLeft => (ox, oy),
        Corner::TopRight => (right, oy),
        Corner::BottomLeft => (ox, bottom),
        Corner::BottomRight => (right, bottom),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/branding.rs"]
mod tests;
