use anyhow::Context;
use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::Canvas,
    error::{KioskError, KioskResult},
};

pub fn decode_image(bytes: &[u8]) -> KioskResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| KioskError::decode(e.to_string()))
}

pub fn read_and_decode(path: &std::path::Path) -> KioskResult<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Resize to exactly the canvas dimensions (aspect ratio is not preserved).
pub fn fit_to_canvas(img: &DynamicImage, canvas: Canvas) -> RgbaImage {
    img.resize_exact(canvas.width, canvas.height, FilterType::Lanczos3)
        .to_rgba8()
}

/// Straight RGBA8 to premultiplied RGBA8.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Premultiplied RGBA8 back to straight RGBA8.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
