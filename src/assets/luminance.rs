//! Background brightness and the text theme derived from it.

use image::{DynamicImage, imageops::FilterType};

/// Side of the square thumbnail luminance is measured on.
pub const THUMBNAIL_SIDE: u32 = 64;

/// Mean luminance above this is a light background.
pub const LIGHT_THRESHOLD: f64 = 0.55;

/// Binary text-contrast choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Theme {
    /// Light background, dark text.
    Light,
    /// Dark background, light text.
    Dark,
}

impl Theme {
    pub fn text_color(self) -> crate::Rgba8 {
        match self {
            Self::Light => crate::Rgba8::BLACK,
            Self::Dark => crate::Rgba8::WHITE,
        }
    }
}

/// Mean BT.709 luminance in `[0, 1]`, measured on a 64x64 RGB thumbnail.
pub fn mean_luminance(img: &DynamicImage) -> f64 {
    let thumb = img
        .resize_exact(THUMBNAIL_SIDE, THUMBNAIL_SIDE, FilterType::CatmullRom)
        .to_rgb8();
    let n = thumb.pixels().len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = thumb
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0.map(|c| f64::from(c) / 255.0);
            0.2126 * r + 0.7152 * g + 0.0722 * b
        })
        .sum();
    sum / n as f64
}

pub fn theme_for_luminance(lum: f64) -> Theme {
    if lum > LIGHT_THRESHOLD {
        Theme::Light
    } else {
        Theme::Dark
    }
}

pub fn classify(img: &DynamicImage) -> Theme {
    theme_for_luminance(mean_luminance(img))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/luminance.rs"]
mod tests;
