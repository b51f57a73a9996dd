use image::{Rgb, RgbImage};

use super::*;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
}

#[test]
fn white_is_light_and_black_is_dark() {
    let white = solid(200, 120, [255, 255, 255]);
    assert!((mean_luminance(&white) - 1.0).abs() < 1e-9);
    assert_eq!(classify(&white), Theme::Light);

    let black = solid(200, 120, [0, 0, 0]);
    assert_eq!(mean_luminance(&black), 0.0);
    assert_eq!(classify(&black), Theme::Dark);
}

#[test]
fn threshold_is_strict() {
    assert_eq!(theme_for_luminance(LIGHT_THRESHOLD), Theme::Dark);
    assert_eq!(theme_for_luminance(0.550_001), Theme::Light);
    assert_eq!(theme_for_luminance(0.549_999), Theme::Dark);
}

#[test]
fn green_dominates_the_weighting() {
    let green = solid(8, 8, [0, 255, 0]);
    assert!((mean_luminance(&green) - 0.7152).abs() < 1e-9);
    assert_eq!(classify(&green), Theme::Light);

    let red = solid(8, 8, [255, 0, 0]);
    assert!((mean_luminance(&red) - 0.2126).abs() < 1e-9);
    assert_eq!(classify(&red), Theme::Dark);
}

#[test]
fn half_and_half_averages() {
    let mut img = RgbImage::new(64, 64);
    for (x, _, px) in img.enumerate_pixels_mut() {
        *px = if x < 32 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) };
    }
    let lum = mean_luminance(&DynamicImage::ImageRgb8(img));
    assert!((lum - 0.5).abs() < 1e-2, "lum = {lum}");
}

#[test]
fn classification_is_deterministic() {
    let img = solid(97, 53, [180, 200, 40]);
    assert_eq!(mean_luminance(&img), mean_luminance(&img));
}

#[test]
fn theme_maps_to_contrasting_text() {
    assert_eq!(Theme::Light.text_color(), crate::Rgba8::BLACK);
    assert_eq!(Theme::Dark.text_color(), crate::Rgba8::WHITE);
}

#[test]
fn thumbnail_uses_bicubic_resampling() {
    let mut img = RgbImage::new(203, 117);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let v = if (x / 3 + y / 5) % 2 == 0 { 240 } else { 20 };
        *px = Rgb([v, (x % 256) as u8, (y * 2 % 256) as u8]);
    }
    let img = DynamicImage::ImageRgb8(img);

    let thumb = img
        .resize_exact(THUMBNAIL_SIDE, THUMBNAIL_SIDE, FilterType::CatmullRom)
        .to_rgb8();
    let expected = thumb
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0.map(|c| f64::from(c) / 255.0);
            0.2126 * r + 0.7152 * g + 0.0722 * b
        })
        .sum::<f64>()
        / f64::from(THUMBNAIL_SIDE * THUMBNAIL_SIDE);
    assert!((mean_luminance(&img) - expected).abs() < 1e-12);
}
