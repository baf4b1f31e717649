// Color metrics: pixel samples -> brightness -> darkness decision

use image::DynamicImage;

use crate::region::PixelRect;

/// Recommended darkness cutoff for the average brightness of a region.
pub const DEFAULT_DARKNESS_THRESHOLD: f64 = 0.4;

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Perceptual brightness of an 8-bit RGB sample, in `[0, 1]`.
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    (LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b)) / 255.0
}

/// `true` when `average_brightness` is strictly below `threshold`.
pub fn is_dark(average_brightness: f64, threshold: f64) -> bool {
    average_brightness < threshold
}

/// Mean brightness of `image` over `extent`.
///
/// The extent is clipped to the image first. Returns `None` for an empty
/// intersection so callers never divide by zero.
pub fn average_brightness(image: &DynamicImage, extent: PixelRect) -> Option<f64> {
    let clipped = extent.clip_to(image.width(), image.height());
    if clipped.is_empty() {
        return None;
    }

    let region = image
        .crop_imm(clipped.x, clipped.y, clipped.width, clipped.height)
        .to_rgb8();
    let total: f64 = region
        .pixels()
        .map(|p| brightness(p.0[0], p.0[1], p.0[2]))
        .sum();

    Some(total / clipped.area() as f64)
}

/// Classify `extent` of `image`. Zero-area extents are never dark.
pub fn is_region_dark(image: &DynamicImage, extent: PixelRect, threshold: f64) -> bool {
    average_brightness(image, extent).is_some_and(|avg| is_dark(avg, threshold))
}
