pub mod compositor;
pub mod detector;
pub mod metrics;

use image::DynamicImage;

/// Return a color-inverted copy of `image`.
///
/// Every color sample becomes `MAX - value` for its bit depth; alpha is left
/// untouched. Applying it twice yields the original pixels.
pub fn invert_image(image: &DynamicImage) -> DynamicImage {
    let mut inverted = image.clone();
    inverted.invert();
    inverted
}
