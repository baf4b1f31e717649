// Region compositing: base + extent + replacement -> new page image

use image::{DynamicImage, imageops};

use crate::error::InkSaverError;
use crate::region::PixelRect;

/// Replace `extent` of `base` with `replacement`, returning a new image.
///
/// The replacement's top-left pixel is aligned with the extent's origin and
/// cropped to the extent. The extent is clipped to `base` first; an empty
/// intersection returns `base` unchanged. This is a hard copy of samples,
/// never a blend.
///
/// # Errors
/// Returns `InkSaverError::CompositeError` if `replacement` has a different
/// color model than `base` or is smaller than the clipped extent.
pub fn composite(
    base: &DynamicImage,
    extent: PixelRect,
    replacement: &DynamicImage,
) -> crate::error::Result<DynamicImage> {
    let mut output = base.clone();
    composite_in_place(&mut output, extent, replacement)?;
    Ok(output)
}

/// In-place form of [`composite`] for an image the caller owns exclusively.
///
/// On error `target` is left untouched.
pub(crate) fn composite_in_place(
    target: &mut DynamicImage,
    extent: PixelRect,
    replacement: &DynamicImage,
) -> crate::error::Result<()> {
    let clipped = extent.clip_to(target.width(), target.height());
    if clipped.is_empty() {
        return Ok(());
    }

    if replacement.color() != target.color() {
        return Err(InkSaverError::composite(format!(
            "color model mismatch: base is {:?}, replacement is {:?}",
            target.color(),
            replacement.color()
        )));
    }
    if replacement.width() < clipped.width || replacement.height() < clipped.height {
        return Err(InkSaverError::composite(format!(
            "replacement {}x{} is smaller than region {}x{}",
            replacement.width(),
            replacement.height(),
            clipped.width,
            clipped.height
        )));
    }

    let (x, y) = (i64::from(clipped.x), i64::from(clipped.y));
    let (w, h) = (clipped.width, clipped.height);

    // Copy within the concrete buffer type so 16-bit and float samples keep
    // their full precision.
    macro_rules! replace_variants {
        ($($variant:ident),* $(,)?) => {
            match (&mut *target, replacement) {
                $(
                    (DynamicImage::$variant(dst), DynamicImage::$variant(src)) => {
                        if src.width() == w && src.height() == h {
                            imageops::replace(dst, src, x, y);
                        } else {
                            let patch = imageops::crop_imm(src, 0, 0, w, h).to_image();
                            imageops::replace(dst, &patch, x, y);
                        }
                    }
                )*
                _ => {
                    return Err(InkSaverError::composite(format!(
                        "unsupported color model {:?}",
                        replacement.color()
                    )));
                }
            }
        };
    }

    replace_variants!(
        ImageLuma8,
        ImageLumaA8,
        ImageRgb8,
        ImageRgba8,
        ImageLuma16,
        ImageLumaA16,
        ImageRgb16,
        ImageRgba16,
        ImageRgb32F,
        ImageRgba32F,
    );

    Ok(())
}
