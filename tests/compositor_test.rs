// Region compositor and inversion

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use pdf_ink_saver::invert::compositor::composite;
use pdf_ink_saver::invert::invert_image;
use pdf_ink_saver::region::PixelRect;

/// A deterministic, non-uniform test pattern.
fn pattern(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 37 % 256) as u8,
            (y * 53 % 256) as u8,
            ((x + y) * 11 % 256) as u8,
            (200 + (x % 50)) as u8,
        ])
    }))
}

fn assert_outside_unchanged(base: &DynamicImage, out: &DynamicImage, extent: PixelRect) {
    for (x, y, px) in base.pixels() {
        if !extent.contains(x, y) {
            assert_eq!(out.get_pixel(x, y), px, "pixel ({x},{y}) outside extent changed");
        }
    }
}

#[test]
fn test_composite_replaces_only_extent() {
    let base = pattern(20, 16);
    let extent = PixelRect::new(4, 3, 8, 6);
    let replacement = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 4])));

    let out = composite(&base, extent, &replacement).unwrap();

    assert_eq!(out.dimensions(), base.dimensions());
    assert_eq!(out.color(), base.color());
    assert_outside_unchanged(&base, &out, extent);
    for y in 3..9 {
        for x in 4..12 {
            assert_eq!(out.get_pixel(x, y), Rgba([1, 2, 3, 4]));
        }
    }
}

#[test]
fn test_composite_hard_edges_no_blending() {
    let base = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
    let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
    let out = composite(&base, PixelRect::new(3, 3, 4, 4), &white).unwrap();

    // Every pixel is either fully black or fully white.
    for (_, _, px) in out.pixels() {
        assert!(px == Rgba([0, 0, 0, 255]) || px == Rgba([255, 255, 255, 255]));
    }
    assert_eq!(out.get_pixel(2, 3), Rgba([0, 0, 0, 255]));
    assert_eq!(out.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    assert_eq!(out.get_pixel(6, 6), Rgba([255, 255, 255, 255]));
    assert_eq!(out.get_pixel(7, 6), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_composite_clips_partially_outside_extent() {
    let base = pattern(10, 10);
    let extent = PixelRect::new(7, 8, 6, 6);
    let replacement = DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 6, Rgba([9, 9, 9, 9])));

    let out = composite(&base, extent, &replacement).unwrap();

    assert_eq!(out.dimensions(), (10, 10));
    assert_outside_unchanged(&base, &out, extent);
    assert_eq!(out.get_pixel(9, 9), Rgba([9, 9, 9, 9]));
    assert_eq!(out.get_pixel(7, 8), Rgba([9, 9, 9, 9]));
}

#[test]
fn test_composite_outside_bounds_is_noop() {
    let base = pattern(10, 10);
    let replacement = DynamicImage::ImageRgba8(RgbaImage::new(5, 5));
    let out = composite(&base, PixelRect::new(12, 0, 5, 5), &replacement).unwrap();
    assert_eq!(out, base);
}

#[test]
fn test_composite_crops_larger_replacement() {
    let base = pattern(10, 10);
    let replacement = DynamicImage::ImageRgba8(RgbaImage::from_fn(10, 10, |x, y| {
        Rgba([x as u8, y as u8, 0, 255])
    }));
    let out = composite(&base, PixelRect::new(2, 2, 3, 3), &replacement).unwrap();

    // Replacement's origin is aligned with the extent's origin.
    assert_eq!(out.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
    assert_eq!(out.get_pixel(4, 4), Rgba([2, 2, 0, 255]));
    assert_outside_unchanged(&base, &out, PixelRect::new(2, 2, 3, 3));
}

#[test]
fn test_composite_rejects_color_model_mismatch() {
    let base = pattern(10, 10);
    let replacement = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
    assert!(composite(&base, PixelRect::new(0, 0, 4, 4), &replacement).is_err());
}

#[test]
fn test_composite_rejects_too_small_replacement() {
    let base = pattern(10, 10);
    let replacement = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
    assert!(composite(&base, PixelRect::new(0, 0, 4, 4), &replacement).is_err());
}

#[test]
fn test_composite_does_not_modify_base() {
    let base = pattern(8, 8);
    let before = base.clone();
    let replacement = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
    let _ = composite(&base, PixelRect::new(0, 0, 8, 8), &replacement).unwrap();
    assert_eq!(base, before);
}

#[test]
fn test_invert_flips_color_keeps_alpha() {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 100, 250, 77])));
    let inv = invert_image(&img);
    assert_eq!(inv.get_pixel(0, 0), Rgba([245, 155, 5, 77]));
}

#[test]
fn test_invert_is_involutive() {
    let img = pattern(13, 7);
    assert_eq!(invert_image(&invert_image(&img)), img);
}

#[test]
fn test_invert_composite_twice_restores_region() {
    let base = pattern(16, 16);
    let extent = PixelRect::new(3, 5, 9, 7);

    let crop = base.crop_imm(extent.x, extent.y, extent.width, extent.height);
    let once = composite(&base, extent, &invert_image(&crop)).unwrap();

    let crop_again = once.crop_imm(extent.x, extent.y, extent.width, extent.height);
    let twice = composite(&once, extent, &invert_image(&crop_again)).unwrap();

    assert_ne!(once, base);
    assert_eq!(twice, base);
}

#[test]
fn test_composite_keeps_16_bit_precision() {
    let base = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(
        6,
        6,
        image::Rgb([1000u16, 2000, 3000]),
    ));
    let crop = base.crop_imm(0, 0, 3, 3);
    let out = composite(&base, PixelRect::new(0, 0, 3, 3), &invert_image(&crop)).unwrap();
    let rgb16 = out.as_rgb16().unwrap();
    assert_eq!(rgb16.get_pixel(0, 0).0, [65535 - 1000, 65535 - 2000, 65535 - 3000]);
    assert_eq!(rgb16.get_pixel(5, 5).0, [1000, 2000, 3000]);
}
