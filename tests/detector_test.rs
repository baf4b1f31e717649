// Dark region detector: selection, classification, ordering, isolation

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};
use pdf_ink_saver::invert::detector::{DetectorConfig, RegionDecision, invert_dark_regions};
use pdf_ink_saver::region::{NormalizedRect, PixelRect, RegionCandidate};

fn uniform(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
}

/// Left half black, right half white.
fn split_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    }))
}

fn candidate(x: f64, y: f64, w: f64, h: f64) -> RegionCandidate {
    RegionCandidate::from_xywh(x, y, w, h).expect("finite candidate")
}

#[test]
fn test_no_candidates_returns_identical_image() {
    let page = split_page(40, 20);
    let result = invert_dark_regions(&page, &[], &DetectorConfig::default());
    assert_eq!(result.image, page);
    assert!(result.decisions.is_empty());
}

#[test]
fn test_zero_sized_page_returns_input() {
    let page = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
    let result = invert_dark_regions(
        &page,
        &[RegionCandidate::new(NormalizedRect::FULL)],
        &DetectorConfig::default(),
    );
    assert_eq!(result.image, page);
}

#[test]
fn test_full_black_page_becomes_white() {
    let page = uniform(30, 30, 0);
    let result = invert_dark_regions(
        &page,
        &[RegionCandidate::new(NormalizedRect::FULL)],
        &DetectorConfig::default(),
    );
    assert_eq!(result.image, uniform(30, 30, 255));
    assert_eq!(result.inverted_count(), 1);
}

#[test]
fn test_light_region_is_left_alone() {
    let page = uniform(30, 30, 200);
    let result = invert_dark_regions(
        &page,
        &[RegionCandidate::new(NormalizedRect::FULL)],
        &DetectorConfig::default(),
    );
    assert_eq!(result.image, page);
    assert!(matches!(result.decisions[0], RegionDecision::Light { .. }));
}

#[test]
fn test_only_dark_half_is_inverted() {
    let page = split_page(40, 20);
    let candidates = [candidate(0.0, 0.0, 0.5, 1.0), candidate(0.5, 0.0, 0.5, 1.0)];
    let result = invert_dark_regions(&page, &candidates, &DetectorConfig::default());

    assert_eq!(result.inverted_count(), 1);
    assert!(matches!(result.decisions[0], RegionDecision::Inverted { .. }));
    assert!(matches!(result.decisions[1], RegionDecision::Light { .. }));
    for (_, _, px) in result.image.pixels() {
        assert_eq!(px, Rgba([255, 255, 255, 255]));
    }
}

#[test]
fn test_small_candidates_are_never_classified() {
    let page = uniform(50, 50, 0);
    // 0.2 x 0.2 = 0.04 < 0.05
    let candidates = [candidate(0.1, 0.1, 0.2, 0.2)];
    let result = invert_dark_regions(&page, &candidates, &DetectorConfig::default());

    assert_eq!(result.image, page);
    match &result.decisions[0] {
        RegionDecision::TooSmall { area } => assert!((area - 0.04).abs() < 1e-9),
        other => panic!("expected TooSmall, got {other:?}"),
    }
}

#[test]
fn test_min_region_area_is_configurable() {
    let page = uniform(50, 50, 0);
    let candidates = [candidate(0.1, 0.1, 0.2, 0.2)];
    let config = DetectorConfig {
        min_region_area: 0.01,
        ..DetectorConfig::default()
    };
    let result = invert_dark_regions(&page, &candidates, &config);
    assert_eq!(result.inverted_count(), 1);
    assert_eq!(result.image.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    assert_eq!(result.image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_pixels_outside_dark_regions_unchanged() {
    let page = DynamicImage::ImageRgb8(RgbImage::from_fn(20, 20, |x, y| {
        if (5..15).contains(&x) && (5..15).contains(&y) {
            Rgb([10, 10, 10])
        } else {
            Rgb([(x * 12) as u8, (y * 12) as u8, 240])
        }
    }));
    let candidates = [candidate(0.25, 0.25, 0.5, 0.5)];
    let result = invert_dark_regions(&page, &candidates, &DetectorConfig::default());

    let extent = PixelRect::new(5, 5, 10, 10);
    for (x, y, px) in page.pixels() {
        if extent.contains(x, y) {
            assert_eq!(result.image.get_pixel(x, y), Rgba([245, 245, 245, 255]));
        } else {
            assert_eq!(result.image.get_pixel(x, y), px);
        }
    }
}

#[test]
fn test_overlapping_regions_later_overwrites_earlier() {
    // Dark page, two overlapping dark candidates: both are inverted from the
    // source page, so the overlap is inverted exactly once.
    let page = uniform(20, 20, 0);
    let candidates = [candidate(0.0, 0.0, 0.75, 0.75), candidate(0.25, 0.25, 0.75, 0.75)];
    let result = invert_dark_regions(&page, &candidates, &DetectorConfig::default());

    assert_eq!(result.inverted_count(), 2);
    assert_eq!(result.image.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    assert_eq!(result.image.get_pixel(19, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(result.image.get_pixel(0, 19), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_source_page_is_not_modified() {
    let page = uniform(10, 10, 0);
    let before = page.clone();
    let _ = invert_dark_regions(
        &page,
        &[RegionCandidate::new(NormalizedRect::FULL)],
        &DetectorConfig::default(),
    );
    assert_eq!(page, before);
}

#[test]
fn test_threshold_controls_classification() {
    let page = uniform(10, 10, 128);
    let full = [RegionCandidate::new(NormalizedRect::FULL)];

    let strict = invert_dark_regions(&page, &full, &DetectorConfig::default());
    assert_eq!(strict.inverted_count(), 0);

    let lenient = DetectorConfig {
        darkness_threshold: 0.6,
        ..DetectorConfig::default()
    };
    let result = invert_dark_regions(&page, &full, &lenient);
    assert_eq!(result.inverted_count(), 1);
    assert_eq!(result.image, uniform(10, 10, 127));
}
