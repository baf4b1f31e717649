// Dark region detection: page + candidates -> selectively inverted page

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, warn};

use super::compositor::composite_in_place;
use super::invert_image;
use super::metrics::{self, DEFAULT_DARKNESS_THRESHOLD};
use crate::region::{PixelRect, RegionCandidate};

/// Candidates smaller than this fraction of the page are ignored.
pub const DEFAULT_MIN_REGION_AREA: f64 = 0.05;

/// Classification parameters for [`invert_dark_regions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Regions whose average brightness is below this value are inverted.
    pub darkness_threshold: f64,
    /// Minimum candidate area as a fraction of the unit square.
    pub min_region_area: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            darkness_threshold: DEFAULT_DARKNESS_THRESHOLD,
            min_region_area: DEFAULT_MIN_REGION_AREA,
        }
    }
}

/// What happened to one candidate, in proposer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RegionDecision {
    /// Below `min_region_area`; never classified or composited.
    TooSmall { area: f64 },
    /// Scaled to an empty pixel rectangle.
    Empty,
    /// Classified light; left unchanged.
    Light { extent: PixelRect, brightness: f64 },
    /// Classified dark and replaced by its inverse.
    Inverted { extent: PixelRect, brightness: f64 },
    /// Classification or compositing failed; the region was skipped.
    Failed { extent: PixelRect, reason: String },
}

/// Final page image plus the per-candidate decisions that produced it.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub image: DynamicImage,
    pub decisions: Vec<RegionDecision>,
}

impl DetectionResult {
    pub fn inverted_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, RegionDecision::Inverted { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, RegionDecision::Failed { .. }))
            .count()
    }
}

/// Invert every dark candidate region of `page`.
///
/// Candidates are processed in the order given. Each one is classified and
/// inverted from the source `page`, then copied over the running result, so
/// a later overlapping region overwrites an earlier one. `page` itself is
/// never modified.
///
/// An image with zero width or height, or an empty candidate list, comes
/// back unchanged. A region that fails is recorded as
/// [`RegionDecision::Failed`] and the remaining regions are still processed.
pub fn invert_dark_regions(
    page: &DynamicImage,
    candidates: &[RegionCandidate],
    config: &DetectorConfig,
) -> DetectionResult {
    invert_dark_regions_with(page, candidates, config, composite_in_place)
}

/// [`invert_dark_regions`] with the compositing step supplied by the caller.
pub(crate) fn invert_dark_regions_with<F>(
    page: &DynamicImage,
    candidates: &[RegionCandidate],
    config: &DetectorConfig,
    mut compose: F,
) -> DetectionResult
where
    F: FnMut(&mut DynamicImage, PixelRect, &DynamicImage) -> crate::error::Result<()>,
{
    let (width, height) = (page.width(), page.height());
    if width == 0 || height == 0 || candidates.is_empty() {
        return DetectionResult {
            image: page.clone(),
            decisions: Vec::new(),
        };
    }

    let mut result = page.clone();
    let mut decisions = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let area = candidate.area();
        if area < config.min_region_area {
            decisions.push(RegionDecision::TooSmall { area });
            continue;
        }

        let extent = candidate.rect.to_pixels(width, height);
        let decision = match classify_and_invert(page, &mut result, extent, config, &mut compose) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(?extent, error = %e, "skipping region");
                RegionDecision::Failed {
                    extent,
                    reason: e.to_string(),
                }
            }
        };
        debug!(?decision, "region processed");
        decisions.push(decision);
    }

    DetectionResult {
        image: result,
        decisions,
    }
}

fn classify_and_invert<F>(
    source: &DynamicImage,
    target: &mut DynamicImage,
    extent: PixelRect,
    config: &DetectorConfig,
    compose: &mut F,
) -> crate::error::Result<RegionDecision>
where
    F: FnMut(&mut DynamicImage, PixelRect, &DynamicImage) -> crate::error::Result<()>,
{
    let Some(brightness) = metrics::average_brightness(source, extent) else {
        return Ok(RegionDecision::Empty);
    };
    if !brightness.is_finite() {
        return Err(crate::error::InkSaverError::composite(format!(
            "non-finite brightness {brightness}"
        )));
    }

    if !metrics::is_dark(brightness, config.darkness_threshold) {
        return Ok(RegionDecision::Light { extent, brightness });
    }

    let crop = source.crop_imm(extent.x, extent.y, extent.width, extent.height);
    let inverted = invert_image(&crop);
    compose(target, extent, &inverted)?;

    Ok(RegionDecision::Inverted { extent, brightness })
}
