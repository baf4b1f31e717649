// ページ単位処理: サイズ検証 → ラスタライズ → 領域候補 → 暗部反転 → ページ化

use tracing::debug;

use crate::config::pipeline::PipelineConfig;
use crate::invert::detector::{DetectionResult, invert_dark_regions};
use crate::pipeline::document::{RasterPage, SourcePage};
use crate::pipeline::log::PageLog;
use crate::region::proposer::RegionProposer;
use crate::render::PageRasterizer;

/// Result of processing one page. Never partially composited.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Success(RasterPage),
    Failed(String),
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PageOutcome::Success(_))
    }
}

/// Pixel size to rasterize a page at: native points times `scale`, at least 1x1.
pub fn raster_target_size(page: &SourcePage, scale: f64) -> (u32, u32) {
    let to_px = |pts: f64| ((pts * scale).round().max(1.0)).min(f64::from(u32::MAX)) as u32;
    (to_px(page.width_pts), to_px(page.height_pts))
}

/// Process a single page: validate -> rasterize -> propose -> invert -> page.
///
/// A failing proposer is downgraded to "no regions found" and logged as a
/// warning. Skipped regions are logged as warnings too. Retrying is left to
/// the caller.
pub fn process_page(
    page: &SourcePage,
    rasterizer: &dyn PageRasterizer,
    proposer: &dyn RegionProposer,
    config: &PipelineConfig,
    log: &mut PageLog<'_>,
) -> PageOutcome {
    let page_num = page.index + 1;

    if !page.has_valid_dimensions() {
        return PageOutcome::Failed("invalid dimensions".to_string());
    }

    let target = raster_target_size(page, config.raster_scale);
    let raster = match rasterizer.rasterize(page, target) {
        Ok(image) => image,
        Err(e) => return PageOutcome::Failed(format!("rasterization failed: {e}")),
    };
    if raster.width() == 0 || raster.height() == 0 {
        return PageOutcome::Failed("rasterizer produced an empty image".to_string());
    }

    let candidates = match proposer.propose(&raster) {
        Ok(candidates) => candidates,
        Err(e) => {
            log.warning(format!(
                "Page {page_num}: region detection failed ({e}); continuing without regions"
            ));
            Vec::new()
        }
    };

    let detection = invert_dark_regions(&raster, &candidates, &config.detector());
    debug!(
        page = page_num,
        candidates = candidates.len(),
        inverted = detection.inverted_count(),
        "dark region pass finished"
    );

    log_detection(page_num, &detection, candidates.len(), log);

    PageOutcome::Success(RasterPage {
        source_index: page.index,
        image: detection.image,
        width_pts: page.width_pts,
        height_pts: page.height_pts,
    })
}

fn log_detection(
    page_num: usize,
    detection: &DetectionResult,
    candidate_count: usize,
    log: &mut PageLog<'_>,
) {
    if detection.failed_count() > 0 {
        log.warning(format!(
            "Page {page_num}: {} region(s) could not be processed and were left unchanged",
            detection.failed_count()
        ));
    }
    log.info(format!(
        "Page {page_num}: {} of {candidate_count} region(s) inverted",
        detection.inverted_count()
    ));
}
