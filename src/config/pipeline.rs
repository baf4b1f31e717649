use crate::error::InkSaverError;
use crate::invert::detector::{DEFAULT_MIN_REGION_AREA, DetectorConfig};
use crate::invert::metrics::DEFAULT_DARKNESS_THRESHOLD;

/// Page rasterization oversampling relative to the native page size.
pub const DEFAULT_RASTER_SCALE: f64 = 2.0;

/// Minimum number of successful pages for a run to produce output.
pub const DEFAULT_MIN_SUCCESS_PAGES: usize = 1;

/// Runtime parameters for one document run, passed explicitly to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub darkness_threshold: f64,
    pub min_region_area: f64,
    pub min_success_pages: usize,
    pub raster_scale: f64,
    /// Worker threads for page processing. 0 = one per CPU.
    pub parallel_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            darkness_threshold: DEFAULT_DARKNESS_THRESHOLD,
            min_region_area: DEFAULT_MIN_REGION_AREA,
            min_success_pages: DEFAULT_MIN_SUCCESS_PAGES,
            raster_scale: DEFAULT_RASTER_SCALE,
            parallel_workers: 0,
        }
    }
}

impl PipelineConfig {
    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            darkness_threshold: self.darkness_threshold,
            min_region_area: self.min_region_area,
        }
    }

    /// 値の範囲を検証する。
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=1.0).contains(&self.darkness_threshold) {
            return Err(InkSaverError::config(format!(
                "darkness_threshold must be within 0.0-1.0, got {}",
                self.darkness_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_region_area) {
            return Err(InkSaverError::config(format!(
                "min_region_area must be within 0.0-1.0, got {}",
                self.min_region_area
            )));
        }
        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(InkSaverError::config(format!(
                "raster_scale must be a positive number, got {}",
                self.raster_scale
            )));
        }
        Ok(())
    }
}
