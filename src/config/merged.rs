use super::job::Job;
use super::pipeline::PipelineConfig;
use super::settings::Settings;
use crate::region::proposer::ProposerKind;

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub darkness_threshold: f64,
    pub min_region_area: f64,
    pub min_success_pages: usize,
    pub raster_scale: f64,
    pub parallel_workers: usize,
    pub proposer: ProposerKind,
}

impl MergedConfig {
    /// JobのOption値がSomeならJobの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            darkness_threshold: job.darkness_threshold.unwrap_or(settings.darkness_threshold),
            min_region_area: job.min_region_area.unwrap_or(settings.min_region_area),
            min_success_pages: job.min_success_pages.unwrap_or(settings.min_success_pages),
            raster_scale: job.raster_scale.unwrap_or(settings.raster_scale),
            parallel_workers: settings.parallel_workers,
            proposer: job.proposer.unwrap_or(settings.proposer),
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            darkness_threshold: self.darkness_threshold,
            min_region_area: self.min_region_area,
            min_success_pages: self.min_success_pages,
            raster_scale: self.raster_scale,
            parallel_workers: self.parallel_workers,
        }
    }
}
