use std::path::Path;

use serde::Deserialize;

use super::pipeline::{DEFAULT_MIN_SUCCESS_PAGES, DEFAULT_RASTER_SCALE};
use crate::invert::detector::DEFAULT_MIN_REGION_AREA;
use crate::invert::metrics::DEFAULT_DARKNESS_THRESHOLD;
use crate::region::proposer::ProposerKind;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub darkness_threshold: f64,
    pub min_region_area: f64,
    pub min_success_pages: usize,
    pub raster_scale: f64,
    pub parallel_workers: usize,
    pub proposer: ProposerKind,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            darkness_threshold: DEFAULT_DARKNESS_THRESHOLD,
            min_region_area: DEFAULT_MIN_REGION_AREA,
            min_success_pages: DEFAULT_MIN_SUCCESS_PAGES,
            raster_scale: DEFAULT_RASTER_SCALE,
            parallel_workers: 0,
            proposer: ProposerKind::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::InkSaverError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
