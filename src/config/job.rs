use serde::Deserialize;

use crate::region::proposer::ProposerKind;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

/// 1ジョブ = 入力PDF 1つ。未指定の項目はsettings.yamlの値を使う。
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    pub output: String,
    /// Optional path for a JSON run report.
    pub report: Option<String>,
    pub darkness_threshold: Option<f64>,
    pub min_region_area: Option<f64>,
    pub min_success_pages: Option<usize>,
    pub raster_scale: Option<f64>,
    pub proposer: Option<ProposerKind>,
}

impl JobFile {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let job_file: JobFile = serde_yml::from_str(yaml)?;
        if job_file.jobs.is_empty() {
            return Err(crate::error::InkSaverError::config(
                "Job file must contain at least one job",
            ));
        }
        Ok(job_file)
    }
}
