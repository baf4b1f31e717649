// ジョブ単位: PDF読込 → ドキュメント処理 → 出力PDF・レポート書き出し

use std::path::PathBuf;

use tracing::info;

use crate::config::pipeline::PipelineConfig;
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::render_output_pdf;
use crate::pipeline::log::LogSink;
use crate::pipeline::orchestrator::{DocumentProcessor, ProcessingRun};
use crate::pipeline::state::{ProcessingState, Verdict};
use crate::region::proposer::ProposerKind;
use crate::render::PageRasterizer;

/// Configuration for a single job.
pub struct JobConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
    pub pipeline: PipelineConfig,
    pub proposer: ProposerKind,
}

/// Result of processing a single job.
pub struct JobResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub verdict: Verdict,
    pub pages_written: usize,
    /// `true` if the output PDF was written.
    pub output_written: bool,
    pub state: ProcessingState,
}

/// Run a single job with the given rasterizer.
///
/// The output PDF is written only when the verdict carries a document
/// (success or completed-with-errors). The report is written regardless.
pub fn run_job_with(
    config: &JobConfig,
    rasterizer: &dyn PageRasterizer,
    sink: Option<&dyn LogSink>,
) -> crate::error::Result<JobResult> {
    let reader = PdfReader::open(&config.input_path)?;
    let proposer = config.proposer.build()?;

    let mut processor = DocumentProcessor::new(rasterizer, proposer.as_ref(), config.pipeline);
    if let Some(sink) = sink {
        processor = processor.with_log_sink(sink);
    }
    let ProcessingRun { document, state } = processor.process(&reader)?;

    let output_written = state.verdict.has_output();
    if output_written {
        let pdf_bytes = render_output_pdf(&document)?;
        std::fs::write(&config.output_path, pdf_bytes)?;
        info!(
            output = %config.output_path.display(),
            pages = document.page_count(),
            "output written"
        );
    }

    if let Some(report_path) = &config.report_path {
        let json = serde_json::to_vec_pretty(&state)?;
        std::fs::write(report_path, json)?;
    }

    Ok(JobResult {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        verdict: state.verdict,
        pages_written: if output_written { document.page_count() } else { 0 },
        output_written,
        state,
    })
}

/// Run a single job, rendering pages with pdfium.
#[cfg(feature = "pdfium")]
pub fn run_job(
    config: &JobConfig,
    sink: Option<&dyn LogSink>,
) -> crate::error::Result<JobResult> {
    let rasterizer = crate::render::pdfium::PdfiumRasterizer::new(&config.input_path);
    run_job_with(config, &rasterizer, sink)
}

/// Run a single job. Without the `pdfium` feature no rasterizer is available.
#[cfg(not(feature = "pdfium"))]
pub fn run_job(
    config: &JobConfig,
    _sink: Option<&dyn LogSink>,
) -> crate::error::Result<JobResult> {
    Err(crate::error::InkSaverError::render(format!(
        "cannot render {}: built without the `pdfium` feature",
        config.input_path.display()
    )))
}

/// Run multiple jobs, collecting results.
/// One job failure does NOT prevent other jobs from running.
pub fn run_all_jobs(
    jobs: &[JobConfig],
    sink: Option<&dyn LogSink>,
) -> Vec<crate::error::Result<JobResult>> {
    jobs.iter().map(|job| run_job(job, sink)).collect()
}
