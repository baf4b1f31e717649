// ドキュメント単位: 全ページを並列処理 → 入力順に再構成 → ログ集約・判定

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::pipeline::PipelineConfig;
use crate::error::InkSaverError;
use crate::pipeline::document::{OutputDocument, SourceDocument};
use crate::pipeline::log::{LogEntry, LogSink, PageLog};
use crate::pipeline::page_processor::{PageOutcome, process_page};
use crate::pipeline::state::{ProcessingState, Verdict};
use crate::region::proposer::RegionProposer;
use crate::render::PageRasterizer;

/// Cooperative cancellation for a document run.
///
/// Cancelling stops new pages from starting; pages already in flight run to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What one page worker hands back to the aggregation step.
#[derive(Debug)]
pub struct PageReport {
    pub index: usize,
    /// `None` when the run was cancelled before this page started.
    pub outcome: Option<PageOutcome>,
    pub log: Vec<LogEntry>,
}

/// Output document plus the aggregated state of the run.
#[derive(Debug)]
pub struct ProcessingRun {
    pub document: OutputDocument,
    pub state: ProcessingState,
}

/// Runs the page pipeline over every page of a document.
pub struct DocumentProcessor<'a> {
    rasterizer: &'a dyn PageRasterizer,
    proposer: &'a dyn RegionProposer,
    config: PipelineConfig,
    sink: Option<&'a dyn LogSink>,
    cancel: CancelToken,
}

impl<'a> DocumentProcessor<'a> {
    pub fn new(
        rasterizer: &'a dyn PageRasterizer,
        proposer: &'a dyn RegionProposer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            rasterizer,
            proposer,
            config,
            sink: None,
            cancel: CancelToken::new(),
        }
    }

    /// Forward every log entry to `sink` as soon as it is emitted.
    pub fn with_log_sink(mut self, sink: &'a dyn LogSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process all pages of `document`.
    ///
    /// Page failures never surface as `Err`; they are logged and reflected
    /// in the verdict. If fewer than `min_success_pages` pages succeed, the
    /// partial output is discarded and an empty document is returned.
    ///
    /// # Errors
    /// Invalid configuration, or the worker pool cannot be created.
    pub fn process(&self, document: &dyn SourceDocument) -> crate::error::Result<ProcessingRun> {
        self.config.validate()?;

        let page_count = document.page_count();
        let mut log = PageLog::new(self.sink);

        if page_count == 0 {
            log.warning("Document has no pages; nothing to process");
            return Ok(ProcessingRun {
                document: OutputDocument::new(),
                state: ProcessingState {
                    log: log.into_entries(),
                    processed_pages: 0,
                    succeeded_pages: 0,
                    verdict: Verdict::Skipped,
                },
            });
        }

        log.info(format!("Processing started: {page_count} page(s)"));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel_workers)
            .build()
            .map_err(|e| InkSaverError::pipeline(format!("failed to build worker pool: {e}")))?;

        let mut reports: Vec<PageReport> = pool.install(|| {
            (0..page_count)
                .into_par_iter()
                .map(|index| self.run_page(document, index, page_count))
                .collect()
        });
        // Completion order is arbitrary; output order follows the input.
        reports.sort_by_key(|r| r.index);

        Ok(self.aggregate(log.into_entries(), reports, page_count))
    }

    fn run_page(
        &self,
        document: &dyn SourceDocument,
        index: usize,
        page_count: usize,
    ) -> PageReport {
        let page_num = index + 1;
        let mut log = PageLog::new(self.sink);

        if self.cancel.is_cancelled() {
            log.warning(format!("Page {page_num}: not started, processing was cancelled"));
            return PageReport {
                index,
                outcome: None,
                log: log.into_entries(),
            };
        }

        log.info(format!("Processing page {page_num} of {page_count}..."));

        let outcome = match document.page(index) {
            Some(page) => process_page(
                &page,
                self.rasterizer,
                self.proposer,
                &self.config,
                &mut log,
            ),
            None => PageOutcome::Failed("page could not be read".to_string()),
        };

        match &outcome {
            PageOutcome::Success(_) => log.success(format!("Page {page_num} processed")),
            PageOutcome::Failed(reason) => {
                log.error(format!("Page {page_num} skipped: {reason}"))
            }
        }

        PageReport {
            index,
            outcome: Some(outcome),
            log: log.into_entries(),
        }
    }

    /// Merge worker reports into the final document and state.
    fn aggregate(
        &self,
        mut entries: Vec<LogEntry>,
        reports: Vec<PageReport>,
        page_count: usize,
    ) -> ProcessingRun {
        let mut document = OutputDocument::new();
        let mut processed_pages = 0;
        let mut cancelled_pages = 0;

        for report in reports {
            entries.extend(report.log);
            match report.outcome {
                Some(PageOutcome::Success(page)) => {
                    processed_pages += 1;
                    document.insert(page, report.index);
                }
                Some(PageOutcome::Failed(_)) => processed_pages += 1,
                None => cancelled_pages += 1,
            }
        }

        let succeeded_pages = document.page_count();
        let min_success = self.config.min_success_pages;
        debug!(processed_pages, succeeded_pages, cancelled_pages, "pages aggregated");

        let mut log = PageLog::new(self.sink);
        let (verdict, document) = if cancelled_pages > 0 {
            log.warning(format!(
                "Processing cancelled: {processed_pages} of {page_count} page(s) were processed; output discarded"
            ));
            (Verdict::Cancelled, OutputDocument::new())
        } else if succeeded_pages < min_success {
            log.error(format!(
                "Processing failed: {succeeded_pages} of {page_count} page(s) succeeded, at least {min_success} required; output discarded"
            ));
            (Verdict::Failed, OutputDocument::new())
        } else if succeeded_pages < page_count {
            log.warning(format!(
                "Processing completed with errors: {succeeded_pages} of {page_count} page(s) processed"
            ));
            (Verdict::CompletedWithErrors, document)
        } else {
            log.info(format!(
                "Processing completed: {succeeded_pages} of {page_count} page(s) processed"
            ));
            (Verdict::Success, document)
        };

        entries.extend(log.into_entries());
        info!(%verdict, succeeded_pages, page_count, "document run finished");

        ProcessingRun {
            document,
            state: ProcessingState {
                log: entries,
                processed_pages,
                succeeded_pages,
                verdict,
            },
        }
    }
}
