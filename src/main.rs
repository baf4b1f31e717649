use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pdf_ink_saver::config::job::JobFile;
use pdf_ink_saver::config::merged::MergedConfig;
use pdf_ink_saver::config::{self};
use pdf_ink_saver::pipeline::job_runner::{JobConfig, run_all_jobs};
use pdf_ink_saver::pipeline::log::ConsoleLogSink;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_ink_saver <jobs.yaml>...");
        eprintln!("  Invert predominantly dark regions of PDF pages to save toner.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_ink_saver {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // The processing log is printed by ConsoleLogSink; tracing carries
    // diagnostics only unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut job_configs: Vec<JobConfig> = Vec::new();

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file = match JobFile::from_yaml(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            let pipeline = merged.pipeline();
            if let Err(e) = pipeline.validate() {
                eprintln!("ERROR: {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }

            job_configs.push(JobConfig {
                input_path: resolve_path(&job_dir, &job.input),
                output_path: resolve_path(&job_dir, &job.output),
                report_path: job.report.as_deref().map(|r| resolve_path(&job_dir, r)),
                pipeline,
                proposer: merged.proposer,
            });
        }
    }

    let results = run_all_jobs(&job_configs, Some(&ConsoleLogSink));

    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) if job_result.output_written => {
                eprintln!(
                    "OK: {} -> {} ({} pages, {})",
                    job_result.input_path.display(),
                    job_result.output_path.display(),
                    job_result.pages_written,
                    job_result.verdict
                );
            }
            Ok(job_result) => {
                eprintln!(
                    "ERROR: {} -> {}: {}",
                    job_result.input_path.display(),
                    job_result.output_path.display(),
                    job_result.verdict
                );
                has_error = true;
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {} -> {}: {e}",
                    job_configs[i].input_path.display(),
                    job_configs[i].output_path.display()
                );
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
