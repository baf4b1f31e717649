pub mod document;
pub mod job_runner;
pub mod log;
pub mod orchestrator;
pub mod page_processor;
pub mod state;
