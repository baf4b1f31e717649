use thiserror::Error;

#[derive(Debug, Error)]
pub enum InkSaverError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("PDF read error: {0}")]
    PdfReadError(String),

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Region proposal error: {0}")]
    ProposalError(String),

    #[error("Composite error: {0}")]
    CompositeError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`InkSaverError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl InkSaverError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a PDF read error.
    pdf_read => PdfReadError,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
    /// Create a render error.
    render => RenderError,
    /// Create a region proposal error.
    proposal => ProposalError,
    /// Create a composite error.
    composite => CompositeError,
    /// Create a pipeline error.
    pipeline => PipelineError,
}

impl From<lopdf::Error> for InkSaverError {
    fn from(e: lopdf::Error) -> Self {
        Self::PdfReadError(e.to_string())
    }
}

impl From<serde_json::Error> for InkSaverError {
    fn from(e: serde_json::Error) -> Self {
        Self::PipelineError(e.to_string())
    }
}

impl From<serde_yml::Error> for InkSaverError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "pdfium")]
impl From<pdfium_render::prelude::PdfiumError> for InkSaverError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<image::ImageError> for InkSaverError {
    fn from(e: image::ImageError) -> Self {
        Self::CompositeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InkSaverError>;
