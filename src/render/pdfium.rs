// pdfium-render wrapper: page -> DynamicImage (in-memory only)

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

use super::PageRasterizer;
use crate::pipeline::document::SourcePage;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::InkSaverError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::InkSaverError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::InkSaverError::render("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))?;
    Ok(Pdfium::new(bindings))
}

/// Renders a PDF page to exactly `width_px` x `height_px` pixels.
///
/// # Arguments
/// * `pdf_path`   - Path to the PDF file
/// * `page_index` - 0-indexed page number
///
/// # Errors
/// Returns `InkSaverError::RenderError` if the library cannot be loaded, the
/// file cannot be opened, the page index is out of range, or rendering fails.
pub fn render_page(
    pdf_path: &Path,
    page_index: usize,
    width_px: u32,
    height_px: u32,
) -> crate::error::Result<DynamicImage> {
    if width_px == 0 || height_px == 0 {
        return Err(crate::error::InkSaverError::render(format!(
            "target size must be non-zero, got {width_px}x{height_px}"
        )));
    }
    let pdfium = create_pdfium()?;
    let document = pdfium.load_pdf_from_file(pdf_path, None)?;

    let page_index_u16 = u16::try_from(page_index)
        .map_err(|_| crate::error::InkSaverError::render("page index exceeds u16 range"))?;
    let page = document.pages().get(page_index_u16)?;

    let to_i32 = |v: u32| {
        i32::try_from(v)
            .map_err(|_| crate::error::InkSaverError::render("target size exceeds i32 range"))
    };
    let config = PdfRenderConfig::new()
        .set_target_width(to_i32(width_px)?)
        .set_target_height(to_i32(height_px)?);

    let bitmap = page.render_with_config(&config)?;
    Ok(bitmap.as_image())
}

/// Rasterizes pages of one PDF file on disk.
///
/// pdfium is not re-entrant, so concurrent page workers take turns.
pub struct PdfiumRasterizer {
    pdf_path: PathBuf,
    lock: Mutex<()>,
}

impl PdfiumRasterizer {
    pub fn new(pdf_path: impl Into<PathBuf>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        page: &SourcePage,
        target: (u32, u32),
    ) -> crate::error::Result<DynamicImage> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| crate::error::InkSaverError::render("pdfium lock poisoned"))?;
        debug!(page = page.index + 1, width = target.0, height = target.1, "rendering page");
        render_page(&self.pdf_path, page.index, target.0, target.1)
    }
}
