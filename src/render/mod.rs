#[cfg(feature = "pdfium")]
pub mod pdfium;

use image::DynamicImage;

use crate::pipeline::document::SourcePage;

/// Renders an input page into a pixel buffer of the requested size.
pub trait PageRasterizer: Send + Sync {
    /// `target` is `(width_px, height_px)`.
    fn rasterize(&self, page: &SourcePage, target: (u32, u32))
    -> crate::error::Result<DynamicImage>;
}
