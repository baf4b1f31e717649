// Document abstractions: input page handles and the assembled output

use std::collections::BTreeMap;

use image::DynamicImage;

/// A page of the input document, as handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePage {
    /// 0-based page index in the input document.
    pub index: usize,
    /// Native page width in PDF points.
    pub width_pts: f64,
    /// Native page height in PDF points.
    pub height_pts: f64,
}

impl SourcePage {
    pub fn has_valid_dimensions(&self) -> bool {
        self.width_pts.is_finite()
            && self.height_pts.is_finite()
            && self.width_pts > 0.0
            && self.height_pts > 0.0
    }
}

/// Read access to the pages of an input document.
pub trait SourceDocument: Sync {
    fn page_count(&self) -> usize;

    /// Returns `None` if the page cannot be read.
    fn page(&self, index: usize) -> Option<SourcePage>;
}

/// A document described only by its page sizes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    pages: Vec<SourcePage>,
}

impl InMemoryDocument {
    /// Build from `(width_pts, height_pts)` pairs in page order.
    pub fn new(sizes: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let pages = sizes
            .into_iter()
            .enumerate()
            .map(|(index, (width_pts, height_pts))| SourcePage {
                index,
                width_pts,
                height_pts,
            })
            .collect();
        Self { pages }
    }

    /// `count` pages of identical size.
    pub fn uniform(count: usize, width_pts: f64, height_pts: f64) -> Self {
        Self::new(std::iter::repeat_n((width_pts, height_pts), count))
    }
}

impl SourceDocument for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Option<SourcePage> {
        self.pages.get(index).copied()
    }
}

/// A processed page: the final raster plus the native size it is drawn at.
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub source_index: usize,
    pub image: DynamicImage,
    pub width_pts: f64,
    pub height_pts: f64,
}

/// Output document, built fresh for each run.
///
/// Pages are keyed by their input index, so iteration always follows the
/// input order. Indices of failed pages are simply absent.
#[derive(Debug, Clone, Default)]
pub struct OutputDocument {
    pages: BTreeMap<usize, RasterPage>,
}

impl OutputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `page` at input position `index`, replacing any page already there.
    pub fn insert(&mut self, page: RasterPage, index: usize) {
        self.pages.insert(index, page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in input order.
    pub fn pages(&self) -> impl Iterator<Item = &RasterPage> {
        self.pages.values()
    }

    /// Input indices of the pages present, ascending.
    pub fn source_indices(&self) -> Vec<usize> {
        self.pages.keys().copied().collect()
    }
}
