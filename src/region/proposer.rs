// Region proposal: image -> candidate rectangles
//
// Detection models live outside this crate. The proposers here are
// model-free and deterministic.

use image::DynamicImage;
use serde::Deserialize;

use super::{NormalizedRect, RegionCandidate};

/// Finds candidate rectangular regions in a rasterized page.
///
/// Returning an empty list is a valid answer. An `Err` is treated by the
/// page pipeline as "no regions found" rather than a page failure.
pub trait RegionProposer: Send + Sync {
    fn propose(&self, image: &DynamicImage) -> crate::error::Result<Vec<RegionCandidate>>;
}

/// Returns the same candidate list for every image.
#[derive(Debug, Clone, Default)]
pub struct FixedProposer {
    candidates: Vec<RegionCandidate>,
}

impl FixedProposer {
    pub fn new(candidates: Vec<RegionCandidate>) -> Self {
        Self { candidates }
    }
}

impl RegionProposer for FixedProposer {
    fn propose(&self, _image: &DynamicImage) -> crate::error::Result<Vec<RegionCandidate>> {
        Ok(self.candidates.clone())
    }
}

/// Proposes a single region covering the whole page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullPageProposer;

impl RegionProposer for FullPageProposer {
    fn propose(&self, _image: &DynamicImage) -> crate::error::Result<Vec<RegionCandidate>> {
        Ok(vec![RegionCandidate::new(NormalizedRect::FULL)])
    }
}

/// Upper bound on `rows * cols` for [`GridProposer`].
///
/// Cells of a larger grid are far below any useful `min_region_area`.
pub const MAX_GRID_CELLS: usize = 4096;

/// Tiles the page into `rows` x `cols` equal cells, row-major from the top-left.
#[derive(Debug, Clone, Copy)]
pub struct GridProposer {
    rows: u32,
    cols: u32,
}

impl GridProposer {
    pub fn new(rows: u32, cols: u32) -> crate::error::Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(crate::error::InkSaverError::config(format!(
                "grid proposer needs at least one row and column, got {rows}x{cols}"
            )));
        }
        let cells = (rows as usize).checked_mul(cols as usize);
        if !cells.is_some_and(|n| n <= MAX_GRID_CELLS) {
            return Err(crate::error::InkSaverError::config(format!(
                "grid proposer {rows}x{cols} exceeds {MAX_GRID_CELLS} cells"
            )));
        }
        Ok(Self { rows, cols })
    }

    fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl RegionProposer for GridProposer {
    fn propose(&self, _image: &DynamicImage) -> crate::error::Result<Vec<RegionCandidate>> {
        let cell_w = 1.0 / f64::from(self.cols);
        let cell_h = 1.0 / f64::from(self.rows);
        let mut candidates = Vec::with_capacity(self.cell_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let rect = NormalizedRect::new(
                    f64::from(col) * cell_w,
                    f64::from(row) * cell_h,
                    cell_w,
                    cell_h,
                )
                .ok_or_else(|| crate::error::InkSaverError::proposal("non-finite grid cell"))?;
                candidates.push(RegionCandidate::new(rect));
            }
        }
        Ok(candidates)
    }
}

/// Proposer selection as written in `settings.yaml`.
///
/// ```yaml
/// proposer: full_page
/// # or
/// proposer:
///   grid: { rows: 4, cols: 4 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposerKind {
    FullPage,
    Grid { rows: u32, cols: u32 },
}

/// Rows and columns of the default grid. Each cell covers 0.0625 of the
/// page and must stay at or above `DEFAULT_MIN_REGION_AREA` (0.05), or
/// every cell is dropped as too small.
const DEFAULT_GRID_SIDE: u32 = 4;

impl Default for ProposerKind {
    fn default() -> Self {
        ProposerKind::Grid {
            rows: DEFAULT_GRID_SIDE,
            cols: DEFAULT_GRID_SIDE,
        }
    }
}

impl ProposerKind {
    /// Instantiate the configured proposer.
    pub fn build(&self) -> crate::error::Result<Box<dyn RegionProposer>> {
        Ok(match *self {
            ProposerKind::FullPage => Box::new(FullPageProposer),
            ProposerKind::Grid { rows, cols } => Box::new(GridProposer::new(rows, cols)?),
        })
    }
}
