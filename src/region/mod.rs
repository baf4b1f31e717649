// Region geometry: unit-square rectangles and their pixel-space counterparts

pub mod proposer;

use serde::Serialize;

/// A rectangle in unit coordinates, independent of any image resolution.
///
/// The origin is the top-left corner of the page and `y` grows downwards,
/// matching raster row order. Every constructed value satisfies
/// `0 <= x, y` and `x + width <= 1`, `y + height <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl NormalizedRect {
    /// The whole unit square.
    pub const FULL: NormalizedRect = NormalizedRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Build a rectangle, clamping it into the unit square.
    ///
    /// Returns `None` if any component is not finite. Negative sizes clamp
    /// to zero, which yields a zero-area rectangle rather than an error.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return None;
        }
        let x0 = x.clamp(0.0, 1.0);
        let y0 = y.clamp(0.0, 1.0);
        let x1 = (x + width.max(0.0)).clamp(x0, 1.0);
        let y1 = (y + height.max(0.0)).clamp(y0, 1.0);
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Convert a rectangle whose origin is the bottom-left corner (y grows
    /// upwards, as vision frameworks report boxes) into top-left convention.
    pub fn from_bottom_left(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        Self::new(x, 1.0 - y - height, width, height)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Area as a fraction of the unit square.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Scale to an image of `image_width` x `image_height` pixels.
    ///
    /// Edges are rounded to the nearest pixel boundary and the result is
    /// clipped to the image bounds.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelRect {
        let w = f64::from(image_width);
        let h = f64::from(image_height);
        let x0 = (self.x * w).round() as u32;
        let y0 = (self.y * h).round() as u32;
        let x1 = ((self.x + self.width) * w).round() as u32;
        let y1 = ((self.y + self.height) * h).round() as u32;
        PixelRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
        .clip_to(image_width, image_height)
    }
}

/// A rectangle in the pixel grid of a concrete image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count, widened so large pages cannot overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Intersection with an image of `width` x `height` pixels.
    ///
    /// A rectangle that lies completely outside yields an empty rectangle.
    pub fn clip_to(&self, width: u32, height: u32) -> PixelRect {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);
        PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && u64::from(px) < u64::from(self.x) + u64::from(self.width)
            && u64::from(py) < u64::from(self.y) + u64::from(self.height)
    }
}

/// A candidate region reported by a [`proposer::RegionProposer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionCandidate {
    pub rect: NormalizedRect,
}

impl RegionCandidate {
    pub fn new(rect: NormalizedRect) -> Self {
        Self { rect }
    }

    /// Shorthand for building a candidate from raw unit coordinates.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        NormalizedRect::new(x, y, width, height).map(Self::new)
    }

    pub fn area(&self) -> f64 {
        self.rect.area()
    }
}
