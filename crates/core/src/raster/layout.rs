//! Regular pixel lattice shared by every band of one analysis run

use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use serde::{Deserialize, Serialize};

/// A north-up grid of square pixels in a planar metric CRS.
///
/// `origin_y` is the *top* edge: rows grow downward, so the center of pixel
/// `(row, col)` is
///
/// ```text
/// x = origin_x + (col + 0.5) * pixel_size
/// y = origin_y - (row + 0.5) * pixel_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_size: f64,
    pub width: usize,
    pub height: usize,
}

impl RasterGrid {
    /// Create a grid from its raw parameters.
    pub fn new(origin_x: f64, origin_y: f64, pixel_size: f64, width: usize, height: usize) -> Result<Self> {
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return Err(Error::InvalidExtent(format!(
                "pixel size must be positive, got {}",
                pixel_size
            )));
        }
        if !(origin_x.is_finite() && origin_y.is_finite()) {
            return Err(Error::InvalidExtent("origin must be finite".into()));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            origin_x,
            origin_y,
            pixel_size,
            width,
            height,
        })
    }

    /// Derive a grid covering `bounds = (min_x, min_y, max_x, max_y)` expanded
    /// by `margin` on every side.
    ///
    /// Width and height are rounded up, so any fractional remainder extends
    /// the grid past the expanded box to the east and south; the box itself
    /// is always covered.
    pub fn from_extent(bounds: (f64, f64, f64, f64), pixel_size: f64, margin: f64) -> Result<Self> {
        let (min_x, min_y, max_x, max_y) = bounds;

        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidExtent(format!(
                "bounds must be finite, got ({}, {}, {}, {})",
                min_x, min_y, max_x, max_y
            )));
        }
        if max_x <= min_x || max_y <= min_y {
            return Err(Error::InvalidExtent(format!(
                "degenerate bounding box ({}, {}, {}, {})",
                min_x, min_y, max_x, max_y
            )));
        }
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return Err(Error::InvalidExtent(format!(
                "pixel size must be positive, got {}",
                pixel_size
            )));
        }
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(Error::invalid_parameter("margin", margin, "must be >= 0"));
        }

        let left = min_x - margin;
        let top = max_y + margin;
        let width = ((max_x + margin - left) / pixel_size).ceil() as usize;
        let height = ((top - (min_y - margin)) / pixel_size).ceil() as usize;

        Self::new(left, top, pixel_size, width.max(1), height.max(1))
    }

    /// Rebuild a grid from a north-up transform and a band shape.
    pub fn from_transform(transform: &GeoTransform, rows: usize, cols: usize) -> Result<Self> {
        if !transform.is_north_up() || (transform.pixel_width + transform.pixel_height).abs() > 1e-9 * transform.pixel_width.abs() {
            return Err(Error::InvalidExtent(
                "transform must be north-up with square pixels".into(),
            ));
        }
        Self::new(transform.origin_x, transform.origin_y, transform.pixel_width, cols, rows)
    }

    /// Affine transform equivalent to this grid
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::new(self.origin_x, self.origin_y, self.pixel_size, -self.pixel_size)
    }

    /// Dimensions as (rows, cols), matching `Raster::shape`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Area covered by one pixel
    pub fn cell_area(&self) -> f64 {
        self.pixel_size * self.pixel_size
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.origin_x,
            self.origin_y - self.height as f64 * self.pixel_size,
            self.origin_x + self.width as f64 * self.pixel_size,
            self.origin_y,
        )
    }

    /// Center of pixel `(row, col)`
    #[inline]
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_size,
            self.origin_y - (row as f64 + 0.5) * self.pixel_size,
        )
    }

    /// Y coordinate of the centers of row `row`
    #[inline]
    pub fn row_center_y(&self, row: usize) -> f64 {
        self.origin_y - (row as f64 + 0.5) * self.pixel_size
    }

    /// X coordinate of the centers of column `col`
    #[inline]
    pub fn col_center_x(&self, col: usize) -> f64 {
        self.origin_x + (col as f64 + 0.5) * self.pixel_size
    }

    /// All pixel centers in row-major order (row 0 = top)
    pub fn pixel_centers(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| self.pixel_center(row, col)))
    }

    /// Fractional (col, row) of a geographic coordinate; integer parts index
    /// the containing pixel, `.5` lands on its center.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_size,
            (self.origin_y - y) / self.pixel_size,
        )
    }

    /// Flat row-major index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether `other` describes the same lattice: equal dimensions, and
    /// origin and pixel size equal within `1e-9` pixels.
    pub fn is_aligned_with(&self, other: &RasterGrid) -> bool {
        let tol = 1e-9 * self.pixel_size.abs().max(other.pixel_size.abs());
        self.width == other.width
            && self.height == other.height
            && (self.pixel_size - other.pixel_size).abs() <= tol
            && (self.origin_x - other.origin_x).abs() <= tol
            && (self.origin_y - other.origin_y).abs() <= tol
    }

    /// Fail with [`Error::ShapeMismatch`] unless `other` is aligned with `self`.
    pub fn ensure_aligned(&self, other: &RasterGrid) -> Result<()> {
        if self.is_aligned_with(other) {
            return Ok(());
        }
        Err(Error::ShapeMismatch {
            ew: self.width,
            eh: self.height,
            ex: self.origin_x,
            ey: self.origin_y,
            ep: self.pixel_size,
            aw: other.width,
            ah: other.height,
            ax: other.origin_x,
            ay: other.origin_y,
            ap: other.pixel_size,
        })
    }
}
