//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// Grids built by the engine are always north-up (`pixel_height < 0`, no
/// rotation). Rotated transforms only arrive from the raster I/O layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (negative for north-up bands)
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a north-up transform with no rotation
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    #[inline]
    fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Geographic coordinates of the center of pixel (col, row)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Geographic coordinates of the top-left corner of pixel (col, row)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64, row as f64)
    }

    /// Fractional (col, row) of a geographic coordinate.
    ///
    /// Returns NaN for a singular transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det.abs() < 1e-10 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        (
            (self.pixel_height * dx - self.row_rotation * dy) / det,
            (-self.col_rotation * dx + self.pixel_width * dy) / det,
        )
    }

    /// Cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Whether this is a north-up transform (no rotation, y decreasing by row)
    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10 && self.col_rotation.abs() < 1e-10 && self.pixel_height < 0.0
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a `width x height` band
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let corners = [
            self.pixel_to_geo_corner(0, 0),
            self.pixel_to_geo_corner(width, 0),
            self.pixel_to_geo_corner(0, height),
            self.pixel_to_geo_corner(width, height),
        ];

        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_center_roundtrip() {
        let gt = GeoTransform::new(-5000.0, 12000.0, 2000.0, -2000.0);

        let (x, y) = gt.pixel_to_geo(3, 4);
        assert_relative_eq!(x, 2000.0);
        assert_relative_eq!(y, 3000.0);

        let (col, row) = gt.geo_to_pixel(x, y);
        assert_relative_eq!(col, 3.5, epsilon = 1e-10);
        assert_relative_eq!(row, 4.5, epsilon = 1e-10);
    }

    #[test]
    fn test_north_up() {
        assert!(GeoTransform::new(10.0, 50.0, 2.0, -2.0).is_north_up());
        assert!(!GeoTransform::new(10.0, 50.0, 2.0, 2.0).is_north_up());
        let rotated = GeoTransform {
            row_rotation: 0.5,
            ..GeoTransform::new(10.0, 50.0, 2.0, -2.0)
        };
        assert!(!rotated.is_north_up());
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 50);

        assert_relative_eq!(min_x, 0.0);
        assert_relative_eq!(min_y, 50.0);
        assert_relative_eq!(max_x, 100.0);
        assert_relative_eq!(max_y, 100.0);
    }
}
