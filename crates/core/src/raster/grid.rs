//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement, RasterGrid};
use ndarray::{Array2, ArrayView2};

/// A georeferenced single-band raster.
///
/// `Raster<T>` stores values of type `T` in row-major order (row 0 = top)
/// together with the transform, CRS tag and nodata sentinel of the band.
/// Stages of the coverage analysis never mutate a band they receive; each
/// one returns a new `Raster`.
///
/// # Example
///
/// ```ignore
/// use gridcover_core::{Raster, RasterGrid};
///
/// let grid = RasterGrid::from_extent((0.0, 0.0, 1000.0, 1000.0), 100.0, 0.0)?;
/// let mask: Raster<u8> = Raster::from_grid(&grid, 1);
/// assert_eq!(mask.shape(), (10, 10));
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Affine transformation
    transform: GeoTransform,
    /// Coordinate reference system
    crs: Option<CRS>,
    /// No-data value
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster covering `grid`, every cell set to `value`
    pub fn from_grid(grid: &RasterGrid, value: T) -> Self {
        let mut raster = Self::filled(grid.height, grid.width, value);
        raster.transform = grid.transform();
        raster
    }

    /// Create a raster covering `grid` from row-major values
    pub fn from_grid_vec(grid: &RasterGrid, data: Vec<T>) -> Result<Self> {
        let mut raster = Self::from_vec(data, grid.height, grid.width)?;
        raster.transform = grid.transform();
        Ok(raster)
    }

    /// Create a raster from existing data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Create a raster of another element type with the same transform and
    /// CRS, all cells zero and no nodata set
    pub fn with_same_meta<U: RasterElement>(&self) -> Raster<U> {
        Raster {
            data: Array2::zeros(self.data.dim()),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        }
    }

    /// Build a new raster with the same metadata by mapping every cell
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        U: RasterElement,
        F: Fn(T) -> U,
    {
        Raster {
            data: self.data.mapv(f),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The pixel lattice of this band
    pub fn grid(&self) -> Result<RasterGrid> {
        RasterGrid::from_transform(&self.transform, self.rows(), self.cols())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Set the geotransform
    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    /// Get the CRS
    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    /// Set the CRS
    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Center of the pixel at (row, col)
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    // Value checks

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Number of cells different from zero
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| !v.is_zero()).count()
    }

    /// Calculate basic statistics (min, max, sum, mean) over valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            sum,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub sum: f64,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_from_grid() {
        let grid = RasterGrid::new(10.0, 50.0, 5.0, 8, 4).unwrap();
        let raster: Raster<u8> = Raster::from_grid(&grid, 1);
        assert_eq!(raster.shape(), (4, 8));
        assert_eq!(raster.count_nonzero(), 32);
        assert!(raster.grid().unwrap().is_aligned_with(&grid));
        assert_eq!(raster.pixel_center(1, 2), grid.pixel_center(1, 2));
    }

    #[test]
    fn test_from_grid_vec_rejects_wrong_length() {
        let grid = RasterGrid::new(0.0, 2.0, 1.0, 2, 2).unwrap();
        assert!(matches!(
            Raster::<f32>::from_grid_vec(&grid, vec![0.0; 3]),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<f32> = Raster::new(10, 10);
        raster.set(5, 5, 42.0).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42.0);
        assert!(raster.get(10, 0).is_err());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let grid = RasterGrid::new(0.0, 3.0, 1.0, 3, 3).unwrap();
        let mut raster: Raster<f32> = Raster::from_grid(&grid, 2.5);
        raster.set_crs(Some(CRS::web_mercator()));
        let mapped: Raster<u8> = raster.map(|v| (v > 2.0) as u8);
        assert_eq!(mapped.count_nonzero(), 9);
        assert_eq!(mapped.crs(), Some(&CRS::web_mercator()));
        assert_eq!(mapped.transform(), raster.transform());
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<f32> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as f32).unwrap();
            }
        }

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(0.0));
        assert_eq!(stats.max, Some(99.0));
        assert_eq!(stats.sum, 4950.0);
        assert_eq!(stats.valid_count, 100);
    }
}
