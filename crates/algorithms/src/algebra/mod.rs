//! Raster algebra on aligned bands
//!
//! Element-wise operations between rasters that share a grid: masking by a
//! boundary polygon, multiplication, and thresholding to a binary band.
//! Every binary operation checks grid alignment and CRS tags first.

mod stats;

pub use stats::{coverage_stats, CoverageStats};

use crate::maybe_rayon::*;
use crate::rasterize::rasterize_mask;
use geo::MultiPolygon;
use gridcover_core::crs::ensure_compatible;
use gridcover_core::{Error, Raster, RasterElement, RasterGrid, Result};
use ndarray::{Array2, Zip};

/// Grid shared by `a` and `b`, or the reason they cannot be combined.
fn shared_grid<A: RasterElement, B: RasterElement>(a: &Raster<A>, b: &Raster<B>) -> Result<RasterGrid> {
    let grid_a = a.grid()?;
    let grid_b = b.grid()?;
    grid_a.ensure_aligned(&grid_b)?;
    ensure_compatible(a.crs(), b.crs())?;
    Ok(grid_a)
}

/// Multiply two aligned bands cell by cell.
///
/// The product is computed in `f64` and written back in `A`'s type, so a
/// `f32` density band can be scaled by a `u8` mask. The result keeps `a`'s
/// nodata value.
///
/// # Errors
/// `ShapeMismatch` if the grids differ, `CrsMismatch` if both bands carry
/// non-equivalent CRS tags.
pub fn combine<A, B>(a: &Raster<A>, b: &Raster<B>) -> Result<Raster<A>>
where
    A: RasterElement,
    B: RasterElement,
{
    shared_grid(a, b)?;
    let (rows, cols) = a.shape();

    let data: Vec<A> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![A::zero(); cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                // SAFETY: row < rows and col < cols, and both bands share the shape
                let (va, vb) = unsafe { (a.get_unchecked(row, col), b.get_unchecked(row, col)) };
                let product = va.to_f64().unwrap_or(f64::NAN) * vb.to_f64().unwrap_or(f64::NAN);
                *out = A::from_f64_lossy(product);
            }
            row_data
        })
        .collect();

    let mut output = a.with_same_meta::<A>();
    output.set_nodata(a.nodata());
    *output.data_mut() = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}

/// Binary band: 1 where `band > t`, 0 elsewhere (NaN included).
///
/// # Errors
/// `InvalidParameter` if `t` is NaN.
pub fn threshold<T: RasterElement>(band: &Raster<T>, t: f64) -> Result<Raster<u8>> {
    if t.is_nan() {
        return Err(Error::invalid_parameter("threshold", t, "must be a number"));
    }

    let mut output = band.map(|v| v.to_f64().is_some_and(|x| x > t) as u8);
    output.set_nodata(Some(0));
    Ok(output)
}

/// Zero every cell whose center lies outside `boundary`.
///
/// The boundary is rasterized with the same center-in-polygon rule as the
/// proximity mask. The output uses 0 as nodata.
pub fn clip_by_mask<T: RasterElement>(band: &Raster<T>, boundary: &MultiPolygon<f64>) -> Result<Raster<T>> {
    let grid = band.grid()?;
    let mask = rasterize_mask(boundary, &grid)?;

    let mut output = band.with_same_meta::<T>();
    Zip::from(output.data_mut())
        .and(band.data())
        .and(mask.data())
        .for_each(|out, &value, &inside| {
            if inside == 1 {
                *out = value;
            }
        });
    output.set_nodata(Some(T::zero()));
    Ok(output)
}
