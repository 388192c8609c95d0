//! Quadratic-kernel density raster
//!
//! Every weighted point spreads its weight over the pixel centers within the
//! kernel radius:
//!
//! ```text
//! w(c) = Σ weight(p) · (1 - (d(c, p) / r)²)    for d(c, p) <= r
//! ```
//!
//! The output is split into horizontal bands of rows, one per worker. Each
//! band only looks at the points whose kernel can reach it and writes into
//! its own slice of the output, so peak memory stays at one f64 per cell
//! whatever the worker count. Every cell sums its points in layer order;
//! permuting the layer changes the result only by floating point rounding.

use crate::maybe_rayon::*;
use gridcover_core::{Algorithm, Error, Layer, Raster, RasterGrid, Result, WeightedPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::index::{GridIndex, Neighbor, RadiusIndex};
use super::kdtree::KdTree;

/// Spatial index used to find the pixels reached by each point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// k-d tree over all pixel centers
    #[default]
    KdTree,
    /// Direct window arithmetic on the regular grid
    Grid,
}

/// Parameters for kernel density rasterization
#[derive(Debug, Clone)]
pub struct KernelDensityParams {
    /// Kernel radius in CRS units; points have no influence beyond it
    pub radius: f64,
    pub index: IndexKind,
}

impl Default for KernelDensityParams {
    fn default() -> Self {
        Self {
            radius: 25_000.0,
            index: IndexKind::default(),
        }
    }
}

/// Kernel density algorithm
#[derive(Debug, Clone, Default)]
pub struct KernelDensity;

impl Algorithm for KernelDensity {
    type Input = (Layer<WeightedPoint>, RasterGrid);
    type Output = Raster<f32>;
    type Params = KernelDensityParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "KernelDensity"
    }

    fn description(&self) -> &'static str {
        "Quadratic-kernel weighted point density on a regular grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (points, grid) = input;
        kernel_density(&points, &grid, &params)
    }
}

/// Rasterize weighted points with a bounded quadratic kernel.
///
/// Pixels no point reaches are 0. A point at exactly `radius` from a pixel
/// center contributes exactly 0. Points with zero weight are skipped before
/// any index query. The output carries the layer's CRS and nodata `0.0`.
///
/// # Errors
/// `InvalidParameter` for a non-positive radius or a negative/non-finite
/// weight or coordinate.
pub fn kernel_density(
    points: &Layer<WeightedPoint>,
    grid: &RasterGrid,
    params: &KernelDensityParams,
) -> Result<Raster<f32>> {
    let radius = params.radius;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::invalid_parameter("radius", radius, "must be > 0"));
    }

    for p in points.iter() {
        if !(p.weight.is_finite() && p.weight >= 0.0) {
            return Err(Error::invalid_parameter("weight", p.weight, "must be finite and >= 0"));
        }
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(Error::invalid_parameter(
                "point",
                format!("({}, {})", p.x, p.y),
                "coordinates must be finite",
            ));
        }
    }

    let active: Vec<WeightedPoint> = points.iter().filter(|p| p.weight > 0.0).copied().collect();
    debug!(
        points = points.len(),
        active = active.len(),
        cells = grid.len(),
        radius,
        "kernel density"
    );

    let heat = match params.index {
        IndexKind::KdTree => accumulate(&active, grid, radius, &KdTree::from_grid(grid)),
        IndexKind::Grid => accumulate(&active, grid, radius, &GridIndex::new(*grid)),
    };

    let data: Vec<f32> = heat.into_iter().map(|v| v as f32).collect();
    let mut output = Raster::from_grid_vec(grid, data)?;
    output.set_crs(points.crs.clone());
    output.set_nodata(Some(0.0));
    Ok(output)
}

/// Sum kernel contributions of `points` into a row-major f64 buffer
/// covering `grid`.
fn accumulate<I: RadiusIndex>(points: &[WeightedPoint], grid: &RasterGrid, radius: f64, index: &I) -> Vec<f64> {
    accumulate_in_bands(points, grid, radius, index, worker_count())
}

fn accumulate_in_bands<I: RadiusIndex>(
    points: &[WeightedPoint],
    grid: &RasterGrid,
    radius: f64,
    index: &I,
    band_count: usize,
) -> Vec<f64> {
    let (rows, cols) = grid.shape();
    if points.is_empty() || rows == 0 {
        return vec![0.0; rows * cols];
    }

    let radius_sq = radius * radius;
    let rows_per_band = rows.div_ceil(band_count.max(1));
    let bands: Vec<(usize, usize)> = (0..rows)
        .step_by(rows_per_band)
        .map(|start| (start, (start + rows_per_band).min(rows)))
        .collect();

    bands
        .into_par_iter()
        .flat_map(|(first_row, end_row)| {
            let first_cell = first_row * cols;
            let end_cell = end_row * cols;
            let mut heat = vec![0.0f64; end_cell - first_cell];

            // Centers of the band span [bottom, top]; one pixel of slack
            // keeps points whose disc grazes the outer rows.
            let top = grid.row_center_y(first_row) + radius + grid.pixel_size;
            let bottom = grid.row_center_y(end_row - 1) - radius - grid.pixel_size;

            let mut hits: Vec<Neighbor> = Vec::new();
            for p in points.iter().filter(|p| p.y >= bottom && p.y <= top) {
                hits.clear();
                index.within_radius(p.x, p.y, radius, &mut hits);
                for hit in hits.iter().filter(|h| h.index >= first_cell && h.index < end_cell) {
                    heat[hit.index - first_cell] += p.weight * (1.0 - hit.distance_sq / radius_sq);
                }
            }
            heat
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 100x100 grid with pixel centers on integer coordinates 0..=99
    fn integer_grid() -> RasterGrid {
        RasterGrid::new(-0.5, 99.5, 1.0, 100, 100).unwrap()
    }

    fn params(radius: f64) -> KernelDensityParams {
        KernelDensityParams {
            radius,
            ..Default::default()
        }
    }

    /// (row, col) of the pixel centered on integer (x, y)
    fn cell(x: usize, y: usize) -> (usize, usize) {
        (99 - y, x)
    }

    #[test]
    fn test_single_point_profile() {
        let grid = integer_grid();
        let points = Layer::untagged(vec![WeightedPoint::new(50.0, 50.0, 1000.0)]);
        let heat = kernel_density(&points, &grid, &params(25.0)).unwrap();

        let (r, c) = cell(50, 50);
        assert_relative_eq!(heat.get(r, c).unwrap(), 1000.0);

        // d = 25 sits on the boundary of the support
        let (r, c) = cell(75, 50);
        assert_eq!(heat.get(r, c).unwrap(), 0.0);

        // d = 26 is out of reach
        let (r, c) = cell(50, 76);
        assert_eq!(heat.get(r, c).unwrap(), 0.0);

        // d = 10 -> 1000 * (1 - 0.16)
        let (r, c) = cell(60, 50);
        assert_relative_eq!(heat.get(r, c).unwrap(), 840.0, epsilon = 1e-3);

        // d = 5 diagonally (3-4-5) -> 1000 * (1 - 0.04)
        let (r, c) = cell(53, 54);
        assert_relative_eq!(heat.get(r, c).unwrap(), 960.0, epsilon = 1e-3);
    }

    #[test]
    fn test_contributions_add_up() {
        let grid = integer_grid();
        let points = Layer::untagged(vec![
            WeightedPoint::new(40.0, 50.0, 100.0),
            WeightedPoint::new(60.0, 50.0, 300.0),
        ]);
        let heat = kernel_density(&points, &grid, &params(20.0)).unwrap();

        // Midpoint is at d = 10 from both
        let (r, c) = cell(50, 50);
        assert_relative_eq!(heat.get(r, c).unwrap(), 0.75 * 400.0, epsilon = 1e-3);
    }

    #[test]
    fn test_no_points_gives_zero_raster() {
        let grid = integer_grid();
        let heat = kernel_density(&Layer::untagged(vec![]), &grid, &params(10.0)).unwrap();
        assert_eq!(heat.shape(), (100, 100));
        assert_eq!(heat.count_nonzero(), 0);
        assert_eq!(heat.nodata(), Some(0.0));
    }

    #[test]
    fn test_band_split_matches_direct_sum() {
        // 23 rows do not divide evenly into any of the band counts below
        let grid = RasterGrid::new(0.0, 23.0, 1.0, 19, 23).unwrap();
        let points: Vec<WeightedPoint> = (0..30)
            .map(|i| WeightedPoint::new(((i * 7) % 19) as f64 + 0.3, ((i * 11) % 23) as f64 + 0.6, 1.0 + i as f64))
            .collect();
        let radius = 4.2;

        let mut expected = vec![0.0f64; grid.len()];
        for (cell, (x, y)) in grid.pixel_centers().enumerate() {
            for p in &points {
                let d_sq = p.dist_sq(x, y);
                if d_sq <= radius * radius {
                    expected[cell] += p.weight * (1.0 - d_sq / (radius * radius));
                }
            }
        }

        let index = KdTree::from_grid(&grid);
        for bands in [1, 2, 3, 7, 23, 40] {
            let heat = accumulate_in_bands(&points, &grid, radius, &index, bands);
            assert_eq!(heat.len(), grid.len());
            for (a, b) in heat.iter().zip(&expected) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_weight_points_contribute_nothing() {
        let grid = integer_grid();
        let points = Layer::untagged(vec![WeightedPoint::new(50.0, 50.0, 0.0)]);
        let heat = kernel_density(&points, &grid, &params(10.0)).unwrap();
        assert_eq!(heat.count_nonzero(), 0);
    }

    #[test]
    fn test_indexes_agree() {
        let grid = RasterGrid::new(0.0, 64.0, 1.5, 40, 42).unwrap();
        let points = Layer::untagged(
            (0..60)
                .map(|i| WeightedPoint::new(((i * 37) % 61) as f64, ((i * 17) % 63) as f64, (i % 7) as f64 * 10.0))
                .collect(),
        );

        let kd = kernel_density(&points, &grid, &params(7.5)).unwrap();
        let gi = kernel_density(
            &points,
            &grid,
            &KernelDensityParams {
                radius: 7.5,
                index: IndexKind::Grid,
            },
        )
        .unwrap();

        for (a, b) in kd.data().iter().zip(gi.data().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let grid = integer_grid();
        let ok = Layer::untagged(vec![WeightedPoint::new(1.0, 1.0, 1.0)]);
        assert!(matches!(
            kernel_density(&ok, &grid, &params(0.0)),
            Err(Error::InvalidParameter { name: "radius", .. })
        ));

        let negative = Layer::untagged(vec![WeightedPoint::new(1.0, 1.0, -1.0)]);
        assert!(matches!(
            kernel_density(&negative, &grid, &params(5.0)),
            Err(Error::InvalidParameter { name: "weight", .. })
        ));

        let nan = Layer::untagged(vec![WeightedPoint::new(f64::NAN, 1.0, 1.0)]);
        assert!(kernel_density(&nan, &grid, &params(5.0)).is_err());
    }

    #[test]
    fn test_algorithm_trait() {
        let grid = integer_grid();
        let points = Layer::untagged(vec![WeightedPoint::new(10.0, 10.0, 5.0)]);
        let heat = KernelDensity.execute((points, grid), params(3.0)).unwrap();
        let (r, c) = cell(10, 10);
        assert_relative_eq!(heat.get(r, c).unwrap(), 5.0);
    }
}
