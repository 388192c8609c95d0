//! Coverage summary

use gridcover_core::{Raster, Result};
use serde::Serialize;

use super::shared_grid;

/// How many dense cells stay out of reach of every facility
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageStats {
    /// Cells above the density threshold inside the boundary
    pub dense_cells: usize,
    /// Dense cells beyond every facility buffer
    pub unserved_cells: usize,
    /// `1 - unserved / dense`; `None` when there are no dense cells
    pub covered_fraction: Option<f64>,
    /// Area of one cell in CRS units squared
    pub cell_area: f64,
}

impl CoverageStats {
    /// Area of all dense cells
    pub fn dense_area(&self) -> f64 {
        self.dense_cells as f64 * self.cell_area
    }

    /// Area of all unserved cells
    pub fn unserved_area(&self) -> f64 {
        self.unserved_cells as f64 * self.cell_area
    }
}

/// Summarize a dense-cell band against an unserved-cell band.
///
/// Both bands are binary and must share a grid.
pub fn coverage_stats(dense: &Raster<u8>, unserved: &Raster<u8>) -> Result<CoverageStats> {
    let grid = shared_grid(dense, unserved)?;
    let dense_cells = dense.count_nonzero();
    let unserved_cells = unserved.count_nonzero();

    let covered_fraction = (dense_cells > 0).then(|| 1.0 - unserved_cells as f64 / dense_cells as f64);

    Ok(CoverageStats {
        dense_cells,
        unserved_cells,
        covered_fraction,
        cell_area: grid.cell_area(),
    })
}
