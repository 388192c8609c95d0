//! # Gridcover Algorithms
//!
//! Analysis stages of the gridcover coverage engine.
//!
//! ## Stages
//!
//! - **density**: quadratic-kernel point density over a regular grid,
//!   backed by a k-d tree or a lattice index
//! - **proximity**: 0/1 mask of cells within reach of a facility
//! - **algebra**: clip, multiply and threshold aligned bands; coverage summary
//! - **vectorize**: polygonize binary bands, erode regions, keep centroids
//! - **population**: census polygons to weighted centroids
//! - **pipeline**: the full run driven by `CoverageConfig`
//!
//! Geometry helpers shared by the stages live in **vector** (buffer, union,
//! centroid, selection) and **rasterize** (center-in-polygon burning).

mod maybe_rayon;

pub mod algebra;
pub mod density;
pub mod pipeline;
pub mod population;
pub mod proximity;
pub mod rasterize;
pub mod vector;
pub mod vectorize;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::algebra::{clip_by_mask, combine, coverage_stats, threshold, CoverageStats};
    pub use crate::density::{kernel_density, IndexKind, KdTree, KernelDensity, KernelDensityParams};
    pub use crate::pipeline::{run_coverage, CoverageConfig, CoverageOutputs};
    pub use crate::population::polygon_centroids;
    pub use crate::proximity::{proximity_mask, Proximity};
    pub use crate::rasterize::{rasterize_mask, rasterize_polygons};
    pub use crate::vector::{buffer_points, select_within, union_all, BufferParams};
    pub use crate::vectorize::{
        erode_regions, extract_regions, extract_underserved_points, region_centroids, VectorExtractor,
        VectorizeParams,
    };
    pub use gridcover_core::prelude::*;
}
