//! # Gridcover Core
//!
//! Core types and traits for the gridcover coverage engine.
//!
//! This crate provides:
//! - `RasterGrid`: regular north-up pixel lattice derived from an extent
//! - `Raster<T>`: generic georeferenced band on top of `ndarray`
//! - `GeoTransform`: affine transformation for georeferencing
//! - `CRS`: coordinate reference system tag
//! - Vector layer types (weighted points, polygon features, class points)
//! - The `Algorithm` trait shared by the analysis stages

pub mod crs;
pub mod error;
pub mod raster;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement, RasterGrid};
pub use vector::{AttributeValue, ClassPoint, Feature, Layer, PolygonFeature, WeightedPoint};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement, RasterGrid};
    pub use crate::vector::{AttributeValue, ClassPoint, Feature, Layer, PolygonFeature, WeightedPoint};
    pub use crate::Algorithm;
}

/// Core trait for all analysis stages.
///
/// Stages are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
