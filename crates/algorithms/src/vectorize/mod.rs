//! Raster-to-vector extraction of underserved areas
//!
//! A binary band goes through three steps:
//!
//! 1. **Regions**: 4-connected groups of equal non-zero pixels become
//!    polygons whose boundaries follow pixel edges, holes included.
//! 2. **Erosion**: each polygon is shrunk by a negative buffer; polygons
//!    that disappear are dropped, which filters out slivers and small
//!    patches.
//! 3. **Centroids**: each surviving polygon collapses to its centroid,
//!    keeping the pixel value as class.

mod label;
mod trace;

use crate::maybe_rayon::*;
use crate::vector::offset_polygon;
use geo::{Area, Centroid};
use gridcover_core::raster::Neighborhood;
use gridcover_core::{Algorithm, ClassPoint, Error, Layer, PolygonFeature, Raster, Result};
use tracing::debug;

use label::label_regions;
use trace::trace_region;

/// Parameters for underserved-point extraction
#[derive(Debug, Clone)]
pub struct VectorizeParams {
    /// Negative buffer applied to every region, in CRS units; 0 disables it
    pub erosion: f64,
}

impl Default for VectorizeParams {
    fn default() -> Self {
        Self { erosion: 10_000.0 }
    }
}

/// Region extraction, erosion and centroid reduction as one stage
#[derive(Debug, Clone, Default)]
pub struct VectorExtractor;

impl Algorithm for VectorExtractor {
    type Input = Raster<u8>;
    type Output = Layer<ClassPoint>;
    type Params = VectorizeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "VectorExtractor"
    }

    fn description(&self) -> &'static str {
        "Polygonize a binary band, erode the regions and keep their centroids"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        extract_underserved_points(&input, &params)
    }
}

/// Polygonize every 4-connected region of equal non-zero value.
///
/// Zero and nodata cells are background. Regions that touch only at a
/// corner stay separate. The layer inherits the band's CRS.
pub fn extract_regions(band: &Raster<u8>) -> Result<Layer<PolygonFeature>> {
    let grid = band.grid()?;
    let labeling = label_regions(band, Neighborhood::Rook);

    let indexed: Vec<(u32, &label::Region)> = labeling
        .regions
        .iter()
        .enumerate()
        .map(|(k, region)| (k as u32 + 1, region))
        .collect();

    let features = indexed
        .into_par_iter()
        .map(|(id, region)| {
            Ok(PolygonFeature {
                geometry: trace_region(&labeling, region, id, &grid)?,
                class: i64::from(region.class),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(regions = features.len(), "regions extracted");
    Ok(Layer::new(features, band.crs().cloned()))
}

/// Shrink every region by `erosion` and drop those that vanish.
///
/// # Errors
/// `InvalidParameter` if `erosion` is negative or not finite.
pub fn erode_regions(regions: &Layer<PolygonFeature>, erosion: f64) -> Result<Layer<PolygonFeature>> {
    if !(erosion.is_finite() && erosion >= 0.0) {
        return Err(Error::invalid_parameter("erosion", erosion, "must be finite and >= 0"));
    }
    if erosion == 0.0 {
        return Ok(regions.clone());
    }

    let kept: Vec<PolygonFeature> = regions
        .features
        .clone()
        .into_par_iter()
        .filter_map(|feature| {
            let geometry = offset_polygon(&feature.geometry, -erosion);
            (!geometry.0.is_empty() && geometry.unsigned_area() > 0.0).then_some(PolygonFeature {
                geometry,
                class: feature.class,
            })
        })
        .collect();

    debug!(before = regions.len(), after = kept.len(), erosion, "regions eroded");
    Ok(regions.with_features(kept))
}

/// Centroid of every region, carrying its class.
pub fn region_centroids(regions: &Layer<PolygonFeature>) -> Layer<ClassPoint> {
    let points = regions
        .iter()
        .filter_map(|feature| {
            feature.geometry.centroid().map(|point| ClassPoint {
                point,
                class: feature.class,
            })
        })
        .collect();
    regions.with_features(points)
}

/// Regions, erosion and centroids in one call.
pub fn extract_underserved_points(band: &Raster<u8>, params: &VectorizeParams) -> Result<Layer<ClassPoint>> {
    let regions = extract_regions(band)?;
    let eroded = erode_regions(&regions, params.erosion)?;
    Ok(region_centroids(&eroded))
}
