//! Population layer preparation
//!
//! Census polygons are reduced to weighted points at their centroids before
//! density estimation.

use gridcover_core::{Error, Feature, Layer, Result, WeightedPoint};
use tracing::debug;

use crate::vector::centroid;

/// Reduce every feature to a point at its centroid, weighted by the numeric
/// attribute `field`.
///
/// Features whose value is null, non-numeric or NaN weigh 0, as do features
/// without the attribute. Features with an empty geometry are dropped.
///
/// # Errors
/// `InvalidParameter` if no feature of a non-empty layer carries `field`.
pub fn polygon_centroids(features: &Layer<Feature>, field: &str) -> Result<Layer<WeightedPoint>> {
    if !features.is_empty() && features.iter().all(|f| f.get_property(field).is_none()) {
        return Err(Error::invalid_parameter(
            "population_field",
            field,
            "no feature carries this attribute",
        ));
    }

    let points: Vec<WeightedPoint> = features
        .iter()
        .filter_map(|feature| {
            let weight = feature
                .get_property(field)
                .and_then(|v| v.as_f64())
                .filter(|w| !w.is_nan())
                .unwrap_or(0.0);
            centroid(&feature.geometry).map(|c| WeightedPoint::new(c.x(), c.y(), weight))
        })
        .collect();

    debug!(
        features = features.len(),
        points = points.len(),
        field,
        "population centroids"
    );
    Ok(features.with_features(points))
}
