//! Proximity mask around facilities
//!
//! Pixels within the buffer distance of any facility are 0 ("covered"),
//! all others 1 ("far"). Downstream the mask multiplies the density band,
//! so covered cells drop out of the underserved surface.

use geo::Point;
use gridcover_core::{Algorithm, Error, Layer, Raster, RasterGrid, Result};
use tracing::debug;

use crate::rasterize::rasterize_polygons;
use crate::vector::{buffer_points, union_all, BufferParams};

/// Mask value for cells within reach of a facility
pub const NEAR: u8 = 0;
/// Mask value for cells beyond every facility buffer
pub const FAR: u8 = 1;
/// Nodata sentinel written on proximity masks
pub const PROXIMITY_NODATA: u8 = 255;

/// Proximity mask algorithm
#[derive(Debug, Clone, Default)]
pub struct Proximity;

impl Algorithm for Proximity {
    type Input = (Layer<Point<f64>>, RasterGrid);
    type Output = Raster<u8>;
    type Params = BufferParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Proximity"
    }

    fn description(&self) -> &'static str {
        "Binary mask: 0 within the buffer distance of any facility, 1 elsewhere"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (facilities, grid) = input;
        proximity_mask(&facilities, &grid, &params)
    }
}

/// Rasterize the union of facility buffers as a 0 (near) / 1 (far) mask.
///
/// An empty facility layer yields a mask of all 1s.
///
/// # Errors
/// `EmptyInput` if the buffer distance is 0, `InvalidParameter` if it is
/// negative or not finite.
pub fn proximity_mask(facilities: &Layer<Point<f64>>, grid: &RasterGrid, params: &BufferParams) -> Result<Raster<u8>> {
    let buffers = buffer_points(&facilities.features, params)?;

    let mut mask = if buffers.is_empty() {
        Raster::from_grid(grid, FAR)
    } else {
        let coverage = union_all(buffers);
        debug!(
            facilities = facilities.len(),
            parts = coverage.0.len(),
            distance = params.distance,
            "facility buffers merged"
        );
        rasterize_polygons(&coverage, grid, FAR, NEAR)?
    };

    mask.set_crs(facilities.crs.clone());
    mask.set_nodata(Some(PROXIMITY_NODATA));
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> RasterGrid {
        RasterGrid::new(0.0, 100.0, 1.0, 100, 100).unwrap()
    }

    fn params(distance: f64) -> BufferParams {
        BufferParams {
            distance,
            segments: 64,
        }
    }

    fn near_count(mask: &Raster<u8>) -> usize {
        mask.data().iter().filter(|&&v| v == NEAR).count()
    }

    #[test]
    fn test_empty_layer_is_all_far() {
        let mask = proximity_mask(&Layer::untagged(vec![]), &grid(), &params(10.0)).unwrap();
        assert_eq!(mask.shape(), (100, 100));
        assert!(mask.data().iter().all(|&v| v == FAR));
        assert_eq!(mask.nodata(), Some(PROXIMITY_NODATA));
    }

    #[test]
    fn test_single_facility_disc() {
        let layer = Layer::untagged(vec![Point::new(50.0, 50.0)]);
        let mask = proximity_mask(&layer, &grid(), &params(10.0)).unwrap();

        // Center (row 49/50, col 49/50) is covered, far corner is not
        assert_eq!(mask.get(49, 49).unwrap(), NEAR);
        assert_eq!(mask.get(0, 0).unwrap(), FAR);

        // ~ pi * r^2 pixels
        let near = near_count(&mask) as f64;
        assert!((near - std::f64::consts::PI * 100.0).abs() < 20.0, "near = {near}");
    }

    #[test]
    fn test_overlapping_buffers_are_deduplicated() {
        let one = proximity_mask(&Layer::untagged(vec![Point::new(40.0, 50.0)]), &grid(), &params(10.0)).unwrap();
        let two = proximity_mask(
            &Layer::untagged(vec![Point::new(40.0, 50.0), Point::new(50.0, 50.0)]),
            &grid(),
            &params(10.0),
        )
        .unwrap();

        let single = near_count(&one);
        let union = near_count(&two);
        assert!(union > single);
        assert!(union < 2 * single);
    }

    #[test]
    fn test_rejects_zero_distance() {
        let layer = Layer::untagged(vec![Point::new(50.0, 50.0)]);
        assert!(matches!(
            proximity_mask(&layer, &grid(), &params(0.0)),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(
            proximity_mask(&layer, &grid(), &params(-1.0)),
            Err(Error::InvalidParameter { .. })
        ));
        // Distance is checked even when there is nothing to buffer
        assert!(matches!(
            proximity_mask(&Layer::untagged(vec![]), &grid(), &params(0.0)),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_algorithm_trait() {
        let layer = Layer::untagged(vec![Point::new(5.0, 95.0)]);
        let mask = Proximity.execute((layer, grid()), params(3.0)).unwrap();
        assert_eq!(mask.get(4, 4).unwrap(), NEAR);
        assert_eq!(mask.get(50, 50).unwrap(), FAR);
    }
}
