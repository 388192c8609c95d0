//! Buffer operations
//!
//! Points become circles approximated by regular polygons. Polygons are
//! offset through `geo`'s buffer, which also handles negative distances
//! (erosion).

use geo::{Buffer, LineString, MultiPolygon, Point, Polygon};
use gridcover_core::{Error, Result};
use std::f64::consts::PI;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance in CRS units
    pub distance: f64,
    /// Number of segments approximating a full circle
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 40_000.0,
            segments: 64,
        }
    }
}

/// Create a circular buffer around a point.
///
/// The circle is inscribed: vertices lie exactly on the radius and edges
/// fall slightly inside it.
pub fn buffer_point(point: &Point<f64>, params: &BufferParams) -> Polygon<f64> {
    let n = params.segments.max(4);
    let r = params.distance.abs();
    let (cx, cy) = (point.x(), point.y());

    let mut coords: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}

/// Circular buffers around every point, one polygon per point.
///
/// # Errors
/// `EmptyInput` for a zero distance (every buffer would be empty),
/// `InvalidParameter` for a negative or non-finite one.
pub fn buffer_points(points: &[Point<f64>], params: &BufferParams) -> Result<Vec<Polygon<f64>>> {
    if params.distance == 0.0 {
        return Err(Error::EmptyInput("buffer distance of 0"));
    }
    if !(params.distance.is_finite() && params.distance > 0.0) {
        return Err(Error::invalid_parameter(
            "buffer_distance",
            params.distance,
            "must be > 0",
        ));
    }
    Ok(points.iter().map(|p| buffer_point(p, params)).collect())
}

/// Offset a (multi)polygon by `distance`; negative values shrink it.
///
/// Parts narrower than `2 * |distance|` vanish under a negative offset, so
/// the result may be empty.
pub fn offset_polygon(geometry: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance == 0.0 {
        return geometry.clone();
    }
    geometry.buffer(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )])
    }

    #[test]
    fn test_buffer_point_circle() {
        let polygon = buffer_point(
            &Point::new(0.0, 0.0),
            &BufferParams {
                distance: 10.0,
                segments: 64,
            },
        );

        let expected_area = PI * 100.0;
        let error = (polygon.unsigned_area() - expected_area).abs() / expected_area;
        assert!(error < 0.01, "circle area error {:.2}%", error * 100.0);
    }

    #[test]
    fn test_buffer_point_vertex_count() {
        let polygon = buffer_point(
            &Point::new(5.0, 5.0),
            &BufferParams {
                distance: 1.0,
                segments: 32,
            },
        );
        // segments + closing coordinate
        assert_eq!(polygon.exterior().0.len(), 33);
    }

    #[test]
    fn test_buffer_points_rejects_non_positive_distance() {
        let pts = vec![Point::new(0.0, 0.0)];
        let zero = BufferParams {
            distance: 0.0,
            segments: 16,
        };
        assert!(matches!(buffer_points(&pts, &zero), Err(Error::EmptyInput(_))));

        for distance in [-5.0, f64::NAN, f64::INFINITY] {
            let params = BufferParams {
                distance,
                segments: 16,
            };
            assert!(matches!(
                buffer_points(&pts, &params),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_negative_offset_shrinks() {
        let shrunk = offset_polygon(&square(0.0, 0.0, 10.0), -2.0);
        assert!((shrunk.unsigned_area() - 36.0).abs() < 0.5);
    }

    #[test]
    fn test_negative_offset_removes_thin_parts() {
        // 3 wide: gone under a 2-unit erosion
        let shrunk = offset_polygon(&square(0.0, 0.0, 3.0), -2.0);
        assert!(shrunk.0.is_empty() || shrunk.unsigned_area() < 1e-9);
    }
}
