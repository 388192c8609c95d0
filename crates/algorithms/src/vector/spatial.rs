//! Spatial helpers: centroid, bounds, point-in-boundary selection

use geo::{BoundingRect, Centroid as GeoCentroid, Geometry, Intersects, MultiPolygon, Point};
use gridcover_core::{Layer, WeightedPoint};

/// Compute the centroid of a geometry
pub fn centroid(geom: &Geometry<f64>) -> Option<Point<f64>> {
    match geom {
        Geometry::Point(p) => Some(*p),
        Geometry::MultiPoint(mp) => mp.centroid(),
        Geometry::Polygon(p) => p.centroid(),
        Geometry::MultiPolygon(mp) => mp.centroid(),
        Geometry::Rect(r) => Some(r.centroid()),
        Geometry::Triangle(t) => Some(t.centroid()),
        Geometry::LineString(ls) => ls.centroid(),
        Geometry::MultiLineString(mls) => mls.centroid(),
        Geometry::Line(l) => Some(l.centroid()),
        Geometry::GeometryCollection(gc) => gc.centroid(),
    }
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of a multipolygon, `None` if empty
pub fn total_bounds(geometry: &MultiPolygon<f64>) -> Option<(f64, f64, f64, f64)> {
    geometry
        .bounding_rect()
        .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}

/// Keep the points that intersect `boundary` (interior or edge).
pub fn select_within(points: &Layer<WeightedPoint>, boundary: &MultiPolygon<f64>) -> Layer<WeightedPoint> {
    let Some((min_x, min_y, max_x, max_y)) = total_bounds(boundary) else {
        return points.with_features(Vec::new());
    };

    let kept = points
        .iter()
        .filter(|p| p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y)
        .filter(|p| boundary.intersects(&p.point()))
        .copied()
        .collect();

    points.with_features(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_centroid_polygon() {
        let c = centroid(&Geometry::Polygon(square(0.0, 0.0, 10.0))).unwrap();
        assert!((c.x() - 5.0).abs() < 1e-10);
        assert!((c.y() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_centroid_point_is_itself() {
        let c = centroid(&Geometry::Point(Point::new(3.0, -2.0))).unwrap();
        assert_eq!(c, Point::new(3.0, -2.0));
    }

    #[test]
    fn test_total_bounds() {
        let mp = MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(4.0, 5.0, 2.0)]);
        assert_eq!(total_bounds(&mp), Some((0.0, 0.0, 6.0, 7.0)));
        assert_eq!(total_bounds(&MultiPolygon::new(vec![])), None);
    }

    #[test]
    fn test_select_within() {
        let boundary = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        let points = Layer::untagged(vec![
            WeightedPoint::new(5.0, 5.0, 1.0),
            WeightedPoint::new(10.0, 5.0, 2.0),
            WeightedPoint::new(11.0, 5.0, 3.0),
            WeightedPoint::new(-1.0, -1.0, 4.0),
        ]);

        let kept = select_within(&points, &boundary);
        let weights: Vec<f64> = kept.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![1.0, 2.0]);
    }

    #[test]
    fn test_select_within_empty_boundary() {
        let points = Layer::untagged(vec![WeightedPoint::new(5.0, 5.0, 1.0)]);
        assert!(select_within(&points, &MultiPolygon::new(vec![])).is_empty());
    }
}
