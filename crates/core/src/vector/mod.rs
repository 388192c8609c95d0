//! Vector layer types
//!
//! Layers are ordered feature sequences sharing one CRS tag. The file-backed
//! readers and writers live outside this workspace; they hand over and take
//! back these in-memory structures.

use crate::crs::CRS;
use geo_types::{Geometry, MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value; `None` for null, strings and booleans
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// A geometry with free-form attributes, as read from a population layer
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: HashMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            properties: HashMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_property(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// A point carrying a non-negative weight (population count)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

impl WeightedPoint {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }

    /// Squared Euclidean distance to (x, y)
    #[inline]
    pub fn dist_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

/// A (multi)polygon region labelled with an integer class
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub geometry: MultiPolygon<f64>,
    pub class: i64,
}

/// A representative point of a region, keeping the region's class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassPoint {
    pub point: Point<f64>,
    pub class: i64,
}

/// Ordered features with a single shared CRS
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<F> {
    pub features: Vec<F>,
    pub crs: Option<CRS>,
}

impl<F> Layer<F> {
    pub fn new(features: Vec<F>, crs: Option<CRS>) -> Self {
        Self { features, crs }
    }

    /// A layer with no CRS tag
    pub fn untagged(features: Vec<F>) -> Self {
        Self { features, crs: None }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.features.iter()
    }

    /// Same CRS, new features
    pub fn with_features<G>(&self, features: Vec<G>) -> Layer<G> {
        Layer {
            features,
            crs: self.crs.clone(),
        }
    }
}

impl<F> Default for Layer<F> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            crs: None,
        }
    }
}

impl<F> IntoIterator for Layer<F> {
    type Item = F;
    type IntoIter = std::vec::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_numeric_view() {
        assert_eq!(AttributeValue::Int(12).as_f64(), Some(12.0));
        assert_eq!(AttributeValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(AttributeValue::Null.as_f64(), None);
        assert_eq!(AttributeValue::String("12".into()).as_f64(), None);
    }

    #[test]
    fn test_feature_properties() {
        let f = Feature::new(Point::new(1.0, 2.0)).with_property("population", AttributeValue::Int(40));
        assert_eq!(f.get_property("population"), Some(&AttributeValue::Int(40)));
        assert!(f.get_property("missing").is_none());
    }

    #[test]
    fn test_layer_keeps_crs() {
        let layer = Layer::new(vec![WeightedPoint::new(0.0, 0.0, 1.0)], Some(CRS::web_mercator()));
        let derived: Layer<u8> = layer.with_features(vec![1, 2]);
        assert_eq!(derived.len(), 2);
        assert_eq!(derived.crs, Some(CRS::web_mercator()));
    }

    #[test]
    fn test_weighted_point_distance() {
        let p = WeightedPoint::new(3.0, 4.0, 1.0);
        assert_eq!(p.dist_sq(0.0, 0.0), 25.0);
    }
}
