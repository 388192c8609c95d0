//! Union of many polygons
//!
//! Folding N polygons into one accumulator re-processes the growing result
//! at every step. Merging neighbours pairwise, level by level, keeps each
//! operand small and gives O(log N) rounds whose pairs are independent.

use crate::maybe_rayon::*;
use geo::{BooleanOps, MultiPolygon, Polygon};

/// Union all polygons with a balanced pairwise merge.
///
/// Returns an empty `MultiPolygon` for empty input.
pub fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let parts: Vec<MultiPolygon<f64>> = polygons.into_iter().map(|p| MultiPolygon::new(vec![p])).collect();
    union_multi(parts)
}

/// Same as [`union_all`], for inputs that are already multi-part.
pub fn union_multi(mut level: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    if level.is_empty() {
        return MultiPolygon::new(vec![]);
    }

    while level.len() > 1 {
        let mut items = level.into_iter();
        let mut pairs = Vec::new();
        while let Some(a) = items.next() {
            pairs.push((a, items.next()));
        }

        level = pairs
            .into_par_iter()
            .map(|(a, b)| match b {
                Some(b) => a.union(&b),
                None => a,
            })
            .collect();
    }

    level.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}
