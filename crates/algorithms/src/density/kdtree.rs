//! 2D k-d tree over pixel centers
//!
//! Answers "which pixel centers lie within distance r of this point" in
//! O(log n + k) instead of scanning every cell, which is what makes kernel
//! density over country-sized grids tractable.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use gridcover_core::RasterGrid;
use std::cmp::Ordering;

use super::index::{Neighbor, RadiusIndex};

/// A 2D k-d tree over indexed coordinates.
///
/// Nodes are laid out implicitly: the subtree of a slice `[lo, hi)` has its
/// splitting point at the median `lo + (hi - lo) / 2`, so no child pointers
/// are stored.
#[derive(Debug, Clone)]
pub struct KdTree {
    /// Points in tree order: (x, y, original index)
    nodes: Vec<(f64, f64, usize)>,
}

impl KdTree {
    /// Build a k-d tree from coordinates; query results report positions in
    /// `coords`.
    ///
    /// Construction is O(n log n) using median selection on alternating axes.
    pub fn build(coords: &[(f64, f64)]) -> Self {
        let mut nodes: Vec<(f64, f64, usize)> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        build_recursive(&mut nodes, 0);

        Self { nodes }
    }

    /// Build a tree over every pixel center of `grid`; indices are row-major.
    pub fn from_grid(grid: &RasterGrid) -> Self {
        let centers: Vec<(f64, f64)> = grid.pixel_centers().collect();
        Self::build(&centers)
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn radius_recursive(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        qx: f64,
        qy: f64,
        radius_sq: f64,
        out: &mut Vec<Neighbor>,
    ) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let (px, py, index) = self.nodes[mid];

        let dx = qx - px;
        let dy = qy - py;
        let distance_sq = dx * dx + dy * dy;

        if distance_sq <= radius_sq {
            out.push(Neighbor { index, distance_sq });
        }

        let diff = if depth % 2 == 0 { dx } else { dy };

        // Points equal to the split value can sit on either side
        if diff <= 0.0 || diff * diff <= radius_sq {
            self.radius_recursive(lo, mid, depth + 1, qx, qy, radius_sq, out);
        }
        if diff >= 0.0 || diff * diff <= radius_sq {
            self.radius_recursive(mid + 1, hi, depth + 1, qx, qy, radius_sq, out);
        }
    }
}

impl RadiusIndex for KdTree {
    fn within_radius(&self, x: f64, y: f64, radius: f64, out: &mut Vec<Neighbor>) {
        if self.nodes.is_empty() || !(radius > 0.0) {
            return;
        }
        self.radius_recursive(0, self.nodes.len(), 0, x, y, radius * radius, out);
    }
}

fn axis_cmp(depth: usize) -> impl Fn(&(f64, f64, usize), &(f64, f64, usize)) -> Ordering {
    move |a, b| {
        let (va, vb) = if depth % 2 == 0 { (a.0, b.0) } else { (a.1, b.1) };
        va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
    }
}

/// Recursively arrange `nodes` so each slice's median splits its subtree.
fn build_recursive(nodes: &mut [(f64, f64, usize)], depth: usize) {
    if nodes.len() <= 1 {
        return;
    }
    let mid = nodes.len() / 2;
    nodes.select_nth_unstable_by(mid, axis_cmp(depth));

    let (left, rest) = nodes.split_at_mut(mid);
    build_recursive(left, depth + 1);
    build_recursive(&mut rest[1..], depth + 1);
}
