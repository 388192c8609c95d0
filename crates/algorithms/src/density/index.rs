//! Radius queries over pixel centers

use gridcover_core::RasterGrid;

/// A pixel center found by a radius query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row-major pixel index
    pub index: usize,
    /// Squared distance from the query point to the pixel center
    pub distance_sq: f64,
}

/// "All pixel centers within Euclidean distance `radius`" over one grid.
///
/// Implementations must report exactly the centers with
/// `distance_sq <= radius * radius`, using the same center coordinates as
/// [`RasterGrid::pixel_center`], so that results do not depend on which
/// index answered the query.
pub trait RadiusIndex: Sync {
    /// Append every pixel center within `radius` of `(x, y)` to `out`.
    fn within_radius(&self, x: f64, y: f64, radius: f64, out: &mut Vec<Neighbor>);
}

/// Radius queries answered by index arithmetic on the regular lattice.
///
/// Candidate rows and columns come straight from the grid geometry; only
/// the square window around the query point is tested.
#[derive(Debug, Clone, Copy)]
pub struct GridIndex {
    grid: RasterGrid,
}

impl GridIndex {
    pub fn new(grid: RasterGrid) -> Self {
        Self { grid }
    }

    /// Inclusive index range covering lattice positions `k` with
    /// `lo <= (k + 0.5) * step <= hi`, clamped to `0..len`.
    ///
    /// Padded by one position on each side; the exact distance test in the
    /// caller decides membership.
    fn span(lo: f64, hi: f64, step: f64, len: usize) -> Option<(usize, usize)> {
        let first = ((lo / step - 0.5).ceil() - 1.0).max(0.0);
        let last = ((hi / step - 0.5).floor() + 1.0).min(len as f64 - 1.0);
        if !(first <= last) {
            return None;
        }
        Some((first as usize, last as usize))
    }
}

impl RadiusIndex for GridIndex {
    fn within_radius(&self, x: f64, y: f64, radius: f64, out: &mut Vec<Neighbor>) {
        if !(radius > 0.0) {
            return;
        }
        let g = &self.grid;
        let p = g.pixel_size;

        let Some((c0, c1)) = Self::span(x - radius - g.origin_x, x + radius - g.origin_x, p, g.width) else {
            return;
        };
        // Rows count downward from the top edge
        let Some((r0, r1)) = Self::span(g.origin_y - y - radius, g.origin_y - y + radius, p, g.height) else {
            return;
        };

        let radius_sq = radius * radius;
        for row in r0..=r1 {
            let dy = g.row_center_y(row) - y;
            let dy_sq = dy * dy;
            if dy_sq > radius_sq {
                continue;
            }
            for col in c0..=c1 {
                let dx = g.col_center_x(col) - x;
                let distance_sq = dx * dx + dy_sq;
                if distance_sq <= radius_sq {
                    out.push(Neighbor {
                        index: g.index(row, col),
                        distance_sq,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(grid: &RasterGrid, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let r_sq = radius * radius;
        grid.pixel_centers()
            .enumerate()
            .filter(|(_, (cx, cy))| {
                let dx = cx - x;
                let dy = cy - y;
                dx * dx + dy * dy <= r_sq
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn query(index: &impl RadiusIndex, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut out = Vec::new();
        index.within_radius(x, y, radius, &mut out);
        let mut ids: Vec<usize> = out.iter().map(|n| n.index).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_grid_index_matches_brute_force() {
        let grid = RasterGrid::new(-3.0, 17.0, 0.7, 31, 23).unwrap();
        let index = GridIndex::new(grid);

        for &(x, y, r) in &[
            (5.0, 5.0, 2.3),
            (-3.0, 17.0, 4.0),
            (20.0, 0.0, 6.5),
            (1.35, 9.25, 0.35),
            (8.0, 8.0, 100.0),
        ] {
            assert_eq!(query(&index, x, y, r), brute_force(&grid, x, y, r), "query ({x}, {y}, {r})");
        }
    }

    #[test]
    fn test_grid_index_boundary_is_inclusive() {
        // Centers on integer coordinates; radius hits (3, 0) exactly
        let grid = RasterGrid::new(-0.5, 0.5, 1.0, 7, 1).unwrap();
        let index = GridIndex::new(grid);
        let ids = query(&index, 0.0, 0.0, 3.0);
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_grid_index_outside_grid() {
        let grid = RasterGrid::new(0.0, 10.0, 1.0, 10, 10).unwrap();
        let index = GridIndex::new(grid);
        assert!(query(&index, 100.0, 100.0, 5.0).is_empty());
        assert!(query(&index, 5.0, 5.0, 0.0).is_empty());
    }
}
