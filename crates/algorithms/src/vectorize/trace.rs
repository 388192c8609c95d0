//! Boundary tracing along pixel edges
//!
//! Vertices live on the pixel-corner lattice `(col, row)`. Every edge
//! between a region pixel and a non-region pixel becomes a directed edge
//! with the region on its left, so in map coordinates (y up) outer rings
//! run counter-clockwise and holes clockwise. Where two region pixels meet
//! only at a corner the walk always turns left, and a walk that comes back
//! through the same corner is cut there into an outer ring and a hole.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use gridcover_core::{Error, RasterGrid, Result};
use std::collections::HashMap;

use super::label::{Labeling, Region};

type Vertex = (i64, i64);

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: Vertex,
    to: Vertex,
}

impl Edge {
    fn direction(&self) -> (i64, i64) {
        (self.to.0 - self.from.0, self.to.1 - self.from.1)
    }
}

/// Left turn of a lattice direction; rows grow downwards.
fn turn_left((dc, dr): (i64, i64)) -> (i64, i64) {
    (dr, -dc)
}

/// Boundary edges of region `id`, region on the left of every edge.
fn boundary_edges(labeling: &Labeling, region: &Region, id: u32) -> Vec<Edge> {
    let mut edges = Vec::new();
    for &(row, col) in &region.pixels {
        let (r, c) = (row as isize, col as isize);
        let (vr, vc) = (row as i64, col as i64);

        if labeling.label_at(r - 1, c) != id {
            edges.push(Edge {
                from: (vc + 1, vr),
                to: (vc, vr),
            });
        }
        if labeling.label_at(r + 1, c) != id {
            edges.push(Edge {
                from: (vc, vr + 1),
                to: (vc + 1, vr + 1),
            });
        }
        if labeling.label_at(r, c - 1) != id {
            edges.push(Edge {
                from: (vc, vr),
                to: (vc, vr + 1),
            });
        }
        if labeling.label_at(r, c + 1) != id {
            edges.push(Edge {
                from: (vc + 1, vr + 1),
                to: (vc + 1, vr),
            });
        }
    }
    edges
}

/// Link boundary edges into closed rings of lattice vertices, dropping
/// vertices in the middle of straight runs.
fn link_rings(edges: &[Edge]) -> Result<Vec<Vec<Vertex>>> {
    let mut outgoing: HashMap<Vertex, Vec<usize>> = HashMap::with_capacity(edges.len());
    for (i, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }

        let mut walk = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            walk.push(current);

            let edge = edges[current];
            let candidates = outgoing.get(&edge.to).map(Vec::as_slice).unwrap_or_default();
            let next = match candidates {
                [only] => *only,
                _ => {
                    let left = turn_left(edge.direction());
                    candidates
                        .iter()
                        .copied()
                        .find(|&i| edges[i].direction() == left)
                        .ok_or_else(|| Error::GeometryDegenerate(format!("open boundary at vertex {:?}", edge.to)))?
                }
            };

            if next == start {
                break;
            }
            if used[next] {
                return Err(Error::GeometryDegenerate(format!(
                    "boundary walk re-entered a closed ring at vertex {:?}",
                    edge.to
                )));
            }
            current = next;
        }

        rings.extend(split_at_repeats(edges, walk).into_iter().map(|ring| corners(edges, &ring)));
    }

    Ok(rings)
}

/// Split a closed walk that passes a vertex twice into simple rings.
///
/// A region that touches itself at a corner produces such walks; the
/// pieces are an outer ring and a hole sharing that single vertex.
fn split_at_repeats(edges: &[Edge], walk: Vec<usize>) -> Vec<Vec<usize>> {
    let mut pieces = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
    let mut position: HashMap<Vertex, usize> = HashMap::new();

    for e in walk {
        let vertex = edges[e].from;
        if let Some(&pos) = position.get(&vertex) {
            let piece: Vec<usize> = stack.drain(pos..).collect();
            for &p in &piece {
                position.remove(&edges[p].from);
            }
            pieces.push(piece);
        }
        position.insert(vertex, stack.len());
        stack.push(e);
    }
    pieces.push(stack);
    pieces
}

/// Start vertices of the edges where the walk changes direction
fn corners(edges: &[Edge], ring: &[usize]) -> Vec<Vertex> {
    let n = ring.len();
    (0..n)
        .filter(|&k| edges[ring[k]].direction() != edges[ring[(k + n - 1) % n]].direction())
        .map(|k| edges[ring[k]].from)
        .collect()
}

/// Twice the signed area of a lattice ring; positive for outer rings.
fn signed_area2(ring: &[Vertex]) -> i64 {
    // Lattice rows grow downwards, so flip the sign to get map orientation
    let n = ring.len();
    -(0..n)
        .map(|i| {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum::<i64>()
}

fn to_line_string(ring: &[Vertex], grid: &RasterGrid) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|&(c, r)| Coord {
            x: grid.origin_x + c as f64 * grid.pixel_size,
            y: grid.origin_y - r as f64 * grid.pixel_size,
        })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// Polygon outline of region `id` in map coordinates.
///
/// The largest outer ring carries every hole. Further outer rings, which
/// only appear where the walk splits at a corner, become extra parts.
pub(crate) fn trace_region(labeling: &Labeling, region: &Region, id: u32, grid: &RasterGrid) -> Result<MultiPolygon<f64>> {
    let edges = boundary_edges(labeling, region, id);
    let rings = link_rings(&edges)?;

    let (mut outers, holes): (Vec<_>, Vec<_>) = rings
        .into_iter()
        .map(|ring| (signed_area2(&ring), ring))
        .partition(|(area, _)| *area > 0);

    if outers.is_empty() {
        return Err(Error::GeometryDegenerate(format!("region {id} has no outer boundary")));
    }
    outers.sort_by(|a, b| b.0.cmp(&a.0));

    let interiors: Vec<LineString<f64>> = holes.iter().map(|(_, ring)| to_line_string(ring, grid)).collect();
    let mut parts = Vec::with_capacity(outers.len());
    let mut interiors = Some(interiors);
    for (_, ring) in &outers {
        parts.push(Polygon::new(to_line_string(ring, grid), interiors.take().unwrap_or_default()));
    }

    Ok(MultiPolygon::new(parts))
}
