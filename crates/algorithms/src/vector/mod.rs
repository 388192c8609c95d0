//! Vector operations used by the coverage analysis
//!
//! - Buffer: circles around points, positive/negative polygon offsets
//! - Union: balanced pairwise merge of many polygons
//! - Centroid, bounds and point-in-boundary selection

mod buffer;
mod spatial;
mod union;

pub use buffer::{buffer_point, buffer_points, offset_polygon, BufferParams};
pub use spatial::{centroid, select_within, total_bounds};
pub use union::{union_all, union_multi};
