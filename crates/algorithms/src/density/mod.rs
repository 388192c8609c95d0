//! Kernel density estimation over a regular grid
//!
//! - `kernel_density`: bounded quadratic kernel, summed over weighted points
//! - `RadiusIndex`: "pixel centers within r" queries, answered by a
//!   [`KdTree`] or by [`GridIndex`] window arithmetic

mod index;
pub mod kdtree;
mod kernel;

pub use index::{GridIndex, Neighbor, RadiusIndex};
pub use kdtree::KdTree;
pub use kernel::{kernel_density, IndexKind, KernelDensity, KernelDensityParams};
