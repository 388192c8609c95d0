//! Raster data structures and operations

mod element;
mod geotransform;
mod grid;
mod layout;
mod neighborhood;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
pub use layout::RasterGrid;
pub use neighborhood::Neighborhood;
