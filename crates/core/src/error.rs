//! Error types for gridcover

use thiserror::Error;

/// Main error type for gridcover operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error(
        "Raster grid mismatch: expected {ew}x{eh} at ({ex}, {ey}) with pixel {ep}, \
         got {aw}x{ah} at ({ax}, {ay}) with pixel {ap}"
    )]
    ShapeMismatch {
        ew: usize,
        eh: usize,
        ex: f64,
        ey: f64,
        ep: f64,
        aw: usize,
        ah: usize,
        ax: f64,
        ay: f64,
        ap: f64,
    },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Degenerate geometry: {0}")]
    GeometryDegenerate(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for gridcover operations
pub type Result<T> = std::result::Result<T, Error>;
