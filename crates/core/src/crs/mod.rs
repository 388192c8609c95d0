//! Coordinate Reference System tags
//!
//! The engine never reprojects. A CRS is carried alongside every layer and
//! band so that operations combining two inputs can refuse mismatched ones.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System identifier (EPSG code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// Web Mercator (EPSG:3857), the metric projection the coverage analysis runs in
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        self.epsg == other.epsg
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

/// Fail with [`Error::CrsMismatch`] when both tags are present and differ.
///
/// A missing tag on either side is accepted: untagged data is assumed to be
/// in the same projection as its partner.
pub fn ensure_compatible(a: Option<&CRS>, b: Option<&CRS>) -> Result<()> {
    match (a, b) {
        (Some(a), Some(b)) if !a.is_equivalent(b) => {
            Err(Error::CrsMismatch(a.identifier(), b.identifier()))
        }
        _ => Ok(()),
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::web_mercator()
    }
}
