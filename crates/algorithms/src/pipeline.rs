//! End-to-end coverage analysis
//!
//! Country boundary, population polygons and facility points go in; the
//! intermediate bands, the underserved centroids and a coverage summary
//! come out. Every stage returns a new value and the run aborts on the
//! first error.

use geo::{MultiPolygon, Point};
use gridcover_core::crs::ensure_compatible;
use gridcover_core::{ClassPoint, Error, Feature, Layer, PolygonFeature, Raster, RasterGrid, Result, CRS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::algebra::{clip_by_mask, combine, coverage_stats, threshold, CoverageStats};
use crate::density::{kernel_density, IndexKind, KernelDensityParams};
use crate::population::polygon_centroids;
use crate::proximity::proximity_mask;
use crate::vector::{offset_polygon, select_within, total_bounds, union_multi, BufferParams};
use crate::vectorize::{erode_regions, extract_regions, region_centroids};

/// Settings of one coverage run. Distances are in CRS units (meters for a
/// metric projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Output pixel size
    #[serde(default = "default_pixel_size")]
    pub pixel_size: f64,

    /// Kernel density radius; also the margin added around the country
    #[serde(default = "default_kernel_radius")]
    pub kernel_radius: f64,

    /// Reach of each facility
    #[serde(default = "default_substation_buffer")]
    pub substation_buffer: f64,

    /// Density above which a cell counts as dense
    #[serde(default = "default_density_threshold")]
    pub density_threshold: f64,

    /// Negative buffer applied to underserved regions before taking centroids
    #[serde(default = "default_erosion")]
    pub erosion: f64,

    /// Extra reach beyond `kernel_radius` when selecting population
    /// around the country
    #[serde(default = "default_country_buffer_extra")]
    pub country_buffer_extra: f64,

    /// Segments approximating each facility circle
    #[serde(default = "default_buffer_segments")]
    pub buffer_segments: usize,

    /// Numeric attribute holding the population count
    #[serde(default = "default_population_field")]
    pub population_field: String,

    #[serde(default)]
    pub index: IndexKind,
}

fn default_pixel_size() -> f64 {
    2_000.0
}

fn default_kernel_radius() -> f64 {
    25_000.0
}

fn default_substation_buffer() -> f64 {
    40_000.0
}

fn default_density_threshold() -> f64 {
    10_000.0
}

fn default_erosion() -> f64 {
    10_000.0
}

fn default_country_buffer_extra() -> f64 {
    10_000.0
}

fn default_buffer_segments() -> usize {
    64
}

fn default_population_field() -> String {
    "population".to_string()
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            pixel_size: default_pixel_size(),
            kernel_radius: default_kernel_radius(),
            substation_buffer: default_substation_buffer(),
            density_threshold: default_density_threshold(),
            erosion: default_erosion(),
            country_buffer_extra: default_country_buffer_extra(),
            buffer_segments: default_buffer_segments(),
            population_field: default_population_field(),
            index: IndexKind::default(),
        }
    }
}

impl CoverageConfig {
    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every setting is in range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("pixel_size", self.pixel_size),
            ("kernel_radius", self.kernel_radius),
            ("substation_buffer", self.substation_buffer),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid_parameter(name, value, "must be > 0"));
            }
        }

        let non_negative = [
            ("erosion", self.erosion),
            ("country_buffer_extra", self.country_buffer_extra),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid_parameter(name, value, "must be >= 0"));
            }
        }

        if !self.density_threshold.is_finite() {
            return Err(Error::invalid_parameter(
                "density_threshold",
                self.density_threshold,
                "must be finite",
            ));
        }
        if self.buffer_segments < 4 {
            return Err(Error::invalid_parameter("buffer_segments", self.buffer_segments, "must be >= 4"));
        }
        if self.population_field.is_empty() {
            return Err(Error::Config("population_field must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Everything a coverage run produces
#[derive(Debug, Clone)]
pub struct CoverageOutputs {
    pub grid: RasterGrid,
    /// Kernel density of the selected population
    pub density: Raster<f32>,
    /// Dense cells inside the country
    pub density_threshold: Raster<u8>,
    /// 0 within reach of a facility, 1 elsewhere
    pub proximity: Raster<u8>,
    /// Density with reachable cells zeroed
    pub combined: Raster<f32>,
    /// Dense unreachable cells inside the country
    pub coverage_threshold: Raster<u8>,
    /// Polygonized underserved regions before erosion
    pub regions: Layer<PolygonFeature>,
    /// Regions that survived erosion
    pub eroded_regions: Layer<PolygonFeature>,
    /// One point per surviving region
    pub underserved: Layer<ClassPoint>,
    pub stats: CoverageStats,
}

/// Run the full analysis.
///
/// All layers must share a CRS (untagged layers are accepted). The outputs
/// carry the first CRS tag found among country, population and facilities.
///
/// # Errors
/// `EmptyInput` if the country layer has no area, `CrsMismatch` for
/// conflicting layer tags, and any error raised by a stage.
pub fn run_coverage(
    country: &Layer<MultiPolygon<f64>>,
    population: &Layer<Feature>,
    substations: &Layer<Point<f64>>,
    config: &CoverageConfig,
) -> Result<CoverageOutputs> {
    config.validate()?;
    ensure_compatible(country.crs.as_ref(), population.crs.as_ref())?;
    ensure_compatible(country.crs.as_ref(), substations.crs.as_ref())?;
    ensure_compatible(population.crs.as_ref(), substations.crs.as_ref())?;

    let span = info_span!("coverage", pixel_size = config.pixel_size);
    let _guard = span.enter();

    let crs: Option<CRS> = country
        .crs
        .clone()
        .or_else(|| population.crs.clone())
        .or_else(|| substations.crs.clone());

    let boundary = union_multi(country.features.clone());
    let bounds = total_bounds(&boundary).ok_or(Error::EmptyInput("country boundary"))?;
    let grid = RasterGrid::from_extent(bounds, config.pixel_size, config.kernel_radius)?;
    info!(width = grid.width, height = grid.height, "grid built");

    let centroids = polygon_centroids(population, &config.population_field)?;
    let reach = offset_polygon(&boundary, config.kernel_radius + config.country_buffer_extra);
    let selected = select_within(&centroids, &reach);
    info!(total = centroids.len(), selected = selected.len(), "population selected");

    let mut density = kernel_density(
        &selected,
        &grid,
        &KernelDensityParams {
            radius: config.kernel_radius,
            index: config.index,
        },
    )?;
    density.set_crs(crs.clone());
    let density_threshold = clip_by_mask(&threshold(&density, config.density_threshold)?, &boundary)?;
    info!(dense_cells = density_threshold.count_nonzero(), "density computed");

    let mut proximity = proximity_mask(
        substations,
        &grid,
        &BufferParams {
            distance: config.substation_buffer,
            segments: config.buffer_segments,
        },
    )?;
    proximity.set_crs(crs.clone());
    debug!(facilities = substations.len(), "proximity mask built");

    let combined = combine(&density, &proximity)?;
    let coverage_threshold = clip_by_mask(&threshold(&combined, config.density_threshold)?, &boundary)?;
    info!(unserved_cells = coverage_threshold.count_nonzero(), "coverage computed");

    let regions = extract_regions(&coverage_threshold)?;
    let eroded_regions = erode_regions(&regions, config.erosion)?;
    let underserved = region_centroids(&eroded_regions);
    info!(
        regions = regions.len(),
        after_erosion = eroded_regions.len(),
        "underserved areas extracted"
    );

    let stats = coverage_stats(&density_threshold, &coverage_threshold)?;
    info!(
        dense_cells = stats.dense_cells,
        unserved_cells = stats.unserved_cells,
        covered_fraction = ?stats.covered_fraction,
        "coverage summary"
    );

    Ok(CoverageOutputs {
        grid,
        density,
        density_threshold,
        proximity,
        combined,
        coverage_threshold,
        regions,
        eroded_regions,
        underserved,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoverageConfig::default();
        assert_eq!(config.pixel_size, 2_000.0);
        assert_eq!(config.kernel_radius, 25_000.0);
        assert_eq!(config.substation_buffer, 40_000.0);
        assert_eq!(config.density_threshold, 10_000.0);
        assert_eq!(config.erosion, 10_000.0);
        assert_eq!(config.country_buffer_extra, 10_000.0);
        assert_eq!(config.buffer_segments, 64);
        assert_eq!(config.population_field, "population");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = CoverageConfig::from_json(r#"{ "pixel_size": 500.0, "index": "grid" }"#).unwrap();
        assert_eq!(config.pixel_size, 500.0);
        assert_eq!(config.index, IndexKind::Grid);
        assert_eq!(config.kernel_radius, 25_000.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CoverageConfig {
            erosion: 0.0,
            population_field: "pop_2020".to_string(),
            ..Default::default()
        };
        let parsed = CoverageConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(matches!(
            CoverageConfig::from_json(r#"{ "pixel_size": -1.0 }"#),
            Err(Error::InvalidParameter { name: "pixel_size", .. })
        ));
        assert!(matches!(
            CoverageConfig::from_json(r#"{ "erosion": -5.0 }"#),
            Err(Error::InvalidParameter { name: "erosion", .. })
        ));
        assert!(matches!(CoverageConfig::from_json("not json"), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_country_is_rejected() {
        let result = run_coverage(
            &Layer::untagged(vec![]),
            &Layer::untagged(vec![]),
            &Layer::untagged(vec![]),
            &CoverageConfig::default(),
        );
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_conflicting_crs_is_rejected() {
        let country = Layer::new(vec![], Some(CRS::from_epsg(3857)));
        let substations = Layer::new(vec![], Some(CRS::from_epsg(32631)));
        let result = run_coverage(&country, &Layer::untagged(vec![]), &substations, &CoverageConfig::default());
        assert!(matches!(result, Err(Error::CrsMismatch(..))));
    }
}
