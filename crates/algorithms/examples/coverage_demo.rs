//! Coverage demo: synthetic country with three towns and two substations
//!
//! Builds a 300 km x 200 km country, scatters census polygons around three
//! towns, places substations near two of them and runs the full analysis.
//! The third town ends up as the single underserved point.
//!
//! Run:
//!   cargo run -p gridcover-algorithms --example coverage_demo
//!   cargo run -p gridcover-algorithms --example coverage_demo -- config.json
//!
//! Set `RUST_LOG=gridcover_algorithms=debug` for per-stage details.

use geo::{LineString, MultiPolygon, Point, Polygon};
use gridcover_algorithms::pipeline::{run_coverage, CoverageConfig};
use gridcover_core::{AttributeValue, Error, Feature, Layer, Result, CRS};
use tracing::info;

fn rectangle(x0: f64, y0: f64, width: f64, height: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x0, y0),
            (x0 + width, y0),
            (x0 + width, y0 + height),
            (x0, y0 + height),
            (x0, y0),
        ]),
        vec![],
    )
}

/// 5 x 5 block of 1 km census cells around a town center
fn town(cx: f64, cy: f64, people_per_cell: i64) -> Vec<Feature> {
    let mut cells = Vec::new();
    for i in -2..=2 {
        for j in -2..=2 {
            let x0 = cx + i as f64 * 1_000.0 - 500.0;
            let y0 = cy + j as f64 * 1_000.0 - 500.0;
            cells.push(
                Feature::new(rectangle(x0, y0, 1_000.0, 1_000.0))
                    .with_property("population", AttributeValue::Int(people_per_cell)),
            );
        }
    }
    cells
}

fn load_config() -> Result<CoverageConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| Error::Config(format!("{path}: {e}")))?;
            CoverageConfig::from_json(&text)
        }
        None => Ok(CoverageConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridcover_algorithms=info".parse().map_err(|e| Error::Config(format!("{e}")))?),
        )
        .init();

    let config = load_config()?;
    let crs = Some(CRS::web_mercator());

    let country = Layer::new(
        vec![MultiPolygon::new(vec![rectangle(0.0, 0.0, 300_000.0, 200_000.0)])],
        crs.clone(),
    );

    let mut census = Vec::new();
    census.extend(town(60_000.0, 60_000.0, 8_000));
    census.extend(town(150_000.0, 140_000.0, 6_000));
    census.extend(town(240_000.0, 70_000.0, 7_000));
    let population = Layer::new(census, crs.clone());

    let substations = Layer::new(
        vec![Point::new(65_000.0, 55_000.0), Point::new(145_000.0, 150_000.0)],
        crs,
    );

    let outputs = run_coverage(&country, &population, &substations, &config)?;

    info!(
        width = outputs.grid.width,
        height = outputs.grid.height,
        pixel_size = outputs.grid.pixel_size,
        "grid"
    );
    info!(
        "Computation total > pop = {} cells ({:.0} km2)",
        outputs.stats.dense_cells,
        outputs.stats.dense_area() / 1.0e6
    );
    info!(
        "Computation non connected > pop = {} cells ({:.0} km2)",
        outputs.stats.unserved_cells,
        outputs.stats.unserved_area() / 1.0e6
    );
    match outputs.stats.covered_fraction {
        Some(fraction) => info!("covered fraction = {:.3}", fraction),
        None => info!("no dense cells"),
    }
    info!(
        "regions = {}, after erosion = {}",
        outputs.regions.len(),
        outputs.eroded_regions.len()
    );
    for point in outputs.underserved.iter() {
        info!(
            x = point.point.x(),
            y = point.point.y(),
            class = point.class,
            "underserved area"
        );
    }

    Ok(())
}
