use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use transit_insights::layers::poi::{PoiLayer, SEARCH_RADIUS_METERS};
use transit_insights::render::{self, heatmap};

/// Render a crowd heatmap weighted by POI neighbourhood density.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GeoJSON file of Point / MultiPoint POIs
    #[arg(long, default_value = "data/poi_points.geojson")]
    input: PathBuf,

    /// Directory the HTML map is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Neighbourhood radius in meters
    #[arg(long, default_value_t = SEARCH_RADIUS_METERS)]
    radius_meters: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
    let args = Args::parse();

    log::info!("Reading POIs from path: {}", args.input.display());
    let start = Instant::now();
    let layer = PoiLayer::load(&args.input)?;
    log::debug!("POIs loaded in {}ms", start.elapsed().as_millis());
    layer.print_stats();

    let density_start = Instant::now();
    let weighted = layer.density(args.radius_meters);
    log::info!(
        "Counted neighbours within {}m for {} POIs in {}ms",
        args.radius_meters,
        weighted.len(),
        density_start.elapsed().as_millis()
    );

    let html = heatmap::render_heatmap_page(&weighted)?;
    render::write_page(&args.output_dir, heatmap::OUTPUT_FILE_NAME, &html)?;
    Ok(())
}
