use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use transit_insights::layers::route_network::{LengthMethod, RouteNetwork};
use transit_insights::render::{self, carbon};

/// Render bus routes coloured by estimated carbon emissions.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GeoJSON file of LineString / MultiLineString routes
    #[arg(long, default_value = "data/type_route_public_transport_line_Tainan.geojson")]
    input: PathBuf,

    /// Directory the HTML map is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = LengthMethod::WebMercator)]
    length_method: LengthMethod,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
    let args = Args::parse();

    log::info!("Reading routes from path: {}", args.input.display());
    let start = Instant::now();
    let network = RouteNetwork::load(&args.input, args.length_method)?;
    log::debug!("Routes loaded in {}ms", start.elapsed().as_millis());
    network.print_stats();

    let render_start = Instant::now();
    let html = carbon::render_carbon_map(&network)?;
    log::debug!("Map rendered in {}ms", render_start.elapsed().as_millis());

    let file_name = carbon::output_file_name(&chrono::Local::now());
    render::write_page(&args.output_dir, &file_name, &html)?;
    Ok(())
}
