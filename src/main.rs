use clap::Parser;
use log::info;
use nearest_position::{
    DEFAULT_RESOLUTION, EntityStore, GridConfig, NearestError, NearestFinder, QueryPoint,
    ReportRow, read_entities,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "nearest-position")]
#[command(about = "Find the nearest vehicle to each of ten reference positions", long_about = None)]
struct Cli {
    /// Binary vehicle position file
    #[arg(default_value = "VehiclePositions.dat")]
    input: PathBuf,

    /// Grid cells per axis
    #[arg(default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "Could not process the file \"{}\". (Does the file exist and is the format correct?)",
                cli.input.display()
            );
            eprintln!();
            eprintln!("Error = \"{}\"", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), NearestError> {
    let started = Instant::now();

    let store = EntityStore::from_entities(read_entities(&cli.input)?)?;
    let loaded = Instant::now();
    info!("Loaded {} vehicles from {}", store.len(), cli.input.display());

    if store.is_empty() {
        println!("No vehicles were loaded from disk.");
    }

    let finder = NearestFinder::new(
        store,
        QueryPoint::defaults(),
        &GridConfig::new(cli.resolution),
    )?;
    let results = finder.find_all();
    let finished = Instant::now();

    for row in finder.report(&results) {
        print_row(&row);
    }

    info!(
        "Dat file read time taken: {} ms",
        loaded.duration_since(started).as_millis()
    );
    info!(
        "Nearest position calculation execution time: {} ms",
        finished.duration_since(loaded).as_millis()
    );
    info!(
        "Total time taken: {} ms",
        finished.duration_since(started).as_millis()
    );

    Ok(())
}

fn print_row(row: &ReportRow) {
    let (Some(label), Some(lat), Some(lon), Some(meters)) = (
        row.label.as_deref(),
        row.latitude,
        row.longitude,
        row.distance_meters,
    ) else {
        return;
    };

    println!(
        "For the Position {} at ({},{})",
        row.position, row.query_latitude, row.query_longitude
    );
    println!(
        "    - has nearest Vehicle {} ({},{}) at Minimum Distance of {:.3} meters",
        label, lat, lon, meters
    );
    println!();
}
