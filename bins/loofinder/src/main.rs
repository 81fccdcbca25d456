//! loofinder: cluster, rank and inspect restroom locations from the command line.

use clap::{Parser, Subcommand};
use loofinder_places::{Amenity, SortOrder};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod output;

use config::Config;
use output::Status;

/// Exit code when the configuration cannot be loaded
const EXIT_CONFIG_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "loofinder")]
#[command(author, version, about = "Cluster, rank and inspect public restroom locations")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a loofinder.toml configuration file
    #[arg(short, long, global = true, env = "LOOFINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print collected metrics as JSON to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group nearby restrooms into map clusters
    #[command(allow_negative_numbers = true)]
    Cluster {
        /// JSON file of restroom records ("-" or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Clustering radius in km; repeat for several zoom levels
        #[arg(short, long = "radius")]
        radius: Vec<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Great-circle distance between two coordinates
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,

        /// Report meters instead of kilometers
        #[arg(long)]
        meters: bool,
    },

    /// List restrooms near a location, filtered and sorted
    #[command(allow_negative_numbers = true)]
    Nearby {
        /// JSON file of restroom records ("-" or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Latitude to search from (defaults to the configured location)
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude to search from
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Search radius in km
        #[arg(short, long)]
        radius: Option<f64>,

        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<f64>,

        /// Minimum cleanliness (0-5)
        #[arg(long)]
        min_cleanliness: Option<f64>,

        /// Required amenity; repeat for several
        #[arg(short, long = "amenity", value_parser = parse_amenity)]
        amenity: Vec<Amenity>,

        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Sort by distance, rating or name
        #[arg(short, long, default_value = "distance", value_parser = parse_sort)]
        sort: SortOrder,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a location payload (lat/lng object, GeoJSON or WKT)
    ParseLocation {
        /// JSON value, or a bare WKT string
        location: String,
    },

    /// Show the effective configuration
    Config,
}

fn parse_amenity(s: &str) -> Result<Amenity, String> {
    s.parse()
}

fn parse_sort(s: &str) -> Result<SortOrder, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_path) = match Config::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            Status::error(&format!("{:#}", e));
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if let Err(e) = loofinder_telemetry::init_with_config(config.logging.telemetry(cli.verbose)) {
        Status::warning(&format!("Logging disabled: {:#}", e));
    }
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let result = match cli.command {
        Commands::Cluster { input, radius, json } => commands::cluster(&config, input.as_deref(), radius, json),
        Commands::Distance { lat1, lng1, lat2, lng2, meters } => {
            commands::distance(lat1, lng1, lat2, lng2, meters);
            Ok(())
        }
        Commands::Nearby {
            input,
            lat,
            lng,
            radius,
            min_rating,
            min_cleanliness,
            amenity,
            category,
            sort,
            limit,
            json,
        } => {
            let query = commands::NearbyQuery {
                origin: lat.zip(lng),
                radius_km: radius,
                min_rating,
                min_cleanliness,
                amenities: amenity,
                category,
                sort,
                limit,
                json,
            };
            commands::nearby(&config, input.as_deref(), query)
        }
        Commands::ParseLocation { location } => commands::parse_location(&location),
        Commands::Config => commands::show_config(&config, config_path.as_deref()),
    };

    if cli.metrics {
        let report = loofinder_telemetry::metrics().export_json();
        match serde_json::to_string_pretty(&report) {
            Ok(text) => eprintln!("{}", text),
            Err(e) => Status::warning(&format!("Could not export metrics: {}", e)),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
