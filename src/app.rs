use clap::Parser;
use colored::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;
use crate::domain::types::SafeZone;
use crate::export::write_safe_zones_csv;
use crate::providers::{MapboxGeocoder, RoutingProvider};
use crate::session::EvacuationSession;

#[derive(Debug, Parser)]
#[command(
    name = "evac-finder",
    about = "Find safe zones around a location and route to the nearest shelter"
)]
pub struct Args {
    /// Place name or "longitude,latitude"
    #[arg(short, long)]
    pub location: String,

    /// Also look up a route to the nearest reachable safe zone
    #[arg(short, long)]
    pub route: bool,

    /// Seed for reproducible safe zones
    #[arg(long)]
    pub seed: Option<u64>,

    /// Routing provider (mapbox or osrm), overrides ROUTING_PROVIDER
    #[arg(long)]
    pub provider: Option<String>,

    /// Write the generated safe zones to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .try_init()?;

    dotenv::dotenv().ok();
    Ok(())
}

fn print_safe_zones(zones: &[SafeZone]) {
    if zones.is_empty() {
        println!("{}", "No safe zones could be placed around this location".yellow());
        return;
    }

    println!("{}", format!("{} Safe Zones Available!", zones.len()).green());
    for zone in zones {
        println!(
            "  {} ({:.5}, {:.5}) capacity: {} people",
            zone.name.bold(),
            zone.location.lng(),
            zone.location.lat(),
            zone.capacity
        );
    }
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;
    let args = Args::parse();

    let mut settings = Settings::from_env();
    if let Some(provider) = &args.provider {
        settings.routing_provider = provider.to_lowercase();
    }

    let geocoder = match MapboxGeocoder::from_settings(&settings) {
        Ok(g) => Some(g),
        Err(e) => {
            warn!("Geocoding disabled: {}", e);
            None
        }
    };
    let router = if args.route {
        Some(RoutingProvider::from_settings(&settings)?)
    } else {
        None
    };
    let rng = match args.seed {
        Some(seed) => {
            info!("Seeding safe zone generator with {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = EvacuationSession::new(geocoder, router, rng);

    let span = info_span!("search", location = %args.location);
    match session.submit_location(&args.location).instrument(span).await {
        Ok(zones) => print_safe_zones(zones),
        Err(e) => {
            println!("{}", e.to_string().red());
            return Err(e.into());
        }
    }

    if let Some(path) = &args.csv {
        write_safe_zones_csv(path, session.safe_zones())?;
        println!("Saved safe zones to {}", path.display());
    }

    if args.route {
        match session.route_to_nearest_shelter().await {
            Ok(route) => println!("{}", route.summary().green()),
            Err(e) => println!(
                "{}",
                format!("No accessible route to any shelter found ({e}). Try another location.")
                    .red()
            ),
        }
    }

    Ok(())
}
