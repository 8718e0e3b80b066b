//! # Wayfare Console Entry Point
//!
//! Interactive line-oriented frontend over the Wayfare engine.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load engine configuration (file + env)
//! 3. Build the geocoder, resolver, backend, and controller
//! 4. Wire suggestion streams and enter the REPL
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wayfare Console                                  │
//! │                                                                         │
//! │  stdin ──► ConsoleSession ──► LocationResolver ──► StaticGeocoder      │
//! │                    │                                                    │
//! │                    └────────► RouteController ──► HTTP backend         │
//! │                                                   (/get_route,         │
//! │                                                    /predict)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wayfare_core::LatLng;
use wayfare_engine::{
    EngineConfig, HttpRouteBackend, LocationResolver, RouteController, StaticGeocoder,
};

use crate::commands::{ConsoleSession, Flow};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Wayfare console");

    // Load configuration
    let config = EngineConfig::load()?;

    // Build the engine
    let geocoder = demo_geocoder();
    let resolver = LocationResolver::new(Arc::new(geocoder.clone()), config.geocode_timeout());
    let backend = HttpRouteBackend::new(&config.backend.base_url, config.request_timeout())?;
    let controller = RouteController::new(Arc::new(backend));

    let mut session = ConsoleSession::new(resolver, controller, geocoder);

    println!("wayfare: plan a trip ('help' for commands)");
    println!("backend: {}", config.backend.base_url);

    // REPL loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("wayfare> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };

        if session.handle(&line).await == Flow::Quit {
            break;
        }
    }

    info!("Console session ended");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=wayfare_engine=trace` - Trace the engine only
/// - Default: WARN (the REPL owns stdout; logs stay out of the way)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The built-in gazetteer behind `suggest`/`choose`/`map`.
///
/// Stands in for a real autocomplete/geocoding provider so the console works
/// offline; the route backend is still a live HTTP service.
fn demo_geocoder() -> StaticGeocoder {
    StaticGeocoder::new([
        ("MG Road, Bengaluru", LatLng::new(12.9756, 77.6050)),
        ("Koramangala, Bengaluru", LatLng::new(12.9352, 77.6245)),
        ("Indiranagar, Bengaluru", LatLng::new(12.9719, 77.6412)),
        ("Whitefield, Bengaluru", LatLng::new(12.9698, 77.7500)),
        ("Kempegowda Intl Airport, Bengaluru", LatLng::new(13.1986, 77.7066)),
        ("Connaught Place, New Delhi", LatLng::new(28.6315, 77.2167)),
        ("Gateway of India, Mumbai", LatLng::new(18.9220, 72.8347)),
        ("Marine Drive, Mumbai", LatLng::new(18.9432, 72.8236)),
    ])
}
