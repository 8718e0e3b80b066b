//! # wayfare-engine: Async Engine for Wayfare
//!
//! This crate provides the asynchronous layer of Wayfare: the slot
//! synchronization engine, the route request controller, the geocoding
//! capability port, and the HTTP backend client.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Wayfare Engine Architecture                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 LocationResolver (Synchronization)               │  │
//! │  │                                                                  │  │
//! │  │  Owns both endpoint slots behind one mutex                      │  │
//! │  │  Typed text / suggestion stream / map picks / swap              │  │
//! │  │  Generation-guarded apply for async reverse-geocode results     │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ snapshot()                              │
//! │                               ▼                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ RouteController│  │ GeocodingPort  │  │  HttpRouteBackend      │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Epoch-guarded  │  │ reverse/forward│  │ POST /get_route        │    │
//! │  │ single request │  │ lookup trait + │  │ POST /predict          │    │
//! │  │ lifecycle      │  │ suggestion mpsc│  │ JSON both ways         │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  RACE POLICY:                                                          │
//! │  • Stale results (slot generation or request epoch mismatch) are      │
//! │    dropped entirely - never queued, never retried, never surfaced     │
//! │  • Cancellation is soft: in-flight calls run to completion with       │
//! │    their effects suppressed                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`resolver`] - Location resolution synchronization engine
//! - [`controller`] - Route request controller with stale suppression
//! - [`geocode`] - Geocoding capability port + suggestion streams
//! - [`backend`] - HTTP implementation of the route backend port
//! - [`config`] - Engine configuration (file + env)
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wayfare_core::Endpoint;
//! use wayfare_engine::{
//!     EngineConfig, HttpRouteBackend, LocationResolver, RouteController, StaticGeocoder,
//! };
//!
//! let config = EngineConfig::load()?;
//! let resolver = LocationResolver::new(Arc::new(geocoder), config.geocode_timeout());
//! let backend = HttpRouteBackend::new(&config.backend.base_url, config.request_timeout())?;
//! let controller = RouteController::new(Arc::new(backend));
//!
//! resolver.set_address_text(Endpoint::Origin, "MG Road");
//! let (origin, destination) = resolver.snapshot();
//! controller.request_route(&origin, &destination, "").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod geocode;
pub mod resolver;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::HttpRouteBackend;
pub use config::{BackendSettings, EngineConfig, GeocodeSettings};
pub use controller::{RequestOutcome, RouteBackend, RouteController, NETWORK_ERROR_MESSAGE};
pub use error::{
    BackendError, BackendResult, EngineError, EngineResult, GeocodeError, GeocodeResult,
};
pub use geocode::{
    suggestion_channel, GeocodingProvider, StaticGeocoder, SuggestionReceiver, SuggestionSelection,
    SuggestionSender,
};
pub use resolver::{LocationResolver, MapPickOutcome, SuggestionBinding};
