//! # Geocoding Capability Port
//!
//! Abstracts the external geocoding/autocomplete provider behind a trait so
//! the synchronization engine never knows a provider wire format.
//!
//! ## Port Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Geocoding Capability Port                           │
//! │                                                                         │
//! │  reverse_geocode(coord) ──────► address | AddressNotFound | Provider   │
//! │                                  (async, awaited by map picks)         │
//! │                                                                         │
//! │  geocode(text) ───────────────► (address, coord)                       │
//! │                                  (forward lookup; present for          │
//! │                                   completeness, no engine flow         │
//! │                                   calls it)                            │
//! │                                                                         │
//! │  suggestion_channel() ────────► mpsc stream of SuggestionSelection     │
//! │                                  (each element is a user-confirmed     │
//! │                                   pick from the autocomplete list,     │
//! │                                   already resolved by the provider)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Real provider adapters live outside this workspace; [`StaticGeocoder`]
//! is the in-memory implementation used by the console app and the tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use wayfare_core::LatLng;

use crate::error::{GeocodeError, GeocodeResult};

// =============================================================================
// Suggestion Stream
// =============================================================================

/// One user-confirmed pick from a provider's autocomplete list.
///
/// The provider has already resolved the pair, so applying it needs no
/// geocode round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSelection {
    /// The formatted address the user picked.
    pub address: String,

    /// The provider-resolved coordinate for that address.
    pub location: LatLng,
}

/// Sender half of a suggestion stream (held by the input surface).
pub type SuggestionSender = mpsc::UnboundedSender<SuggestionSelection>;

/// Receiver half of a suggestion stream (consumed by a resolver binding).
pub type SuggestionReceiver = mpsc::UnboundedReceiver<SuggestionSelection>;

/// Creates the suggestion stream for one text input.
///
/// The surface that owns the input keeps the sender and pushes an element
/// whenever the user confirms a suggestion; the resolver attaches the
/// receiver to a slot exactly once per logical binding.
pub fn suggestion_channel() -> (SuggestionSender, SuggestionReceiver) {
    mpsc::unbounded_channel()
}

// =============================================================================
// Provider Trait
// =============================================================================

/// The geocoding provider port.
///
/// Implementations must be cheap to share (`Arc`) and must not retry
/// internally; a failed lookup is terminal for the triggering user action.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolves a coordinate to a human-readable address.
    async fn reverse_geocode(&self, location: LatLng) -> GeocodeResult<String>;

    /// Resolves free address text to a confirmed (address, coordinate) pair.
    ///
    /// Present for completeness; suggestion selection already supplies a
    /// resolved pair, so no engine flow calls this.
    async fn geocode(&self, query: &str) -> GeocodeResult<(String, LatLng)>;
}

// =============================================================================
// Static Geocoder (in-memory provider)
// =============================================================================

/// How far (in degrees, per axis) a reverse lookup may snap to a known
/// place before reporting `AddressNotFound`.
const REVERSE_SNAP_DEGREES: f64 = 0.25;

/// An in-memory provider backed by a fixed gazetteer table.
///
/// Used by the console app and the engine tests; real deployments plug a
/// provider adapter into the same trait.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: Vec<(String, LatLng)>,
}

impl StaticGeocoder {
    /// Creates a geocoder over the given (address, coordinate) table.
    pub fn new<I, S>(places: I) -> Self
    where
        I: IntoIterator<Item = (S, LatLng)>,
        S: Into<String>,
    {
        StaticGeocoder {
            places: places
                .into_iter()
                .map(|(name, loc)| (name.into(), loc))
                .collect(),
        }
    }

    /// Returns the entries matching a query, autocomplete-style.
    ///
    /// This is the "suggestion list" a surface shows; confirming one of the
    /// returned selections is what feeds the suggestion stream.
    pub fn suggest(&self, query: &str) -> Vec<SuggestionSelection> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.places
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .map(|(name, location)| SuggestionSelection {
                address: name.clone(),
                location: *location,
            })
            .collect()
    }

    fn nearest(&self, location: LatLng) -> Option<&(String, LatLng)> {
        self.places
            .iter()
            .filter(|(_, place)| {
                (place.lat - location.lat).abs() <= REVERSE_SNAP_DEGREES
                    && (place.lng - location.lng).abs() <= REVERSE_SNAP_DEGREES
            })
            .min_by(|(_, a), (_, b)| {
                let da = (a.lat - location.lat).powi(2) + (a.lng - location.lng).powi(2);
                let db = (b.lat - location.lat).powi(2) + (b.lng - location.lng).powi(2);
                da.total_cmp(&db)
            })
    }
}

#[async_trait]
impl GeocodingProvider for StaticGeocoder {
    async fn reverse_geocode(&self, location: LatLng) -> GeocodeResult<String> {
        match self.nearest(location) {
            Some((name, _)) => Ok(name.clone()),
            None => Err(GeocodeError::AddressNotFound),
        }
    }

    async fn geocode(&self, query: &str) -> GeocodeResult<(String, LatLng)> {
        self.suggest(query)
            .into_iter()
            .next()
            .map(|s| (s.address, s.location))
            .ok_or(GeocodeError::AddressNotFound)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
