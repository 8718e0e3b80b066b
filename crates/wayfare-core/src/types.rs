//! # Domain Types
//!
//! Core domain types used throughout Wayfare.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     LatLng      │   │   RouteQuery    │   │  RouteResponse  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  lat (f64)      │   │  origin         │   │  distance       │       │
//! │  │  lng (f64)      │   │  destination    │   │  duration(s)    │       │
//! │  │                 │   │  *_coords       │   │  steps          │       │
//! │  └─────────────────┘   │  arrival_time?  │   │  error?         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Endpoint     │   │  RequestMode    │   │  RequestPhase   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Origin         │   │  DirectRoute    │   │  Idle           │       │
//! │  │  Destination    │   │  Predicted-     │   │  Loading        │       │
//! │  │                 │   │    Arrival      │   │  Success/Failed │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Compatibility
//! `RouteQuery` and `RouteResponse` serialize to exactly the JSON bodies the
//! route backend speaks: unresolved coordinates go out as `null`, and
//! `arrival_time` is omitted entirely from a DirectRoute payload.

use serde::{Deserialize, Serialize};

use crate::endpoint::EndpointState;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS-84 coordinate pair.
///
/// Immutable value type; the engine never mutates a coordinate in place,
/// it only replaces the `Option<LatLng>` on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude/longitude degrees.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Parses a `lat,lng` pair (the same shape [`LatLng`] displays as).
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidCoordinate {
            value: value.to_string(),
        };

        let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
        Ok(LatLng {
            lat: lat.trim().parse().map_err(|_| invalid())?,
            lng: lng.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

// =============================================================================
// Endpoint
// =============================================================================

/// Names the two logical slots tracked by the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Where the trip starts.
    Origin,

    /// Where the trip ends.
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Origin => write!(f, "origin"),
            Endpoint::Destination => write!(f, "destination"),
        }
    }
}

// =============================================================================
// Request Mode
// =============================================================================

/// Which backend operation a route request targets.
///
/// ## Selection Rule
/// Mode is a pure function of the arrival-time field and nothing else:
/// a non-empty arrival time targets the prediction endpoint, an empty one
/// targets the plain route endpoint. No slot state participates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Plain route lookup ("leave now").
    DirectRoute,

    /// Latest-departure prediction for a desired arrival time.
    PredictedArrival,
}

impl RequestMode {
    /// Selects the mode for an arrival-time input field.
    pub fn for_arrival_time(arrival_time: &str) -> Self {
        if arrival_time.is_empty() {
            RequestMode::DirectRoute
        } else {
            RequestMode::PredictedArrival
        }
    }
}

impl std::fmt::Display for RequestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestMode::DirectRoute => write!(f, "direct_route"),
            RequestMode::PredictedArrival => write!(f, "predicted_arrival"),
        }
    }
}

// =============================================================================
// Route Query (request body)
// =============================================================================

/// The JSON body sent to the route backend.
///
/// ## Field Policy
/// Addresses and coordinates are passed through exactly as captured from the
/// slot snapshots. Empty addresses and `null` coordinates are allowed on the
/// wire; the backend owns the policy for handling them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    /// Origin address text (may be empty).
    pub origin: String,

    /// Destination address text (may be empty).
    pub destination: String,

    /// Resolved origin coordinate, `null` when unresolved.
    pub origin_coords: Option<LatLng>,

    /// Resolved destination coordinate, `null` when unresolved.
    pub destination_coords: Option<LatLng>,

    /// Desired arrival time (`YYYY-MM-DDTHH:MM`), present only for
    /// prediction requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
}

impl RouteQuery {
    /// Builds the query for a pair of slot snapshots and the arrival field.
    ///
    /// An empty arrival time yields a DirectRoute body (no `arrival_time`
    /// key at all); a non-empty one yields a PredictedArrival body.
    pub fn from_snapshots(
        origin: &EndpointState,
        destination: &EndpointState,
        arrival_time: &str,
    ) -> Self {
        RouteQuery {
            origin: origin.address.clone(),
            destination: destination.address.clone(),
            origin_coords: origin.location,
            destination_coords: destination.location,
            arrival_time: if arrival_time.is_empty() {
                None
            } else {
                Some(arrival_time.to_string())
            },
        }
    }

    /// The backend operation this query targets.
    pub fn mode(&self) -> RequestMode {
        RequestMode::for_arrival_time(self.arrival_time.as_deref().unwrap_or(""))
    }
}

// =============================================================================
// Route Response (response body)
// =============================================================================

/// The JSON body returned by the route backend.
///
/// Every field is optional on the wire; success fields and `error` are
/// mutually informative (a non-empty `error` means the rest should be
/// ignored).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Human-readable distance, e.g. `"12.4 km"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,

    /// Duration without live traffic, e.g. `"20 min"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Traffic-aware duration, preferred over `duration` for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic: Option<String>,

    /// Short route summary, e.g. the main road name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Ordered turn-by-turn instructions. May contain inline markup that
    /// MUST be sanitized before display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,

    /// Recommended departure timestamp for prediction requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_departure_iso: Option<String>,

    /// Backend-provided departure text, e.g. `"Now (real-time estimate)"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_departure: Option<String>,

    /// Backend-reported error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouteResponse {
    /// Returns the backend-reported error, if the body carries a non-empty
    /// one.
    pub fn backend_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

// =============================================================================
// Request Lifecycle
// =============================================================================

/// Lifecycle of the single outstanding route request.
///
/// ## Transitions
/// ```text
/// Idle ──request──► Loading ──ok──► Success(response)
///                      │
///                      └────err───► Failed(message)
///
/// Any new request from any state re-enters Loading immediately.
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestPhase {
    /// No request has been made since startup (or display was cleared).
    #[default]
    Idle,

    /// A request is in flight; previous results are cleared from display.
    Loading,

    /// The last request completed with a usable response.
    Success(RouteResponse),

    /// The last request failed; the message is ready for display.
    Failed(String),
}

impl RequestPhase {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestPhase::Loading)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointState;

    #[test]
    fn test_mode_selection_is_pure_in_arrival_time() {
        assert_eq!(
            RequestMode::for_arrival_time(""),
            RequestMode::DirectRoute
        );
        assert_eq!(
            RequestMode::for_arrival_time("2024-01-01T09:00"),
            RequestMode::PredictedArrival
        );
    }

    #[test]
    fn test_mode_ignores_slot_state() {
        // Identical arrival field, wildly different slots: same mode.
        let empty = EndpointState::default();
        let mut resolved = EndpointState::default();
        resolved.select_suggestion("MG Road, Bengaluru", LatLng::new(12.97, 77.59));

        let a = RouteQuery::from_snapshots(&empty, &empty, "");
        let b = RouteQuery::from_snapshots(&resolved, &resolved, "");
        assert_eq!(a.mode(), RequestMode::DirectRoute);
        assert_eq!(b.mode(), RequestMode::DirectRoute);

        let c = RouteQuery::from_snapshots(&empty, &resolved, "2024-01-01T09:00");
        assert_eq!(c.mode(), RequestMode::PredictedArrival);
    }

    #[test]
    fn test_direct_route_payload_shape() {
        // Origin "A" with no coordinate, destination "B" at {1,1}: the wire
        // body must carry an explicit null for the unresolved coordinate and
        // no arrival_time key at all.
        let mut origin = EndpointState::default();
        origin.set_address_text("A");
        let mut destination = EndpointState::default();
        destination.select_suggestion("B", LatLng::new(1.0, 1.0));

        let query = RouteQuery::from_snapshots(&origin, &destination, "");
        let body = serde_json::to_value(&query).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "origin": "A",
                "destination": "B",
                "origin_coords": null,
                "destination_coords": { "lat": 1.0, "lng": 1.0 },
            })
        );
    }

    #[test]
    fn test_prediction_payload_carries_arrival_time() {
        let origin = EndpointState::default();
        let destination = EndpointState::default();
        let query = RouteQuery::from_snapshots(&origin, &destination, "2024-01-01T09:00");

        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["arrival_time"], "2024-01-01T09:00");
        assert_eq!(query.mode(), RequestMode::PredictedArrival);
    }

    #[test]
    fn test_response_tolerates_sparse_bodies() {
        let response: RouteResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, RouteResponse::default());
        assert!(response.backend_error().is_none());

        let response: RouteResponse =
            serde_json::from_str(r#"{"error": "No suitable departure time found."}"#).unwrap();
        assert_eq!(
            response.backend_error(),
            Some("No suitable departure time found.")
        );
    }

    #[test]
    fn test_empty_error_field_is_not_an_error() {
        let response: RouteResponse = serde_json::from_str(r#"{"error": ""}"#).unwrap();
        assert!(response.backend_error().is_none());
    }

    #[test]
    fn test_latlng_parse_round_trips_display() {
        let coord = LatLng::new(12.9716, 77.5946);
        assert_eq!(LatLng::parse(&coord.to_string()).unwrap(), coord);

        assert!(LatLng::parse("12.97").is_err());
        assert!(LatLng::parse("north,south").is_err());
    }
}
