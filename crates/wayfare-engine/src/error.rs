//! # Engine Error Types
//!
//! Error types for the async engine layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Geocoding    │  │    Backend      │  │    Configuration        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  AddressNotFound│  │  Request        │  │  InvalidConfig          │ │
//! │  │  Provider       │  │  Decode         │  │  ConfigLoadFailed       │ │
//! │  │                 │  │                 │  │  InvalidUrl             │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Geocode failures are best-effort: the slot is left unchanged and     │
//! │  nothing is surfaced. Backend failures collapse into one generic      │
//! │  user-facing connectivity message. Config failures are startup-fatal. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Geocoding Errors
// =============================================================================

/// Result type alias for geocoding operations.
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Reverse/forward geocode lookup failures.
///
/// Both variants are handled best-effort by the resolver: the slot is left
/// unchanged and the failure is logged at debug level only. A bounded-wait
/// expiry is classified as [`GeocodeError::Provider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The provider had no address for the requested point.
    #[error("No address found for the requested location")]
    AddressNotFound,

    /// The provider failed or timed out.
    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Result type alias for route backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Route backend transport/decode failures.
///
/// These never reach the user verbatim: the controller collapses every
/// variant into the single generic connectivity message. Backend-REPORTED
/// errors (a non-empty `error` field in a decoded body) are not errors at
/// this layer; they arrive inside a successful response.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or no response arrived in time.
    #[error("Route request failed: {0}")]
    Request(String),

    /// The response body was not a parseable route response.
    #[error("Route response could not be decoded: {0}")]
    Decode(String),
}

// =============================================================================
// Engine Errors
// =============================================================================

/// Result type alias for engine setup operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Configuration and wiring failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid engine configuration.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// The backend base URL does not parse.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}
