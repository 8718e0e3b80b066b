//! # wayfare-core: Pure Domain Logic for Wayfare
//!
//! This crate is the **heart** of Wayfare. It contains the race-sensitive
//! slot rules, the wire payload shapes, and the result formatting as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wayfare Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Display Surface (apps/console)                  │   │
//! │  │    Address input ──► Map pick ──► Arrival time ──► Route        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                      wayfare-engine                             │   │
//! │  │    LocationResolver, RouteController, HTTP backend, geocoding   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wayfare-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ endpoint  │  │  format   │  │ sanitize  │  │   │
//! │  │   │  LatLng   │  │  Slots +  │  │  Route-   │  │  markup   │  │   │
//! │  │   │  Route*   │  │generations│  │  Display  │  │ stripping │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK READS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain and wire types (LatLng, RouteQuery, RouteResponse)
//! - [`endpoint`] - Per-slot generation state machine and the slot pair
//! - [`format`] - Result formatter (duration precedence, departure line)
//! - [`sanitize`] - Instruction markup sanitizer
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and clock access is FORBIDDEN here
//! 3. **Generations over ordering**: out-of-order async results are resolved
//!    by counter comparison, never by arrival order
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use wayfare_core::{EndpointState, LatLng};
//!
//! let mut origin = EndpointState::default();
//!
//! // A map pick dispatches an async reverse geocode...
//! let ticket = origin.begin_resolution();
//!
//! // ...but the user selects a suggestion before it completes.
//! origin.select_suggestion("MG Road, Bengaluru", LatLng::new(12.975, 77.606));
//!
//! // The late reverse-geocode result lost the race and is discarded.
//! assert!(!origin.apply_resolution(ticket, "Somewhere Else", LatLng::new(0.0, 0.0)));
//! assert_eq!(origin.address, "MG Road, Bengaluru");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod endpoint;
pub mod error;
pub mod format;
pub mod sanitize;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use wayfare_core::LatLng` instead of
// `use wayfare_core::types::LatLng`

pub use endpoint::{EndpointState, SlotPair};
pub use error::{CoreError, CoreResult};
pub use format::{format_route, validate_arrival_time, RouteDisplay, VALUE_PLACEHOLDER};
pub use sanitize::sanitize_instruction;
pub use types::{Endpoint, LatLng, RequestMode, RequestPhase, RouteQuery, RouteResponse};
