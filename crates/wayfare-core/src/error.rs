//! # Error Types
//!
//! Domain-specific error types for wayfare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wayfare-core errors (this file)                                       │
//! │  └── CoreError        - Input parsing/validation failures              │
//! │                                                                         │
//! │  wayfare-engine errors (separate crate)                                │
//! │  ├── GeocodeError     - Provider lookup failures (best-effort)         │
//! │  ├── BackendError     - Route backend transport/decode failures        │
//! │  └── EngineError      - Configuration and wiring failures              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending value in the message
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core domain errors.
///
/// These cover user-input parsing only; the race/lifecycle rules in this
/// crate never error; a stale result is a silent no-op by design.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An arrival-time string that is neither empty nor a parseable
    /// timestamp.
    #[error("Invalid arrival time {value:?}, expected YYYY-MM-DDTHH:MM")]
    InvalidArrivalTime { value: String },

    /// A coordinate string that is not a `lat,lng` pair.
    #[error("Invalid coordinate {value:?}, expected lat,lng")]
    InvalidCoordinate { value: String },
}
