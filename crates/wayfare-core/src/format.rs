//! # Result Formatter
//!
//! Pure projection of a raw [`RouteResponse`] plus the arrival-time input
//! into display-ready fields. Owns no state and performs no I/O; every
//! rendering rule a display surface needs lives here so the console app (and
//! any future shell) stays a dumb renderer.
//!
//! ## Formatting Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  duration   duration_in_traffic ?? duration ?? "—"                      │
//! │  distance   distance ?? "—"                                             │
//! │                                                                         │
//! │  departure  (a) arrival set AND recommended_departure_iso parses:       │
//! │                 "Leave by 08:30 AM to arrive by 09:00 AM"               │
//! │             (b) else suggested_departure verbatim                       │
//! │             (c) else no line                                            │
//! │                                                                         │
//! │  summary    verbatim when present                                       │
//! │  steps      each instruction sanitized before display                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clock strings render with a fixed 12-hour `%I:%M %p` format so the output
//! is deterministic for a fixed locale/timezone.

use chrono::{DateTime, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult};
use crate::sanitize::sanitize_instruction;
use crate::types::RouteResponse;

/// Placeholder rendered for absent distance/duration values.
pub const VALUE_PLACEHOLDER: &str = "—";

// =============================================================================
// Display Fields
// =============================================================================

/// Display-ready projection of one route response.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDisplay {
    /// Travel time, traffic-aware when the backend provided it.
    pub duration: String,

    /// Route distance.
    pub distance: String,

    /// Departure suggestion line, when one applies.
    pub departure: Option<String>,

    /// Route summary (main road name), verbatim.
    pub summary: Option<String>,

    /// Sanitized turn-by-turn instructions, in order.
    pub steps: Vec<String>,
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats a route response for display.
pub fn format_route(response: &RouteResponse, arrival_time: &str) -> RouteDisplay {
    let duration = response
        .duration_in_traffic
        .clone()
        .or_else(|| response.duration.clone())
        .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string());

    let distance = response
        .distance
        .clone()
        .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string());

    RouteDisplay {
        duration,
        distance,
        departure: departure_line(response, arrival_time),
        summary: response.summary.clone().filter(|s| !s.is_empty()),
        steps: response
            .steps
            .iter()
            .map(|s| sanitize_instruction(s))
            .collect(),
    }
}

/// Builds the departure suggestion line.
///
/// The computed "Leave by X to arrive by Y" form wins only when the user
/// asked for an arrival time AND the backend recommended a departure AND
/// both timestamps parse; anything else falls back to the backend's verbatim
/// `suggested_departure`, or to no line at all. A timestamp that fails to
/// parse must not render a garbage clock.
fn departure_line(response: &RouteResponse, arrival_time: &str) -> Option<String> {
    if !arrival_time.is_empty() {
        if let Some(iso) = response.recommended_departure_iso.as_deref() {
            if let (Some(leave), Some(arrive)) = (format_clock(iso), format_clock(arrival_time)) {
                return Some(format!("Leave by {leave} to arrive by {arrive}"));
            }
        }
    }

    response
        .suggested_departure
        .clone()
        .filter(|s| !s.is_empty())
}

// =============================================================================
// Clock Rendering
// =============================================================================

/// Renders the wall-clock hour:minute of a timestamp (`08:30 AM`).
///
/// Returns `None` when the timestamp does not parse.
pub fn format_clock(timestamp: &str) -> Option<String> {
    wall_clock(timestamp).map(|t| t.format("%I:%M %p").to_string())
}

/// Extracts the local wall-clock time from a timestamp string.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset (`2024-01-01T08:30:00+05:30`), rendered at the
///   stated offset's wall clock, which keeps the output deterministic
/// - naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` (the datetime-local input shape)
fn wall_clock(timestamp: &str) -> Option<NaiveTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.naive_local().time());
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map(|dt| dt.time())
}

/// Validates an arrival-time input before it is stored.
///
/// Display surfaces call this when the user edits the field. The request
/// path deliberately does NOT: whatever string is stored at request time is
/// sent as-is (the backend owns arrival-time policy).
pub fn validate_arrival_time(value: &str) -> CoreResult<()> {
    if value.is_empty() || wall_clock(value).is_some() {
        Ok(())
    } else {
        Err(CoreError::InvalidArrivalTime {
            value: value.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> RouteResponse {
        RouteResponse {
            distance: Some("12.4 km".to_string()),
            duration: Some("20 min".to_string()),
            duration_in_traffic: Some("35 min".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_traffic_duration_is_strictly_preferred() {
        let display = format_route(&response(), "");
        assert_eq!(display.duration, "35 min");
        assert_eq!(display.distance, "12.4 km");
    }

    #[test]
    fn test_duration_falls_back_then_placeholder() {
        let mut r = response();
        r.duration_in_traffic = None;
        assert_eq!(format_route(&r, "").duration, "20 min");

        r.duration = None;
        assert_eq!(format_route(&r, "").duration, "—");

        r.distance = None;
        assert_eq!(format_route(&r, "").distance, "—");
    }

    #[test]
    fn test_departure_line_exact_rendering() {
        let mut r = response();
        r.recommended_departure_iso = Some("2024-01-01T08:30".to_string());

        let display = format_route(&r, "2024-01-01T09:00");
        assert_eq!(
            display.departure.as_deref(),
            Some("Leave by 08:30 AM to arrive by 09:00 AM")
        );
    }

    #[test]
    fn test_departure_line_afternoon_clock() {
        let mut r = response();
        r.recommended_departure_iso = Some("2024-01-01T17:45:00".to_string());

        let display = format_route(&r, "2024-01-01T18:30");
        assert_eq!(
            display.departure.as_deref(),
            Some("Leave by 05:45 PM to arrive by 06:30 PM")
        );
    }

    #[test]
    fn test_departure_line_with_offset_timestamp() {
        // The prediction backend emits RFC 3339 with the search timezone's
        // offset; the clock renders at that offset's wall time.
        let mut r = response();
        r.recommended_departure_iso = Some("2024-01-01T08:30:00+05:30".to_string());

        let display = format_route(&r, "2024-01-01T09:00");
        assert_eq!(
            display.departure.as_deref(),
            Some("Leave by 08:30 AM to arrive by 09:00 AM")
        );
    }

    #[test]
    fn test_suggested_departure_requires_no_arrival_time() {
        let mut r = response();
        r.suggested_departure = Some("Now (real-time estimate)".to_string());

        let display = format_route(&r, "");
        assert_eq!(display.departure.as_deref(), Some("Now (real-time estimate)"));
    }

    #[test]
    fn test_recommendation_wins_over_suggested_departure() {
        let mut r = response();
        r.recommended_departure_iso = Some("2024-01-01T08:30".to_string());
        r.suggested_departure = Some("Now (real-time estimate)".to_string());

        let display = format_route(&r, "2024-01-01T09:00");
        assert_eq!(
            display.departure.as_deref(),
            Some("Leave by 08:30 AM to arrive by 09:00 AM")
        );
    }

    #[test]
    fn test_unparseable_recommendation_falls_through() {
        let mut r = response();
        r.recommended_departure_iso = Some("not a timestamp".to_string());
        r.suggested_departure = Some("Leave soon".to_string());

        let display = format_route(&r, "2024-01-01T09:00");
        assert_eq!(display.departure.as_deref(), Some("Leave soon"));

        r.suggested_departure = None;
        let display = format_route(&r, "2024-01-01T09:00");
        assert_eq!(display.departure, None);
    }

    #[test]
    fn test_steps_are_sanitized() {
        let mut r = response();
        r.steps = vec![
            "Turn <b>left</b> onto <b>MG Road</b>".to_string(),
            "<script>alert(1)</script>Continue straight".to_string(),
        ];

        let display = format_route(&r, "");
        assert_eq!(
            display.steps,
            vec![
                "Turn left onto MG Road".to_string(),
                "Continue straight".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_summary_is_omitted() {
        let mut r = response();
        r.summary = Some(String::new());
        assert_eq!(format_route(&r, "").summary, None);

        r.summary = Some("NH 48".to_string());
        assert_eq!(format_route(&r, "").summary.as_deref(), Some("NH 48"));
    }

    #[test]
    fn test_validate_arrival_time() {
        assert!(validate_arrival_time("").is_ok());
        assert!(validate_arrival_time("2024-01-01T09:00").is_ok());
        assert!(validate_arrival_time("2024-01-01T09:00:30").is_ok());
        assert!(validate_arrival_time("tomorrow-ish").is_err());
        assert!(validate_arrival_time("09:00").is_err());
    }
}
