//! # Endpoint Slots
//!
//! Per-endpoint (origin/destination) "address + coordinate" state with the
//! generation bookkeeping that keeps three out-of-order input sources
//! consistent.
//!
//! ## Why a Generation Counter?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Input Sources Racing for One Slot                      │
//! │                                                                         │
//! │  Typed text ───────────► set_address_text     (synchronous)            │
//! │                                                                         │
//! │  Autocomplete pick ────► select_suggestion    (async event, pre-       │
//! │                                                 resolved by provider)  │
//! │                                                                         │
//! │  Map pick ─────────────► begin_resolution ──► reverse geocode ──┐      │
//! │                                                (async, slow)    │      │
//! │                          apply_resolution ◄─────────────────────┘      │
//! │                                                                         │
//! │  Every accepted mutation bumps `generation` by exactly 1. A reverse-   │
//! │  geocode result is applied only if the generation captured at dispatch │
//! │  still matches - otherwise it lost the race and is dropped silently.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the counter, a slow reverse geocode from an earlier map pick
//! could land after a newer suggestion selection and clobber it. Ordering is
//! enforced only by generation comparison, never by arrival order.

use serde::{Deserialize, Serialize};

use crate::types::{Endpoint, LatLng};

// =============================================================================
// Endpoint State
// =============================================================================

/// The current value of one endpoint slot.
///
/// ## Invariants
/// - `generation` increases by exactly 1 on every accepted mutation
/// - a stale async resolution never mutates the slot (checked via
///   [`EndpointState::apply_resolution`])
/// - `location` is only ever set together with the address that produced it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointState {
    /// Display address text. May be empty or free-form typed text that was
    /// never resolved to a coordinate.
    pub address: String,

    /// Resolved coordinate, if any input source has produced one.
    pub location: Option<LatLng>,

    /// Mutation epoch for this slot.
    pub generation: u64,
}

impl EndpointState {
    /// Overwrites the address text from keyboard input.
    ///
    /// Typing alone never resolves a coordinate: the previous `location` is
    /// left in place until an explicit selection replaces it.
    pub fn set_address_text(&mut self, text: &str) {
        self.generation += 1;
        self.address = text.to_string();
    }

    /// Applies a provider-confirmed suggestion selection.
    ///
    /// The provider already resolved the pair, so both fields change
    /// atomically with no geocode round-trip.
    pub fn select_suggestion(&mut self, address: &str, location: LatLng) {
        self.generation += 1;
        self.address = address.to_string();
        self.location = Some(location);
    }

    /// Marks the start of an async resolution (a map pick) and returns the
    /// dispatch ticket.
    ///
    /// The bump happens here, synchronously, before any async work starts:
    /// it both invalidates older in-flight resolutions for this slot and
    /// produces the ticket the eventual result must present.
    pub fn begin_resolution(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Applies a finished resolution if the slot is still on the dispatch
    /// ticket's generation.
    ///
    /// Returns `true` when applied. A `false` return means the resolution
    /// lost the race to a newer mutation; the slot is left untouched and the
    /// caller must not retry.
    pub fn apply_resolution(&mut self, ticket: u64, address: &str, location: LatLng) -> bool {
        if self.generation != ticket {
            return false;
        }
        self.generation += 1;
        self.address = address.to_string();
        self.location = Some(location);
        true
    }
}

// =============================================================================
// Slot Pair
// =============================================================================

/// Both endpoint slots, owned together so `swap` and snapshots are atomic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotPair {
    /// The origin slot.
    pub origin: EndpointState,

    /// The destination slot.
    pub destination: EndpointState,
}

impl SlotPair {
    /// Creates an empty pair (both slots blank at generation 0).
    pub fn new() -> Self {
        SlotPair::default()
    }

    /// Borrows one slot.
    pub fn slot(&self, endpoint: Endpoint) -> &EndpointState {
        match endpoint {
            Endpoint::Origin => &self.origin,
            Endpoint::Destination => &self.destination,
        }
    }

    /// Mutably borrows one slot.
    pub fn slot_mut(&mut self, endpoint: Endpoint) -> &mut EndpointState {
        match endpoint {
            Endpoint::Origin => &mut self.origin,
            Endpoint::Destination => &mut self.destination,
        }
    }

    /// Exchanges the two complete slot states in a single step.
    ///
    /// Generations travel with their states (swap is not a per-slot
    /// mutation), which makes a double swap restore the pair bit-for-bit.
    /// Must never trigger geocoding as a side effect, and cannot: this is a
    /// plain memory exchange.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    /// Clones both slots for a consistent read.
    pub fn snapshot(&self) -> (EndpointState, EndpointState) {
        (self.origin.clone(), self.destination.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_accepted_mutation_bumps_generation_once() {
        let mut slot = EndpointState::default();
        slot.set_address_text("MG Road");
        assert_eq!(slot.generation, 1);

        slot.select_suggestion("MG Road, Bengaluru", LatLng::new(12.97, 77.59));
        assert_eq!(slot.generation, 2);

        let ticket = slot.begin_resolution();
        assert_eq!(ticket, 3);
        assert!(slot.apply_resolution(ticket, "Church Street", LatLng::new(12.975, 77.6)));
        assert_eq!(slot.generation, 4);
    }

    #[test]
    fn test_typing_never_clears_location() {
        let mut slot = EndpointState::default();
        slot.select_suggestion("Koramangala", LatLng::new(12.93, 77.62));

        slot.set_address_text("Koramang");
        assert_eq!(slot.address, "Koramang");
        // Coordinate survives until an explicit selection replaces it.
        assert_eq!(slot.location, Some(LatLng::new(12.93, 77.62)));
    }

    #[test]
    fn test_stale_resolution_is_discarded_without_state_change() {
        let mut slot = EndpointState::default();
        let ticket = slot.begin_resolution();

        // A newer suggestion selection supersedes the in-flight resolution.
        slot.select_suggestion("Indiranagar", LatLng::new(12.97, 77.64));
        let before = slot.clone();

        assert!(!slot.apply_resolution(ticket, "Old Pick", LatLng::new(0.0, 0.0)));
        assert_eq!(slot, before);
    }

    #[test]
    fn test_last_current_resolution_wins_regardless_of_completion_order() {
        // Two map picks dispatched back to back; the FIRST one completes
        // LAST. Only the second pick's result may land.
        let mut slot = EndpointState::default();
        let slow = slot.begin_resolution();
        let fast = slot.begin_resolution();

        assert!(slot.apply_resolution(fast, "Second Pick", LatLng::new(2.0, 2.0)));
        assert!(!slot.apply_resolution(slow, "First Pick", LatLng::new(1.0, 1.0)));

        assert_eq!(slot.address, "Second Pick");
        assert_eq!(slot.location, Some(LatLng::new(2.0, 2.0)));
    }

    #[test]
    fn test_interleaved_sources_generation_monotonicity() {
        let mut slot = EndpointState::default();

        let pick_a = slot.begin_resolution();
        slot.set_address_text("typed over it");
        let pick_b = slot.begin_resolution();
        slot.select_suggestion("Final Answer", LatLng::new(9.0, 9.0));

        // Both in-flight resolutions were superseded before completing.
        assert!(!slot.apply_resolution(pick_b, "B", LatLng::new(2.0, 2.0)));
        assert!(!slot.apply_resolution(pick_a, "A", LatLng::new(1.0, 1.0)));

        assert_eq!(slot.address, "Final Answer");
        assert_eq!(slot.location, Some(LatLng::new(9.0, 9.0)));
    }

    #[test]
    fn test_swap_is_self_inverse_bit_for_bit() {
        let mut pair = SlotPair::new();
        pair.origin.select_suggestion("A", LatLng::new(1.0, 1.0));
        pair.origin.set_address_text("A edited");
        pair.destination.set_address_text("B");

        let before = pair.clone();
        pair.swap();
        assert_ne!(pair, before);
        pair.swap();
        assert_eq!(pair, before);
    }

    #[test]
    fn test_swap_exchanges_generations_with_their_slots() {
        let mut pair = SlotPair::new();
        pair.origin.set_address_text("A");
        pair.origin.set_address_text("A2");
        pair.destination.set_address_text("B");

        pair.swap();
        assert_eq!(pair.origin.address, "B");
        assert_eq!(pair.origin.generation, 1);
        assert_eq!(pair.destination.address, "A2");
        assert_eq!(pair.destination.generation, 2);
    }

    #[test]
    fn test_swap_triggers_no_resolution() {
        // Swap is a plain exchange; neither slot gains a coordinate it did
        // not already have.
        let mut pair = SlotPair::new();
        pair.origin.set_address_text("typed only");
        pair.destination.select_suggestion("B", LatLng::new(1.0, 1.0));

        pair.swap();
        assert_eq!(pair.destination.location, None);
        assert_eq!(pair.origin.location, Some(LatLng::new(1.0, 1.0)));
    }
}
