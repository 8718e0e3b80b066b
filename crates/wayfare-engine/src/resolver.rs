//! # Location Resolution Synchronization Engine
//!
//! Orchestrates every mutation of the two endpoint slots: typed text,
//! suggestion selections arriving on a stream, map picks that need an async
//! reverse geocode, and the atomic swap.
//!
//! ## Race Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LocationResolver Data Flow                          │
//! │                                                                         │
//! │  set_address_text ────────────┐                                        │
//! │  select_suggestion ───────────┤                                        │
//! │  (suggestion stream) ─────────┼──► Mutex<SlotPair> ◄── swap/snapshot   │
//! │                               │         ▲                               │
//! │  pick_on_map ── begin ────────┘         │ apply iff generation         │
//! │       │                                 │ still matches                │
//! │       └──► reverse_geocode (await) ─────┘                               │
//! │                                                                         │
//! │  The mutex is held only for synchronous mutations - NEVER across an    │
//! │  await. Atomicity across the async gap comes from the generation       │
//! │  ticket, not from the lock.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both slots live behind one mutex so `swap` exchanges them in a single
//! step and `snapshot` can never observe a half-updated pair.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use wayfare_core::{Endpoint, EndpointState, LatLng, SlotPair};

use crate::error::GeocodeError;
use crate::geocode::{GeocodingProvider, SuggestionReceiver};

// =============================================================================
// Map Pick Outcome
// =============================================================================

/// What became of one map pick.
///
/// Lookup failures are best-effort by policy; the slot is left unchanged
/// and the engine surfaces nothing. The outcome is still reported so a
/// display surface MAY show a transient signal if it chooses to.
#[derive(Debug, Clone, PartialEq)]
pub enum MapPickOutcome {
    /// The resolved address was applied to the slot.
    Applied {
        /// The address the provider resolved for the picked point.
        address: String,
    },

    /// A newer mutation superseded this pick while the lookup was in
    /// flight; the result was discarded. Not an error.
    Superseded,

    /// The provider had no address for the picked point.
    AddressNotFound,

    /// The provider failed or the bounded wait expired.
    ProviderFailed,
}

// =============================================================================
// Location Resolver
// =============================================================================

/// The synchronization engine owning both endpoint slots.
///
/// Cheap to clone; clones share the same slot pair and provider.
#[derive(Clone)]
pub struct LocationResolver {
    /// Both slots under one lock: swap and snapshots are atomic.
    slots: Arc<Mutex<SlotPair>>,

    /// The geocoding capability port.
    geocoder: Arc<dyn GeocodingProvider>,

    /// Bounded wait for one reverse lookup.
    geocode_timeout: Duration,
}

impl LocationResolver {
    /// Creates a resolver over a provider with the given lookup timeout.
    pub fn new(geocoder: Arc<dyn GeocodingProvider>, geocode_timeout: Duration) -> Self {
        LocationResolver {
            slots: Arc::new(Mutex::new(SlotPair::new())),
            geocoder,
            geocode_timeout,
        }
    }

    /// Executes a function with read access to the slot pair.
    fn with_slots<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SlotPair) -> R,
    {
        let slots = self.slots.lock().expect("slot mutex poisoned");
        f(&slots)
    }

    /// Executes a function with write access to the slot pair.
    fn with_slots_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SlotPair) -> R,
    {
        let mut slots = self.slots.lock().expect("slot mutex poisoned");
        f(&mut slots)
    }

    // =========================================================================
    // Slot Mutations
    // =========================================================================

    /// Overwrites a slot's address text from keyboard input.
    ///
    /// Typing never triggers a geocode; the coordinate is left as-is until
    /// an explicit selection replaces it.
    pub fn set_address_text(&self, endpoint: Endpoint, text: &str) {
        self.with_slots_mut(|slots| slots.slot_mut(endpoint).set_address_text(text));
        debug!(%endpoint, %text, "address text set");
    }

    /// Applies a provider-confirmed suggestion selection to a slot.
    pub fn select_suggestion(&self, endpoint: Endpoint, address: &str, location: LatLng) {
        self.with_slots_mut(|slots| slots.slot_mut(endpoint).select_suggestion(address, location));
        debug!(%endpoint, %address, "suggestion selected");
    }

    /// Resolves a map pick: reverse geocode, then apply under the
    /// generation guard.
    ///
    /// The generation bump happens synchronously before the lookup starts,
    /// so any mutation that lands during the await supersedes this pick.
    /// Lookup failures leave the slot unchanged (best-effort policy).
    pub async fn pick_on_map(&self, endpoint: Endpoint, location: LatLng) -> MapPickOutcome {
        let ticket = self.with_slots_mut(|slots| slots.slot_mut(endpoint).begin_resolution());

        let lookup = tokio::time::timeout(
            self.geocode_timeout,
            self.geocoder.reverse_geocode(location),
        )
        .await
        .unwrap_or_else(|_| {
            Err(GeocodeError::Provider(format!(
                "reverse geocode timed out after {:?}",
                self.geocode_timeout
            )))
        });

        match lookup {
            Ok(address) => {
                let applied = self.with_slots_mut(|slots| {
                    slots
                        .slot_mut(endpoint)
                        .apply_resolution(ticket, &address, location)
                });

                if applied {
                    debug!(%endpoint, %address, "map pick applied");
                    MapPickOutcome::Applied { address }
                } else {
                    debug!(%endpoint, ticket, "map pick superseded, result dropped");
                    MapPickOutcome::Superseded
                }
            }
            Err(GeocodeError::AddressNotFound) => {
                debug!(%endpoint, %location, "no address for picked point");
                MapPickOutcome::AddressNotFound
            }
            Err(GeocodeError::Provider(reason)) => {
                debug!(%endpoint, %reason, "reverse geocode failed");
                MapPickOutcome::ProviderFailed
            }
        }
    }

    /// Atomically exchanges the two complete slot states.
    ///
    /// Generations travel with their states, so `swap(); swap()` restores
    /// the pair exactly. Triggers no geocoding.
    pub fn swap(&self) {
        self.with_slots_mut(SlotPair::swap);
        debug!("slots swapped");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Consistent snapshot of (origin, destination).
    pub fn snapshot(&self) -> (EndpointState, EndpointState) {
        self.with_slots(SlotPair::snapshot)
    }

    /// Clones one slot's current state.
    pub fn slot(&self, endpoint: Endpoint) -> EndpointState {
        self.with_slots(|slots| slots.slot(endpoint).clone())
    }

    // =========================================================================
    // Suggestion Stream Lifecycle
    // =========================================================================

    /// Binds a suggestion stream to a slot.
    ///
    /// Called exactly once per logical (input, slot) binding, never per
    /// render. Every selection arriving on the stream is applied as
    /// [`LocationResolver::select_suggestion`]. The returned handle tears
    /// the binding down on [`SuggestionBinding::detach`] or on drop.
    pub fn attach_suggestions(
        &self,
        endpoint: Endpoint,
        mut selections: SuggestionReceiver,
    ) -> SuggestionBinding {
        let resolver = self.clone();
        let task = tokio::spawn(async move {
            while let Some(selection) = selections.recv().await {
                resolver.select_suggestion(endpoint, &selection.address, selection.location);
            }
            debug!(%endpoint, "suggestion stream closed");
        });

        SuggestionBinding { endpoint, task }
    }
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("slots", &self.slots)
            .field("geocode_timeout", &self.geocode_timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Suggestion Binding
// =============================================================================

/// Handle for one attached suggestion stream.
///
/// Dropping the handle (or calling [`SuggestionBinding::detach`]) stops the
/// forwarding task; selections sent afterwards go nowhere.
#[derive(Debug)]
pub struct SuggestionBinding {
    endpoint: Endpoint,
    task: JoinHandle<()>,
}

impl SuggestionBinding {
    /// The slot this binding feeds.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Explicitly tears the binding down.
    pub fn detach(self) {
        // Drop does the abort; consuming self makes the teardown explicit
        // at call sites and prevents double use.
    }
}

impl Drop for SuggestionBinding {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::error::GeocodeResult;
    use crate::geocode::{suggestion_channel, StaticGeocoder, SuggestionSelection};

    /// Provider double whose reverse lookups block until released, so tests
    /// control completion order precisely.
    struct GatedGeocoder {
        release: Notify,
        address: String,
    }

    impl GatedGeocoder {
        fn new(address: &str) -> Arc<Self> {
            Arc::new(GatedGeocoder {
                release: Notify::new(),
                address: address.to_string(),
            })
        }
    }

    #[async_trait]
    impl GeocodingProvider for GatedGeocoder {
        async fn reverse_geocode(&self, _location: LatLng) -> GeocodeResult<String> {
            self.release.notified().await;
            Ok(self.address.clone())
        }

        async fn geocode(&self, _query: &str) -> GeocodeResult<(String, LatLng)> {
            Err(GeocodeError::AddressNotFound)
        }
    }

    /// Provider double that always fails reverse lookups.
    struct FailingGeocoder(GeocodeError);

    #[async_trait]
    impl GeocodingProvider for FailingGeocoder {
        async fn reverse_geocode(&self, _location: LatLng) -> GeocodeResult<String> {
            Err(self.0.clone())
        }

        async fn geocode(&self, _query: &str) -> GeocodeResult<(String, LatLng)> {
            Err(self.0.clone())
        }
    }

    fn static_resolver() -> LocationResolver {
        let geocoder = StaticGeocoder::new([("MG Road, Bengaluru", LatLng::new(12.975, 77.606))]);
        LocationResolver::new(Arc::new(geocoder), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_map_pick_applies_resolved_address() {
        let resolver = static_resolver();

        let outcome = resolver
            .pick_on_map(Endpoint::Origin, LatLng::new(12.97, 77.60))
            .await;
        assert_eq!(
            outcome,
            MapPickOutcome::Applied {
                address: "MG Road, Bengaluru".to_string()
            }
        );

        let origin = resolver.slot(Endpoint::Origin);
        assert_eq!(origin.address, "MG Road, Bengaluru");
        assert_eq!(origin.location, Some(LatLng::new(12.97, 77.60)));
    }

    #[tokio::test]
    async fn test_slow_map_pick_never_overwrites_newer_selection() {
        let geocoder = GatedGeocoder::new("Stale Map Pick");
        let resolver = LocationResolver::new(geocoder.clone(), Duration::from_secs(5));

        let pick = {
            let resolver = resolver.clone();
            tokio::spawn(async move {
                resolver
                    .pick_on_map(Endpoint::Destination, LatLng::new(1.0, 1.0))
                    .await
            })
        };

        // Let the pick dispatch its lookup, then beat it with a suggestion.
        tokio::task::yield_now().await;
        resolver.select_suggestion(
            Endpoint::Destination,
            "Fresh Suggestion",
            LatLng::new(2.0, 2.0),
        );

        geocoder.release.notify_one();
        assert_eq!(pick.await.unwrap(), MapPickOutcome::Superseded);

        let destination = resolver.slot(Endpoint::Destination);
        assert_eq!(destination.address, "Fresh Suggestion");
        assert_eq!(destination.location, Some(LatLng::new(2.0, 2.0)));
    }

    #[tokio::test]
    async fn test_map_pick_failures_leave_slot_untouched() {
        for (error, expected) in [
            (GeocodeError::AddressNotFound, MapPickOutcome::AddressNotFound),
            (
                GeocodeError::Provider("boom".to_string()),
                MapPickOutcome::ProviderFailed,
            ),
        ] {
            let resolver =
                LocationResolver::new(Arc::new(FailingGeocoder(error)), Duration::from_secs(5));
            resolver.set_address_text(Endpoint::Origin, "typed before pick");
            let before = resolver.slot(Endpoint::Origin);

            let outcome = resolver
                .pick_on_map(Endpoint::Origin, LatLng::new(1.0, 1.0))
                .await;
            assert_eq!(outcome, expected);

            // Address and location unchanged; only the dispatch bump shows.
            let after = resolver.slot(Endpoint::Origin);
            assert_eq!(after.address, before.address);
            assert_eq!(after.location, before.location);
            assert_eq!(after.generation, before.generation + 1);
        }
    }

    #[tokio::test]
    async fn test_reverse_geocode_timeout_is_a_provider_failure() {
        let geocoder = GatedGeocoder::new("never released");
        let resolver = LocationResolver::new(geocoder, Duration::from_millis(10));

        let outcome = resolver
            .pick_on_map(Endpoint::Origin, LatLng::new(1.0, 1.0))
            .await;
        assert_eq!(outcome, MapPickOutcome::ProviderFailed);
    }

    #[tokio::test]
    async fn test_swap_is_atomic_and_self_inverse() {
        let resolver = static_resolver();
        resolver.set_address_text(Endpoint::Origin, "A");
        resolver.select_suggestion(Endpoint::Destination, "B", LatLng::new(1.0, 1.0));

        let before = resolver.snapshot();
        resolver.swap();

        let (origin, destination) = resolver.snapshot();
        assert_eq!(origin.address, "B");
        assert_eq!(destination.address, "A");

        resolver.swap();
        assert_eq!(resolver.snapshot(), before);
    }

    #[tokio::test]
    async fn test_attached_suggestions_flow_into_the_slot() {
        let resolver = static_resolver();
        let (tx, rx) = suggestion_channel();
        let binding = resolver.attach_suggestions(Endpoint::Origin, rx);

        tx.send(SuggestionSelection {
            address: "Koramangala, Bengaluru".to_string(),
            location: LatLng::new(12.935, 77.624),
        })
        .unwrap();

        // The forwarding task runs on this runtime; yield until it applies.
        for _ in 0..50 {
            tokio::task::yield_now().await;
            if resolver.slot(Endpoint::Origin).location.is_some() {
                break;
            }
        }

        let origin = resolver.slot(Endpoint::Origin);
        assert_eq!(origin.address, "Koramangala, Bengaluru");
        assert_eq!(origin.location, Some(LatLng::new(12.935, 77.624)));

        binding.detach();
    }

    #[tokio::test]
    async fn test_detached_binding_stops_forwarding() {
        let resolver = static_resolver();
        let (tx, rx) = suggestion_channel();
        let binding = resolver.attach_suggestions(Endpoint::Origin, rx);
        binding.detach();

        // Give the abort a chance to land, then send into the void.
        tokio::task::yield_now().await;
        let _ = tx.send(SuggestionSelection {
            address: "Ignored".to_string(),
            location: LatLng::new(0.0, 0.0),
        });

        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert_eq!(resolver.slot(Endpoint::Origin).address, "");
    }
}
