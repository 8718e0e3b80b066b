//! # Console Commands
//!
//! Parses one line of user input and dispatches it to the engine.
//!
//! ## Command Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  from <text>          type the origin address                           │
//! │  to <text>            type the destination address                      │
//! │  suggest from <q>     list provider suggestions for a query             │
//! │  choose from <n>      confirm suggestion n from the last list           │
//! │  map from <lat,lng>   pick a map point (reverse geocoded)               │
//! │  swap                 exchange origin and destination                   │
//! │  arrive <ts>          set desired arrival (YYYY-MM-DDTHH:MM); no        │
//! │                       argument clears it                                │
//! │  route                fetch the route / prediction                      │
//! │  show                 print both slots, arrival time, request phase     │
//! │  help                 print this list                                   │
//! │  quit                 exit                                              │
//! │                                                                         │
//! │  ("to" works everywhere "from" does)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::debug;

use wayfare_core::{
    format_route, validate_arrival_time, Endpoint, EndpointState, LatLng, RequestPhase,
};
use wayfare_engine::{
    suggestion_channel, LocationResolver, RequestOutcome, RouteController, StaticGeocoder,
    SuggestionBinding, SuggestionSelection, SuggestionSender,
};

const HELP: &str = "\
commands:
  from <text>          type the origin address
  to <text>            type the destination address
  suggest from <q>     list provider suggestions for a query
  choose from <n>      confirm suggestion n from the last list
  map from <lat,lng>   pick a map point (reverse geocoded)
  swap                 exchange origin and destination
  arrive [<ts>]        set desired arrival (YYYY-MM-DDTHH:MM), empty clears
  route                fetch the route / prediction
  show                 print both slots, arrival time, request phase
  help                 print this list
  quit                 exit
('to' works everywhere 'from' does)";

/// Whether the REPL should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// =============================================================================
// Console Session
// =============================================================================

/// One interactive session: the engine handles plus per-endpoint suggestion
/// plumbing and the arrival-time field.
pub struct ConsoleSession {
    resolver: LocationResolver,
    controller: RouteController,
    geocoder: StaticGeocoder,

    /// Sender half of each endpoint's suggestion stream (the "autocomplete
    /// widget" side).
    senders: HashMap<Endpoint, SuggestionSender>,

    /// Last listed suggestions per endpoint, for `choose`.
    listed: HashMap<Endpoint, Vec<SuggestionSelection>>,

    /// The desired-arrival input field ("" = leave now).
    arrival_time: String,

    /// Keeps the suggestion bindings alive for the session lifetime;
    /// dropping the session detaches them.
    _bindings: Vec<SuggestionBinding>,
}

impl ConsoleSession {
    /// Wires a session: one suggestion stream per endpoint, attached to the
    /// resolver exactly once.
    pub fn new(
        resolver: LocationResolver,
        controller: RouteController,
        geocoder: StaticGeocoder,
    ) -> Self {
        let mut senders = HashMap::new();
        let mut bindings = Vec::new();

        for endpoint in [Endpoint::Origin, Endpoint::Destination] {
            let (tx, rx) = suggestion_channel();
            bindings.push(resolver.attach_suggestions(endpoint, rx));
            senders.insert(endpoint, tx);
        }

        ConsoleSession {
            resolver,
            controller,
            geocoder,
            senders,
            listed: HashMap::new(),
            arrival_time: String::new(),
            _bindings: bindings,
        }
    }

    /// Handles one input line.
    pub async fn handle(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "from" | "to" => self.type_address(endpoint_for(command), rest),
            "suggest" => self.suggest(rest),
            "choose" => self.choose(rest).await,
            "map" => self.map_pick(rest).await,
            "swap" => {
                self.resolver.swap();
                self.show();
            }
            "arrive" => self.set_arrival(rest),
            "route" => self.route().await,
            "show" => self.show(),
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Flow::Quit,
            other => println!("unknown command '{other}' (try 'help')"),
        }

        Flow::Continue
    }

    // =========================================================================
    // Slot Commands
    // =========================================================================

    fn type_address(&self, endpoint: Endpoint, text: &str) {
        self.resolver.set_address_text(endpoint, text);
    }

    fn suggest(&mut self, rest: &str) {
        let Some((endpoint, query)) = split_endpoint(rest) else {
            println!("usage: suggest from|to <query>");
            return;
        };

        let hits = self.geocoder.suggest(query);
        if hits.is_empty() {
            println!("no suggestions for '{query}'");
        } else {
            for (index, hit) in hits.iter().enumerate() {
                println!("  [{}] {}", index + 1, hit.address);
            }
            println!("confirm with: choose {endpoint_word} <n>", endpoint_word = word_for(endpoint));
        }
        self.listed.insert(endpoint, hits);
    }

    async fn choose(&mut self, rest: &str) {
        let Some((endpoint, index)) = split_endpoint(rest) else {
            println!("usage: choose from|to <n>");
            return;
        };

        let selection = index
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| self.listed.get(&endpoint).and_then(|l| l.get(n)))
            .cloned();

        let Some(selection) = selection else {
            println!("no such suggestion; run 'suggest {} <query>' first", word_for(endpoint));
            return;
        };

        // Feed the selection through the same stream a real autocomplete
        // widget would use, then let the forwarding task run.
        if let Some(sender) = self.senders.get(&endpoint) {
            if sender.send(selection.clone()).is_ok() {
                tokio::task::yield_now().await;
                println!("{}: {}", endpoint, selection.address);
                return;
            }
        }
        println!("suggestion stream for {endpoint} is closed");
    }

    async fn map_pick(&self, rest: &str) {
        let Some((endpoint, coord)) = split_endpoint(rest) else {
            println!("usage: map from|to <lat,lng>");
            return;
        };

        let location = match LatLng::parse(coord) {
            Ok(location) => location,
            Err(err) => {
                println!("{err}");
                return;
            }
        };

        let outcome = self.resolver.pick_on_map(endpoint, location).await;
        debug!(?outcome, "map pick finished");
        match self.resolver.slot(endpoint) {
            state if state.location == Some(location) => {
                println!("{}: {}", endpoint, state.address);
            }
            // Lookup failures and lost races stay silent, like the map
            // surface this stands in for.
            _ => {}
        }
    }

    fn set_arrival(&mut self, rest: &str) {
        if rest.is_empty() {
            self.arrival_time.clear();
            println!("arrival time cleared (direct route)");
            return;
        }

        match validate_arrival_time(rest) {
            Ok(()) => {
                self.arrival_time = rest.to_string();
                println!("arrive by {rest}");
            }
            Err(err) => println!("{err}"),
        }
    }

    // =========================================================================
    // Route Command
    // =========================================================================

    async fn route(&self) {
        let (origin, destination) = self.resolver.snapshot();
        println!("Calculating...");

        let outcome = self
            .controller
            .request_route(&origin, &destination, &self.arrival_time)
            .await;

        match outcome {
            RequestOutcome::Completed(RequestPhase::Success(response)) => {
                self.render_route(&origin, &destination, &response);
            }
            RequestOutcome::Completed(RequestPhase::Failed(message)) => {
                println!("error: {message}");
            }
            // Unreachable in a sequential shell, but the contract allows it.
            RequestOutcome::Completed(phase) => debug!(?phase, "non-terminal completion"),
            RequestOutcome::Superseded => debug!("route response superseded"),
        }
    }

    fn render_route(
        &self,
        origin: &EndpointState,
        destination: &EndpointState,
        response: &wayfare_core::RouteResponse,
    ) {
        let display = format_route(response, &self.arrival_time);

        println!("Route Info");
        println!("  From:     {}", origin.address);
        println!("  To:       {}", destination.address);
        println!("  Distance: {}", display.distance);
        println!("  Duration: {}", display.duration);
        if let Some(departure) = &display.departure {
            println!("  Suggested Departure: {departure}");
        }
        if let Some(summary) = &display.summary {
            println!("  Route Summary: {summary}");
        }
        if !display.steps.is_empty() {
            println!("  Steps:");
            for step in &display.steps {
                println!("    - {step}");
            }
        }
    }

    // =========================================================================
    // Display
    // =========================================================================

    fn show(&self) {
        let (origin, destination) = self.resolver.snapshot();
        print_slot("origin", &origin);
        print_slot("destination", &destination);

        if self.arrival_time.is_empty() {
            println!("arrival:     (leave now)");
        } else {
            println!("arrival:     {}", self.arrival_time);
        }
        println!("request:     {:?}", self.controller.phase());
    }
}

fn print_slot(label: &str, state: &EndpointState) {
    match state.location {
        Some(location) => println!("{label}: {:?} @ {location}", state.address),
        None => println!("{label}: {:?} (unresolved)", state.address),
    }
}

/// Splits `from <rest>` / `to <rest>` argument forms.
fn split_endpoint(rest: &str) -> Option<(Endpoint, &str)> {
    let (word, rest) = rest.split_once(char::is_whitespace)?;
    match word {
        "from" | "origin" => Some((Endpoint::Origin, rest.trim())),
        "to" | "destination" => Some((Endpoint::Destination, rest.trim())),
        _ => None,
    }
}

fn endpoint_for(word: &str) -> Endpoint {
    match word {
        "to" => Endpoint::Destination,
        _ => Endpoint::Origin,
    }
}

fn word_for(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Origin => "from",
        Endpoint::Destination => "to",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_endpoint_accepts_both_spellings() {
        assert_eq!(
            split_endpoint("from MG Road"),
            Some((Endpoint::Origin, "MG Road"))
        );
        assert_eq!(
            split_endpoint("destination 12.9,77.6"),
            Some((Endpoint::Destination, "12.9,77.6"))
        );
        assert_eq!(split_endpoint("sideways 1"), None);
        assert_eq!(split_endpoint(""), None);
    }
}
