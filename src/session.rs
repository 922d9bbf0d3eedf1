//! Event-driven controller tying the resolver, airport lookup and departure
//! board together.
//!
//! Every trigger (location change, airport search, selection change) spawns one
//! task that reports back over an mpsc channel. Each kind of trigger carries a
//! generation number; a response whose generation is no longer current was
//! superseded and is dropped instead of overwriting newer state.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::airports::{Airport, AirportLookup};
use crate::aviation::{AirportQuery, AviationData};
use crate::flights::{Flight, FlightBoard};
use crate::geo::Point;
use crate::location::{Location, LocationQuery, LocationResolver, LocationState};
use crate::radius::Radius;

/// Result of a background fetch, tagged with the generation that started it
#[derive(Debug)]
pub enum SessionEvent {
    LocationResolved {
        generation: u64,
        result: Result<Location>,
    },
    AirportsFetched {
        generation: u64,
        result: Result<Vec<Airport>>,
    },
    DeparturesFetched {
        generation: u64,
        iata: String,
        result: Result<Vec<Flight>>,
    },
}

#[derive(Debug, Default, Clone, Copy)]
struct Generation(u64);

impl Generation {
    fn bump(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// All view state for one user session
pub struct Session {
    resolver: Arc<dyn LocationResolver>,
    aviation: Option<Arc<dyn AviationData>>,
    location: LocationState,
    airports: AirportLookup,
    flights: FlightBoard,
    location_generation: Generation,
    airports_generation: Generation,
    flights_generation: Generation,
    in_flight: usize,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    cancel: CancellationToken,
}

impl Session {
    /// Create a session. `aviation` is `None` when no API key is configured, in
    /// which case the session never touches the network.
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        aviation: Option<Arc<dyn AviationData>>,
        radius: Radius,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            resolver,
            aviation,
            location: LocationState::default(),
            airports: AirportLookup::new(radius),
            flights: FlightBoard::default(),
            location_generation: Generation::default(),
            airports_generation: Generation::default(),
            flights_generation: Generation::default(),
            in_flight: 0,
            events_tx,
            events_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.aviation.is_some()
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn airports(&self) -> &AirportLookup {
        &self.airports
    }

    pub fn flights(&self) -> &FlightBoard {
        &self.flights
    }

    /// Whether any background fetch has not reported back yet
    pub fn pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Geolocate and, once resolved, look up airports in that country
    pub fn resolve(&mut self, query: LocationQuery) {
        if !self.has_api_key() {
            warn!("Missing aviationstack API key, not resolving location");
            return;
        }

        let generation = self.location_generation.bump();
        self.location.begin();
        // Searches and boards of the previous location are superseded too
        self.airports_generation.bump();
        self.flights_generation.bump();
        self.airports.clear();
        self.flights.clear();

        let resolver = Arc::clone(&self.resolver);
        let span = info_span!(
            "location.resolve",
            provider = %resolver.name(),
            query = %query,
            generation
        );
        self.spawn(
            async move {
                let result = resolver.resolve(&query).await;
                SessionEvent::LocationResolved { generation, result }
            }
            .instrument(span),
        );
    }

    /// Manual city search: bypasses the resolver and lists matching airports unfiltered
    pub fn search_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }
        // A pending auto-detection must not replace the user's search
        self.location_generation.bump();
        self.location.loading = false;
        self.location.error = None;
        self.start_airport_fetch(AirportQuery::City(city.to_string()), None, city.to_string());
    }

    fn search_country(&mut self, location: &Location) {
        self.start_airport_fetch(
            AirportQuery::Country(location.country.clone()),
            Some(location.point()),
            location.city.clone(),
        );
    }

    fn start_airport_fetch(&mut self, query: AirportQuery, origin: Option<Point>, label: String) {
        let Some(aviation) = self.aviation.clone() else {
            return;
        };

        let generation = self.airports_generation.bump();
        self.flights_generation.bump();
        self.flights.clear();
        self.airports.clear();
        self.airports.begin(origin, label);

        let span = info_span!("airports.fetch", query = %query, generation);
        self.spawn(
            async move {
                let result = aviation.airports(&query).await;
                SessionEvent::AirportsFetched { generation, result }
            }
            .instrument(span),
        );
    }

    /// Change the radius; only re-filters, never refetches airports
    pub fn set_radius(&mut self, radius: Radius) {
        self.airports.set_radius(radius);
        self.sync_departures();
    }

    pub fn select_iata(&mut self, iata: &str) {
        if self.airports.select_iata(iata) {
            self.sync_departures();
        }
    }

    pub fn select_next(&mut self) {
        if self.airports.select_next() {
            self.sync_departures();
        }
    }

    pub fn select_previous(&mut self) {
        if self.airports.select_previous() {
            self.sync_departures();
        }
    }

    /// Point the departure board at the selected airport, fetching when it changed
    fn sync_departures(&mut self) {
        let target = self
            .airports
            .selected()
            .and_then(|a| a.iata_code.clone());

        if target.as_deref() == self.flights.iata() {
            return;
        }

        let generation = self.flights_generation.bump();
        let (Some(iata), Some(aviation)) = (target, self.aviation.clone()) else {
            self.flights.clear();
            return;
        };

        self.flights.begin(&iata);
        let span = info_span!("departures.fetch", iata = %iata, generation);
        self.spawn(
            async move {
                let result = aviation.departures(&iata).await;
                SessionEvent::DeparturesFetched {
                    generation,
                    iata,
                    result,
                }
            }
            .instrument(span),
        );
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = SessionEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                event = task => {
                    // Receiver is gone only when the session was dropped
                    let _ = tx.send(event);
                }
            }
        });
    }

    /// Apply one event; stale events only release their in-flight slot
    pub fn handle(&mut self, event: SessionEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            SessionEvent::LocationResolved { generation, result } => {
                if !self.location_generation.is_current(generation) {
                    debug!(generation, "Dropping superseded location result");
                    return;
                }
                self.location.apply(result);
                match self.location.location.clone() {
                    Some(location) => {
                        info!(
                            city = %location.city,
                            country = %location.country,
                            "Location resolved"
                        );
                        self.search_country(&location);
                    }
                    None => {
                        warn!(error = ?self.location.error, "Location resolution failed");
                        self.airports.clear();
                        self.flights.clear();
                    }
                }
            }
            SessionEvent::AirportsFetched { generation, result } => {
                if !self.airports_generation.is_current(generation) {
                    debug!(generation, "Dropping superseded airport result");
                    return;
                }
                self.airports.apply_fetch(result);
                self.sync_departures();
            }
            SessionEvent::DeparturesFetched {
                generation,
                iata,
                result,
            } => {
                if !self.flights_generation.is_current(generation) {
                    debug!(generation, iata = %iata, "Dropping superseded departures result");
                    return;
                }
                self.flights.apply_fetch(result);
            }
        }
    }

    /// Apply every event that has already arrived without waiting
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it; `false` when nothing is in flight
    pub async fn next_event(&mut self) -> bool {
        if !self.pending() {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until no fetch is in flight, including the ones they trigger
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    /// Abandon every in-flight fetch
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        self.in_flight = 0;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
