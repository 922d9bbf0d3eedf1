//! Fake providers for session tests
//!
//! Both fakes count their calls so tests can assert that nothing touched the
//! network, and can delay individual answers to force responses to arrive out
//! of order.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aerolocate::airports::Airport;
use aerolocate::aviation::{AirportQuery, AviationData};
use aerolocate::flights::{Flight, FlightEndpoint, FlightIdent};
use aerolocate::location::{Location, LocationQuery, LocationResolver};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

pub fn london() -> Location {
    Location {
        ip: "81.2.69.142".to_string(),
        city: "London".to_string(),
        region: "England".to_string(),
        country: "United Kingdom".to_string(),
        latitude: 51.5074,
        longitude: -0.1278,
    }
}

pub fn paris() -> Location {
    Location {
        ip: "90.84.1.1".to_string(),
        city: "Paris".to_string(),
        region: "Ile-de-France".to_string(),
        country: "France".to_string(),
        latitude: 48.8566,
        longitude: 2.3522,
    }
}

pub fn airport(name: &str, iata: Option<&str>, coords: Option<(f64, f64)>) -> Airport {
    Airport {
        airport_name: name.to_string(),
        iata_code: iata.map(str::to_string),
        icao_code: None,
        city: None,
        country_name: Some("United Kingdom".to_string()),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    }
}

/// Heathrow, Gatwick, Manchester, Edinburgh and one airport without coordinates
pub fn uk_airports() -> Vec<Airport> {
    vec![
        airport("Heathrow", Some("LHR"), Some((51.47, -0.4543))),
        airport("Gatwick", Some("LGW"), Some((51.1537, -0.1821))),
        airport("Manchester", Some("MAN"), Some((53.3537, -2.2750))),
        airport("Edinburgh", Some("EDI"), Some((55.95, -3.3725))),
        airport("Unknown Strip", None, None),
    ]
}

pub fn flight(iata: &str) -> Flight {
    Flight {
        flight: FlightIdent {
            iata: Some(iata.to_string()),
            number: Some(iata.trim_start_matches(char::is_alphabetic).to_string()),
            ..Default::default()
        },
        arrival: FlightEndpoint {
            iata: Some("JFK".to_string()),
            ..Default::default()
        },
        flight_status: Some("scheduled".to_string()),
        ..Default::default()
    }
}

/// Resolver answering from a table, with optional per-query delay
#[derive(Default)]
pub struct FakeResolver {
    answers: HashMap<String, (Option<Location>, Duration)>,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn answer(mut self, query: &LocationQuery, location: Location, delay: Duration) -> Self {
        self.answers
            .insert(query.to_string(), (Some(location), delay));
        self
    }

    pub fn fail(mut self, query: &LocationQuery) -> Self {
        self.answers
            .insert(query.to_string(), (None, Duration::ZERO));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationResolver for FakeResolver {
    async fn resolve(&self, query: &LocationQuery) -> Result<Location> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(&query.to_string()) {
            Some((location, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                location
                    .clone()
                    .ok_or_else(|| anyhow!("Could not retrieve location"))
            }
            None => Err(anyhow!("Could not retrieve location")),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// aviationstack stand-in
#[derive(Default)]
pub struct FakeAviation {
    airports: Option<Vec<Airport>>,
    airports_delay: Duration,
    departures: HashMap<String, (Vec<Flight>, Duration)>,
    departures_fail: bool,
    pub airport_calls: AtomicUsize,
    pub departure_calls: AtomicUsize,
}

impl FakeAviation {
    pub fn with_airports(mut self, airports: Vec<Airport>) -> Self {
        self.airports = Some(airports);
        self
    }

    /// Answer airport requests only after `delay`
    pub fn with_airports_delay(mut self, delay: Duration) -> Self {
        self.airports_delay = delay;
        self
    }

    pub fn with_departures(mut self, iata: &str, flights: Vec<Flight>, delay: Duration) -> Self {
        self.departures.insert(iata.to_string(), (flights, delay));
        self
    }

    /// Every departures request rejects
    pub fn failing_departures(mut self) -> Self {
        self.departures_fail = true;
        self
    }

    pub fn airport_calls(&self) -> usize {
        self.airport_calls.load(Ordering::SeqCst)
    }

    pub fn departure_calls(&self) -> usize {
        self.departure_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AviationData for FakeAviation {
    async fn airports(&self, _query: &AirportQuery) -> Result<Vec<Airport>> {
        self.airport_calls.fetch_add(1, Ordering::SeqCst);
        if !self.airports_delay.is_zero() {
            tokio::time::sleep(self.airports_delay).await;
        }
        self.airports
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn departures(&self, iata: &str) -> Result<Vec<Flight>> {
        self.departure_calls.fetch_add(1, Ordering::SeqCst);
        if self.departures_fail {
            return Err(anyhow!("connection reset"));
        }
        match self.departures.get(iata) {
            Some((flights, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(flights.clone())
            }
            None => Ok(Vec::new()),
        }
    }
}
