mod aviationstack;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use crate::airports::Airport;
use crate::flights::Flight;

pub use aviationstack::AviationStackClient;

/// How to ask the provider for airports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportQuery {
    /// Every airport in a country (`country_name=`)
    Country(String),
    /// Free-text search, used for manual city lookups (`search=`)
    City(String),
}

impl AirportQuery {
    /// Query parameter name and value sent to the provider
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            AirportQuery::Country(country) => ("country_name", country.as_str()),
            AirportQuery::City(city) => ("search", city.as_str()),
        }
    }
}

impl fmt::Display for AirportQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirportQuery::Country(country) => write!(f, "country {}", country),
            AirportQuery::City(city) => write!(f, "city {}", city),
        }
    }
}

/// Trait for aviation data providers
#[async_trait]
pub trait AviationData: Send + Sync {
    /// Airports matching the query, in provider order
    async fn airports(&self, query: &AirportQuery) -> Result<Vec<Airport>>;

    /// Departures from the airport with this IATA code, in provider order
    async fn departures(&self, iata: &str) -> Result<Vec<Flight>>;
}
