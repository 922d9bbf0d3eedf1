use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Departures shown per airport; the provider's order is kept as-is
pub const MAX_DEPARTURES: usize = 10;

/// Flight identifiers (`flight` object)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightIdent {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
}

/// One end of a flight (`departure` / `arrival` objects)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightEndpoint {
    #[serde(default)]
    pub airport: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub scheduled: Option<DateTime<Utc>>,
}

/// Flight as returned by the aviationstack `/v1/flights` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    #[serde(default, deserialize_with = "null_as_default")]
    pub flight: FlightIdent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub airline: Airline,
    #[serde(default, deserialize_with = "null_as_default")]
    pub departure: FlightEndpoint,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arrival: FlightEndpoint,
    #[serde(default)]
    pub flight_status: Option<String>,
}

impl Flight {
    /// Row key: flight IATA code plus scheduled departure, falling back to the
    /// flight number and then the row position
    pub fn row_key(&self, index: usize) -> String {
        let ident = non_blank(self.flight.iata.as_deref()).unwrap_or("unknown");
        let discriminator = self
            .departure
            .scheduled
            .map(|t| t.to_rfc3339())
            .or_else(|| non_blank(self.flight.number.as_deref()).map(str::to_string))
            .unwrap_or_else(|| format!("#{}", index));
        format!("{}-{}", ident, discriminator)
    }

    pub fn code(&self) -> &str {
        non_blank(self.flight.iata.as_deref()).unwrap_or("N/A")
    }

    pub fn airline_name(&self) -> &str {
        non_blank(self.airline.name.as_deref()).unwrap_or("N/A")
    }

    pub fn destination(&self) -> &str {
        non_blank(self.arrival.iata.as_deref()).unwrap_or("N/A")
    }

    pub fn status(&self) -> &str {
        non_blank(self.flight_status.as_deref()).unwrap_or("N/A")
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Unparseable timestamps are dropped rather than failing the whole response
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }))
}

/// Keep the first [`MAX_DEPARTURES`] flights in provider order
pub fn take_departures(mut flights: Vec<Flight>) -> Vec<Flight> {
    flights.truncate(MAX_DEPARTURES);
    flights
}

/// Departure board for the selected airport
///
/// Its loading flag is independent of the airport lookup.
#[derive(Debug, Clone, Default)]
pub struct FlightBoard {
    iata: Option<String>,
    flights: Vec<Flight>,
    loading: bool,
}

impl FlightBoard {
    /// Start loading departures for `iata`; previous rows stay until the response lands
    pub fn begin(&mut self, iata: &str) {
        self.iata = Some(iata.to_string());
        self.loading = true;
    }

    /// Apply the provider response; failures degrade to an empty board
    pub fn apply_fetch(&mut self, result: Result<Vec<Flight>>) {
        match result {
            Ok(flights) => {
                debug!(
                    iata = ?self.iata,
                    received = flights.len(),
                    "Received departures"
                );
                self.flights = take_departures(flights);
            }
            Err(e) => {
                warn!(iata = ?self.iata, error = %e, "Failed to fetch flight data");
                self.flights.clear();
            }
        }
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.iata = None;
        self.flights.clear();
        self.loading = false;
    }

    pub fn iata(&self) -> Option<&str> {
        self.iata.as_deref()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
