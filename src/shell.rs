//! Presentation shell: turns session state into the screen to show.
//!
//! The screen is picked by precedence, first match wins: missing API key,
//! location loading, location error, airport error, then the dashboard.

use std::fmt::Write as _;

use serde::Serialize;

use crate::airports::Airport;
use crate::flights::{Flight, FlightBoard};
use crate::radius::Radius;
use crate::session::Session;

pub const MISSING_KEY_MESSAGE: &str = "Error: Missing AviationStack API key.";
pub const LOADING_LOCATION_MESSAGE: &str = "Loading your location...";
pub const LOADING_AIRPORTS_MESSAGE: &str = "Loading airports...";
pub const LOADING_FLIGHTS_MESSAGE: &str = "Loading flights...";
pub const NO_FLIGHTS_MESSAGE: &str = "No real-time flight data available.";

const NOT_AVAILABLE: &str = "N/A";

/// What the user sees
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    ConfigError { message: String },
    LoadingLocation { message: String },
    LocationError { message: String },
    AirportError { message: String },
    Dashboard(Dashboard),
}

/// Full UI once a location and airports are known
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub heading: String,
    pub radius: Radius,
    pub airports_loading: bool,
    pub airports: Vec<AirportButton>,
    pub detail: Option<AirportDetail>,
    pub departures: Option<Departures>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportButton {
    pub key: String,
    pub name: String,
    pub distance_km: Option<f64>,
    pub selected: bool,
}

/// Detail card for the selected airport; blanks are shown as "N/A"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportDetail {
    pub name: String,
    pub iata: String,
    pub icao: String,
    pub city: String,
    pub country: String,
}

impl From<&Airport> for AirportDetail {
    fn from(airport: &Airport) -> Self {
        let or_na = |value: &Option<String>| {
            value
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        Self {
            name: airport.airport_name.clone(),
            iata: or_na(&airport.iata_code),
            icao: or_na(&airport.icao_code),
            city: or_na(&airport.city),
            country: or_na(&airport.country_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DepartureRows {
    Loading,
    Empty,
    Rows { rows: Vec<FlightRow> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departures {
    pub title: String,
    pub rows: DepartureRows,
}

impl Departures {
    /// Departures section for the airport with the given code
    pub fn from_board(iata: Option<&str>, board: &FlightBoard) -> Self {
        let rows = if board.is_loading() {
            DepartureRows::Loading
        } else if board.flights().is_empty() {
            DepartureRows::Empty
        } else {
            DepartureRows::Rows {
                rows: board
                    .flights()
                    .iter()
                    .enumerate()
                    .map(|(i, f)| FlightRow::new(f, i))
                    .collect(),
            }
        };
        Departures {
            title: format!(
                "Live Departures from {}",
                iata.unwrap_or(NOT_AVAILABLE)
            ),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRow {
    pub key: String,
    pub flight: String,
    pub airline: String,
    pub destination: String,
    pub status: String,
    pub scheduled: String,
}

impl FlightRow {
    pub fn new(flight: &Flight, index: usize) -> Self {
        Self {
            key: flight.row_key(index),
            flight: flight.code().to_string(),
            airline: flight.airline_name().to_string(),
            destination: flight.destination().to_string(),
            status: flight.status().to_string(),
            scheduled: flight
                .departure
                .scheduled
                .map(|t| t.format("%H:%M UTC").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl Screen {
    /// Pick the screen for the current session state
    pub fn from_session(session: &Session) -> Screen {
        if !session.has_api_key() {
            return Screen::ConfigError {
                message: MISSING_KEY_MESSAGE.to_string(),
            };
        }

        let location = session.location();
        if location.loading {
            return Screen::LoadingLocation {
                message: LOADING_LOCATION_MESSAGE.to_string(),
            };
        }
        if let Some(error) = &location.error {
            return Screen::LocationError {
                message: format!("Error: {}", error),
            };
        }

        let airports = session.airports();
        if let Some(error) = airports.error() {
            return Screen::AirportError {
                message: error.to_string(),
            };
        }

        Screen::Dashboard(Dashboard::from_session(session))
    }

    /// The single message of a non-dashboard screen
    pub fn message(&self) -> Option<&str> {
        match self {
            Screen::ConfigError { message }
            | Screen::LoadingLocation { message }
            | Screen::LocationError { message }
            | Screen::AirportError { message } => Some(message),
            Screen::Dashboard(_) => None,
        }
    }
}

impl Dashboard {
    fn from_session(session: &Session) -> Dashboard {
        let lookup = session.airports();
        let board = session.flights();

        // City searches have no resolved location; fall back to the search label
        let heading = match &session.location().location {
            Some(location) if lookup.origin().is_some() => format!(
                "Airports near {}, {} ({})",
                location.city,
                location.country,
                lookup.filtered().len()
            ),
            _ if lookup.label().is_empty() => "Airports".to_string(),
            _ => format!(
                "Airports matching {} ({})",
                lookup.label(),
                lookup.filtered().len()
            ),
        };

        let selected_index = lookup.selected_index();
        let airports = lookup
            .filtered()
            .iter()
            .enumerate()
            .map(|(i, airport)| AirportButton {
                key: airport.key(),
                name: airport.airport_name.clone(),
                distance_km: lookup.origin().and_then(|o| airport.distance_km(o)),
                selected: selected_index == Some(i),
            })
            .collect();

        let selected = lookup.selected();
        let detail = selected.map(AirportDetail::from);
        let departures =
            selected.map(|airport| Departures::from_board(airport.iata_code.as_deref(), board));

        Dashboard {
            heading,
            radius: lookup.radius(),
            airports_loading: lookup.is_loading(),
            airports,
            detail,
            departures,
        }
    }
}

/// Render a screen as plain text for non-interactive output
pub fn render_plain(screen: &Screen) -> String {
    let dashboard = match screen {
        Screen::Dashboard(dashboard) => dashboard,
        other => return format!("{}\n", other.message().unwrap_or_default()),
    };

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = render_dashboard(&mut out, dashboard);
    out
}

fn render_dashboard(out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
    writeln!(out, "{}", dashboard.heading)?;
    writeln!(out)?;

    let options: Vec<String> = Radius::all()
        .map(|r| {
            if r == dashboard.radius {
                format!("[{}]", r)
            } else {
                r.to_string()
            }
        })
        .collect();
    writeln!(out, "Filter radius: {}", options.join("  "))?;
    writeln!(out)?;

    if dashboard.airports_loading {
        writeln!(out, "{}", LOADING_AIRPORTS_MESSAGE)?;
    }

    for airport in &dashboard.airports {
        let marker = if airport.selected { '>' } else { ' ' };
        match airport.distance_km {
            Some(km) => writeln!(out, "{} {} ({:.0} km)", marker, airport.name, km)?,
            None => writeln!(out, "{} {}", marker, airport.name)?,
        }
    }

    if let Some(detail) = &dashboard.detail {
        writeln!(out)?;
        writeln!(out, "{}", detail.name)?;
        writeln!(out, "  IATA:    {}", detail.iata)?;
        writeln!(out, "  ICAO:    {}", detail.icao)?;
        writeln!(out, "  City:    {}", detail.city)?;
        writeln!(out, "  Country: {}", detail.country)?;
    }

    if let Some(departures) = &dashboard.departures {
        writeln!(out)?;
        render_departures(out, departures)?;
    }

    Ok(())
}

/// Departures section on its own (used by the `departures` command)
pub fn render_departures_plain(departures: &Departures) -> String {
    let mut out = String::new();
    let _ = render_departures(&mut out, departures);
    out
}

fn render_departures(out: &mut String, departures: &Departures) -> std::fmt::Result {
    writeln!(out, "{}", departures.title)?;
    match &departures.rows {
        DepartureRows::Loading => writeln!(out, "{}", LOADING_FLIGHTS_MESSAGE),
        DepartureRows::Empty => writeln!(out, "{}", NO_FLIGHTS_MESSAGE),
        DepartureRows::Rows { rows } => {
            writeln!(
                out,
                "{:<10} {:<28} {:<5} {:<10} {}",
                "Flight", "Airline", "To", "Status", "Scheduled"
            )?;
            for row in rows {
                writeln!(
                    out,
                    "{:<10} {:<28} {:<5} {:<10} {}",
                    row.flight,
                    truncate(&row.airline, 28),
                    row.destination,
                    row.status,
                    row.scheduled
                )?;
            }
            Ok(())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard {
            heading: "Airports near London, United Kingdom (1)".to_string(),
            radius: Radius::DEFAULT,
            airports_loading: false,
            airports: vec![AirportButton {
                key: "LHR-Heathrow".to_string(),
                name: "Heathrow".to_string(),
                distance_km: Some(23.4),
                selected: true,
            }],
            detail: Some(AirportDetail {
                name: "Heathrow".to_string(),
                iata: "LHR".to_string(),
                icao: "EGLL".to_string(),
                city: NOT_AVAILABLE.to_string(),
                country: "United Kingdom".to_string(),
            }),
            departures: Some(Departures {
                title: "Live Departures from LHR".to_string(),
                rows: DepartureRows::Empty,
            }),
        }
    }

    #[test]
    fn test_render_message_screen() {
        let screen = Screen::ConfigError {
            message: MISSING_KEY_MESSAGE.to_string(),
        };
        assert_eq!(render_plain(&screen), "Error: Missing AviationStack API key.\n");
    }

    #[test]
    fn test_render_dashboard() {
        let text = render_plain(&Screen::Dashboard(dashboard()));
        assert!(text.starts_with("Airports near London, United Kingdom (1)\n"));
        assert!(text.contains("[100 km]"));
        assert!(text.contains("> Heathrow (23 km)"));
        assert!(text.contains("  ICAO:    EGLL"));
        assert!(text.contains("  City:    N/A"));
        assert!(text.contains("Live Departures from LHR\nNo real-time flight data available."));
    }

    #[test]
    fn test_render_departure_rows() {
        let departures = Departures {
            title: "Live Departures from LHR".to_string(),
            rows: DepartureRows::Rows {
                rows: vec![FlightRow::new(&Flight::default(), 0)],
            },
        };
        let text = render_departures_plain(&departures);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Flight"));
        assert!(lines[2].starts_with("N/A"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
