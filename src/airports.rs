use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::geo::{Point, within_radius};
use crate::radius::Radius;

/// Airport as returned by the aviationstack `/v1/airports` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub airport_name: String,
    #[serde(default, deserialize_with = "opt_code")]
    pub iata_code: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub icao_code: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "opt_code")]
    pub country_name: Option<String>,
    #[serde(default, deserialize_with = "opt_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_coordinate")]
    pub longitude: Option<f64>,
}

impl Airport {
    /// Coordinates, if the provider supplied both
    pub fn point(&self) -> Option<Point> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Point::new(lat, lon)),
            _ => None,
        }
    }

    /// Distance from `origin`, if the airport has coordinates
    pub fn distance_km(&self, origin: &Point) -> Option<f64> {
        self.point().map(|p| origin.distance_km(&p))
    }

    /// Stable key for list rendering: IATA code (or "no-code") plus name
    pub fn key(&self) -> String {
        format!(
            "{}-{}",
            self.iata_code.as_deref().unwrap_or("no-code"),
            self.airport_name
        )
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .unwrap_or_default())
}

// Blank codes are treated the same as missing ones
fn opt_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    }))
}

// aviationstack sends coordinates as strings; accept numbers as well
fn opt_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    // A zero coordinate is how the provider reports "unknown"
    Ok(parsed.filter(|v| v.is_finite() && *v != 0.0))
}

/// Keep the airports within `radius` of `origin`, preserving provider order
///
/// Airports without coordinates are never kept.
pub fn filter_by_radius(airports: &[Airport], origin: &Point, radius: Radius) -> Vec<Airport> {
    let radius_km = f64::from(radius.km());
    airports
        .iter()
        .filter(|airport| {
            airport
                .point()
                .is_some_and(|p| within_radius(origin, &p, radius_km))
        })
        .cloned()
        .collect()
}

/// Airport lookup state for one search: raw provider list, the radius-filtered
/// view of it, and the selected airport.
///
/// The selection is always an index into `filtered`.
#[derive(Debug, Clone, Default)]
pub struct AirportLookup {
    origin: Option<Point>,
    label: String,
    radius: Radius,
    all: Vec<Airport>,
    filtered: Vec<Airport>,
    selected: Option<usize>,
    loading: bool,
    error: Option<String>,
}

impl AirportLookup {
    pub fn new(radius: Radius) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    /// Start a new search around `origin` (or unfiltered when `None`), labelled for messages
    pub fn begin(&mut self, origin: Option<Point>, label: impl Into<String>) {
        self.origin = origin;
        self.label = label.into();
        self.loading = true;
    }

    /// Forget the previous search entirely
    pub fn clear(&mut self) {
        self.origin = None;
        self.label.clear();
        self.all.clear();
        self.filtered.clear();
        self.selected = None;
        self.loading = false;
        self.error = None;
    }

    /// Apply the provider response for the current search
    pub fn apply_fetch(&mut self, result: Result<Vec<Airport>>) {
        self.loading = false;
        match result {
            Ok(airports) if airports.is_empty() => {
                debug!(label = %self.label, "Provider returned no airports");
                self.all.clear();
                self.filtered.clear();
                self.selected = None;
                self.error = Some(format!("No airports found for {}.", self.label));
            }
            Ok(airports) => {
                debug!(label = %self.label, count = airports.len(), "Received airports");
                self.all = airports;
                self.refilter();
            }
            Err(e) => {
                warn!(label = %self.label, error = %e, "Airport fetch failed");
                self.all.clear();
                self.filtered.clear();
                self.selected = None;
                self.error = Some("Failed to fetch airport data.".to_string());
            }
        }
    }

    /// Change the radius and re-filter the already fetched list
    pub fn set_radius(&mut self, radius: Radius) {
        if self.radius == radius {
            return;
        }
        self.radius = radius;
        if !self.all.is_empty() {
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        self.filtered = match &self.origin {
            Some(origin) => filter_by_radius(&self.all, origin, self.radius),
            None => self.all.clone(),
        };
        self.selected = if self.filtered.is_empty() { None } else { Some(0) };

        if self.filtered.is_empty() {
            self.error = Some(format!(
                "No airports found within {} km of {}.",
                self.radius.km(),
                self.label
            ));
        } else {
            self.error = None;
        }
    }

    /// Select by index into the filtered list; out of range indexes are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.filtered.len() && self.selected != Some(index) {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Select by IATA code, returning whether the selection changed
    pub fn select_iata(&mut self, iata: &str) -> bool {
        match self
            .filtered
            .iter()
            .position(|a| a.iata_code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(iata)))
        {
            Some(index) => self.select(index),
            None => false,
        }
    }

    pub fn select_next(&mut self) -> bool {
        match self.selected {
            Some(i) => self.select(i + 1),
            None => false,
        }
    }

    pub fn select_previous(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => self.select(i - 1),
            _ => false,
        }
    }

    pub fn origin(&self) -> Option<&Point> {
        self.origin.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn radius(&self) -> Radius {
        self.radius
    }

    pub fn filtered(&self) -> &[Airport] {
        &self.filtered
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Airport> {
        self.selected.and_then(|i| self.filtered.get(i))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
