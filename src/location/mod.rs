mod fixed;
mod ip_api;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::Point;

pub use fixed::FixedLocationResolver;
pub use ip_api::IpApiClient;

/// Where the user is, as reported by an IP geolocation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

/// What to geolocate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationQuery {
    /// The caller's own public address
    #[default]
    Auto,
    /// A user supplied IP address or hostname
    Ip(String),
}

impl LocationQuery {
    /// Build a query from an optional manual IP, treating blank input as auto-detection
    pub fn from_ip(ip: Option<&str>) -> Self {
        match ip.map(str::trim) {
            Some(ip) if !ip.is_empty() => LocationQuery::Ip(ip.to_string()),
            _ => LocationQuery::Auto,
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Auto => write!(f, "auto"),
            LocationQuery::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

/// Trait for services that turn an IP lookup into a [`Location`]
///
/// # Example
///
/// ```rust,ignore
/// let client = IpApiClient::new(http, "http://ip-api.com".to_string());
/// let location = client.resolve(&LocationQuery::Auto).await?;
/// println!("{}, {}", location.city, location.country);
/// ```
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve the query to a location
    ///
    /// # Returns
    ///
    /// * `Ok(Location)` - The resolved location
    /// * `Err(...)` - Network failure or a non-success payload; the message is user facing
    async fn resolve(&self, query: &LocationQuery) -> Result<Location>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

/// Resolver output as exposed to consumers: `{location, loading, error}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    pub location: Option<Location>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LocationState {
    /// A fresh resolution has started; the previous location is kept until it completes
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply the resolver result; success replaces the location wholesale
    pub fn apply(&mut self, result: Result<Location>) {
        self.loading = false;
        match result {
            Ok(location) => {
                self.location = Some(location);
                self.error = None;
            }
            Err(e) => {
                self.location = None;
                self.error = Some(e.to_string());
            }
        }
    }
}
