use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Location, LocationQuery, LocationResolver};

// ip-api.com JSON response; on failure only status, message and query are present
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    query: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<Location> {
        if self.status != "success" {
            return Err(match self.message {
                Some(reason) if !reason.trim().is_empty() => {
                    anyhow!("Could not retrieve location ({})", reason.trim())
                }
                _ => anyhow!("Could not retrieve location"),
            });
        }

        let (Some(latitude), Some(longitude)) = (self.lat, self.lon) else {
            return Err(anyhow!("Could not retrieve location (missing coordinates)"));
        };

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow!(
                "Could not retrieve location (invalid coordinates {}, {})",
                latitude,
                longitude
            ));
        }

        Ok(Location {
            ip: self.query.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            region: self.region_name.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            latitude,
            longitude,
        })
    }
}

/// Client for the ip-api.com JSON endpoint
#[derive(Clone)]
pub struct IpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/json/` for the caller's own address, `<base>/json/<ip>` otherwise
    pub fn lookup_url(&self, query: &LocationQuery) -> String {
        match query {
            LocationQuery::Auto => format!("{}/json/", self.base_url),
            LocationQuery::Ip(ip) => format!("{}/json/{}", self.base_url, ip.trim()),
        }
    }

    pub async fn lookup(&self, query: &LocationQuery) -> Result<Location> {
        let url = self.lookup_url(query);
        debug!(query = %query, "Resolving location with ip-api");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch location: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "ip-api request failed");
            return Err(anyhow!("Failed to fetch location (HTTP {})", status));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse location response: {}", e))?;

        let location = body.into_location()?;
        debug!(
            ip = %location.ip,
            city = %location.city,
            country = %location.country,
            "ip-api resolved location"
        );
        Ok(location)
    }
}

#[async_trait]
impl LocationResolver for IpApiClient {
    async fn resolve(&self, query: &LocationQuery) -> Result<Location> {
        self.lookup(query).await
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}
