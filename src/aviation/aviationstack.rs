use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{AirportQuery, AviationData};
use crate::airports::Airport;
use crate::flights::Flight;

/// aviationstack list envelope: `{pagination, data}` or `{error}`
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> ListResponse<T> {
    fn into_data(self) -> Result<Vec<T>> {
        if let Some(error) = self.error {
            return Err(anyhow!(
                "aviationstack error {}: {}",
                error.code.as_deref().unwrap_or("unknown"),
                error.message.as_deref().unwrap_or("no message")
            ));
        }
        Ok(self.data)
    }
}

/// Turn a response body into the listed records or the provider's error
fn decode_list<T: DeserializeOwned>(
    endpoint: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Vec<T>> {
    if !status.is_success() {
        // Error bodies still use the envelope; prefer the provider's message
        let detail = serde_json::from_str::<ListResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|r| r.into_data().err())
            .map(|e| e.to_string())
            .unwrap_or_else(|| format!("HTTP {}", status));
        warn!(endpoint = %endpoint, status = %status, "aviationstack request failed");
        return Err(anyhow!("aviationstack {} request failed: {}", endpoint, detail));
    }

    let parsed: ListResponse<T> = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse aviationstack {} response", endpoint))?;
    parsed.into_data()
}

/// Client for the aviationstack REST API
#[derive(Clone)]
pub struct AviationStackClient {
    client: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl AviationStackClient {
    pub fn new(client: reqwest::Client, access_key: String, base_url: String) -> Self {
        Self {
            client,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, endpoint: &str, params: &[(&str, &str)]) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/v1/{}", self.base_url, endpoint))
            .query(&[("access_key", self.access_key.as_str())])
            .query(params)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        // The URL carries the access key, so only the endpoint and params are logged
        debug!(endpoint = %endpoint, params = ?params, "Requesting aviationstack");

        let response = self
            .request(endpoint, params)
            .send()
            .await
            .with_context(|| format!("Failed to send aviationstack {} request", endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read aviationstack {} response", endpoint))?;

        decode_list(endpoint, status, &body)
    }

    pub async fn fetch_airports(&self, query: &AirportQuery) -> Result<Vec<Airport>> {
        let (key, value) = query.param();
        let airports: Vec<Airport> = self.fetch_list("airports", &[(key, value)]).await?;
        debug!(query = %query, count = airports.len(), "Fetched airports");
        Ok(airports)
    }

    pub async fn fetch_departures(&self, iata: &str) -> Result<Vec<Flight>> {
        let iata = iata.trim();
        if iata.is_empty() {
            return Err(anyhow!("IATA code cannot be empty"));
        }
        let flights: Vec<Flight> = self.fetch_list("flights", &[("dep_iata", iata)]).await?;
        debug!(iata = %iata, count = flights.len(), "Fetched departures");
        Ok(flights)
    }
}

#[async_trait]
impl AviationData for AviationStackClient {
    async fn airports(&self, query: &AirportQuery) -> Result<Vec<Airport>> {
        self.fetch_airports(query).await
    }

    async fn departures(&self, iata: &str) -> Result<Vec<Flight>> {
        self.fetch_departures(iata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AviationStackClient {
        AviationStackClient::new(
            reqwest::Client::new(),
            "secret".to_string(),
            "https://api.aviationstack.com/".to_string(),
        )
    }

    #[test]
    fn test_airports_url() {
        let query = AirportQuery::Country("United Kingdom".to_string());
        let (key, value) = query.param();
        let request = client()
            .request("airports", &[(key, value)])
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.aviationstack.com/v1/airports?access_key=secret&country_name=United+Kingdom"
        );
    }

    #[test]
    fn test_flights_url() {
        let request = client()
            .request("flights", &[("dep_iata", "LHR")])
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.aviationstack.com/v1/flights?access_key=secret&dep_iata=LHR"
        );
    }

    #[test]
    fn test_envelope_with_data() {
        let json = r#"{
            "pagination": {"limit": 100, "offset": 0, "count": 1, "total": 1},
            "data": [{"airport_name": "Gatwick", "iata_code": "LGW", "latitude": "51.1537", "longitude": "-0.1821"}]
        }"#;
        let parsed: ListResponse<Airport> = serde_json::from_str(json).unwrap();
        let airports = parsed.into_data().unwrap();
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].iata_code.as_deref(), Some("LGW"));
    }

    #[test]
    fn test_envelope_without_data_is_empty() {
        let parsed: ListResponse<Airport> = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_data().unwrap().is_empty());
    }

    #[test]
    fn test_envelope_with_error() {
        let json = r#"{"error": {"code": "invalid_access_key", "message": "You have not supplied a valid API Access Key."}}"#;
        let parsed: ListResponse<Flight> = serde_json::from_str(json).unwrap();
        let err = parsed.into_data().unwrap_err();
        assert!(err.to_string().contains("invalid_access_key"));
    }

    #[test]
    fn test_unauthorized_uses_provider_message() {
        let body = r#"{"error": {"code": "invalid_access_key", "message": "You have not supplied a valid API Access Key."}}"#;
        let err = decode_list::<Flight>("flights", reqwest::StatusCode::UNAUTHORIZED, body)
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "aviationstack flights request failed: aviationstack error invalid_access_key: \
             You have not supplied a valid API Access Key."
        );
    }

    #[test]
    fn test_server_error_without_envelope() {
        let err = decode_list::<Airport>(
            "airports",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "<html>Internal Server Error</html>",
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("airports request failed"), "got: {}", err);
        assert!(err.contains("HTTP 500"), "got: {}", err);
    }

    #[test]
    fn test_success_body_decodes_records() {
        let body = r#"{"data": [{"flight": {"iata": "BA117"}, "arrival": {"iata": "JFK"}}]}"#;
        let flights = decode_list::<Flight>("flights", reqwest::StatusCode::OK, body).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].flight.iata.as_deref(), Some("BA117"));
    }
}
