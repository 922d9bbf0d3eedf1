use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::aviation::{AviationData, AviationStackClient};
use crate::config::AppConfig;
use crate::location::{FixedLocationResolver, IpApiClient, LocationResolver};
use crate::radius::Radius;
use crate::session::Session;

/// The two data sources a session talks to
#[derive(Clone)]
pub struct Providers {
    pub resolver: Arc<dyn LocationResolver>,
    /// `None` when no aviationstack key is configured
    pub aviation: Option<Arc<dyn AviationData>>,
}

impl Providers {
    /// Build providers from configuration. `offline` swaps the IP lookup for a
    /// fixed location; the airport and flight data still need the API.
    pub fn from_config(config: &AppConfig, offline: bool) -> Result<Self> {
        let client = config.http_client()?;

        let resolver: Arc<dyn LocationResolver> = if offline {
            Arc::new(FixedLocationResolver::default())
        } else {
            Arc::new(IpApiClient::new(client.clone(), config.ip_api_url.clone()))
        };

        let aviation = match config.api_key() {
            Some(key) => Some(Arc::new(AviationStackClient::new(
                client,
                key.to_string(),
                config.aviationstack_url.clone(),
            )) as Arc<dyn AviationData>),
            None => {
                warn!("No aviationstack API key configured");
                None
            }
        };

        debug!(
            resolver = resolver.name(),
            aviation = aviation.is_some(),
            "Providers ready"
        );
        Ok(Self { resolver, aviation })
    }

    pub fn session(&self, radius: Radius) -> Session {
        Session::new(Arc::clone(&self.resolver), self.aviation.clone(), radius)
    }
}
