use anyhow::Result;
use async_trait::async_trait;

use super::{Location, LocationQuery, LocationResolver};

/// Offline resolver that always answers with the same location
#[derive(Debug, Clone)]
pub struct FixedLocationResolver {
    location: Location,
}

impl FixedLocationResolver {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    /// Demo location in central London
    pub fn london() -> Self {
        Self::new(Location {
            ip: "127.0.0.1".to_string(),
            city: "London".to_string(),
            region: "England".to_string(),
            country: "United Kingdom".to_string(),
            latitude: 51.5074,
            longitude: -0.1278,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl Default for FixedLocationResolver {
    fn default() -> Self {
        Self::london()
    }
}

#[async_trait]
impl LocationResolver for FixedLocationResolver {
    async fn resolve(&self, _query: &LocationQuery) -> Result<Location> {
        Ok(self.location.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
