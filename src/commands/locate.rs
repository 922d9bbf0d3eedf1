use anyhow::Result;
use tracing::info;

use aerolocate::config::AppConfig;
use aerolocate::location::LocationQuery;
use aerolocate::providers::Providers;

/// Resolve and print the location without touching the aviation API
pub async fn handle_locate(
    config: &AppConfig,
    ip: Option<String>,
    offline: bool,
    json: bool,
) -> Result<()> {
    let providers = Providers::from_config(config, offline)?;
    let query = LocationQuery::from_ip(ip.as_deref());
    info!(provider = providers.resolver.name(), query = %query, "Resolving location");

    let location = providers.resolver.resolve(&query).await?;

    if json {
        return super::print_json(&location);
    }
    println!(
        "{}, {}, {} ({:.4}, {:.4}) via {}",
        location.city,
        location.region,
        location.country,
        location.latitude,
        location.longitude,
        location.ip
    );
    Ok(())
}
