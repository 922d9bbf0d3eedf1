use anyhow::{Context, Result};
use tracing::info;

use aerolocate::config::AppConfig;
use aerolocate::location::LocationQuery;
use aerolocate::providers::Providers;
use aerolocate::radius::Radius;
use aerolocate::tui::Browser;

/// Run the interactive terminal UI
pub async fn handle_browse(
    config: &AppConfig,
    ip: Option<String>,
    city: Option<String>,
    radius: Option<Radius>,
    offline: bool,
) -> Result<()> {
    let providers = Providers::from_config(config, offline)?;
    let radius = radius.unwrap_or(config.default_radius);
    let mut session = providers.session(radius);

    match city.as_deref() {
        Some(city) => session.search_city(city),
        None => session.resolve(LocationQuery::from_ip(ip.as_deref())),
    }
    info!(radius = %radius, offline, "Starting browser");

    let mut browser = Browser::new()
        .context("Failed to set up terminal")?
        .with_search(city.or(ip));
    browser.run(&mut session).await
}
