use anyhow::{Result, bail};
use tracing::{info, warn};

use aerolocate::config::AppConfig;
use aerolocate::location::LocationQuery;
use aerolocate::providers::Providers;
use aerolocate::radius::Radius;
use aerolocate::shell::{Screen, render_plain};

pub struct AirportsArgs {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub radius: Option<Radius>,
    pub select: Option<String>,
    pub offline: bool,
    pub json: bool,
}

/// One-shot version of the dashboard: locate, list airports, show departures
pub async fn handle_airports(config: &AppConfig, args: AirportsArgs) -> Result<()> {
    let providers = Providers::from_config(config, args.offline)?;
    let radius = args.radius.unwrap_or(config.default_radius);
    let mut session = providers.session(radius);

    match args.city.as_deref() {
        Some(city) => {
            info!(city = %city, "Searching airports by city");
            session.search_city(city);
        }
        None => session.resolve(LocationQuery::from_ip(args.ip.as_deref())),
    }
    session.settle().await;

    if let Some(iata) = args.select.as_deref().map(str::trim) {
        session.select_iata(iata);
        if session
            .airports()
            .selected()
            .and_then(|a| a.iata_code.as_deref())
            .is_none_or(|code| !code.eq_ignore_ascii_case(iata))
        {
            warn!(iata = %iata, "Airport not in the filtered list");
        }
        session.settle().await;
    }

    let screen = Screen::from_session(&session);
    if args.json {
        super::print_json(&screen)?;
    }

    match &screen {
        Screen::ConfigError { message } | Screen::LocationError { message } => {
            bail!("{}", message)
        }
        _ if !args.json => print!("{}", render_plain(&screen)),
        _ => {}
    }
    Ok(())
}
