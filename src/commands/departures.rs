use anyhow::{Result, bail};
use tracing::info;

use aerolocate::config::AppConfig;
use aerolocate::flights::FlightBoard;
use aerolocate::providers::Providers;
use aerolocate::shell::{Departures, MISSING_KEY_MESSAGE, render_departures_plain};

/// Print the departure board of one airport
pub async fn handle_departures(config: &AppConfig, iata: &str, json: bool) -> Result<()> {
    // No geolocation needed, so skip building the ip-api client
    let providers = Providers::from_config(config, true)?;
    let Some(aviation) = providers.aviation else {
        bail!("{}", MISSING_KEY_MESSAGE);
    };

    let iata = iata.trim().to_uppercase();
    if iata.is_empty() {
        bail!("IATA code cannot be empty");
    }
    info!(iata = %iata, "Fetching departures");

    let mut board = FlightBoard::default();
    board.begin(&iata);
    board.apply_fetch(aviation.departures(&iata).await);

    if json {
        return super::print_json(&board.flights());
    }
    print!(
        "{}",
        render_departures_plain(&Departures::from_board(Some(&iata), &board))
    );
    Ok(())
}
