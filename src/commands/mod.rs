pub mod airports;
pub mod browse;
pub mod departures;
pub mod locate;

pub use airports::{AirportsArgs, handle_airports};
pub use browse::handle_browse;
pub use departures::handle_departures;
pub use locate::handle_locate;

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
