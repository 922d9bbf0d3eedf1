//! AeroLocate - find airports near you and their live departures
//!
//! The library geolocates the caller through an IP lookup service, asks the
//! aviationstack API for airports in that country, keeps the ones within a
//! chosen radius and lists live departures for the selected airport.

pub mod airports;
pub mod aviation;
pub mod config;
pub mod flights;
pub mod geo;
pub mod location;
pub mod log_format;
pub mod providers;
pub mod radius;
pub mod session;
pub mod shell;
pub mod tui;

pub use airports::{Airport, AirportLookup};
pub use aviation::{AirportQuery, AviationData, AviationStackClient};
pub use config::AppConfig;
pub use flights::{Flight, FlightBoard};
pub use location::{FixedLocationResolver, IpApiClient, Location, LocationQuery, LocationResolver};
pub use providers::Providers;
pub use radius::Radius;
pub use session::{Session, SessionEvent};
pub use shell::Screen;
