pub mod handlers;
pub mod models;
mod service;

pub use models::{GeoLocation, LocationInfo, ResolvedLocation};
pub use service::{GeocodeError, GeocodeService};
