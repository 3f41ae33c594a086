pub mod handlers;
mod service;

pub use service::{WeatherError, WeatherResponse, WeatherService};
