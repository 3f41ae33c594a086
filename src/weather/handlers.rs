use axum::{extract::State, Json};
use serde::Serialize;

use super::service::{WeatherError, WeatherResponse};
use crate::extractors::{CityParam, OptionsParam};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current conditions by city (path or query), coordinates, or the default city
///
/// GET /weather?city=Hyderabad&units=metric
/// GET /weather/{city}
/// GET /weather?lat=17.38&lon=78.48
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
    options: OptionsParam,
) -> Result<Json<WeatherResponse>, WeatherError> {
    let units = options.units_or(&state.config.units);
    let location = state
        .geocode_service
        .resolve(options.lat, options.lon, city.as_deref(), &state.config.default_city)
        .await?;

    let weather = state.weather_service.get_weather(&location, &units).await?;
    Ok(Json(weather))
}
