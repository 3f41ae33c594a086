use axum::{extract::State, Json};

use super::models::{DailyForecastResponse, MiddayForecastResponse};
use super::service::ForecastError;
use crate::extractors::{CityParam, OptionsParam};
use crate::AppState;

/// Daily min/max summaries (5 days by default)
///
/// GET /forecast/daily?city=Hyderabad&days=5&units=metric
/// GET /forecast/daily/{city}
/// GET /forecast/daily?lat=17.38&lon=78.48
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    city: CityParam,
    options: OptionsParam,
) -> Result<Json<DailyForecastResponse>, ForecastError> {
    let units = options.units_or(&state.config.units);
    let location = state
        .geocode_service
        .resolve(options.lat, options.lon, city.as_deref(), &state.config.default_city)
        .await?;

    let forecast = state
        .forecast_service
        .get_daily(&location, &units, options.days)
        .await?;
    Ok(Json(forecast))
}

/// One forecast point per day, nearest to local midday
///
/// GET /forecast/midday?city=Hyderabad&days=5&units=metric
/// GET /forecast/midday/{city}
pub async fn get_midday_forecast(
    State(state): State<AppState>,
    city: CityParam,
    options: OptionsParam,
) -> Result<Json<MiddayForecastResponse>, ForecastError> {
    let units = options.units_or(&state.config.units);
    let location = state
        .geocode_service
        .resolve(options.lat, options.lon, city.as_deref(), &state.config.default_city)
        .await?;

    let forecast = state
        .forecast_service
        .get_midday(&location, &units, options.days)
        .await?;
    Ok(Json(forecast))
}
