pub mod aggregate;
pub mod api_budget;
pub mod cache;
pub mod condition;
pub mod config;
pub mod error;
pub mod extractors;
pub mod forecast;
pub mod geocode;
pub mod middleware;
pub mod openapi;
pub mod precautions;
pub mod routes;
pub mod upstream;
pub mod weather;

use ::config::ConfigError;
use reqwest::Client;
use std::sync::Arc;

use crate::cache::GeoCache;
use crate::config::AppConfig;
use crate::forecast::ForecastService;
use crate::geocode::GeocodeService;
use crate::precautions::PrecautionsService;
use crate::weather::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub geocode_service: Arc<GeocodeService>,
    pub weather_service: Arc<WeatherService>,
    pub forecast_service: Arc<ForecastService>,
    pub precautions_service: Arc<PrecautionsService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire every service onto one shared HTTP client and geocoding cache
    pub fn new(config: AppConfig, http_client: Client, geo_cache: GeoCache) -> Result<Self, ConfigError> {
        let timezone = config.forecast_timezone()?;

        let geocode_service = Arc::new(GeocodeService::new(
            http_client.clone(),
            &config.openweathermap,
            geo_cache,
        ));
        let weather_service = Arc::new(WeatherService::new(
            http_client.clone(),
            &config.openweathermap,
        ));
        let forecast_service = Arc::new(ForecastService::new(
            http_client.clone(),
            &config.openweathermap,
            &config.forecast,
            timezone,
        ));
        let precautions_service = Arc::new(PrecautionsService::new(http_client, &config.assistant));

        Ok(Self {
            geocode_service,
            weather_service,
            forecast_service,
            precautions_service,
            config: Arc::new(config),
        })
    }
}
