use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::condition::{compass_direction, Condition};
use crate::config::OpenWeatherConfig;
use crate::error::HttpError;
use crate::geocode::{GeocodeError, ResolvedLocation};
use crate::impl_into_response;
use crate::upstream::{self, ResponseCode};

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to fetch weather data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    Location(#[from] GeocodeError),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("OpenWeatherMap rejected the API key")]
    Unauthorized,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Location(e) => e.status_code(),
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::BAD_GATEWAY,
            Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Location(e) => e.error_code(),
            Self::ApiError(_) => Some("API_ERROR"),
            Self::Unauthorized => Some("UPSTREAM_UNAUTHORIZED"),
            Self::InvalidResponse(_) => Some("INVALID_RESPONSE"),
        }
    }
}

impl_into_response!(WeatherError);

/// Current conditions as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<f64>,
    /// Eight-point compass label for `wind_direction`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_compass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    pub description: String,
    pub icon: String,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherFeed {
    #[serde(default)]
    cod: Option<ResponseCode>,
    #[serde(default)]
    name: String,
    dt: i64,
    main: MainInfo,
    #[serde(default)]
    weather: Vec<WeatherInfo>,
    wind: WindInfo,
    visibility: Option<u32>,
    #[serde(default)]
    sys: SysInfo,
}

#[derive(Debug, Default, Deserialize)]
struct SysInfo {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MainInfo {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u32,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct WeatherInfo {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WindInfo {
    speed: f64,
    deg: Option<f64>,
}

pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(client: Client, settings: &OpenWeatherConfig) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_weather(
        &self,
        location: &ResolvedLocation,
        units: &str,
    ) -> Result<WeatherResponse, WeatherError> {
        tracing::debug!(lat = %location.lat, lon = %location.lon, units = %units, "Fetching weather data");

        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", units.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received API response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Unauthorized);
        }

        if !status.is_success() {
            let message =
                upstream::error_message(response, "Failed to fetch current weather data").await;
            return Err(WeatherError::ApiError(message));
        }

        let data: CurrentWeatherFeed = response.json().await?;
        let weather = Self::transform(data, location)?;

        tracing::info!(location = %weather.location, temp = %weather.temperature, "Weather data fetched successfully");

        Ok(weather)
    }

    fn transform(
        data: CurrentWeatherFeed,
        location: &ResolvedLocation,
    ) -> Result<WeatherResponse, WeatherError> {
        if data.cod.as_ref().is_some_and(|cod| !cod.is_ok()) {
            return Err(WeatherError::ApiError(
                "Failed to fetch current weather data".to_string(),
            ));
        }

        let weather_info = data.weather.into_iter().next().ok_or_else(|| {
            WeatherError::InvalidResponse("No weather information available".to_string())
        })?;

        let feed_name = match (data.name.is_empty(), data.sys.country) {
            (true, _) => None,
            (false, Some(country)) if !country.is_empty() => {
                Some(format!("{}, {}", data.name, country))
            }
            (false, _) => Some(data.name),
        };

        Ok(WeatherResponse {
            location: location
                .name
                .clone()
                .or(feed_name)
                .unwrap_or_else(|| "Unknown Location".to_string()),
            lat: location.lat,
            lon: location.lon,
            timestamp: data.dt,
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            temp_min: data.main.temp_min,
            temp_max: data.main.temp_max,
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: data.wind.speed,
            wind_direction: data.wind.deg,
            wind_compass: data.wind.deg.map(|deg| compass_direction(deg).to_string()),
            visibility: data.visibility,
            condition: Condition::from_icon_code(&weather_info.icon),
            description: weather_info.description,
            icon: weather_info.icon,
            sunrise: data.sys.sunrise,
            sunset: data.sys.sunset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coordinates(name: Option<&str>) -> ResolvedLocation {
        ResolvedLocation {
            lat: 17.385,
            lon: 78.4867,
            name: name.map(str::to_string),
        }
    }

    fn feed() -> serde_json::Value {
        json!({
            "coord": {"lon": 78.4867, "lat": 17.385},
            "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
            "main": {"temp": 29.4, "feels_like": 30.2, "temp_min": 28.1, "temp_max": 30.0, "pressure": 1009, "humidity": 58},
            "visibility": 6000,
            "wind": {"speed": 4.1, "deg": 250},
            "dt": 1709283600,
            "sys": {"country": "IN", "sunrise": 1709254800, "sunset": 1709297400},
            "timezone": 19800,
            "name": "Hyderabad",
            "cod": 200
        })
    }

    #[test]
    fn test_transform_current_weather() {
        let data: CurrentWeatherFeed = serde_json::from_value(feed()).unwrap();
        let weather = WeatherService::transform(data, &coordinates(None)).unwrap();

        assert_eq!(weather.location, "Hyderabad, IN");
        assert_eq!(weather.temperature, 29.4);
        assert_eq!(weather.humidity, 58);
        assert_eq!(weather.wind_compass.as_deref(), Some("SW"));
        assert_eq!(weather.condition, Condition::Cloudy);
        assert_eq!(weather.icon, "03d");
        assert_eq!(weather.sunset, Some(1709297400));
    }

    #[test]
    fn test_transform_prefers_geocoded_name() {
        let data: CurrentWeatherFeed = serde_json::from_value(feed()).unwrap();
        let weather =
            WeatherService::transform(data, &coordinates(Some("Hyderabad, Telangana, IN"))).unwrap();
        assert_eq!(weather.location, "Hyderabad, Telangana, IN");
    }

    #[test]
    fn test_transform_without_conditions_is_invalid() {
        let mut value = feed();
        value["weather"] = json!([]);
        let data: CurrentWeatherFeed = serde_json::from_value(value).unwrap();

        let err = WeatherService::transform(data, &coordinates(None)).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[test]
    fn test_transform_rejects_error_code() {
        let mut value = feed();
        value["cod"] = json!(404);
        let data: CurrentWeatherFeed = serde_json::from_value(value).unwrap();

        let err = WeatherService::transform(data, &coordinates(None)).unwrap_err();
        assert!(matches!(err, WeatherError::ApiError(_)));
    }
}
