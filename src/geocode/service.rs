use axum::http::StatusCode;
use reqwest::Client;
use thiserror::Error;

use super::models::{GeoLocation, ResolvedLocation, ZipGeoLocation};
use crate::cache::{normalize_cache_key, GeoCache};
use crate::config::OpenWeatherConfig;
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Failed to fetch location: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Please enter a city name")]
    EmptyQuery,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Both lat and lon are required")]
    IncompleteCoordinates,

    #[error("API error: {0}")]
    ApiError(String),
}

impl HttpError for GeocodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::EmptyQuery | Self::IncompleteCoordinates => StatusCode::BAD_REQUEST,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::EmptyQuery => Some("EMPTY_QUERY"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::IncompleteCoordinates => Some("INCOMPLETE_COORDINATES"),
            Self::ApiError(_) => Some("API_ERROR"),
        }
    }
}

impl_into_response!(GeocodeError);

pub struct GeocodeService {
    client: Client,
    api_key: String,
    base_url: String,
    cache: GeoCache,
}

impl GeocodeService {
    pub fn new(client: Client, settings: &OpenWeatherConfig, cache: GeoCache) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Check if input looks like a zip code (digits only, or digits,country)
    fn is_zip_code(input: &str) -> bool {
        let parts: Vec<&str> = input.split(',').collect();
        match parts.as_slice() {
            [zip] | [zip, _] => {
                let zip = zip.trim();
                !zip.is_empty() && zip.chars().all(|c| c.is_ascii_digit())
            }
            _ => false,
        }
    }

    /// `zip,country` with each part trimmed; the country defaults to US
    fn zip_query(input: &str) -> String {
        let (zip, country) = input.split_once(',').unwrap_or((input, ""));
        let country = match country.trim() {
            "" => "US",
            country => country,
        };
        format!("{},{}", zip.trim(), country)
    }

    /// Look up a free-text city ("Hyderabad", "Paris,FR") or zip code ("60601,US").
    /// Results are cached for 24 hours.
    pub async fn geocode(&self, query: &str) -> Result<GeoLocation, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let cache_key = normalize_cache_key(query);
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(query = %query, "Geocoding cache hit");
            return Ok(cached);
        }

        tracing::debug!(query = %query, "Geocoding cache miss");

        let location = if Self::is_zip_code(query) {
            self.geocode_zip(query).await
        } else {
            self.geocode_city(query).await
        }?;

        self.cache.insert(cache_key, location.clone());
        Ok(location)
    }

    /// Pick coordinates for a request: explicit lat/lon, else city, else `fallback_city`
    pub async fn resolve(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        city: Option<&str>,
        fallback_city: &str,
    ) -> Result<ResolvedLocation, GeocodeError> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(ResolvedLocation {
                lat,
                lon,
                name: None,
            }),
            (None, None) => {
                let query = city.unwrap_or(fallback_city);
                let location = self.geocode(query).await?;
                Ok(ResolvedLocation::from(&location))
            }
            _ => Err(GeocodeError::IncompleteCoordinates),
        }
    }

    async fn geocode_city(&self, city: &str) -> Result<GeoLocation, GeocodeError> {
        tracing::debug!(city = %city, "Geocoding city");

        let response = self
            .client
            .get(format!("{}/geo/1.0/direct", self.base_url))
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError(format!("Geocoding failed: {}", text)));
        }

        let locations: Vec<GeoLocation> = response.json().await?;
        locations
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::CityNotFound(city.to_string()))
    }

    async fn geocode_zip(&self, zip: &str) -> Result<GeoLocation, GeocodeError> {
        let zip_query = Self::zip_query(zip);
        tracing::debug!(zip = %zip_query, "Geocoding zip code");

        let response = self
            .client
            .get(format!("{}/geo/1.0/zip", self.base_url))
            .query(&[("zip", zip_query.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GeocodeError::CityNotFound(zip.to_string()));
        }

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError(format!(
                "Zip geocoding failed: {}",
                text
            )));
        }

        let location: ZipGeoLocation = response.json().await?;
        Ok(location.into())
    }
}
