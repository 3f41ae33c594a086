use axum::http::StatusCode;
use chrono::{FixedOffset, Offset, TimeZone, Utc};
use reqwest::Client;
use std::fmt::Display;
use thiserror::Error;

use super::models::*;
use crate::aggregate::{local_time, DailyAggregator, DaySummary, MalformedSampleError};
use crate::config::{ForecastConfig, OpenWeatherConfig};
use crate::error::HttpError;
use crate::geocode::{GeocodeError, ResolvedLocation};
use crate::impl_into_response;
use crate::upstream;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Failed to fetch data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    Location(#[from] GeocodeError),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("OpenWeatherMap rejected the API key")]
    Unauthorized,

    #[error("Malformed forecast feed: {0}")]
    MalformedFeed(#[from] MalformedSampleError),
}

impl HttpError for ForecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Location(e) => e.status_code(),
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::BAD_GATEWAY,
            Self::MalformedFeed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Location(e) => e.error_code(),
            Self::ApiError(_) => Some("API_ERROR"),
            Self::Unauthorized => Some("UPSTREAM_UNAUTHORIZED"),
            Self::MalformedFeed(_) => Some("MALFORMED_FEED"),
        }
    }
}

impl_into_response!(ForecastError);

/// Time zone used to turn timestamps into calendar dates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastZone {
    Named(chrono_tz::Tz),
    Offset(FixedOffset),
}

impl ForecastZone {
    /// Seconds east of UTC at `timestamp`
    pub fn utc_offset_at(&self, timestamp: i64) -> i32 {
        match self {
            Self::Named(tz) => local_time(timestamp, tz).offset().fix().local_minus_utc(),
            Self::Offset(offset) => offset.local_minus_utc(),
        }
    }
}

pub struct ForecastService {
    client: Client,
    api_key: String,
    base_url: String,
    timezone: Option<chrono_tz::Tz>,
    max_days: usize,
}

impl ForecastService {
    pub fn new(
        client: Client,
        settings: &OpenWeatherConfig,
        forecast: &ForecastConfig,
        timezone: Option<chrono_tz::Tz>,
    ) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timezone,
            max_days: forecast.max_days,
        }
    }

    /// Fetch the raw 5 day / 3 hour feed for a location
    pub async fn fetch_feed(
        &self,
        location: &ResolvedLocation,
        units: &str,
    ) -> Result<ForecastFeed, ForecastError> {
        tracing::debug!(
            lat = %location.lat,
            lon = %location.lon,
            units = %units,
            "Fetching 5 day forecast"
        );

        let response = self
            .client
            .get(format!("{}/data/2.5/forecast", self.base_url))
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", units.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received forecast response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ForecastError::Unauthorized);
        }

        if !status.is_success() {
            let message = upstream::error_message(response, "Failed to fetch forecast data").await;
            return Err(ForecastError::ApiError(message));
        }

        let feed: ForecastFeed = response.json().await?;
        if !feed.is_ok() {
            return Err(ForecastError::ApiError(
                "Failed to fetch forecast data".to_string(),
            ));
        }

        Ok(feed)
    }

    /// Min/max summaries per calendar day
    pub async fn get_daily(
        &self,
        location: &ResolvedLocation,
        units: &str,
        days: Option<usize>,
    ) -> Result<DailyForecastResponse, ForecastError> {
        let feed = self.fetch_feed(location, units).await?;
        let zone = self.zone_for(&feed);
        let max_days = days.unwrap_or(self.max_days);

        let summaries: Vec<DaySummary> = match zone {
            ForecastZone::Named(tz) => DailyAggregator::new(max_days, tz).daily_summaries(&feed.list)?,
            ForecastZone::Offset(offset) => {
                DailyAggregator::new(max_days, offset).daily_summaries(&feed.list)?
            }
        };

        tracing::info!(
            samples = feed.list.len(),
            days = summaries.len(),
            "Daily forecast aggregated"
        );

        Ok(DailyForecastResponse {
            location: forecast_location(location, &feed, zone),
            units: units.to_string(),
            days: summaries,
        })
    }

    /// One forecast point per day, nearest to local 11:30, in chronological order
    pub async fn get_midday(
        &self,
        location: &ResolvedLocation,
        units: &str,
        days: Option<usize>,
    ) -> Result<MiddayForecastResponse, ForecastError> {
        let feed = self.fetch_feed(location, units).await?;
        let zone = self.zone_for(&feed);
        let max_days = days.unwrap_or(self.max_days);

        let picked = match zone {
            ForecastZone::Named(tz) => midday_view(&feed.list, max_days, &tz)?,
            ForecastZone::Offset(offset) => midday_view(&feed.list, max_days, &offset)?,
        };

        tracing::info!(
            samples = feed.list.len(),
            days = picked.len(),
            "Midday forecast selected"
        );

        Ok(MiddayForecastResponse {
            location: forecast_location(location, &feed, zone),
            units: units.to_string(),
            days: picked,
        })
    }

    /// Configured zone first, then the feed's own offset, then UTC
    fn zone_for(&self, feed: &ForecastFeed) -> ForecastZone {
        if let Some(tz) = self.timezone {
            return ForecastZone::Named(tz);
        }

        let offset = feed
            .city
            .as_ref()
            .and_then(|city| city.timezone)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        ForecastZone::Offset(offset)
    }
}

fn midday_view<Tz>(
    items: &[ForecastItem],
    max_days: usize,
    tz: &Tz,
) -> Result<Vec<MiddayForecast>, MalformedSampleError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let samples = DailyAggregator::new(max_days, tz.clone()).midday_samples(items)?;
    Ok(samples
        .into_iter()
        .map(|sample| {
            let local = local_time(sample.timestamp, tz).to_rfc3339();
            MiddayForecast::from_sample(sample, local)
        })
        .collect())
}

fn forecast_location(
    location: &ResolvedLocation,
    feed: &ForecastFeed,
    zone: ForecastZone,
) -> ForecastLocation {
    let feed_name = feed.city.as_ref().and_then(|city| {
        let name = city.name.as_deref().filter(|n| !n.is_empty())?;
        Some(match city.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", name, country),
            _ => name.to_string(),
        })
    });

    let reference_ts = feed.list.first().and_then(|item| item.dt).unwrap_or(0);

    ForecastLocation {
        name: location
            .name
            .clone()
            .or(feed_name)
            .unwrap_or_else(|| "Unknown Location".to_string()),
        lat: location.lat,
        lon: location.lon,
        utc_offset: zone.utc_offset_at(reference_ts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 2024-03-01T00:00:00Z
    const MARCH_1: i64 = 1_709_251_200;
    const HOUR: i64 = 3600;

    fn service(timezone: Option<chrono_tz::Tz>) -> ForecastService {
        let settings = OpenWeatherConfig {
            api_key: "test_api_key".to_string(),
            base_url: "https://owm.example.com".to_string(),
        };
        ForecastService::new(Client::new(), &settings, &ForecastConfig::default(), timezone)
    }

    fn feed(timezone: Option<i32>) -> ForecastFeed {
        serde_json::from_value(json!({
            "cod": "200",
            "list": [
                {"dt": MARCH_1 + 18 * HOUR, "main": {"temp": 25.0}, "weather": [{"icon": "01n", "description": "clear sky"}]},
                {"dt": MARCH_1 + 21 * HOUR, "main": {"temp": 23.0}, "weather": [{"icon": "01n", "description": "clear sky"}]}
            ],
            "city": {"name": "Hyderabad", "country": "IN", "timezone": timezone}
        }))
        .unwrap()
    }

    fn coordinates() -> ResolvedLocation {
        ResolvedLocation {
            lat: 17.385,
            lon: 78.4867,
            name: None,
        }
    }

    #[test]
    fn test_zone_prefers_configured_timezone() {
        let zone = service(Some(chrono_tz::Europe::London)).zone_for(&feed(Some(19800)));
        assert_eq!(zone, ForecastZone::Named(chrono_tz::Europe::London));
    }

    #[test]
    fn test_zone_falls_back_to_feed_offset() {
        let zone = service(None).zone_for(&feed(Some(19800)));
        assert_eq!(zone, ForecastZone::Offset(FixedOffset::east_opt(19800).unwrap()));
        assert_eq!(zone.utc_offset_at(MARCH_1), 19800);
    }

    #[test]
    fn test_zone_defaults_to_utc() {
        let zone = service(None).zone_for(&feed(None));
        assert_eq!(zone.utc_offset_at(MARCH_1), 0);
    }

    #[test]
    fn test_named_zone_offset_follows_dst() {
        let zone = ForecastZone::Named(chrono_tz::Europe::London);
        assert_eq!(zone.utc_offset_at(MARCH_1), 0);
        // 2024-07-01T00:00:00Z is BST
        assert_eq!(zone.utc_offset_at(1_719_792_000), 3600);
    }

    #[test]
    fn test_midday_view_formats_local_time() {
        let ist = FixedOffset::east_opt(19800).unwrap();
        let items = feed(Some(19800)).list;
        let view = midday_view(&items, 5, &ist).unwrap();

        // 18:00Z and 21:00Z fall on March 1st (23:30) and March 2nd (02:30) at IST
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].local_time, "2024-03-01T23:30:00+05:30");
        assert_eq!(view[1].local_time, "2024-03-02T02:30:00+05:30");
    }

    #[test]
    fn test_forecast_location_uses_feed_name_for_coordinates() {
        let feed = feed(Some(19800));
        let zone = service(None).zone_for(&feed);
        let location = forecast_location(&coordinates(), &feed, zone);
        assert_eq!(location.name, "Hyderabad, IN");
        assert_eq!(location.utc_offset, 19800);
    }

    #[test]
    fn test_forecast_location_keeps_geocoded_name() {
        let feed = feed(None);
        let resolved = ResolvedLocation {
            name: Some("Hyderabad, Telangana, IN".to_string()),
            ..coordinates()
        };
        let location = forecast_location(&resolved, &feed, ForecastZone::Offset(Utc.fix()));
        assert_eq!(location.name, "Hyderabad, Telangana, IN");
    }

    #[test]
    fn test_malformed_feed_maps_to_bad_gateway() {
        let err = ForecastError::from(MalformedSampleError {
            index: 2,
            field: crate::aggregate::SampleField::ConditionCode,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), Some("MALFORMED_FEED"));
    }
}
