use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::aggregate::{DaySummary, RawSample, Sample};
use crate::condition::Condition;
use crate::upstream::ResponseCode;

// ============================================================================
// 5 day / 3 hour forecast feed (data API 2.5)
// Every per-entry field is optional so that a missing value surfaces as a
// MalformedSampleError for that entry instead of failing the whole decode.
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ForecastFeed {
    #[serde(default)]
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: Option<FeedCity>,
}

impl ForecastFeed {
    pub fn is_ok(&self) -> bool {
        self.cod.as_ref().is_some_and(ResponseCode::is_ok)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastItem {
    pub dt: Option<i64>,
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub weather: Vec<FeedCondition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Default, Deserialize)]
pub struct FeedCondition {
    pub id: Option<u32>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct FeedCity {
    pub name: Option<String>,
    pub country: Option<String>,
    /// Shift in seconds from UTC
    pub timezone: Option<i32>,
}

impl RawSample for ForecastItem {
    fn timestamp(&self) -> Option<i64> {
        self.dt
    }

    fn temperature(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    fn condition_code(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.icon.as_deref())
    }

    fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.description.as_deref())
    }
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// UTC offset (seconds) used to derive calendar dates
    pub utc_offset: i32,
}

/// Min/max summary per calendar day
#[derive(Debug, Serialize, ToSchema)]
pub struct DailyForecastResponse {
    pub location: ForecastLocation,
    pub units: String,
    pub days: Vec<DaySummary>,
}

/// One representative forecast point per day, nearest to local midday
#[derive(Debug, Serialize, ToSchema)]
pub struct MiddayForecast {
    pub timestamp: i64,
    /// RFC 3339 local time of the forecast point
    pub local_time: String,
    pub temperature: f64,
    pub icon: String,
    pub condition: Condition,
    pub description: String,
}

impl MiddayForecast {
    pub fn from_sample(sample: Sample, local_time: String) -> Self {
        Self {
            timestamp: sample.timestamp,
            local_time,
            temperature: sample.temperature,
            condition: sample.condition(),
            icon: sample.condition_code,
            description: sample.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MiddayForecastResponse {
    pub location: ForecastLocation,
    pub units: String,
    pub days: Vec<MiddayForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feed_decodes_owm_shape() {
        let feed: ForecastFeed = serde_json::from_value(json!({
            "cod": "200",
            "message": 0,
            "cnt": 1,
            "list": [{
                "dt": 1709272800,
                "main": {"temp": 31.2, "feels_like": 30.1, "humidity": 22, "pressure": 1011},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "pop": 0,
                "dt_txt": "2024-03-01 06:00:00"
            }],
            "city": {"name": "Hyderabad", "country": "IN", "timezone": 19800}
        }))
        .unwrap();

        assert!(feed.is_ok());
        assert_eq!(feed.list.len(), 1);
        let item = &feed.list[0];
        assert_eq!(item.timestamp(), Some(1709272800));
        assert_eq!(item.temperature(), Some(31.2));
        assert_eq!(item.condition_code(), Some("01d"));
        assert_eq!(item.description(), Some("clear sky"));
        assert_eq!(feed.city.unwrap().timezone, Some(19800));
    }

    #[test]
    fn test_item_without_weather_has_no_condition() {
        let item: ForecastItem =
            serde_json::from_value(json!({"dt": 1, "main": {"temp": 2.0}})).unwrap();
        assert_eq!(item.condition_code(), None);
    }

    #[test]
    fn test_error_feed_not_ok() {
        let feed: ForecastFeed =
            serde_json::from_value(json!({"cod": "404", "message": "city not found"})).unwrap();
        assert!(!feed.is_ok());
        assert!(feed.list.is_empty());
    }

    #[test]
    fn test_midday_from_sample() {
        let sample = Sample::new(1709272800, 31.2, "01d", "clear sky");
        let midday = MiddayForecast::from_sample(sample, "2024-03-01T11:30:00+05:30".to_string());
        assert_eq!(midday.condition, Condition::ClearDay);
        assert_eq!(midday.icon, "01d");
    }
}
