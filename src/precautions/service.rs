use axum::http::StatusCode;
use reqwest::Client;
use thiserror::Error;

use super::models::{GenerateRequest, GenerateResponse};
use crate::api_budget::ApiCallBudget;
use crate::config::AssistantConfig;
use crate::error::HttpError;
use crate::geocode::GeocodeError;
use crate::impl_into_response;
use crate::weather::{WeatherError, WeatherResponse};

/// Exact reply the assistant must give to off-topic questions
pub const OFF_TOPIC_REPLY: &str = "I am here to suggest only weather.";

#[derive(Error, Debug)]
pub enum PrecautionsError {
    #[error("Failed to reach weather assistant: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    Location(#[from] GeocodeError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("Weather assistant is not configured")]
    NotConfigured,

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Daily weather assistant limit reached")]
    BudgetExhausted,

    #[error("Weather assistant error: {0}")]
    ApiError(String),

    #[error("No valid response from weather assistant")]
    NoResponse,
}

impl HttpError for PrecautionsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Location(e) => e.status_code(),
            Self::Weather(e) => e.status_code(),
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::BudgetExhausted => StatusCode::TOO_MANY_REQUESTS,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            Self::NoResponse => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Location(e) => e.error_code(),
            Self::Weather(e) => e.error_code(),
            Self::NotConfigured => Some("ASSISTANT_NOT_CONFIGURED"),
            Self::EmptyMessage => Some("EMPTY_MESSAGE"),
            Self::BudgetExhausted => Some("ASSISTANT_LIMIT_REACHED"),
            Self::ApiError(_) => Some("ASSISTANT_ERROR"),
            Self::NoResponse => Some("ASSISTANT_NO_RESPONSE"),
        }
    }
}

impl_into_response!(PrecautionsError);

/// Temperature and wind speed unit labels for an OpenWeatherMap `units` value
fn unit_labels(units: &str) -> (&'static str, &'static str) {
    match units {
        "imperial" => ("°F", "mph"),
        "standard" => ("K", "m/s"),
        _ => ("°C", "m/s"),
    }
}

/// Trimmed user message; `Some("")` after trimming is rejected
pub fn normalize_message(message: Option<&str>) -> Result<Option<&str>, PrecautionsError> {
    match message.map(str::trim) {
        Some("") => Err(PrecautionsError::EmptyMessage),
        other => Ok(other),
    }
}

/// Prompt sent to the assistant for the given conditions
pub fn build_prompt(weather: &WeatherResponse, units: &str, message: Option<&str>) -> String {
    let (temp_unit, speed_unit) = unit_labels(units);

    let mut prompt = format!(
        "You are a helpful weather assistant. Based on the current weather conditions in {location}:\n\
         Temperature: {temp}{temp_unit}\n\
         Humidity: {humidity}%\n\
         Wind Speed: {wind} {speed_unit}\n\
         Weather: {description}\n\n\
         Provide concise safety precautions and advice.\n",
        location = weather.location,
        temp = weather.temperature,
        humidity = weather.humidity,
        wind = weather.wind_speed,
        description = weather.description,
    );

    match message {
        Some(message) => prompt.push_str(&format!(
            "The user just said: \"{message}\". If this message is not related to weather or safety, \
             your ONLY response should be \"{OFF_TOPIC_REPLY}\" Otherwise, incorporate their message \
             into your weather-related advice or respond to their weather-related query based on the \
             current conditions provided."
        )),
        None => prompt.push_str("Start with a friendly greeting and then give advice."),
    }

    prompt
}

pub struct PrecautionsService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    budget: ApiCallBudget,
}

impl PrecautionsService {
    pub fn new(client: Client, settings: &AssistantConfig) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone().filter(|key| !key.is_empty()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            budget: ApiCallBudget::new(settings.daily_limit),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn remaining_calls(&self) -> u32 {
        self.budget.remaining()
    }

    /// Ask the assistant for advice on `weather`, optionally answering `message`
    pub async fn advise(
        &self,
        weather: &WeatherResponse,
        units: &str,
        message: Option<&str>,
    ) -> Result<String, PrecautionsError> {
        let api_key = self.api_key.as_deref().ok_or(PrecautionsError::NotConfigured)?;
        let message = normalize_message(message)?;

        if !self.budget.try_acquire() {
            tracing::warn!(used = self.budget.used_today(), "Weather assistant budget exhausted");
            return Err(PrecautionsError::BudgetExhausted);
        }

        let prompt = build_prompt(weather, units, message);
        tracing::debug!(
            location = %weather.location,
            model = %self.model,
            follow_up = message.is_some(),
            "Requesting precautions"
        );

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrecautionsError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let reply = response
            .json::<GenerateResponse>()
            .await?
            .first_text()
            .ok_or(PrecautionsError::NoResponse)?;

        tracing::info!(
            location = %weather.location,
            remaining = self.budget.remaining(),
            "Precautions generated"
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    fn weather() -> WeatherResponse {
        WeatherResponse {
            location: "Hyderabad, Telangana, IN".to_string(),
            lat: 17.385,
            lon: 78.4867,
            timestamp: 1709283600,
            temperature: 38.5,
            feels_like: 40.1,
            temp_min: 36.0,
            temp_max: 39.0,
            humidity: 20,
            pressure: 1006,
            wind_speed: 3.2,
            wind_direction: Some(250.0),
            wind_compass: Some("SW".to_string()),
            visibility: Some(10000),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            condition: Condition::ClearDay,
            sunrise: None,
            sunset: None,
        }
    }

    fn settings(api_key: Option<&str>, daily_limit: u32) -> AssistantConfig {
        AssistantConfig {
            api_key: api_key.map(str::to_string),
            daily_limit,
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn test_greeting_prompt() {
        let prompt = build_prompt(&weather(), "metric", None);
        assert!(prompt.contains("current weather conditions in Hyderabad, Telangana, IN"));
        assert!(prompt.contains("Temperature: 38.5°C"));
        assert!(prompt.contains("Humidity: 20%"));
        assert!(prompt.contains("Wind Speed: 3.2 m/s"));
        assert!(prompt.contains("Weather: clear sky"));
        assert!(prompt.ends_with("Start with a friendly greeting and then give advice."));
    }

    #[test]
    fn test_follow_up_prompt_quotes_message() {
        let prompt = build_prompt(&weather(), "imperial", Some("Can I go running?"));
        assert!(prompt.contains("Temperature: 38.5°F"));
        assert!(prompt.contains("Wind Speed: 3.2 mph"));
        assert!(prompt.contains("The user just said: \"Can I go running?\""));
        assert!(prompt.contains(OFF_TOPIC_REPLY));
        assert!(!prompt.contains("friendly greeting"));
    }

    #[test]
    fn test_normalize_message() {
        assert_eq!(normalize_message(None).unwrap(), None);
        assert_eq!(normalize_message(Some("  hi ")).unwrap(), Some("hi"));
        assert!(matches!(
            normalize_message(Some("   ")),
            Err(PrecautionsError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_advise_without_key_is_not_configured() {
        let service = PrecautionsService::new(Client::new(), &settings(None, 10));
        assert!(!service.is_configured());

        let err = service.advise(&weather(), "metric", None).await.unwrap_err();
        assert!(matches!(err, PrecautionsError::NotConfigured));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_advise_with_exhausted_budget() {
        let service = PrecautionsService::new(Client::new(), &settings(Some("key"), 0));

        let err = service.advise(&weather(), "metric", None).await.unwrap_err();
        assert!(matches!(err, PrecautionsError::BudgetExhausted));
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_budget() {
        let service = PrecautionsService::new(Client::new(), &settings(Some("key"), 5));

        let err = service.advise(&weather(), "metric", Some(" ")).await.unwrap_err();
        assert!(matches!(err, PrecautionsError::EmptyMessage));
        assert_eq!(service.remaining_calls(), 5);
    }
}
