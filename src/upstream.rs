//! Response shapes shared by the OpenWeatherMap data endpoints.

use serde::Deserialize;

/// `cod` is a string on `/forecast` and a number on `/weather`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseCode {
    Text(String),
    Number(i64),
}

impl ResponseCode {
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Text(code) => code.trim() == "200",
            Self::Number(code) => *code == 200,
        }
    }
}

/// Error body returned by OpenWeatherMap on failures
#[derive(Debug, Deserialize)]
pub struct OwmErrorBody {
    #[serde(default)]
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl OwmErrorBody {
    /// Human-readable message, falling back to `default`
    pub fn message_or(&self, default: &str) -> String {
        match &self.message {
            Some(serde_json::Value::String(text)) if !text.is_empty() => text.clone(),
            _ => default.to_string(),
        }
    }
}

/// Read an error response body, keeping whatever message it carries
pub async fn error_message(response: reqwest::Response, default: &str) -> String {
    let status = response.status();
    match response.json::<OwmErrorBody>().await {
        Ok(body) => body.message_or(default),
        Err(_) => format!("{} (HTTP {})", default, status),
    }
}
