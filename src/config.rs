use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::aggregate::DEFAULT_MAX_DAYS;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default city for weather queries
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Temperature units: metric, imperial, or standard
    #[serde(default = "default_units")]
    pub units: String,

    /// API key for the precautions endpoint (optional - if not set, no auth required)
    #[serde(default)]
    pub api_key: Option<String>,

    /// OpenWeatherMap access
    pub openweathermap: OpenWeatherConfig,

    /// Daily forecast aggregation
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Generative-language assistant for precaution advice
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenWeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,

    /// Base URL for both the data and geocoding APIs
    #[serde(default = "default_openweathermap_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Maximum number of days returned by the daily views
    #[serde(default = "default_max_days")]
    pub max_days: usize,

    /// IANA time zone used to derive calendar dates (e.g. "Asia/Kolkata").
    /// When unset, the forecast location's own UTC offset is used.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            timezone: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Generative-language API key; precautions are disabled without it
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_assistant_url")]
    pub base_url: String,

    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// Maximum assistant calls per UTC day
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_assistant_url(),
            model: default_assistant_model(),
            daily_limit: default_daily_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_city() -> String {
    "Hyderabad,IN".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_openweathermap_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_max_days() -> usize {
    DEFAULT_MAX_DAYS
}

fn default_assistant_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_assistant_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_daily_limit() -> u32 {
    500
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            .set_default("units", default_units())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // SKYCAST_OPENWEATHERMAP__API_KEY -> openweathermap.api_key
            .add_source(
                Environment::with_prefix("SKYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Parse the configured forecast time zone, if any
    pub fn forecast_timezone(&self) -> Result<Option<chrono_tz::Tz>, ConfigError> {
        self.forecast
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>().map_err(|_| {
                    ConfigError::Message(format!("Invalid forecast timezone: {}", name))
                })
            })
            .transpose()
    }
}
