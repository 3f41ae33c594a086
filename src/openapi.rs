use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::aggregate::{DaySummary, Sample};
use crate::condition::Condition;
use crate::error::ErrorResponse;
use crate::forecast::models::{
    DailyForecastResponse, ForecastLocation, MiddayForecast, MiddayForecastResponse,
};
use crate::geocode::LocationInfo;
use crate::precautions::models::{PrecautionsRequest, PrecautionsResponse};
use crate::weather::WeatherResponse;

/// OpenAPI documentation for the Skycast API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skycast API",
        version = "0.1.0",
        description = "Current conditions, daily forecast summaries and weather precaution advice backed by OpenWeatherMap."
    ),
    tags(
        (name = "weather", description = "Current weather data"),
        (name = "forecast", description = "Per-day summaries of the 5 day / 3 hour forecast"),
        (name = "precautions", description = "Assistant generated safety advice")
    ),
    components(
        schemas(
            ErrorResponse,
            WeatherResponse,
            Condition,
            Sample,
            DaySummary,
            ForecastLocation,
            DailyForecastResponse,
            MiddayForecast,
            MiddayForecastResponse,
            LocationInfo,
            PrecautionsRequest,
            PrecautionsResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_registered() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        for name in ["DaySummary", "Condition", "WeatherResponse", "PrecautionsRequest"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
