use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
    BoxError, Extension, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::forecast::handlers as forecast_handlers;
use crate::geocode::handlers as geocode_handlers;
use crate::middleware::{require_api_key, ApiKey};
use crate::openapi::swagger_ui;
use crate::precautions::handlers as precautions_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Upper bound for a whole request, upstream calls included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(geocode_handlers::search))
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
}

fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/forecast/daily",
            get(forecast_handlers::get_daily_forecast),
        )
        .route(
            "/forecast/daily/{city}",
            get(forecast_handlers::get_daily_forecast),
        )
        .route(
            "/forecast/midday",
            get(forecast_handlers::get_midday_forecast),
        )
        .route(
            "/forecast/midday/{city}",
            get(forecast_handlers::get_midday_forecast),
        )
}

/// Precautions spend assistant quota, so they sit behind the optional API key
fn precautions_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .route(
            "/precautions",
            post(precautions_handlers::get_precautions),
        )
        .layer(middleware::from_fn(require_api_key))
        .layer(Extension(ApiKey(api_key)))
}

pub fn api_v1_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(forecast_routes())
        .merge(precautions_routes(api_key))
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Build the complete application with state and middleware applied
pub fn build_router(state: AppState) -> Router {
    let api_key = state.config.api_key.clone();

    Router::new()
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes(api_key))
        .merge(swagger_ui())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_geo_cache;
    use crate::config::{AppConfig, AssistantConfig, ForecastConfig, OpenWeatherConfig};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(api_key: Option<&str>) -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            default_city: "Hyderabad,IN".to_string(),
            units: "metric".to_string(),
            api_key: api_key.map(str::to_string),
            openweathermap: OpenWeatherConfig {
                api_key: "test_api_key".to_string(),
                // unroutable, tests must never reach it
                base_url: "http://127.0.0.1:9".to_string(),
            },
            forecast: ForecastConfig::default(),
            assistant: AssistantConfig::default(),
        };
        AppState::new(config, reqwest::Client::new(), create_geo_cache()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(build_router(test_state(None)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_geocode_empty_query() {
        let request = Request::get("/api/v1/geocode?q=").body(Body::empty()).unwrap();
        let (status, body) = send(build_router(test_state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_QUERY");
    }

    #[tokio::test]
    async fn test_weather_half_coordinates_rejected() {
        let request = Request::get("/api/v1/weather?lat=17.38")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(build_router(test_state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INCOMPLETE_COORDINATES");
    }

    #[tokio::test]
    async fn test_forecast_invalid_days_rejected() {
        let request = Request::get("/api/v1/forecast/daily?days=many")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(build_router(test_state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn test_precautions_requires_api_key_when_configured() {
        let request = Request::post("/api/v1/precautions")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"city":"Hyderabad"}"#))
            .unwrap();
        let (status, body) = send(build_router(test_state(Some("secret"))), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_API_KEY");
    }

    #[tokio::test]
    async fn test_precautions_blank_message_rejected() {
        let request = Request::post("/api/v1/precautions")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"city":"Hyderabad","message":"  "}"#))
            .unwrap();
        let (status, body) = send(build_router(test_state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_MESSAGE");
    }
}
