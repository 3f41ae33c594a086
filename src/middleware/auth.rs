use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Key expected in the `X-API-Key` header; `None` disables the check
#[derive(Clone, Debug)]
pub struct ApiKey(pub Option<String>);

fn unauthorized(message: &str, code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::with_code(message, code)),
    )
        .into_response()
}

/// Guard for endpoints that spend paid upstream quota
pub async fn require_api_key(
    Extension(ApiKey(expected_key)): Extension<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let provided_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided_key {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => {
            tracing::warn!("Invalid API key provided");
            unauthorized("Invalid API key", "INVALID_API_KEY")
        }
        None => {
            tracing::warn!("Missing API key");
            unauthorized(
                "API key required. Provide X-API-Key header.",
                "MISSING_API_KEY",
            )
        }
    }
}
