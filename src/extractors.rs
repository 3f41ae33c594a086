use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;

/// Query parameters shared by the weather and forecast endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    /// City name from query string
    pub city: Option<String>,
    /// Units: metric, imperial, or standard
    pub units: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Maximum number of forecast days
    pub days: Option<usize>,
}

impl LocationQuery {
    async fn extract<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<Self, ParamRejection> {
        match Query::<LocationQuery>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(query),
            Err(rejection) => Err(ParamRejection(rejection.body_text())),
        }
    }
}

/// Extracts city from either path parameter or query parameter
///
/// Checks path first, then falls back to query parameter.
/// Returns None if city is not provided in either location.
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

impl CityParam {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = ParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            if !city.trim().is_empty() {
                return Ok(CityParam(Some(city)));
            }
        }

        let query = LocationQuery::extract(parts, state).await?;
        Ok(CityParam(query.city.filter(|c| !c.trim().is_empty())))
    }
}

/// Units, coordinates and day limit from the query string
#[derive(Debug)]
pub struct OptionsParam {
    pub units: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub days: Option<usize>,
}

impl OptionsParam {
    /// Get the units value or use a default
    pub fn units_or(&self, default: &str) -> String {
        self.units.clone().unwrap_or_else(|| default.to_string())
    }
}

impl<S> FromRequestParts<S> for OptionsParam
where
    S: Send + Sync,
{
    type Rejection = ParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = LocationQuery::extract(parts, state).await?;
        Ok(OptionsParam {
            units: query.units,
            lat: query.lat,
            lon: query.lon,
            days: query.days,
        })
    }
}

/// Rejection for unparseable query parameters (e.g. `lat=abc`)
#[derive(Debug)]
pub struct ParamRejection(pub String);

impl IntoResponse for ParamRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(self.0, "INVALID_PARAMETER")),
        )
            .into_response()
    }
}
