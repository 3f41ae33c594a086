use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::models::LocationInfo;
use super::service::GeocodeError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    /// Free-text city or zip code
    #[serde(default)]
    pub q: String,
}

/// Search a city by name
///
/// GET /geocode?q=Hyderabad
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<LocationInfo>, GeocodeError> {
    let location = state.geocode_service.geocode(&query.q).await?;
    Ok(Json(location.into()))
}
