use axum::{extract::State, Json};

use super::models::{PrecautionsRequest, PrecautionsResponse};
use super::service::{normalize_message, PrecautionsError};
use crate::AppState;

/// Safety advice for the current conditions at a location
///
/// POST /precautions
/// {"city": "Hyderabad"}                                  -> greeting plus advice
/// {"lat": 17.38, "lon": 78.48, "message": "Can I jog?"}  -> answer to a follow-up
pub async fn get_precautions(
    State(state): State<AppState>,
    Json(request): Json<PrecautionsRequest>,
) -> Result<Json<PrecautionsResponse>, PrecautionsError> {
    // Reject blank follow-ups before spending upstream calls
    let message = normalize_message(request.message.as_deref())?;
    let units = request
        .units
        .clone()
        .unwrap_or_else(|| state.config.units.clone());

    let city = request.city.as_deref().filter(|c| !c.trim().is_empty());
    let location = state
        .geocode_service
        .resolve(request.lat, request.lon, city, &state.config.default_city)
        .await?;

    let conditions = state.weather_service.get_weather(&location, &units).await?;
    let reply = state
        .precautions_service
        .advise(&conditions, &units, message)
        .await?;

    Ok(Json(PrecautionsResponse {
        location: conditions.location.clone(),
        reply,
        conditions,
    }))
}
