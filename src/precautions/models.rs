use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::weather::WeatherResponse;

/// Ask the assistant for precautions at a location
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PrecautionsRequest {
    /// City to look up; ignored when lat/lon are given
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub units: Option<String>,
    /// Follow-up question from the user; omitted for the opening advice
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrecautionsResponse {
    pub location: String,
    pub reply: String,
    pub conditions: WeatherResponse,
}

// ============================================================================
// generateContent wire format
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}
