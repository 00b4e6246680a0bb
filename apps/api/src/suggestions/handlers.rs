//! Axum route handler for suggestion generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::suggestion::SuggestionRecord;
use crate::state::AppState;
use crate::suggestions::generator::SuggestionInputs;
use crate::suggestions::provider::{Credential, ProviderId};

#[derive(Debug, Deserialize)]
pub struct GenerateSuggestionsRequest {
    /// Falls back to the configured default provider when omitted.
    #[serde(default)]
    pub provider: Option<ProviderId>,
    #[serde(default)]
    pub credential: Credential,
    #[serde(flatten)]
    pub inputs: SuggestionInputs,
}

#[derive(Debug, Serialize)]
pub struct GenerateSuggestionsResponse {
    pub provider: ProviderId,
    pub suggestions: Vec<SuggestionRecord>,
}

/// POST /api/v1/suggestions
///
/// Validation failures come back as 400 with a distinct code; every upstream
/// or parsing failure is the same 502 `GENERATION_FAILED`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateSuggestionsRequest>,
) -> Result<Json<GenerateSuggestionsResponse>, AppError> {
    let provider = request.provider.unwrap_or(state.config.default_provider);

    let suggestions = state
        .generator
        .generate(&request.inputs, provider, &request.credential)
        .await?;

    Ok(Json(GenerateSuggestionsResponse {
        provider,
        suggestions,
    }))
}
