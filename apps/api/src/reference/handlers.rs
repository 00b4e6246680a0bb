use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::reference::ReferenceLink;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRequest {
    pub title: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

/// POST /api/v1/reference
pub async fn handle_find(
    State(state): State<AppState>,
    Json(req): Json<ReferenceRequest>,
) -> Result<Json<ReferenceLink>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(Json(state.reference.find(&req.title, &req.tech_stack).await))
}
