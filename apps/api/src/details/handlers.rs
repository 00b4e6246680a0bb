use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::details::views::{DetailView, ReviewError};
use crate::errors::AppError;
use crate::library::handlers::{save_record, SavedResponse};
use crate::models::review::ReviewRecord;
use crate::models::suggestion::SuggestionRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenViewResponse {
    pub view_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewRecord>,
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match &err {
            ReviewError::UnknownView(id) => AppError::NotFound(format!("Detail view {id} not found")),
            ReviewError::BlankReview => AppError::Validation(err.to_string()),
        }
    }
}

async fn require_view(state: &AppState, id: Uuid) -> Result<DetailView, AppError> {
    state
        .details
        .get(id)
        .await
        .ok_or(ReviewError::UnknownView(id).into())
}

/// POST /api/v1/details
pub async fn handle_open(
    State(state): State<AppState>,
    Json(project): Json<SuggestionRecord>,
) -> (StatusCode, Json<OpenViewResponse>) {
    let view_id = state.details.open(project).await;
    (StatusCode::CREATED, Json(OpenViewResponse { view_id }))
}

/// GET /api/v1/details/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DetailView>, AppError> {
    Ok(Json(require_view(&state, id).await?))
}

/// POST /api/v1/details/:id/reviews
pub async fn handle_add_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddReviewRequest>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let reviews = state.details.add_review(id, &req.text).await?;
    Ok(Json(ReviewsResponse { reviews }))
}

/// POST /api/v1/details/:id/save
///
/// Saves the viewed project to the library. Same duplicate rule as a direct save.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SavedResponse>), AppError> {
    let view = require_view(&state, id).await?;
    save_record(&state, view.project).await
}

/// DELETE /api/v1/details/:id
pub async fn handle_close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.details.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ReviewError::UnknownView(id).into())
    }
}
