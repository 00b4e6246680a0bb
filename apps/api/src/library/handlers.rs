use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::library::store::AddOutcome;
use crate::models::suggestion::{LibraryItem, SuggestionRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub projects: Vec<LibraryItem>,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub saved: bool,
    pub title: String,
}

/// Shared by the library route and the detail-view save route.
pub async fn save_record(
    state: &AppState,
    record: SuggestionRecord,
) -> Result<(StatusCode, Json<SavedResponse>), AppError> {
    if record.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let title = record.title.clone();
    match state.library.add(record).await? {
        AddOutcome::Added => Ok((
            StatusCode::CREATED,
            Json(SavedResponse { saved: true, title }),
        )),
        AddOutcome::Duplicate => Err(AppError::AlreadySaved(title)),
    }
}

/// GET /api/v1/library
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<LibraryResponse>, AppError> {
    let projects = state
        .library
        .list()
        .await?
        .into_iter()
        .map(LibraryItem::from)
        .collect();
    Ok(Json(LibraryResponse { projects }))
}

/// POST /api/v1/library
pub async fn handle_add(
    State(state): State<AppState>,
    Json(record): Json<SuggestionRecord>,
) -> Result<(StatusCode, Json<SavedResponse>), AppError> {
    save_record(&state, record).await
}

/// DELETE /api/v1/library/:title
pub async fn handle_remove(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<StatusCode, AppError> {
    state.library.remove(&title).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/library
pub async fn handle_clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.library.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
