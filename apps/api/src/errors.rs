use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::library::store::StoreError;
use crate::suggestions::generator::{SuggestError, ValidationError};
use crate::suggestions::provider::ProviderId;

/// Shown for every failed generation, whatever went wrong upstream.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate project suggestions. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing credential for {0}")]
    MissingCredential(ProviderId),

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Already saved: {0}")]
    AlreadySaved(String),

    /// Transport and format failures alike. Logged at the point of conversion.
    #[error("Generation failed")]
    GenerationFailed,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<SuggestError> for AppError {
    fn from(err: SuggestError) -> Self {
        match err {
            SuggestError::Validation(ValidationError::MissingCredential(p)) => {
                AppError::MissingCredential(p)
            }
            SuggestError::Validation(ValidationError::MissingInput(field)) => {
                AppError::MissingInput(field)
            }
            SuggestError::Transport(e) => {
                tracing::error!("Suggestion transport error: {e}");
                AppError::GenerationFailed
            }
            SuggestError::Format(msg) => {
                tracing::error!("Suggestion format error: {msg}");
                AppError::GenerationFailed
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential(provider) => (
                StatusCode::BAD_REQUEST,
                "MISSING_CREDENTIAL",
                format!(
                    "Please enter your {} API key to continue.",
                    provider.display_name()
                ),
            ),
            AppError::MissingInput(field) => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                format!("Please fill in all fields before generating suggestions ({field} is empty)."),
            ),
            AppError::AlreadySaved(title) => (
                StatusCode::CONFLICT,
                "ALREADY_SAVED",
                format!("'{title}' is already in your saved library."),
            ),
            AppError::GenerationFailed => (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                GENERATION_FAILED_MESSAGE.to_string(),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "The saved library could not be read or written".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::TransportError;

    #[test]
    fn test_transport_and_format_errors_look_the_same() {
        let transport: AppError = SuggestError::Transport(TransportError::Api {
            status: 500,
            message: "boom".to_string(),
        })
        .into();
        let format: AppError = SuggestError::Format("bad json".to_string()).into();

        let a = transport.into_response();
        let b = format.into_response();
        assert_eq!(a.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(a.status(), b.status());
    }

    #[test]
    fn test_validation_errors_stay_distinct() {
        let cred: AppError =
            SuggestError::from(ValidationError::MissingCredential(ProviderId::Gemini)).into();
        let input: AppError = SuggestError::from(ValidationError::MissingInput("skills")).into();

        assert!(matches!(cred, AppError::MissingCredential(ProviderId::Gemini)));
        assert!(matches!(input, AppError::MissingInput("skills")));
        assert_eq!(cred.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
