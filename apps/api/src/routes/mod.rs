pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::details::handlers as details;
use crate::library::handlers as library;
use crate::reference::handlers as reference;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Suggestion generation
        .route("/api/v1/suggestions", post(suggestions::handle_generate))
        // Saved library
        .route(
            "/api/v1/library",
            get(library::handle_list)
                .post(library::handle_add)
                .delete(library::handle_clear),
        )
        .route("/api/v1/library/:title", delete(library::handle_remove))
        // Detail views & reviews
        .route("/api/v1/details", post(details::handle_open))
        .route(
            "/api/v1/details/:id",
            get(details::handle_get).delete(details::handle_close),
        )
        .route("/api/v1/details/:id/reviews", post(details::handle_add_review))
        .route("/api/v1/details/:id/save", post(details::handle_save))
        // Reference lookup
        .route("/api/v1/reference", post(reference::handle_find))
        .with_state(state)
}
