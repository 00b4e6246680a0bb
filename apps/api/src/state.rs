use crate::config::Config;
use crate::details::views::DetailViews;
use crate::library::store::SavedLibrary;
use crate::reference::ReferenceFinder;
use crate::suggestions::generator::SuggestionGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub generator: SuggestionGenerator,
    /// Durable saved library. Unlocked read-modify-write; last writer wins.
    pub library: SavedLibrary,
    /// In-memory detail views holding per-view reviews.
    pub details: DetailViews,
    pub reference: ReferenceFinder,
}
