//! Open detail views and their reviews.
//!
//! Reviews live only as long as the view that holds them. Closing the view,
//! restarting the process, or the view being evicted discards them; nothing
//! here is persisted.
//!
//! At most `limit` views are open at once. Opening one more evicts the
//! oldest, so clients that never close views cannot grow memory unbounded.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::review::ReviewRecord;
use crate::models::suggestion::SuggestionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub project: SuggestionRecord,
    pub reviews: Vec<ReviewRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("detail view {0} is not open")]
    UnknownView(Uuid),

    #[error("review text cannot be empty")]
    BlankReview,
}

pub const DEFAULT_VIEW_LIMIT: usize = 256;

#[derive(Default)]
struct OpenViews {
    views: HashMap<Uuid, DetailView>,
    /// Open order, oldest first.
    order: VecDeque<Uuid>,
}

#[derive(Clone)]
pub struct DetailViews {
    open: Arc<RwLock<OpenViews>>,
    limit: usize,
}

impl Default for DetailViews {
    fn default() -> Self {
        Self::with_limit(DEFAULT_VIEW_LIMIT)
    }
}

impl DetailViews {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            open: Arc::new(RwLock::new(OpenViews::default())),
            limit: limit.max(1),
        }
    }

    pub async fn open(&self, project: SuggestionRecord) -> Uuid {
        let id = Uuid::new_v4();
        debug!("Opening detail view {id} for '{}'", project.title);

        let mut open = self.open.write().await;
        while open.views.len() >= self.limit {
            let Some(oldest) = open.order.pop_front() else {
                break;
            };
            if let Some(evicted) = open.views.remove(&oldest) {
                info!(
                    "Evicted detail view {oldest} ('{}'); limit is {} open views",
                    evicted.project.title, self.limit
                );
            }
        }
        open.views.insert(
            id,
            DetailView {
                project,
                reviews: Vec::new(),
            },
        );
        open.order.push_back(id);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<DetailView> {
        self.open.read().await.views.get(&id).cloned()
    }

    /// Appends a review and returns the view's full review list.
    pub async fn add_review(&self, id: Uuid, text: &str) -> Result<Vec<ReviewRecord>, ReviewError> {
        let mut open = self.open.write().await;
        let view = open.views.get_mut(&id).ok_or(ReviewError::UnknownView(id))?;
        let review = ReviewRecord::new(text, Local::now()).ok_or(ReviewError::BlankReview)?;
        view.reviews.push(review);
        Ok(view.reviews.clone())
    }

    /// Closes the view. Returns `false` if it was not open.
    pub async fn close(&self, id: Uuid) -> bool {
        let mut open = self.open.write().await;
        let closed = open.views.remove(&id);
        if let Some(view) = &closed {
            open.order.retain(|open_id| *open_id != id);
            debug!(
                "Closed detail view {id}, discarding {} review(s)",
                view.reviews.len()
            );
        }
        closed.is_some()
    }
}
