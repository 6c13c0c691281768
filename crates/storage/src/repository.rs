use std::sync::Arc;

use async_trait::async_trait;
use deck_core::model::{
    ActivityLogEntry, Card, CardId, CardPatch, Created, QueueItemId, ReviewQueueItem,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("not signed in")]
    Unauthorized,

    /// The backend refused the request and explained why.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Non-success status without an explanation.
    #[error("request failed with status {status}")]
    Http { status: u16 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Message written by the backend, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StorageError::Rejected { message, .. } if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// One page of a server-paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

/// What the backend did with a field patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Applied to the card; additions echo the created item.
    Applied {
        created: Option<Created>,
        message: Option<String>,
    },
    /// Turned into a review-queue item for the owner to decide on.
    Queued { message: String },
}

/// Acknowledgement of an accept/reject decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    pub message: String,
}

#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Fetch a card with its flashcards and quizzes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_card(&self, id: &CardId) -> Result<Card, StorageError>;

    /// Apply one field-level patch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend refuses or cannot be reached.
    async fn patch_card(&self, id: &CardId, patch: &CardPatch)
    -> Result<PatchOutcome, StorageError>;
}

#[async_trait]
pub trait CardLogRepository: Send + Sync {
    /// Fetch one page (1-based) of activity log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the page cannot be loaded.
    async fn list_logs(
        &self,
        card_id: &CardId,
        page: u32,
        search: Option<&str>,
    ) -> Result<Page<ActivityLogEntry>, StorageError>;
}

#[async_trait]
pub trait ReviewQueueRepository: Send + Sync {
    /// Fetch one page (1-based) of pending review-queue items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the page cannot be loaded.
    async fn list_review_items(
        &self,
        card_id: &CardId,
        page: u32,
    ) -> Result<Page<ReviewQueueItem>, StorageError>;

    /// Accept a pending item, applying all of its changes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Rejected` with the backend's reason on refusal.
    async fn accept_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError>;

    /// Reject a pending item, discarding all of its changes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Rejected` with the backend's reason on refusal.
    async fn reject_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError>;
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub cards: Arc<dyn CardRepository>,
    pub logs: Arc<dyn CardLogRepository>,
    pub review_queue: Arc<dyn ReviewQueueRepository>,
}

impl Storage {
    /// Build a `Storage` over a shared in-memory backend.
    #[must_use]
    pub fn in_memory(repo: &crate::memory::InMemoryRepository) -> Self {
        let cards: Arc<dyn CardRepository> = Arc::new(repo.clone());
        let logs: Arc<dyn CardLogRepository> = Arc::new(repo.clone());
        let review_queue: Arc<dyn ReviewQueueRepository> = Arc::new(repo.clone());
        Self {
            cards,
            logs,
            review_queue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_rejections() {
        let err = StorageError::Rejected {
            status: 410,
            message: "expired".into(),
        };
        assert_eq!(err.server_message(), Some("expired"));
        assert_eq!(err.to_string(), "expired");

        let blank = StorageError::Rejected {
            status: 500,
            message: "  ".into(),
        };
        assert_eq!(blank.server_message(), None);
        assert_eq!(StorageError::NotFound.server_message(), None);
    }
}
