use std::sync::Arc;

use deck_core::model::{CardId, QueueItemId, ReviewQueueItem, UserRef};
use storage::repository::{Page, ReviewQueueRepository};

use crate::cache::CacheTag;
use crate::error::ReviewQueueServiceError;
use crate::Clock;

/// Result of a successful accept or reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub message: String,
    pub invalidate: Vec<CacheTag>,
}

/// Lists pending proposals for a card and records the owner's decisions.
#[derive(Clone)]
pub struct ReviewQueueService {
    clock: Clock,
    queue: Arc<dyn ReviewQueueRepository>,
    current_user: Option<UserRef>,
}

impl ReviewQueueService {
    #[must_use]
    pub fn new(
        clock: Clock,
        queue: Arc<dyn ReviewQueueRepository>,
        current_user: Option<UserRef>,
    ) -> Self {
        Self {
            clock,
            queue,
            current_user,
        }
    }

    #[must_use]
    pub fn can_decide(&self) -> bool {
        self.current_user.is_some()
    }

    /// Fetch page `page` (1-based) of pending items, dropping any that expired
    /// since the backend produced the page.
    ///
    /// # Errors
    ///
    /// Returns `ReviewQueueServiceError::Storage` if the page cannot be loaded.
    pub async fn fetch_page(
        &self,
        card_id: &CardId,
        page: u32,
    ) -> Result<Page<ReviewQueueItem>, ReviewQueueServiceError> {
        log::debug!("fetching review-queue page {page} for card {card_id}");
        let mut fetched = self.queue.list_review_items(card_id, page.max(1)).await?;
        let now = self.clock.now();
        fetched.items.retain(|item| !item.is_expired(now));
        Ok(fetched)
    }

    /// Accept `item_id`, applying its changes to the card.
    ///
    /// # Errors
    ///
    /// Returns `ReviewQueueServiceError::Unauthenticated` without contacting the
    /// backend when nobody is signed in, or `Storage` when the backend refuses.
    pub async fn accept(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionOutcome, ReviewQueueServiceError> {
        self.require_user()?;
        let receipt = self
            .queue
            .accept_review_item(card_id, item_id)
            .await
            .inspect_err(|e| log::warn!("accept of {item_id} failed: {e}"))?;
        log::info!("accepted review item {item_id} on card {card_id}");
        Ok(DecisionOutcome {
            message: receipt.message,
            invalidate: CacheTag::after_decision(card_id),
        })
    }

    /// Reject `item_id`, discarding its changes.
    ///
    /// # Errors
    ///
    /// Same as [`ReviewQueueService::accept`].
    pub async fn reject(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionOutcome, ReviewQueueServiceError> {
        self.require_user()?;
        let receipt = self
            .queue
            .reject_review_item(card_id, item_id)
            .await
            .inspect_err(|e| log::warn!("reject of {item_id} failed: {e}"))?;
        log::info!("rejected review item {item_id} on card {card_id}");
        Ok(DecisionOutcome {
            message: receipt.message,
            invalidate: CacheTag::after_decision(card_id),
        })
    }

    fn require_user(&self) -> Result<&UserRef, ReviewQueueServiceError> {
        self.current_user
            .as_ref()
            .ok_or(ReviewQueueServiceError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use deck_core::model::{ChangeType, FieldValue, UserId};
    use deck_core::time::fixed_now;
    use storage::InMemoryRepository;

    fn item(id: &str, expires_in: Duration) -> ReviewQueueItem {
        ReviewQueueItem {
            id: QueueItemId::new(id),
            change_type: ChangeType::Edit,
            field: "category".into(),
            submitted_by: None,
            submitted_at: fixed_now(),
            expires_at: fixed_now() + expires_in,
            old_value: FieldValue::text("a"),
            new_value: FieldValue::text("b"),
            old_display: None,
            new_display: None,
            individual_changes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn anonymous_decision_never_reaches_backend() {
        let repo = InMemoryRepository::new();
        let card = CardId::new("c1");
        repo.push_review_item(&card, item("r1", Duration::days(1)));
        let service = ReviewQueueService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()), None);

        let err = service.accept(&card, &QueueItemId::new("r1")).await.unwrap_err();
        assert!(matches!(err, ReviewQueueServiceError::Unauthenticated));
        assert_eq!(repo.pending_item_ids(&card), vec![QueueItemId::new("r1")]);
    }

    #[tokio::test]
    async fn expired_items_are_hidden() {
        let repo = InMemoryRepository::new().with_clock(Clock::fixed(fixed_now()));
        let card = CardId::new("c1");
        repo.push_review_item(&card, item("live", Duration::days(1)));
        repo.push_review_item(&card, item("stale", Duration::hours(1)));
        // The backend clock lags; the client clock has moved past the second expiry.
        let client_clock = Clock::fixed(fixed_now() + Duration::hours(2));
        let user = UserRef::new(UserId::new("o"), "Olivia");
        let service = ReviewQueueService::new(client_clock, Arc::new(repo), Some(user));

        let page = service.fetch_page(&card, 1).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["live"]);
    }
}
