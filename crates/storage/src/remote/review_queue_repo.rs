use async_trait::async_trait;
use deck_core::model::{CardId, QueueItemId, ReviewQueueItem};
use reqwest::Method;

use super::RemoteRepository;
use super::mapping::{MessageDto, QueuePageDto};
use crate::repository::{DecisionReceipt, Page, ReviewQueueRepository, StorageError};

impl RemoteRepository {
    async fn decide(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
        verb: &str,
        fallback: &str,
    ) -> Result<DecisionReceipt, StorageError> {
        let url = self.endpoint(&[
            "cards",
            card_id.as_str(),
            "review-queue",
            item_id.as_str(),
            verb,
        ])?;
        let dto: MessageDto = self.send_json(self.request(Method::POST, url)).await?;
        Ok(DecisionReceipt {
            message: dto
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        })
    }
}

#[async_trait]
impl ReviewQueueRepository for RemoteRepository {
    async fn list_review_items(
        &self,
        card_id: &CardId,
        page: u32,
    ) -> Result<Page<ReviewQueueItem>, StorageError> {
        let mut url = self.endpoint(&["cards", card_id.as_str(), "review-queue"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let dto: QueuePageDto = self.send_json(self.request(Method::GET, url)).await?;
        dto.into_page()
    }

    async fn accept_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError> {
        self.decide(card_id, item_id, "accept", "Change accepted")
            .await
    }

    async fn reject_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError> {
        self.decide(card_id, item_id, "reject", "Change rejected")
            .await
    }
}
