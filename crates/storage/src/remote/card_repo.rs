use async_trait::async_trait;
use deck_core::model::{Card, CardId, CardPatch};
use reqwest::Method;

use super::RemoteRepository;
use super::mapping::{CardDto, PatchResponseDto, patch_body};
use crate::repository::{CardRepository, PatchOutcome, StorageError};

#[async_trait]
impl CardRepository for RemoteRepository {
    async fn get_card(&self, id: &CardId) -> Result<Card, StorageError> {
        let url = self.endpoint(&["cards", id.as_str()])?;
        let dto: CardDto = self.send_json(self.request(Method::GET, url)).await?;
        dto.into_card()
    }

    async fn patch_card(
        &self,
        id: &CardId,
        patch: &CardPatch,
    ) -> Result<PatchOutcome, StorageError> {
        let url = self.endpoint(&["cards", "update"])?;
        log::debug!("patching {} on card {id}", patch.field_name());
        let dto: PatchResponseDto = self
            .send_json(self.request(Method::PATCH, url).json(&patch_body(id, patch)))
            .await?;
        dto.into_outcome()
    }
}
