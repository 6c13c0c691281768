use async_trait::async_trait;
use deck_core::model::{ActivityLogEntry, CardId};
use reqwest::Method;

use super::RemoteRepository;
use super::mapping::LogPageDto;
use crate::repository::{CardLogRepository, Page, StorageError};

#[async_trait]
impl CardLogRepository for RemoteRepository {
    async fn list_logs(
        &self,
        card_id: &CardId,
        page: u32,
        search: Option<&str>,
    ) -> Result<Page<ActivityLogEntry>, StorageError> {
        let mut url = self.endpoint(&["cards", card_id.as_str(), "logs"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
                query.append_pair("search", term);
            }
        }
        let dto: LogPageDto = self.send_json(self.request(Method::GET, url)).await?;
        Ok(dto.into_page())
    }
}
