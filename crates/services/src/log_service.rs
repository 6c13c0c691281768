use std::sync::Arc;

use deck_core::model::{ActivityLogEntry, CardId};
use storage::repository::{CardLogRepository, Page};

use crate::error::CardLogServiceError;

/// Reads a card's activity log one page at a time.
#[derive(Clone)]
pub struct CardLogService {
    logs: Arc<dyn CardLogRepository>,
}

impl CardLogService {
    #[must_use]
    pub fn new(logs: Arc<dyn CardLogRepository>) -> Self {
        Self { logs }
    }

    /// Fetch page `page` (1-based), optionally narrowed by a search term.
    ///
    /// # Errors
    ///
    /// Returns `CardLogServiceError::Storage` if the page cannot be loaded.
    pub async fn fetch_page(
        &self,
        card_id: &CardId,
        page: u32,
        search: Option<&str>,
    ) -> Result<Page<ActivityLogEntry>, CardLogServiceError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        log::debug!("fetching log page {page} for card {card_id} (search: {search:?})");
        Ok(self.logs.list_logs(card_id, page.max(1), search).await?)
    }
}
