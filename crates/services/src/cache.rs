//! Tags naming server data whose cached copies go stale after a mutation.

use std::collections::HashMap;

use deck_core::model::CardId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Card(CardId),
    ReviewQueue(CardId),
    CardLogs(CardId),
}

impl CacheTag {
    /// Accepting or rejecting an item changes the card, its queue and its log.
    #[must_use]
    pub fn after_decision(card_id: &CardId) -> Vec<CacheTag> {
        vec![
            CacheTag::Card(card_id.clone()),
            CacheTag::ReviewQueue(card_id.clone()),
            CacheTag::CardLogs(card_id.clone()),
        ]
    }

    /// An applied patch is already mirrored locally; only the log is stale.
    #[must_use]
    pub fn after_applied_patch(card_id: &CardId) -> Vec<CacheTag> {
        vec![CacheTag::CardLogs(card_id.clone())]
    }

    /// A queued patch grows the pending list and the card's pending count.
    #[must_use]
    pub fn after_queued_patch(card_id: &CardId) -> Vec<CacheTag> {
        vec![
            CacheTag::Card(card_id.clone()),
            CacheTag::ReviewQueue(card_id.clone()),
        ]
    }
}

/// Per-tag version counters. Readers remember the version they loaded and
/// refetch once it moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheVersions {
    versions: HashMap<CacheTag, u64>,
}

impl CacheVersions {
    #[must_use]
    pub fn version(&self, tag: &CacheTag) -> u64 {
        self.versions.get(tag).copied().unwrap_or(0)
    }

    pub fn invalidate<'a>(&mut self, tags: impl IntoIterator<Item = &'a CacheTag>) {
        for tag in tags {
            *self.versions.entry(tag.clone()).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_bumps_all_three_tags_once() {
        let id = CardId::new("c1");
        let mut versions = CacheVersions::default();
        versions.invalidate(&CacheTag::after_decision(&id));
        assert_eq!(versions.version(&CacheTag::Card(id.clone())), 1);
        assert_eq!(versions.version(&CacheTag::ReviewQueue(id.clone())), 1);
        assert_eq!(versions.version(&CacheTag::CardLogs(id.clone())), 1);
        assert_eq!(versions.version(&CacheTag::Card(CardId::new("c2"))), 0);
    }
}
