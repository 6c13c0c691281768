use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Duration;
use deck_core::model::{
    ActivityLogEntry, Card, CardId, CardPatch, Change, ChangeType, Created, FieldValue, Flashcard,
    FlashcardId, LogEntryId, QueueItemId, Quiz, QuizId, ReviewQueueItem, TopicField, UserRef,
};
use deck_core::text::contains_ci;
use deck_core::Clock;

use crate::repository::{
    CardLogRepository, CardRepository, DecisionReceipt, Page, PatchOutcome, ReviewQueueRepository,
    StorageError,
};

/// Page size the backend uses for logs and review-queue items.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How long a proposal waits for a decision before it expires.
const PROPOSAL_TTL_DAYS: i64 = 7;

struct Proposal {
    item: ReviewQueueItem,
    patch: Option<CardPatch>,
}

struct MemoryState {
    cards: HashMap<CardId, Card>,
    // Newest entry first, matching the backend's ordering.
    logs: HashMap<CardId, Vec<ActivityLogEntry>>,
    queue: HashMap<CardId, Vec<Proposal>>,
    page_size: usize,
    acting_user: Option<UserRef>,
    clock: Clock,
    id_seq: u64,
    fail_next_decision: Option<String>,
    log_requests: Vec<(u32, Option<String>)>,
    review_page_requests: Vec<u32>,
}

impl MemoryState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.id_seq += 1;
        format!("{prefix}{}", self.id_seq)
    }
}

/// In-process emulation of the collaboration backend.
///
/// Owners' patches apply directly; anyone else's patch becomes a review-queue
/// proposal, exactly like the remote API. Used by tests and the demo mode.
#[derive(Clone)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                cards: HashMap::new(),
                logs: HashMap::new(),
                queue: HashMap::new(),
                page_size: DEFAULT_PAGE_SIZE,
                acting_user: None,
                clock: Clock::default(),
                id_seq: 0,
                fail_next_decision: None,
                log_requests: Vec::new(),
                review_page_requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn with_state(&self, f: impl FnOnce(&mut MemoryState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.with_state(|s| s.page_size = page_size.max(1));
        self
    }

    #[must_use]
    pub fn with_clock(self, clock: Clock) -> Self {
        self.with_state(|s| s.clock = clock);
        self
    }

    /// Set the user the backend believes is signed in.
    pub fn act_as(&self, user: Option<UserRef>) {
        self.with_state(|s| s.acting_user = user);
    }

    pub fn insert_card(&self, card: Card) {
        self.with_state(|s| {
            s.cards.insert(card.id.clone(), card);
        });
    }

    /// Add a log entry; later pushes are newer.
    pub fn push_log(&self, card_id: &CardId, entry: ActivityLogEntry) {
        self.with_state(|s| s.logs.entry(card_id.clone()).or_default().insert(0, entry));
    }

    pub fn push_review_item(&self, card_id: &CardId, item: ReviewQueueItem) {
        self.with_state(|s| {
            s.queue
                .entry(card_id.clone())
                .or_default()
                .push(Proposal { item, patch: None });
            if let Some(card) = s.cards.get_mut(card_id) {
                card.pending_reviews += 1;
            }
        });
    }

    /// Make the next accept/reject fail with the given backend message.
    pub fn fail_next_decision(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|s| s.fail_next_decision = Some(message));
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<Card> {
        self.lock().ok().and_then(|s| s.cards.get(id).cloned())
    }

    #[must_use]
    pub fn pending_item_ids(&self, card_id: &CardId) -> Vec<QueueItemId> {
        self.lock()
            .map(|s| {
                s.queue
                    .get(card_id)
                    .map(|q| q.iter().map(|p| p.item.id.clone()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Pages requested through `list_review_items`, in call order.
    #[must_use]
    pub fn review_page_requests(&self) -> Vec<u32> {
        self.lock()
            .map(|s| s.review_page_requests.clone())
            .unwrap_or_default()
    }

    /// `(page, search)` pairs requested through `list_logs`, in call order.
    #[must_use]
    pub fn log_requests(&self) -> Vec<(u32, Option<String>)> {
        self.lock()
            .map(|s| s.log_requests.clone())
            .unwrap_or_default()
    }
}

fn paginate<T: Clone>(all: &[T], page: u32, size: usize) -> Page<T> {
    let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
    let start = (page - 1).saturating_mul(size);
    let items: Vec<T> = all.iter().skip(start).take(size).cloned().collect();
    let has_more = all.len() > start.saturating_add(size);
    Page::new(items, has_more)
}

fn rejected(status: u16, message: impl Into<String>) -> StorageError {
    StorageError::Rejected {
        status,
        message: message.into(),
    }
}

fn flashcard_value(f: &Flashcard) -> FieldValue {
    FieldValue::Flashcard {
        question: f.question.clone(),
        answer: f.answer.clone(),
    }
}

fn quiz_value(q: &Quiz) -> FieldValue {
    FieldValue::Quiz {
        question: q.question.clone(),
        answer: q.answer.clone(),
        options: q.options().to_vec(),
    }
}

/// Before/after values a patch would produce on `card`.
fn describe(card: &Card, patch: &CardPatch) -> (ChangeType, FieldValue, FieldValue) {
    let flashcard = |id: &FlashcardId| card.flashcards.iter().find(|f| &f.id == id);
    let quiz = |id: &QuizId| card.quizzes.iter().find(|q| &q.id == id);
    match patch {
        CardPatch::Topic { field, value } => (
            ChangeType::Edit,
            FieldValue::text(card.topic.get(*field)),
            FieldValue::text(value.clone()),
        ),
        CardPatch::AddFlashcard { question, answer } => (
            ChangeType::Addition,
            FieldValue::Empty,
            FieldValue::Flashcard {
                question: question.clone(),
                answer: answer.clone(),
            },
        ),
        CardPatch::EditFlashcard {
            flashcard_id,
            question,
            answer,
        } => match flashcard(flashcard_id) {
            Some(old) => (
                ChangeType::Edit,
                flashcard_value(old),
                FieldValue::Flashcard {
                    question: question.clone().unwrap_or_else(|| old.question.clone()),
                    answer: answer.clone().unwrap_or_else(|| old.answer.clone()),
                },
            ),
            None => (ChangeType::Edit, FieldValue::Empty, FieldValue::Empty),
        },
        CardPatch::DeleteFlashcard { flashcard_id } => (
            ChangeType::Deletion,
            flashcard(flashcard_id).map_or(FieldValue::Empty, flashcard_value),
            FieldValue::Empty,
        ),
        CardPatch::AddQuiz {
            question, answer, ..
        } => (
            ChangeType::Addition,
            FieldValue::Empty,
            FieldValue::Quiz {
                question: question.clone(),
                answer: answer.clone(),
                options: Vec::new(),
            },
        ),
        CardPatch::EditQuiz {
            quiz_id,
            question,
            answer,
        } => match quiz(quiz_id) {
            Some(old) => (
                ChangeType::Edit,
                quiz_value(old),
                FieldValue::Quiz {
                    question: question.clone().unwrap_or_else(|| old.question.clone()),
                    answer: answer.clone().unwrap_or_else(|| old.answer.clone()),
                    options: old.options().to_vec(),
                },
            ),
            None => (ChangeType::Edit, FieldValue::Empty, FieldValue::Empty),
        },
        CardPatch::AddQuizOption { option, .. } => (
            ChangeType::Addition,
            FieldValue::Empty,
            FieldValue::text(option.clone()),
        ),
        CardPatch::EditQuizOption {
            quiz_id,
            option_index,
            option,
        } => (
            ChangeType::Edit,
            quiz(quiz_id)
                .and_then(|q| q.options().get(*option_index))
                .map_or(FieldValue::Empty, |o| FieldValue::text(o.clone())),
            FieldValue::text(option.clone()),
        ),
        CardPatch::DeleteQuiz { quiz_id } => (
            ChangeType::Deletion,
            quiz(quiz_id).map_or(FieldValue::Empty, quiz_value),
            FieldValue::Empty,
        ),
    }
}

/// Apply `patch` to the stored card and record it in the activity log.
fn apply_patch(
    state: &mut MemoryState,
    card_id: &CardId,
    patch: &CardPatch,
    actor: Option<UserRef>,
    summary: String,
) -> Result<Option<Created>, StorageError> {
    let created = match patch {
        CardPatch::AddFlashcard { question, answer } => {
            let id = FlashcardId::new(state.next_id("f"));
            Some(Created::Flashcard(Flashcard::new(id, question.clone(), answer.clone())))
        }
        CardPatch::AddQuiz {
            question,
            answer,
            minimum_options,
        } => {
            let id = QuizId::new(state.next_id("z"));
            let quiz = Quiz::new(id, question.clone(), answer.clone(), *minimum_options, Vec::new())
                .map_err(|e| rejected(422, e.to_string()))?;
            Some(Created::Quiz(quiz))
        }
        _ => None,
    };
    let log_id = LogEntryId::new(state.next_id("l"));
    let now = state.clock.now();

    let card = state.cards.get_mut(card_id).ok_or(StorageError::NotFound)?;
    let (_, old_value, new_value) = describe(card, patch);
    patch
        .apply_to(card, created.clone())
        .map_err(|e| rejected(422, e.to_string()))?;
    card.last_editor.clone_from(&actor);
    card.updated_at = now;

    let entry = ActivityLogEntry {
        id: log_id,
        summary,
        actor,
        at: now,
        changes: vec![Change::new(patch.field_name(), old_value, new_value)],
    };
    state.logs.entry(card_id.clone()).or_default().insert(0, entry);
    Ok(created)
}

fn decision_log(state: &mut MemoryState, card_id: &CardId, summary: String) {
    let id = LogEntryId::new(state.next_id("l"));
    let entry = ActivityLogEntry {
        id,
        summary,
        actor: state.acting_user.clone(),
        at: state.clock.now(),
        changes: Vec::new(),
    };
    state.logs.entry(card_id.clone()).or_default().insert(0, entry);
}

fn take_proposal(
    state: &mut MemoryState,
    card_id: &CardId,
    item_id: &QueueItemId,
) -> Result<Proposal, StorageError> {
    if state.acting_user.is_none() {
        return Err(StorageError::Unauthorized);
    }
    if let Some(message) = state.fail_next_decision.take() {
        return Err(rejected(409, message));
    }
    let now = state.clock.now();
    let queue = state.queue.get_mut(card_id).ok_or(StorageError::NotFound)?;
    let pos = queue
        .iter()
        .position(|p| &p.item.id == item_id)
        .ok_or_else(|| rejected(404, "Review item not found"))?;
    let proposal = queue.remove(pos);
    if let Some(card) = state.cards.get_mut(card_id) {
        card.pending_reviews = card.pending_reviews.saturating_sub(1);
    }
    if proposal.item.is_expired(now) {
        return Err(rejected(410, "expired"));
    }
    Ok(proposal)
}

#[async_trait]
impl CardRepository for InMemoryRepository {
    async fn get_card(&self, id: &CardId) -> Result<Card, StorageError> {
        let state = self.lock()?;
        state.cards.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn patch_card(
        &self,
        id: &CardId,
        patch: &CardPatch,
    ) -> Result<PatchOutcome, StorageError> {
        let mut state = self.lock()?;
        let actor = state.acting_user.clone().ok_or(StorageError::Unauthorized)?;
        let card = state.cards.get(id).ok_or(StorageError::NotFound)?;

        if card.is_owned_by(Some(&actor)) {
            let summary = format!("{} updated {}", actor.name, patch.field_name());
            let created = apply_patch(&mut state, id, patch, Some(actor), summary)?;
            return Ok(PatchOutcome::Applied {
                created,
                message: Some("Card updated".to_string()),
            });
        }

        let (change_type, old_value, new_value) = describe(card, patch);
        let now = state.clock.now();
        let item = ReviewQueueItem {
            id: QueueItemId::new(state.next_id("r")),
            change_type,
            field: patch.field_name().to_string(),
            submitted_by: Some(actor),
            submitted_at: now,
            expires_at: now + Duration::days(PROPOSAL_TTL_DAYS),
            old_value,
            new_value,
            old_display: None,
            new_display: None,
            individual_changes: Vec::new(),
        };
        state.queue.entry(id.clone()).or_default().push(Proposal {
            item,
            patch: Some(patch.clone()),
        });
        if let Some(card) = state.cards.get_mut(id) {
            card.pending_reviews += 1;
        }
        Ok(PatchOutcome::Queued {
            message: "Your change was sent to the owner for review".to_string(),
        })
    }
}

#[async_trait]
impl CardLogRepository for InMemoryRepository {
    async fn list_logs(
        &self,
        card_id: &CardId,
        page: u32,
        search: Option<&str>,
    ) -> Result<Page<ActivityLogEntry>, StorageError> {
        let mut state = self.lock()?;
        state
            .log_requests
            .push((page, search.map(str::to_string)));
        let all = state.logs.get(card_id).cloned().unwrap_or_default();
        let filtered: Vec<ActivityLogEntry> = match search.map(str::trim) {
            Some(term) if !term.is_empty() => all
                .into_iter()
                .filter(|entry| {
                    contains_ci(&entry.summary, term)
                        || contains_ci(&entry.actor_label(), term)
                        || entry.changes.iter().any(|c| {
                            contains_ci(&c.field, term)
                                || contains_ci(&c.old_value.summary(), term)
                                || contains_ci(&c.new_value.summary(), term)
                        })
                })
                .collect(),
            _ => all,
        };
        Ok(paginate(&filtered, page, state.page_size))
    }
}

#[async_trait]
impl ReviewQueueRepository for InMemoryRepository {
    async fn list_review_items(
        &self,
        card_id: &CardId,
        page: u32,
    ) -> Result<Page<ReviewQueueItem>, StorageError> {
        let mut state = self.lock()?;
        state.review_page_requests.push(page);
        let now = state.clock.now();
        let live: Vec<ReviewQueueItem> = state
            .queue
            .get(card_id)
            .map(|q| {
                q.iter()
                    .filter(|p| !p.item.is_expired(now))
                    .map(|p| p.item.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(paginate(&live, page, state.page_size))
    }

    async fn accept_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError> {
        let mut state = self.lock()?;
        let proposal = take_proposal(&mut state, card_id, item_id)?;
        let item = proposal.item;
        let patch = proposal.patch.or_else(|| {
            let field = TopicField::from_wire(&item.field)?;
            let value = item.new_value.as_plain_str()?.to_string();
            Some(CardPatch::Topic { field, value })
        });
        if let Some(patch) = patch {
            let summary = format!("Accepted change to {}", item.field);
            apply_patch(&mut state, card_id, &patch, item.submitted_by.clone(), summary)?;
        } else {
            decision_log(&mut state, card_id, format!("Accepted change to {}", item.field));
        }
        log::debug!("accepted review item {item_id:?} on {card_id:?}");
        Ok(DecisionReceipt {
            message: "Change accepted".to_string(),
        })
    }

    async fn reject_review_item(
        &self,
        card_id: &CardId,
        item_id: &QueueItemId,
    ) -> Result<DecisionReceipt, StorageError> {
        let mut state = self.lock()?;
        let proposal = take_proposal(&mut state, card_id, item_id)?;
        decision_log(
            &mut state,
            card_id,
            format!("Rejected change to {}", proposal.item.field),
        );
        log::debug!("rejected review item {item_id:?} on {card_id:?}");
        Ok(DecisionReceipt {
            message: "Change rejected".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::model::{TopicMeta, UserId};
    use deck_core::time::fixed_now;

    fn owner() -> UserRef {
        UserRef::new(UserId::new("owner"), "Olivia")
    }

    fn guest() -> UserRef {
        UserRef::new(UserId::new("guest"), "Gus")
    }

    fn setup() -> (InMemoryRepository, CardId) {
        let repo = InMemoryRepository::new().with_clock(Clock::fixed(fixed_now()));
        let id = CardId::new("c1");
        let mut card = Card::new(id.clone(), TopicMeta::default(), Some(owner()), fixed_now());
        card.topic.category = "Biology".into();
        repo.insert_card(card);
        (repo, id)
    }

    fn topic(value: &str) -> CardPatch {
        CardPatch::Topic {
            field: TopicField::Category,
            value: value.into(),
        }
    }

    #[test]
    fn paginate_reports_has_more() {
        let all: Vec<u32> = (1..=12).collect();
        let first = paginate(&all, 1, 10);
        assert_eq!(first.items.len(), 10);
        assert!(first.has_more);
        let second = paginate(&all, 2, 10);
        assert_eq!(second.items, vec![11, 12]);
        assert!(!second.has_more);
        assert!(paginate(&all, 3, 10).items.is_empty());
    }

    #[tokio::test]
    async fn owner_patch_applies_and_logs() {
        let (repo, id) = setup();
        repo.act_as(Some(owner()));
        let outcome = repo.patch_card(&id, &topic("Botany")).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Applied { .. }));
        assert_eq!(repo.card(&id).unwrap().topic.category, "Botany");

        let logs = repo.list_logs(&id, 1, None).await.unwrap();
        assert_eq!(logs.items.len(), 1);
        assert_eq!(logs.items[0].changes[0].field, "category");
    }

    #[tokio::test]
    async fn guest_patch_is_queued_then_accepted() {
        let (repo, id) = setup();
        repo.act_as(Some(guest()));
        let outcome = repo.patch_card(&id, &topic("Botany")).await.unwrap();
        assert!(matches!(outcome, PatchOutcome::Queued { .. }));
        assert_eq!(repo.card(&id).unwrap().topic.category, "Biology");
        assert_eq!(repo.card(&id).unwrap().pending_reviews, 1);

        let page = repo.list_review_items(&id, 1).await.unwrap();
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.change_type, ChangeType::Edit);
        assert_eq!(item.old_value, FieldValue::text("Biology"));

        repo.act_as(Some(owner()));
        repo.accept_review_item(&id, &item.id).await.unwrap();
        let card = repo.card(&id).unwrap();
        assert_eq!(card.topic.category, "Botany");
        assert_eq!(card.pending_reviews, 0);
    }

    #[tokio::test]
    async fn injected_failure_keeps_item_pending() {
        let (repo, id) = setup();
        repo.act_as(Some(guest()));
        repo.patch_card(&id, &topic("Botany")).await.unwrap();
        let item_id = repo.pending_item_ids(&id)[0].clone();

        repo.act_as(Some(owner()));
        repo.fail_next_decision("expired");
        let err = repo.reject_review_item(&id, &item_id).await.unwrap_err();
        assert_eq!(err.server_message(), Some("expired"));
        assert_eq!(repo.pending_item_ids(&id), vec![item_id]);
    }

    #[tokio::test]
    async fn anonymous_cannot_patch_or_decide() {
        let (repo, id) = setup();
        let err = repo.patch_card(&id, &topic("x")).await.unwrap_err();
        assert!(matches!(err, StorageError::Unauthorized));
        let err = repo
            .accept_review_item(&id, &QueueItemId::new("r1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unauthorized));
    }

    #[tokio::test]
    async fn log_search_filters_before_paging() {
        let (repo, id) = setup();
        repo.act_as(Some(owner()));
        // Biology->Botany and Botany->Zoology mention botany, Zoology->Ecology does not.
        for value in ["Botany", "Zoology", "Ecology"] {
            repo.patch_card(&id, &topic(value)).await.unwrap();
        }
        let page = repo.list_logs(&id, 1, Some("botany")).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(
            repo.log_requests(),
            vec![(1, Some("botany".to_string()))]
        );
    }
}
