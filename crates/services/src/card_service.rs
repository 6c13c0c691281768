use std::sync::Arc;

use deck_core::model::{Card, CardId, CardPatch, Change, QuizId};
use storage::repository::{CardRepository, PatchOutcome};

use crate::cache::CacheTag;
use crate::error::CardServiceError;
use crate::Clock;

/// What happened to a submitted patch, from the editor's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReceipt {
    /// Backend message worth showing, if any.
    pub message: Option<String>,
    /// `true` when the edit went to the owner's review queue instead of the card.
    pub queued: bool,
    pub invalidate: Vec<CacheTag>,
}

/// Loads cards and sends field-level edits, mirroring accepted ones into the
/// caller's copy of the card.
#[derive(Clone)]
pub struct CardService {
    clock: Clock,
    cards: Arc<dyn CardRepository>,
}

impl CardService {
    #[must_use]
    pub fn new(clock: Clock, cards: Arc<dyn CardRepository>) -> Self {
        Self { clock, cards }
    }

    /// # Errors
    ///
    /// Returns `CardServiceError::Storage` if the card cannot be fetched.
    pub async fn load_card(&self, id: &CardId) -> Result<Card, CardServiceError> {
        Ok(self.cards.get_card(id).await?)
    }

    /// Send `patch` and, if the backend applied it, apply it to `card` too.
    ///
    /// Queued edits leave `card` untouched.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Storage` if the backend refuses, or
    /// `CardServiceError::Patch` if the local copy has drifted from the server.
    pub async fn patch(
        &self,
        card: &mut Card,
        patch: CardPatch,
    ) -> Result<PatchReceipt, CardServiceError> {
        let outcome = self.cards.patch_card(&card.id, &patch).await?;
        match outcome {
            PatchOutcome::Applied { created, message } => {
                patch.apply_to(card, created)?;
                card.updated_at = self.clock.now();
                log::debug!("applied {} on card {}", patch.field_name(), card.id);
                Ok(PatchReceipt {
                    message,
                    queued: false,
                    invalidate: CacheTag::after_applied_patch(&card.id),
                })
            }
            PatchOutcome::Queued { message } => {
                card.pending_reviews += 1;
                log::info!("{} edit on card {} sent for review", patch.field_name(), card.id);
                Ok(PatchReceipt {
                    message: Some(message),
                    queued: true,
                    invalidate: CacheTag::after_queued_patch(&card.id),
                })
            }
        }
    }

    /// Add a distractor to a quiz.
    ///
    /// Blank input and complete quizzes are refused before any request is made.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::QuizNotFound`, `CardServiceError::Quiz` for
    /// rule violations, or the errors of [`CardService::patch`].
    pub async fn add_quiz_option(
        &self,
        card: &mut Card,
        quiz_id: &QuizId,
        raw: &str,
    ) -> Result<PatchReceipt, CardServiceError> {
        let quiz = card
            .quizzes
            .iter()
            .find(|q| &q.id == quiz_id)
            .ok_or_else(|| CardServiceError::QuizNotFound(quiz_id.clone()))?;
        let option = quiz.validate_new_option(raw)?;
        self.patch(
            card,
            CardPatch::AddQuizOption {
                quiz_id: quiz_id.clone(),
                option,
            },
        )
        .await
    }

    /// Restore the old value recorded in a log change.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::NotRevertible` for changes without a topic
    /// target, or the errors of [`CardService::patch`].
    pub async fn revert(
        &self,
        card: &mut Card,
        change: &Change,
    ) -> Result<PatchReceipt, CardServiceError> {
        let patch = change.revert_patch().ok_or(CardServiceError::NotRevertible)?;
        self.patch(card, patch).await
    }
}
