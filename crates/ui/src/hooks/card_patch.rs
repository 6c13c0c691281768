use std::time::Duration;

use deck_core::model::{CardPatch, Change, QuizId};
use dioxus::prelude::*;
use services::{CardServiceError, PatchReceipt};

use crate::context::{AppContext, CardScope};

/// Outcome of the last edit, shown next to the card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchStatus {
    Idle,
    Saving,
    Saved,
    /// A collaborator's edit went to the owner's review queue.
    Queued(String),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardEdit {
    Patch(CardPatch),
    AddOption { quiz_id: QuizId, raw: String },
    Revert(Change),
}

#[derive(Clone, Copy, PartialEq)]
pub struct CardPatcher {
    pub status: Signal<PatchStatus>,
    pub submit: Callback<CardEdit>,
}

impl CardPatcher {
    pub fn patch(&self, patch: CardPatch) {
        self.submit.call(CardEdit::Patch(patch));
    }

    pub fn add_option(&self, quiz_id: QuizId, raw: String) {
        self.submit.call(CardEdit::AddOption { quiz_id, raw });
    }

    pub fn revert(&self, change: Change) {
        self.submit.call(CardEdit::Revert(change));
    }

    pub fn dismiss(&self) {
        let mut status = self.status;
        if !matches!(*status.peek(), PatchStatus::Saving) {
            status.set(PatchStatus::Idle);
        }
    }
}

const SAVED_BADGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Send edits for the card held in `scope`. Applied edits are mirrored into
/// the held card; queued ones bump the review queue instead.
pub fn use_card_patcher(scope: CardScope) -> CardPatcher {
    let ctx = use_context::<AppContext>();
    let cards = ctx.card_service();
    let mut status = use_signal(|| PatchStatus::Idle);

    let submit = use_callback(move |edit: CardEdit| {
        let Some(mut card) = scope.current.peek().clone() else {
            return;
        };
        if *status.peek() == PatchStatus::Saving {
            return;
        }
        // Option rules are checked before anything leaves the client.
        if let CardEdit::AddOption { quiz_id, raw } = &edit {
            let checked = card
                .quizzes
                .iter()
                .find(|q| &q.id == quiz_id)
                .map(|quiz| quiz.validate_new_option(raw));
            if let Some(Err(err)) = checked {
                status.set(PatchStatus::Failed(CardServiceError::from(err).user_message()));
                return;
            }
        }
        status.set(PatchStatus::Saving);
        let cards = cards.clone();
        let mut current = scope.current;
        spawn(async move {
            let result: Result<PatchReceipt, CardServiceError> = match edit {
                CardEdit::Patch(patch) => cards.patch(&mut card, patch).await,
                CardEdit::AddOption { quiz_id, raw } => {
                    cards.add_quiz_option(&mut card, &quiz_id, &raw).await
                }
                CardEdit::Revert(change) => cards.revert(&mut card, &change).await,
            };
            match result {
                Ok(receipt) => {
                    let still_current = current
                        .peek()
                        .as_ref()
                        .is_some_and(|held| held.id == card.id);
                    if still_current {
                        current.set(Some(card));
                    }
                    scope.invalidate(&receipt.invalidate);
                    status.set(if receipt.queued {
                        PatchStatus::Queued(
                            receipt
                                .message
                                .unwrap_or_else(|| "Sent to the owner for review".to_string()),
                        )
                    } else {
                        PatchStatus::Saved
                    });
                    if !receipt.queued {
                        tokio::time::sleep(SAVED_BADGE_TIMEOUT).await;
                        if *status.peek() == PatchStatus::Saved {
                            status.set(PatchStatus::Idle);
                        }
                    }
                }
                Err(err) => {
                    log::warn!("card edit failed: {err}");
                    status.set(PatchStatus::Failed(err.user_message()));
                }
            }
        });
    });

    CardPatcher { status, submit }
}
