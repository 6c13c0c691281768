use std::time::Duration;

use deck_core::model::{CardId, QueueItemId};
use dioxus::prelude::*;
use services::decisions::ERROR_BANNER_TIMEOUT;
use services::{DecisionKind, ReviewDecisions};

use crate::context::{AppContext, use_card_scope};

const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Accept/reject actions sharing one loading flag and one error banner.
#[derive(Clone, Copy, PartialEq)]
pub struct ReviewDecisionsHandle {
    pub state: Signal<ReviewDecisions>,
    pub decide: Callback<(DecisionKind, QueueItemId)>,
    pub dismiss: Callback<()>,
}

impl ReviewDecisionsHandle {
    pub fn accept(&self, item_id: QueueItemId) {
        self.decide.call((DecisionKind::Accept, item_id));
    }

    pub fn reject(&self, item_id: QueueItemId) {
        self.decide.call((DecisionKind::Reject, item_id));
    }
}

/// `on_decided` runs after the backend accepted a decision, with the item
/// that left the queue.
pub fn use_review_decisions(
    card_id: CardId,
    on_decided: Callback<QueueItemId>,
) -> ReviewDecisionsHandle {
    let ctx = use_context::<AppContext>();
    let scope = use_card_scope();
    let queue = ctx.review_queue();
    let authenticated = ctx.current_user().is_some();

    let mut state = use_signal(|| ReviewDecisions::new(authenticated));
    let mut banner_epoch = use_signal(|| 0u64);

    let decide = use_callback(move |(kind, item_id): (DecisionKind, QueueItemId)| {
        let Some(pending) = state.write().begin(kind, item_id) else {
            log::debug!("{} ignored: decisions are disabled", kind.label());
            return;
        };
        let queue = queue.clone();
        let card_id = card_id.clone();
        spawn(async move {
            let result = match pending.kind {
                DecisionKind::Accept => queue.accept(&card_id, &pending.item_id).await,
                DecisionKind::Reject => queue.reject(&card_id, &pending.item_id).await,
            };
            *banner_epoch.write() += 1;
            let epoch = *banner_epoch.peek();
            match result {
                Ok(outcome) => {
                    state.write().finish(&pending, Ok(outcome.message));
                    scope.invalidate(&outcome.invalidate);
                    on_decided.call(pending.item_id.clone());
                    tokio::time::sleep(NOTICE_TIMEOUT).await;
                    if *banner_epoch.peek() == epoch {
                        state.write().clear_notice();
                    }
                }
                Err(err) => {
                    state.write().finish(&pending, Err(err.user_message()));
                    tokio::time::sleep(ERROR_BANNER_TIMEOUT).await;
                    if *banner_epoch.peek() == epoch {
                        state.write().dismiss();
                    }
                }
            }
        });
    });

    let dismiss = use_callback(move |()| {
        *banner_epoch.write() += 1;
        state.write().dismiss();
    });

    ReviewDecisionsHandle {
        state,
        decide,
        dismiss,
    }
}
