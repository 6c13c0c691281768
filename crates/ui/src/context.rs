use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use deck_core::model::{Card, CardId, UserRef};
use dioxus::prelude::*;
use services::{
    AppServices, CacheTag, CacheVersions, CardLogService, CardService, Clock, ReviewQueueService,
};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn current_user(&self) -> Option<UserRef>;
    fn initial_card(&self) -> Option<CardId>;

    fn card_service(&self) -> Arc<CardService>;
    fn log_service(&self) -> Arc<CardLogService>;
    fn review_queue(&self) -> Arc<ReviewQueueService>;
}

impl UiApp for AppServices {
    fn clock(&self) -> Clock {
        AppServices::clock(self)
    }

    fn current_user(&self) -> Option<UserRef> {
        AppServices::current_user(self).cloned()
    }

    fn initial_card(&self) -> Option<CardId> {
        AppServices::initial_card(self).cloned()
    }

    fn card_service(&self) -> Arc<CardService> {
        AppServices::card_service(self)
    }

    fn log_service(&self) -> Arc<CardLogService> {
        AppServices::log_service(self)
    }

    fn review_queue(&self) -> Arc<ReviewQueueService> {
        AppServices::review_queue(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    current_user: Option<UserRef>,
    initial_card: Option<CardId>,
    open_initial_card_once: Arc<AtomicBool>,

    card_service: Arc<CardService>,
    log_service: Arc<CardLogService>,
    review_queue: Arc<ReviewQueueService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_card = app.initial_card();
        Self {
            clock: app.clock(),
            current_user: app.current_user(),
            open_initial_card_once: Arc::new(AtomicBool::new(initial_card.is_some())),
            initial_card,
            card_service: app.card_service(),
            log_service: app.log_service(),
            review_queue: app.review_queue(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserRef> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub fn initial_card(&self) -> Option<&CardId> {
        self.initial_card.as_ref()
    }

    /// The launch card, handed out once so that returning home does not
    /// bounce straight back into it.
    #[must_use]
    pub fn take_initial_card(&self) -> Option<CardId> {
        if self.open_initial_card_once.swap(false, Ordering::AcqRel) {
            self.initial_card.clone()
        } else {
            None
        }
    }

    #[must_use]
    pub fn card_service(&self) -> Arc<CardService> {
        Arc::clone(&self.card_service)
    }

    #[must_use]
    pub fn log_service(&self) -> Arc<CardLogService> {
        Arc::clone(&self.log_service)
    }

    #[must_use]
    pub fn review_queue(&self) -> Arc<ReviewQueueService> {
        Arc::clone(&self.review_queue)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Client-side state shared by everything under a card route: the loaded
/// card and the cache versions that tell readers when to refetch.
#[derive(Clone, Copy, PartialEq)]
pub struct CardScope {
    pub current: Signal<Option<Card>>,
    pub versions: Signal<CacheVersions>,
}

impl CardScope {
    pub fn invalidate(&self, tags: &[CacheTag]) {
        let mut versions = self.versions;
        versions.write().invalidate(tags);
    }

    #[must_use]
    pub fn version(&self, tag: &CacheTag) -> u64 {
        self.versions.read().version(tag)
    }
}

/// Provide the card scope for the subtree. Call once near the root.
pub fn use_card_scope_provider() -> CardScope {
    use_context_provider(|| CardScope {
        current: Signal::new(None),
        versions: Signal::new(CacheVersions::default()),
    })
}

#[must_use]
pub fn use_card_scope() -> CardScope {
    use_context::<CardScope>()
}
