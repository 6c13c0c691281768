use std::sync::Arc;

use deck_core::model::{CardId, UserRef};
use storage::memory::InMemoryRepository;
use storage::remote::RemoteConfig;
use storage::repository::Storage;

use crate::card_service::CardService;
use crate::error::AppServicesError;
use crate::log_service::CardLogService;
use crate::review_queue_service::ReviewQueueService;
use crate::Clock;

/// Assembles app-facing services around one backend and the signed-in user.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    current_user: Option<UserRef>,
    initial_card: Option<CardId>,
    card_service: Arc<CardService>,
    log_service: Arc<CardLogService>,
    review_queue: Arc<ReviewQueueService>,
}

impl AppServices {
    /// Build services backed by the collaboration API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be set up.
    pub fn new_remote(
        config: RemoteConfig,
        clock: Clock,
        current_user: Option<UserRef>,
    ) -> Result<Self, AppServicesError> {
        log::info!("using collaboration API at {}", config.base_url);
        let storage = Storage::remote(config)?;
        Ok(Self::from_storage(&storage, clock, current_user))
    }

    /// Build services over an in-process backend; `current_user` is also the
    /// user that backend treats as signed in.
    #[must_use]
    pub fn in_memory(
        repo: &InMemoryRepository,
        clock: Clock,
        current_user: Option<UserRef>,
    ) -> Self {
        repo.act_as(current_user.clone());
        Self::from_storage(&Storage::in_memory(repo), clock, current_user)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, current_user: Option<UserRef>) -> Self {
        let card_service = Arc::new(CardService::new(clock, Arc::clone(&storage.cards)));
        let log_service = Arc::new(CardLogService::new(Arc::clone(&storage.logs)));
        let review_queue = Arc::new(ReviewQueueService::new(
            clock,
            Arc::clone(&storage.review_queue),
            current_user.clone(),
        ));
        Self {
            clock,
            current_user,
            initial_card: None,
            card_service,
            log_service,
            review_queue,
        }
    }

    /// Card to open on launch.
    #[must_use]
    pub fn with_initial_card(mut self, card_id: Option<CardId>) -> Self {
        self.initial_card = card_id;
        self
    }

    #[must_use]
    pub fn initial_card(&self) -> Option<&CardId> {
        self.initial_card.as_ref()
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
