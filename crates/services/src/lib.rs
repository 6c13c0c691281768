#![forbid(unsafe_code)]

pub mod app_services;
pub mod cache;
pub mod card_service;
pub mod decisions;
pub mod error;
pub mod log_service;
pub mod paging;
pub mod review_queue_service;

pub use deck_core::Clock;

pub use app_services::AppServices;
pub use cache::{CacheTag, CacheVersions};
pub use card_service::{CardService, PatchReceipt};
pub use decisions::{DecisionKind, PendingDecision, ReviewDecisions};
pub use error::{
    AppServicesError, CardLogServiceError, CardServiceError, GENERIC_ERROR_MESSAGE,
    ReviewQueueServiceError,
};
pub use log_service::CardLogService;
pub use paging::{PageRequest, PagedList};
pub use review_queue_service::{DecisionOutcome, ReviewQueueService};
