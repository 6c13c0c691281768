#![forbid(unsafe_code)]

pub mod memory;
pub mod remote;
pub mod repository;
pub mod seed;

pub use memory::InMemoryRepository;
pub use remote::{RemoteConfig, RemoteInitError, RemoteRepository};
pub use repository::{
    CardLogRepository, CardRepository, DecisionReceipt, Page, PatchOutcome,
    ReviewQueueRepository, Storage, StorageError,
};
