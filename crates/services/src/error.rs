//! Shared error types for the services crate.

use thiserror::Error;

use deck_core::model::{CardId, PatchError, QuizError, QuizId};
use storage::remote::RemoteInitError;
use storage::repository::StorageError;

/// Shown when neither the backend nor the domain said anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

fn storage_message(err: &StorageError) -> String {
    match err {
        StorageError::Unauthorized => "Please sign in to continue.".to_string(),
        other => other
            .server_message()
            .map_or_else(|| GENERIC_ERROR_MESSAGE.to_string(), str::to_string),
    }
}

/// Errors emitted by `CardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CardServiceError {
    #[error("card {0} is not loaded")]
    CardMismatch(CardId),
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("this change cannot be reverted")]
    NotRevertible,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CardServiceError {
    /// Text suitable for an inline form error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CardServiceError::Storage(err) => storage_message(err),
            CardServiceError::Quiz(err) => err.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Errors emitted by `CardLogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CardLogServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CardLogServiceError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CardLogServiceError::Storage(err) => storage_message(err),
        }
    }
}

/// Errors emitted by `ReviewQueueService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewQueueServiceError {
    #[error("sign in to review changes")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ReviewQueueServiceError {
    /// Server-provided reason when present, otherwise the generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ReviewQueueServiceError::Unauthenticated => self.to_string(),
            ReviewQueueServiceError::Storage(err) => storage_message(err),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Remote(#[from] RemoteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_errors_prefer_server_message() {
        let err = ReviewQueueServiceError::from(StorageError::Rejected {
            status: 410,
            message: "expired".into(),
        });
        assert_eq!(err.user_message(), "expired");

        let err = ReviewQueueServiceError::from(StorageError::Connection("reset".into()));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn quiz_errors_are_shown_verbatim() {
        let err = CardServiceError::from(QuizError::BlankOption);
        assert_eq!(err.user_message(), QuizError::BlankOption.to_string());
    }
}
