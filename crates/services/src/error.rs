//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::HistoryEntryError;
use storage::repository::StorageError;

/// Errors emitted by session services.
///
/// Navigation and answering never error: out-of-range moves are silent
/// no-ops by design. Only starting a session with bad data, or asking for a
/// completion artifact too early, can fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a practice session needs at least one question")]
    Empty,

    #[error("topic declares {declared} questions but {actual} were supplied")]
    QuestionCountMismatch { declared: u32, actual: usize },

    #[error("session is not completed yet")]
    NotCompleted,

    #[error(transparent)]
    History(#[from] HistoryEntryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
