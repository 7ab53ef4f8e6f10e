use thiserror::Error;

use crate::model::{HistoryEntryError, LedgerError, OutcomeError, QuestionError, TopicError};

/// Top-level error for core domain construction.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Outcome(#[from] OutcomeError),
    #[error(transparent)]
    History(#[from] HistoryEntryError),
}
