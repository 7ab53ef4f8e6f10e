use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ledger::{AnswerLedger, LedgerError};
use crate::model::outcome::Outcome;
use crate::model::question::Question;
use crate::model::topic::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryEntryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("outcome covers {outcome_total} questions but the entry has {questions}")]
    QuestionCountMismatch {
        outcome_total: u32,
        questions: usize,
    },

    #[error("answer ledger covers {ledger} positions but the entry has {questions} questions")]
    LedgerSizeMismatch { ledger: usize, questions: usize },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Frozen snapshot of one completed session.
///
/// Written once when a session completes and never mutated afterwards; the
/// only operation on a stored entry is wholesale deletion. The generated
/// storage key lives with the repository, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    topic: Topic,
    questions: Vec<Question>,
    answers: AnswerLedger,
    outcome: Outcome,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Assembles a snapshot, checking that its parts agree.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError` when the time range is inverted, or the
    /// outcome or ledger disagree with the question count.
    pub fn new(
        topic: Topic,
        questions: Vec<Question>,
        answers: AnswerLedger,
        outcome: Outcome,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, HistoryEntryError> {
        if completed_at < started_at {
            return Err(HistoryEntryError::InvalidTimeRange);
        }
        if outcome.total() as usize != questions.len() {
            return Err(HistoryEntryError::QuestionCountMismatch {
                outcome_total: outcome.total(),
                questions: questions.len(),
            });
        }
        if answers.positions() != questions.len() {
            return Err(HistoryEntryError::LedgerSizeMismatch {
                ledger: answers.positions(),
                questions: questions.len(),
            });
        }

        Ok(Self {
            topic,
            questions,
            answers,
            outcome,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerLedger {
        &self.answers
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
