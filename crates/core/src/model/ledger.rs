use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::question::RecordedAnswer;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("answer position {position} is outside 0..{positions}")]
    PositionOutOfRange { position: usize, positions: usize },
}

//
// ─── ANSWER LEDGER ─────────────────────────────────────────────────────────────
//

/// Recorded answers for a session, keyed by question position.
///
/// The ledger is bounded by the question count it was created with, so a key
/// outside `[0, positions)` can never be stored. An absent key means the
/// position is unanswered; navigating away and back never drops a recorded
/// answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLedger {
    positions: usize,
    answers: BTreeMap<usize, RecordedAnswer>,
}

impl AnswerLedger {
    /// Creates an empty ledger for `positions` questions.
    #[must_use]
    pub fn new(positions: usize) -> Self {
        Self {
            positions,
            answers: BTreeMap::new(),
        }
    }

    /// Rehydrates a ledger from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PositionOutOfRange` if any key falls outside
    /// the question range.
    pub fn from_snapshot(
        positions: usize,
        answers: BTreeMap<usize, RecordedAnswer>,
    ) -> Result<Self, LedgerError> {
        if let Some((&position, _)) = answers.iter().find(|&(&p, _)| p >= positions) {
            return Err(LedgerError::PositionOutOfRange {
                position,
                positions,
            });
        }
        Ok(Self { positions, answers })
    }

    /// Number of question positions this ledger covers.
    #[must_use]
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Records an answer, overwriting any previous one at that position.
    ///
    /// Returns false (and stores nothing) when the position is out of range.
    pub fn record(&mut self, position: usize, answer: RecordedAnswer) -> bool {
        if position >= self.positions {
            return false;
        }
        self.answers.insert(position, answer);
        true
    }

    /// Removes the answer at a position, if any.
    pub fn remove(&mut self, position: usize) -> Option<RecordedAnswer> {
        self.answers.remove(&position)
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&RecordedAnswer> {
        self.answers.get(&position)
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.answers.contains_key(&position)
    }

    /// Number of positions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// True when every position has a recorded answer.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.answers.len() == self.positions
    }

    /// Iterates recorded answers in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RecordedAnswer)> {
        self.answers.iter().map(|(&p, a)| (p, a))
    }

    /// Copies the recorded answers out for persistence.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<usize, RecordedAnswer> {
        self.answers.clone()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
