use std::collections::BTreeSet;

use practice_core::model::{AnswerLedger, RecordedAnswer};

use super::progress::SessionProgress;

/// Everything the UI needs to render one question marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStatus {
    pub is_answered: bool,
    pub is_current: bool,
    pub is_reviewed: bool,
    pub recorded_answer: Option<RecordedAnswer>,
}

/// Read-only navigation view over a session's position, ledger, and review
/// flags.
///
/// Everything here is derived; the navigator holds no state of its own and
/// can be rebuilt from the session at any time.
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    position: usize,
    ledger: &'a AnswerLedger,
    reviewed: &'a BTreeSet<usize>,
    is_complete: bool,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(
        position: usize,
        ledger: &'a AnswerLedger,
        reviewed: &'a BTreeSet<usize>,
        is_complete: bool,
    ) -> Self {
        Self {
            position,
            ledger,
            reviewed,
            is_complete,
        }
    }

    fn total(&self) -> usize {
        self.ledger.positions()
    }

    /// Status of a single question position.
    ///
    /// An out-of-range position reads as unanswered, not current, not
    /// reviewed — the same tolerance navigation itself has.
    #[must_use]
    pub fn status_of(&self, position: usize) -> QuestionStatus {
        QuestionStatus {
            is_answered: self.ledger.is_answered(position),
            is_current: position == self.position && position < self.total(),
            is_reviewed: self.reviewed.contains(&position),
            recorded_answer: self.ledger.get(position).cloned(),
        }
    }

    /// Aggregate progress counters.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total();
        let answered = self.ledger.answered_count();
        let percent_answered = if total == 0 {
            0
        } else {
            // answered <= total, so the rounded value always fits 0..=100.
            (answered as f64 / total as f64 * 100.0).round() as u8
        };

        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            percent_answered,
            is_complete: self.is_complete,
        }
    }

    /// Next unanswered position, searching forward from the current one and
    /// wrapping around the list exactly once. `None` when every question is
    /// answered.
    #[must_use]
    pub fn next_unanswered(&self) -> Option<usize> {
        let total = self.total();
        (1..=total)
            .map(|step| (self.position + step) % total)
            .find(|&p| !self.ledger.is_answered(p))
    }

    /// Previous unanswered position, searching backward with the same
    /// wrap-once rule.
    #[must_use]
    pub fn previous_unanswered(&self) -> Option<usize> {
        let total = self.total();
        (1..=total)
            .map(|step| (self.position + total - step) % total)
            .find(|&p| !self.ledger.is_answered(p))
    }

    /// True when every position has a recorded answer.
    ///
    /// Review flags are informational and never block submission.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.ledger.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(total: usize, answered: &[usize]) -> AnswerLedger {
        let mut ledger = AnswerLedger::new(total);
        for &p in answered {
            ledger.record(p, RecordedAnswer::Choice(0));
        }
        ledger
    }

    #[test]
    fn status_reflects_ledger_and_flags() {
        let ledger = ledger_with(4, &[1]);
        let mut reviewed = BTreeSet::new();
        reviewed.insert(2);
        let nav = Navigator::new(1, &ledger, &reviewed, false);

        let answered = nav.status_of(1);
        assert!(answered.is_answered);
        assert!(answered.is_current);
        assert_eq!(answered.recorded_answer, Some(RecordedAnswer::Choice(0)));

        let flagged = nav.status_of(2);
        assert!(!flagged.is_answered);
        assert!(flagged.is_reviewed);
        assert!(!flagged.is_current);
    }

    #[test]
    fn status_of_out_of_range_position_is_blank() {
        let ledger = ledger_with(4, &[]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(0, &ledger, &reviewed, false);

        let status = nav.status_of(99);
        assert!(!status.is_answered);
        assert!(!status.is_current);
        assert!(!status.is_reviewed);
        assert_eq!(status.recorded_answer, None);
    }

    #[test]
    fn progress_rounds_percentage() {
        let ledger = ledger_with(3, &[0]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(0, &ledger, &reviewed, false);

        let progress = nav.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.percent_answered, 33);

        let ledger = ledger_with(3, &[0, 1]);
        let nav = Navigator::new(0, &ledger, &reviewed, false);
        assert_eq!(nav.progress().percent_answered, 67);
    }

    #[test]
    fn next_unanswered_wraps_once() {
        let ledger = ledger_with(4, &[2, 3]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(2, &ledger, &reviewed, false);

        // Forward from 2: 3 answered, wrap to 0.
        assert_eq!(nav.next_unanswered(), Some(0));
    }

    #[test]
    fn next_unanswered_can_land_on_current() {
        let ledger = ledger_with(3, &[0, 1]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(2, &ledger, &reviewed, false);

        // Only the current position is open; the wrap comes back to it.
        assert_eq!(nav.next_unanswered(), Some(2));
    }

    #[test]
    fn previous_unanswered_searches_backward() {
        let ledger = ledger_with(4, &[0, 3]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(3, &ledger, &reviewed, false);

        assert_eq!(nav.previous_unanswered(), Some(2));
    }

    #[test]
    fn unanswered_searches_return_none_when_full() {
        let ledger = ledger_with(3, &[0, 1, 2]);
        let reviewed = BTreeSet::new();
        let nav = Navigator::new(1, &ledger, &reviewed, false);

        assert_eq!(nav.next_unanswered(), None);
        assert_eq!(nav.previous_unanswered(), None);
        assert!(nav.can_submit());
    }

    #[test]
    fn can_submit_requires_every_answer_only() {
        let ledger = ledger_with(2, &[0]);
        let mut reviewed = BTreeSet::new();
        reviewed.insert(0);
        reviewed.insert(1);
        let nav = Navigator::new(0, &ledger, &reviewed, false);

        // Review flags do not gate submission; the open answer does.
        assert!(!nav.can_submit());
    }
}
