use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

use practice_core::model::{
    AnswerLedger, HistoryEntry, HistoryId, Outcome, Question, RecordedAnswer, Topic,
};
use practice_core::scoring;

use super::navigation::Navigator;
use super::progress::SessionProgress;
use super::timer::CountdownTimer;
use crate::error::SessionError;

/// Where a session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed,
}

/// In-memory practice session for one topic.
///
/// The session owns its topic, question list, answer ledger, review flags,
/// and countdown timer, and is mutated only through these methods — one
/// discrete learner or timer event at a time. Once completed it freezes:
/// answers, position, and review flags stop changing and only the outcome
/// and history key remain of interest.
///
/// Navigation and answering are deliberately tolerant: an out-of-range
/// position or a late call is absorbed as a no-op rather than an error,
/// matching user-driven UI traffic. Only construction validates.
pub struct PracticeSession {
    topic: Topic,
    questions: Vec<Question>,
    position: usize,
    ledger: AnswerLedger,
    reviewed: BTreeSet<usize>,
    timer: CountdownTimer,
    state: SessionState,
    outcome: Option<Outcome>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    history_id: Option<HistoryId>,
}

impl PracticeSession {
    /// Creates a session over the given questions.
    ///
    /// The time allotment comes from the topic's level; the timer starts
    /// paused. `started_at` should come from the services layer clock to
    /// keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided, or
    /// `SessionError::QuestionCountMismatch` if the topic declares a
    /// different count than was supplied.
    pub fn new(
        topic: Topic,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        if topic.question_count() as usize != questions.len() {
            return Err(SessionError::QuestionCountMismatch {
                declared: topic.question_count(),
                actual: questions.len(),
            });
        }

        let ledger = AnswerLedger::new(questions.len());
        let timer = CountdownTimer::new(topic.level().time_limit_secs());
        Ok(Self {
            topic,
            questions,
            position: 0,
            ledger,
            reviewed: BTreeSet::new(),
            timer,
            state: SessionState::InProgress,
            outcome: None,
            started_at,
            completed_at: None,
            history_id: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.position]
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn history_id(&self) -> Option<HistoryId> {
        self.history_id
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.timer.limit_secs()
    }

    /// Read-only navigation view over the current state.
    #[must_use]
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(
            self.position,
            &self.ledger,
            &self.reviewed,
            self.is_complete(),
        )
    }

    /// Aggregate progress counters.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.navigator().progress()
    }

    /// True when every question has a recorded answer.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.navigator().can_submit()
    }

    /// Records an answer at a position, overwriting any earlier one there.
    ///
    /// Recording does not move the position or touch review flags. No-op
    /// when the position is out of range or the session is completed.
    pub fn record_answer(&mut self, position: usize, answer: RecordedAnswer) {
        if self.is_complete() {
            return;
        }
        self.ledger.record(position, answer);
    }

    /// Removes the answer at a position, if any. Same tolerance as
    /// `record_answer`.
    pub fn clear_answer(&mut self, position: usize) {
        if self.is_complete() {
            return;
        }
        self.ledger.remove(position);
    }

    /// Moves to the next question; moving past the last one submits the
    /// session instead of running out of bounds.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        if self.is_complete() {
            return;
        }
        if self.position + 1 < self.questions.len() {
            self.position += 1;
        } else {
            self.complete(now);
        }
    }

    /// Moves to the previous question; at the first one this is a no-op.
    pub fn retreat(&mut self) {
        if self.is_complete() {
            return;
        }
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Jumps straight to a position; out-of-range targets are ignored.
    pub fn jump_to(&mut self, position: usize) {
        if self.is_complete() || position >= self.questions.len() {
            return;
        }
        self.position = position;
    }

    /// Flags a question for another look. Idempotent; the flag is purely
    /// informational and never gates submission.
    pub fn mark_reviewed(&mut self, position: usize) {
        if self.is_complete() || position >= self.questions.len() {
            return;
        }
        self.reviewed.insert(position);
    }

    #[must_use]
    pub fn reviewed_positions(&self) -> &BTreeSet<usize> {
        &self.reviewed
    }

    /// Resumes the countdown. No-op once completed.
    pub fn start(&mut self) {
        if self.is_complete() {
            return;
        }
        self.timer.start();
    }

    /// Pauses the countdown.
    pub fn pause(&mut self) {
        self.timer.pause();
    }

    /// One second of session time, driven by the external clock source.
    ///
    /// Exhausting the allotment forces completion; elapsed time never
    /// passes the limit.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.is_complete() {
            return;
        }
        if self.timer.tick() {
            self.complete(now);
        }
    }

    /// Finalizes the session: scores the ledger, stops the clock, and
    /// freezes all interaction state. Calling this twice has no further
    /// effect.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if self.is_complete() {
            return;
        }
        self.outcome = Some(scoring::score(&self.questions, &self.ledger));
        self.timer.pause();
        self.state = SessionState::Completed;
        self.completed_at = Some(now);
    }

    /// Restores the post-init defaults, keeping topic and questions, so the
    /// same test can be taken again.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.position = 0;
        self.ledger = AnswerLedger::new(self.questions.len());
        self.reviewed.clear();
        self.timer.reset();
        self.state = SessionState::InProgress;
        self.outcome = None;
        self.started_at = now;
        self.completed_at = None;
        self.history_id = None;
    }

    /// Frozen snapshot of this session for the history boundary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` before completion.
    pub fn build_history_entry(&self) -> Result<HistoryEntry, SessionError> {
        let (Some(outcome), Some(completed_at)) = (&self.outcome, self.completed_at) else {
            return Err(SessionError::NotCompleted);
        };

        Ok(HistoryEntry::new(
            self.topic.clone(),
            self.questions.clone(),
            self.ledger.clone(),
            outcome.clone(),
            self.started_at,
            completed_at,
        )?)
    }

    pub(crate) fn set_history_id(&mut self, id: HistoryId) {
        self.history_id = Some(id);
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("topic_id", &self.topic.id())
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("answered", &self.ledger.answered_count())
            .field("elapsed_secs", &self.timer.elapsed_secs())
            .field("state", &self.state)
            .field("history_id", &self.history_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
