use std::sync::Arc;

use practice_core::Clock;
use practice_core::model::{HistoryId, Outcome, Question, RecordedAnswer, Topic};
use storage::repository::HistoryRepository;

use super::engine::PracticeSession;
use crate::error::SessionError;

/// Result of an operation that finished a session.
///
/// `history_id` is `None` when the completed entry could not be persisted;
/// the outcome is still final and `finalize_history` can retry the append.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCompletion {
    pub outcome: Outcome,
    pub history_id: Option<HistoryId>,
}

/// Orchestrates session start, timekeeping, and persisted completion.
///
/// The engine itself performs no I/O; this service supplies the clock and
/// hands the frozen entry to the history boundary the moment a session
/// completes — whether by submission, by advancing past the last question,
/// or by the countdown running out.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    history: Arc<dyn HistoryRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>) -> Self {
        Self { clock, history }
    }

    /// Start a new session for the given topic and begin its countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the question list is empty or disagrees
    /// with the topic's declared count.
    pub fn start_session(
        &self,
        topic: Topic,
        questions: Vec<Question>,
    ) -> Result<PracticeSession, SessionError> {
        let now = self.clock.now();
        let mut session = PracticeSession::new(topic, questions, now)?;
        session.start();
        Ok(session)
    }

    /// Record an answer for the current question position.
    pub fn answer_current(&self, session: &mut PracticeSession, answer: RecordedAnswer) {
        session.record_answer(session.position(), answer);
    }

    /// Move forward one question, persisting if that finished the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::History` if a finished session's snapshot
    /// cannot be assembled.
    pub async fn advance(
        &self,
        session: &mut PracticeSession,
    ) -> Result<Option<SessionCompletion>, SessionError> {
        session.advance(self.clock.now());
        self.persist_if_completed(session).await
    }

    /// One second of session time from the external tick source, persisting
    /// if the countdown just expired.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::History` if a finished session's snapshot
    /// cannot be assembled.
    pub async fn tick(
        &self,
        session: &mut PracticeSession,
    ) -> Result<Option<SessionCompletion>, SessionError> {
        session.tick(self.clock.now());
        self.persist_if_completed(session).await
    }

    /// Explicit submission: complete now, whatever is answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::History` if the snapshot cannot be assembled.
    pub async fn submit(
        &self,
        session: &mut PracticeSession,
    ) -> Result<SessionCompletion, SessionError> {
        session.complete(self.clock.now());
        match self.persist_if_completed(session).await? {
            Some(completion) => Ok(completion),
            // complete() latches Completed, so persist_if_completed always
            // produces a completion here.
            None => Err(SessionError::NotCompleted),
        }
    }

    /// Retry history persistence for a completed session.
    ///
    /// This is useful when the append at completion failed (e.g. transient
    /// storage error).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` if the session is still in
    /// progress, or `SessionError::Storage` if persistence fails again.
    pub async fn finalize_history(
        &self,
        session: &mut PracticeSession,
    ) -> Result<HistoryId, SessionError> {
        if let Some(id) = session.history_id() {
            return Ok(id);
        }
        if !session.is_complete() {
            return Err(SessionError::NotCompleted);
        }

        let entry = session.build_history_entry()?;
        let id = self.history.append_entry(&entry).await?;
        session.set_history_id(id);
        Ok(id)
    }

    /// Appends the frozen entry once per completed session.
    ///
    /// A failed append is not an error here: completion stands, the failure
    /// is logged, and the caller sees `history_id: None` so it can retry
    /// via `finalize_history`.
    async fn persist_if_completed(
        &self,
        session: &mut PracticeSession,
    ) -> Result<Option<SessionCompletion>, SessionError> {
        if !session.is_complete() {
            return Ok(None);
        }

        if session.history_id().is_none() {
            let entry = session.build_history_entry()?;
            match self.history.append_entry(&entry).await {
                Ok(id) => session.set_history_id(id),
                Err(error) => {
                    tracing::warn!(
                        topic_id = %session.topic().id(),
                        %error,
                        "failed to persist completed session; outcome kept in memory"
                    );
                }
            }
        }

        let outcome = session
            .outcome()
            .cloned()
            .ok_or(SessionError::NotCompleted)?;
        Ok(Some(SessionCompletion {
            outcome,
            history_id: session.history_id(),
        }))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{AnswerKey, Category, Level, QuestionId, TopicId};
    use practice_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn build_topic(count: u32) -> Topic {
        Topic::new(
            TopicId::new(1),
            "Reading sprint",
            Level::A2,
            Category::Reading,
            count,
        )
        .unwrap()
    }

    fn build_questions(count: u64) -> Vec<Question> {
        (1..=count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec!["a".into(), "b".into()],
                    AnswerKey::Choice(1),
                )
                .unwrap()
            })
            .collect()
    }

    fn build_service(repo: &InMemoryRepository) -> SessionLoopService {
        SessionLoopService::new(fixed_clock(), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn submit_persists_exactly_one_entry() {
        let repo = InMemoryRepository::new();
        let svc = build_service(&repo);
        let mut session = svc
            .start_session(build_topic(2), build_questions(2))
            .unwrap();

        svc.answer_current(&mut session, RecordedAnswer::Choice(0));
        session.jump_to(1);
        svc.answer_current(&mut session, RecordedAnswer::Choice(1));

        let completion = svc.submit(&mut session).await.unwrap();
        assert_eq!(completion.outcome.correct(), 1);
        assert_eq!(completion.outcome.wrong(), 1);
        assert!(completion.history_id.is_some());

        // A second submit is idempotent and appends nothing.
        let again = svc.submit(&mut session).await.unwrap();
        assert_eq!(again.history_id, completion.history_id);

        assert_eq!(repo.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn advancing_past_the_end_persists() {
        let repo = InMemoryRepository::new();
        let svc = build_service(&repo);
        let mut session = svc
            .start_session(build_topic(1), build_questions(1))
            .unwrap();

        svc.answer_current(&mut session, RecordedAnswer::Choice(0));
        let completion = svc.advance(&mut session).await.unwrap().unwrap();

        assert_eq!(completion.outcome.percentage(), 100);
        assert!(session.is_complete());
        assert!(session.history_id().is_some());
    }

    #[tokio::test]
    async fn tick_before_expiry_does_not_complete() {
        let repo = InMemoryRepository::new();
        let svc = build_service(&repo);
        let mut session = svc
            .start_session(build_topic(1), build_questions(1))
            .unwrap();

        let result = svc.tick(&mut session).await.unwrap();
        assert!(result.is_none());
        assert_eq!(session.elapsed_secs(), 1);
    }

    #[tokio::test]
    async fn timeout_persists_with_open_questions_skipped() {
        let repo = InMemoryRepository::new();
        let svc = build_service(&repo);
        let mut session = svc
            .start_session(build_topic(2), build_questions(2))
            .unwrap();
        svc.answer_current(&mut session, RecordedAnswer::Choice(0));

        let mut completion = None;
        for _ in 0..session.time_limit_secs() {
            if let Some(done) = svc.tick(&mut session).await.unwrap() {
                completion = Some(done);
                break;
            }
        }

        let completion = completion.expect("countdown should expire");
        assert_eq!(completion.outcome.correct(), 1);
        assert_eq!(completion.outcome.skipped(), 1);
        assert_eq!(session.elapsed_secs(), session.time_limit_secs());

        let entry = repo.get_entry(completion.history_id.unwrap()).await.unwrap();
        assert_eq!(entry.outcome().skipped(), 1);
        assert_eq!(entry.started_at(), fixed_now());
    }

    mod failing_repo {
        use async_trait::async_trait;
        use practice_core::model::{HistoryEntry, HistoryId};
        use std::sync::atomic::{AtomicU32, Ordering};
        use storage::repository::{HistoryRepository, HistoryRow, StorageError};

        /// Fails the first `failures` appends, then delegates to an
        /// in-memory store.
        pub struct FlakyRepository {
            pub inner: storage::repository::InMemoryRepository,
            pub failures: AtomicU32,
        }

        #[async_trait]
        impl HistoryRepository for FlakyRepository {
            async fn append_entry(
                &self,
                entry: &HistoryEntry,
            ) -> Result<HistoryId, StorageError> {
                if self.failures.load(Ordering::SeqCst) > 0 {
                    self.failures.fetch_sub(1, Ordering::SeqCst);
                    return Err(StorageError::Connection("disk unplugged".into()));
                }
                self.inner.append_entry(entry).await
            }

            async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError> {
                self.inner.get_entry(id).await
            }

            async fn list_entries(&self) -> Result<Vec<HistoryRow>, StorageError> {
                self.inner.list_entries().await
            }

            async fn delete_entry(&self, id: HistoryId) -> Result<(), StorageError> {
                self.inner.delete_entry(id).await
            }

            async fn clear_entries(&self) -> Result<(), StorageError> {
                self.inner.clear_entries().await
            }
        }
    }

    #[tokio::test]
    async fn persistence_failure_keeps_outcome_and_allows_retry() {
        use failing_repo::FlakyRepository;
        use std::sync::atomic::AtomicU32;

        let repo = Arc::new(FlakyRepository {
            inner: InMemoryRepository::new(),
            failures: AtomicU32::new(1),
        });
        let svc = SessionLoopService::new(fixed_clock(), repo.clone());

        let mut session = svc
            .start_session(build_topic(1), build_questions(1))
            .unwrap();
        svc.answer_current(&mut session, RecordedAnswer::Choice(0));

        // The append fails, but completion stands and the outcome survives.
        let completion = svc.submit(&mut session).await.unwrap();
        assert_eq!(completion.outcome.percentage(), 100);
        assert!(completion.history_id.is_none());
        assert!(session.is_complete());

        // The retry succeeds and latches the key.
        let id = svc.finalize_history(&mut session).await.unwrap();
        assert_eq!(session.history_id(), Some(id));

        let repeat = svc.finalize_history(&mut session).await.unwrap();
        assert_eq!(repeat, id);

        assert_eq!(repo.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn finalize_history_rejects_running_session() {
        let repo = InMemoryRepository::new();
        let svc = build_service(&repo);
        let mut session = svc
            .start_session(build_topic(1), build_questions(1))
            .unwrap();

        let err = svc.finalize_history(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::NotCompleted));
    }
}
