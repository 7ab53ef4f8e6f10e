use async_trait::async_trait;
use chrono::{DateTime, Utc};
use practice_core::model::{
    AnswerKey, AnswerLedger, Category, HistoryEntry, HistoryId, Level, MediaUri, Outcome,
    Question, QuestionAid, QuestionId, RecordedAnswer, Topic, TopicId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one question, including its auxiliary content.
///
/// This mirrors the domain `Question` so repositories can serialize and
/// deserialize without leaking storage concerns into the domain layer; the
/// domain constructor re-validates on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub prompt: String,
    pub options: Vec<String>,
    pub key: AnswerKey,
    pub explanation: Option<String>,
    pub transcript: Option<String>,
    pub translation: Option<String>,
    pub media: Option<MediaUri>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let aid = question.aid();
        Self {
            id: question.id().value(),
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            key: question.key().clone(),
            explanation: aid.explanation.clone(),
            transcript: aid.transcript.clone(),
            translation: aid.translation.clone(),
            media: aid.media.clone(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored fields no longer
    /// pass domain validation.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let question = Question::new(QuestionId::new(self.id), self.prompt, self.options, self.key)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let aid = QuestionAid {
            explanation: self.explanation,
            transcript: self.transcript,
            translation: self.translation,
            media: self.media,
        };
        Ok(if aid.is_empty() {
            question
        } else {
            question.with_aid(aid)
        })
    }
}

/// Persisted shape for a completed session.
///
/// The topic and outcome are flattened into scalar fields; questions and the
/// final answer ledger travel as structured payloads (JSON columns in the
/// sqlite backend).
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub topic_id: u64,
    pub topic_title: String,
    pub level: Level,
    pub category: Category,
    pub question_count: u32,
    pub questions: Vec<QuestionRecord>,
    pub answers: BTreeMap<usize, RecordedAnswer>,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    pub total: u32,
    pub percentage: u8,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl HistoryRecord {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        let topic = entry.topic();
        let outcome = entry.outcome();
        Self {
            topic_id: topic.id().value(),
            topic_title: topic.title().to_owned(),
            level: topic.level(),
            category: topic.category(),
            question_count: topic.question_count(),
            questions: entry
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
            answers: entry.answers().snapshot(),
            correct: outcome.correct(),
            wrong: outcome.wrong(),
            skipped: outcome.skipped(),
            total: outcome.total(),
            percentage: outcome.percentage(),
            started_at: entry.started_at(),
            completed_at: entry.completed_at(),
        }
    }

    /// Convert the record back into a domain `HistoryEntry`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any stored part fails domain
    /// re-validation.
    pub fn into_entry(self) -> Result<HistoryEntry, StorageError> {
        let ser = |e: &dyn std::fmt::Display| StorageError::Serialization(e.to_string());

        let topic = Topic::new(
            TopicId::new(self.topic_id),
            self.topic_title,
            self.level,
            self.category,
            self.question_count,
        )
        .map_err(|e| ser(&e))?;

        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        let answers =
            AnswerLedger::from_snapshot(questions.len(), self.answers).map_err(|e| ser(&e))?;

        let outcome = Outcome::from_persisted(
            self.correct,
            self.wrong,
            self.skipped,
            self.total,
            self.percentage,
        )
        .map_err(|e| ser(&e))?;

        HistoryEntry::new(
            topic,
            questions,
            answers,
            outcome,
            self.started_at,
            self.completed_at,
        )
        .map_err(|e| ser(&e))
    }
}

/// A stored history entry together with its generated key.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: HistoryId,
    pub entry: HistoryEntry,
}

impl HistoryRow {
    #[must_use]
    pub fn new(id: HistoryId, entry: HistoryEntry) -> Self {
        Self { id, entry }
    }
}

/// Repository contract for completed-session history.
///
/// Entries are write-once: appended when a session completes, read back for
/// review screens, and removed wholesale. The engine appends exactly once
/// per completed session and never reads inside the same operation.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Persist a completed session and return its generated key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<HistoryId, StorageError>;

    /// Fetch a single entry by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError>;

    /// List all entries, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_entries(&self) -> Result<Vec<HistoryRow>, StorageError>;

    /// Delete one entry by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the key is unknown.
    async fn delete_entry(&self, id: HistoryId) -> Result<(), StorageError>;

    /// Delete every entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear_entries(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<Vec<HistoryRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<HistoryId, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = HistoryId::generate();
        guard.push(HistoryRow::new(id, entry.clone()));
        Ok(id)
    }

    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.entry.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_entries(&self) -> Result<Vec<HistoryRow>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // Most recently completed first; ties resolved by insertion order,
        // newest insert first, matching the sqlite backend's ordering.
        let mut rows: Vec<_> = guard.iter().cloned().enumerate().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.entry
                .completed_at()
                .cmp(&a.entry.completed_at())
                .then(seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn delete_entry(&self, id: HistoryId) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|row| row.id != id);
        if guard.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn clear_entries(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Aggregates the history repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(InMemoryRepository::new()),
        }
    }
}
