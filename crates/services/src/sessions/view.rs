use chrono::{DateTime, Utc};
use std::sync::Arc;

use practice_core::Clock;
use practice_core::model::{Category, HistoryEntry, HistoryId, Level};
use storage::repository::{HistoryRepository, HistoryRow};

use super::queries::SessionQueries;
use crate::error::SessionError;

/// Presentation-agnostic list item for a completed session.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI may format timestamps (e.g., relative time, locale) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListItem {
    pub id: HistoryId,
    pub topic_title: String,
    pub level: Level,
    pub category: Category,
    pub completed_at: DateTime<Utc>,

    pub total: u32,
    pub correct: u32,
    pub percentage: u8,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_row(row: &HistoryRow) -> Self {
        let topic = row.entry.topic();
        let outcome = row.entry.outcome();
        Self {
            id: row.id,
            topic_title: topic.title().to_owned(),
            level: topic.level(),
            category: topic.category(),
            completed_at: row.entry.completed_at(),
            total: outcome.total(),
            correct: outcome.correct(),
            percentage: outcome.percentage(),
        }
    }
}

/// Review-screen facade over the history boundary.
///
/// This service owns:
/// - the time source (`Clock`)
/// - repository access
///
/// It does **not** own UI formatting.
#[derive(Clone)]
pub struct HistoryService {
    clock: Clock,
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>) -> Self {
        Self { clock, history }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            clock,
            Arc::new(storage::repository::InMemoryRepository::new()),
        )
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// List completed sessions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_entries(&self) -> Result<Vec<HistoryListItem>, SessionError> {
        let rows = SessionQueries::list_rows(self.history.as_ref()).await?;
        Ok(rows.iter().map(HistoryListItem::from_row).collect())
    }

    /// Fetch one completed session for review.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the entry is missing or
    /// repository access fails.
    pub async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, SessionError> {
        SessionQueries::get_entry(id, self.history.as_ref()).await
    }

    /// Remove one completed session from history.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the key is unknown or the
    /// repository fails.
    pub async fn delete_entry(&self, id: HistoryId) -> Result<(), SessionError> {
        SessionQueries::delete_entry(id, self.history.as_ref()).await
    }

    /// Wipe the whole history.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn clear(&self) -> Result<(), SessionError> {
        SessionQueries::clear(self.history.as_ref()).await
    }
}
