use practice_core::model::{HistoryEntry, HistoryId};
use storage::repository::{HistoryRepository, HistoryRow};

use crate::error::SessionError;

/// Storage-backed history queries shared by the workflow and review facade.
pub(crate) struct SessionQueries;

impl SessionQueries {
    /// Fetch a persisted history entry by key.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the entry is missing or storage
    /// fails.
    pub async fn get_entry(
        id: HistoryId,
        history: &dyn HistoryRepository,
    ) -> Result<HistoryEntry, SessionError> {
        let entry = history.get_entry(id).await?;
        Ok(entry)
    }

    /// List persisted entries, most recently completed first, preserving
    /// their keys.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_rows(
        history: &dyn HistoryRepository,
    ) -> Result<Vec<HistoryRow>, SessionError> {
        let rows = history.list_entries().await?;
        Ok(rows)
    }

    /// Delete one entry by key.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the key is unknown or storage
    /// fails.
    pub async fn delete_entry(
        id: HistoryId,
        history: &dyn HistoryRepository,
    ) -> Result<(), SessionError> {
        history.delete_entry(id).await?;
        Ok(())
    }

    /// Delete every persisted entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn clear(history: &dyn HistoryRepository) -> Result<(), SessionError> {
        history.clear_entries().await?;
        Ok(())
    }
}
