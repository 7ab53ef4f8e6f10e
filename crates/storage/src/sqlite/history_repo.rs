use practice_core::model::{HistoryEntry, HistoryId};

use super::SqliteRepository;
use super::mapping::{answers_to_json, map_history_row, questions_to_json};
use crate::repository::{HistoryRecord, HistoryRepository, HistoryRow, StorageError};

fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<HistoryId, StorageError> {
        let record = HistoryRecord::from_entry(entry);
        let id = HistoryId::generate();

        sqlx::query(
            r"
                INSERT INTO history_entries (
                    id, topic_id, topic_title, level, category, question_count,
                    questions, answers,
                    correct, wrong, skipped, total, percentage,
                    started_at, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ",
        )
        .bind(id.to_string())
        .bind(id_i64("topic_id", record.topic_id)?)
        .bind(&record.topic_title)
        .bind(record.level.code())
        .bind(record.category.code())
        .bind(i64::from(record.question_count))
        .bind(questions_to_json(&record.questions)?)
        .bind(answers_to_json(&record.answers)?)
        .bind(i64::from(record.correct))
        .bind(i64::from(record.wrong))
        .bind(i64::from(record.skipped))
        .bind(i64::from(record.total))
        .bind(i64::from(record.percentage))
        .bind(record.started_at)
        .bind(record.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(id)
    }

    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    id, topic_id, topic_title, level, category, question_count,
                    questions, answers,
                    correct, wrong, skipped, total, percentage,
                    started_at, completed_at
                FROM history_entries
                WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        Ok(map_history_row(&row)?.entry)
    }

    async fn list_entries(&self) -> Result<Vec<HistoryRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, topic_id, topic_title, level, category, question_count,
                    questions, answers,
                    correct, wrong, skipped, total, percentage,
                    started_at, completed_at
                FROM history_entries
                ORDER BY completed_at DESC, rowid DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_history_row(&row)?);
        }
        Ok(out)
    }

    async fn delete_entry(&self, id: HistoryId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM history_entries WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn clear_entries(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM history_entries")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
