use practice_core::model::{Category, HistoryId, Level, RecordedAnswer};
use sqlx::Row;
use std::collections::BTreeMap;

use crate::repository::{HistoryRecord, HistoryRow, QuestionRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn history_id_from_str(s: &str) -> Result<HistoryId, StorageError> {
    s.parse::<HistoryId>()
        .map_err(|_| StorageError::Serialization(format!("invalid history id: {s}")))
}

pub(crate) fn parse_level(s: &str) -> Result<Level, StorageError> {
    match s {
        "a1" => Ok(Level::A1),
        "a2" => Ok(Level::A2),
        "b1" => Ok(Level::B1),
        "b2" => Ok(Level::B2),
        "c1" => Ok(Level::C1),
        "c2" => Ok(Level::C2),
        _ => Err(StorageError::Serialization(format!("invalid level: {s}"))),
    }
}

pub(crate) fn parse_category(s: &str) -> Result<Category, StorageError> {
    match s {
        "listening" => Ok(Category::Listening),
        "reading" => Ok(Category::Reading),
        "grammar" => Ok(Category::Grammar),
        "vocabulary" => Ok(Category::Vocabulary),
        _ => Err(StorageError::Serialization(format!(
            "invalid category: {s}"
        ))),
    }
}

pub(crate) fn questions_to_json(questions: &[QuestionRecord]) -> Result<String, StorageError> {
    serde_json::to_string(questions).map_err(ser)
}

pub(crate) fn questions_from_json(json: &str) -> Result<Vec<QuestionRecord>, StorageError> {
    serde_json::from_str(json).map_err(ser)
}

pub(crate) fn answers_to_json(
    answers: &BTreeMap<usize, RecordedAnswer>,
) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn answers_from_json(
    json: &str,
) -> Result<BTreeMap<usize, RecordedAnswer>, StorageError> {
    serde_json::from_str(json).map_err(ser)
}

pub(crate) fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryRow, StorageError> {
    let id = history_id_from_str(&row.try_get::<String, _>("id").map_err(ser)?)?;

    let level = parse_level(&row.try_get::<String, _>("level").map_err(ser)?)?;
    let category = parse_category(&row.try_get::<String, _>("category").map_err(ser)?)?;

    let topic_id_i64: i64 = row.try_get("topic_id").map_err(ser)?;
    let topic_id = u64::try_from(topic_id_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid topic_id: {topic_id_i64}")))?;

    let record = HistoryRecord {
        topic_id,
        topic_title: row.try_get("topic_title").map_err(ser)?,
        level,
        category,
        question_count: u32_from_i64(
            "question_count",
            row.try_get::<i64, _>("question_count").map_err(ser)?,
        )?,
        questions: questions_from_json(&row.try_get::<String, _>("questions").map_err(ser)?)?,
        answers: answers_from_json(&row.try_get::<String, _>("answers").map_err(ser)?)?,
        correct: u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?,
        wrong: u32_from_i64("wrong", row.try_get::<i64, _>("wrong").map_err(ser)?)?,
        skipped: u32_from_i64("skipped", row.try_get::<i64, _>("skipped").map_err(ser)?)?,
        total: u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?,
        percentage: u8_from_i64(
            "percentage",
            row.try_get::<i64, _>("percentage").map_err(ser)?,
        )?,
        started_at: row.try_get("started_at").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    };

    Ok(HistoryRow::new(id, record.into_entry()?))
}
