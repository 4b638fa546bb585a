// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'test_attempts' table: the persisted record of a
/// completed run, stored for history/progress display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TestAttempt {
    pub id: i64,
    pub user_id: i64,
    pub topic_id: i64,
    pub difficulty: String,
    /// Score percentage (0-100).
    pub score: i64,
    pub total_questions: i64,
    pub time_taken_seconds: i64,
    /// Full question snapshot, serialized JSON.
    pub questions_data: Option<String>,
    /// Full answer snapshot, serialized JSON.
    pub answers_data: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// One row of the caller's attempt history, joined with the topic name.
#[derive(Debug, Serialize, FromRow)]
pub struct AttemptHistoryItem {
    pub id: i64,
    pub topic_id: i64,
    pub topic_name: Option<String>,
    pub difficulty: String,
    pub score: i64,
    pub total_questions: i64,
    pub time_taken_seconds: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// Aggregate statistics for the progress page.
#[derive(Debug, Serialize, FromRow)]
pub struct ProgressStats {
    pub total_tests: i64,
    pub avg_score: i64,
    pub best_score: i64,
    pub total_time_spent_seconds: i64,
}
