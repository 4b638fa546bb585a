// src/models/topic.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'topics' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

/// Question count for one difficulty level of a topic.
#[derive(Debug, Serialize, FromRow)]
pub struct DifficultyCount {
    pub difficulty_level: String,
    pub question_count: i64,
}

/// Topic detail page payload: the topic plus its per-difficulty counts,
/// which drive the difficulty selection cards.
#[derive(Debug, Serialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    pub difficulty_counts: Vec<DifficultyCount>,
}

/// DTO for creating a topic. Faculty or admin.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopicRequest {
    pub category_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// DTO for updating a topic. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateTopicRequest {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}
