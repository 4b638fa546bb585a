// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
/// Only management handlers return this row as-is; everything the test
/// runner sends to a client goes through the answer-withholding views in
/// `crate::run`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub topic_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// Correct option label: 'a', 'b', 'c' or 'd'.
    pub correct_answer: String,

    /// Explanation shown alongside the result.
    pub explanation: Option<String>,

    /// Difficulty level: 'easy', 'medium' or 'hard'.
    pub difficulty_level: String,

    /// Countdown budget for this question; NULL falls back to the loader
    /// default.
    pub time_limit_minutes: Option<i64>,

    pub created_by: Option<i64>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating a new question. Faculty or admin.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub topic_id: i64,
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    #[validate(custom(function = validate_option_label))]
    pub correct_answer: String,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty_level: String,
    #[validate(range(min = 1, max = 60))]
    pub time_limit_minutes: Option<i64>,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub difficulty_level: Option<String>,
    pub time_limit_minutes: Option<i64>,
}

pub fn validate_option_label(label: &str) -> Result<(), validator::ValidationError> {
    match label.to_ascii_lowercase().as_str() {
        "a" | "b" | "c" | "d" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_option_label")),
    }
}

pub fn validate_difficulty(level: &str) -> Result<(), validator::ValidationError> {
    match level {
        "easy" | "medium" | "hard" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_difficulty")),
    }
}
