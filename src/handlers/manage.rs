// src/handlers/manage.rs
//
// Content management for faculty (and admin): topics and questions.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{
            CreateQuestionRequest, Question, UpdateQuestionRequest, validate_difficulty,
            validate_option_label,
        },
        topic::{CreateTopicRequest, UpdateTopicRequest},
    },
    utils::jwt::Claims,
};

/// Creates a new topic under a category.
/// Faculty or admin.
pub async fn create_topic(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    sqlx::query("SELECT id FROM categories WHERE id = ?")
        .bind(payload.category_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Category not found".to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO topics (category_id, name, description, created_by)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.category_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(claims.user_id())
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create topic: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let id = result.last_insert_rowid();
    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a topic by ID. Faculty or admin.
pub async fn update_topic(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.category_id.is_none() && payload.name.is_none() && payload.description.is_none() {
        return Ok(StatusCode::OK);
    }

    if let Some(category_id) = payload.category_id {
        sqlx::query("SELECT id FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Category not found".to_string()))?;
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE topics SET ");
    let mut separated = builder.separated(", ");

    if let Some(category_id) = payload.category_id {
        separated.push("category_id = ");
        separated.push_bind_unseparated(category_id);
    }

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(description);
    }

    separated.push("updated_at = datetime('now')");

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update topic: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Topic not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a topic (and, via cascade, its questions). Faculty or admin.
pub async fn delete_topic(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM topics WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete topic: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Topic not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists a topic's questions with answers and explanations.
/// Faculty or admin; students only ever see questions through a run.
pub async fn list_topic_questions(
    State(pool): State<SqlitePool>,
    Path(topic_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, topic_id, question_text, option_a, option_b, option_c, option_d,
               correct_answer, explanation, difficulty_level, time_limit_minutes,
               created_by, created_at, updated_at
        FROM questions
        WHERE topic_id = ?
        ORDER BY id
        "#,
    )
    .bind(topic_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(questions))
}

/// Creates a new question. Faculty or admin.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    sqlx::query("SELECT id FROM topics WHERE id = ?")
        .bind(payload.topic_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Topic not found".to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO questions
        (topic_id, question_text, option_a, option_b, option_c, option_d,
         correct_answer, explanation, difficulty_level, time_limit_minutes, created_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.topic_id)
    .bind(&payload.question_text)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(payload.correct_answer.to_ascii_lowercase())
    .bind(&payload.explanation)
    .bind(&payload.difficulty_level)
    .bind(payload.time_limit_minutes)
    .bind(claims.user_id())
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let id = result.last_insert_rowid();
    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a question by ID. Faculty or admin.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.question_text.is_none()
        && payload.option_a.is_none()
        && payload.option_b.is_none()
        && payload.option_c.is_none()
        && payload.option_d.is_none()
        && payload.correct_answer.is_none()
        && payload.explanation.is_none()
        && payload.difficulty_level.is_none()
        && payload.time_limit_minutes.is_none()
    {
        return Ok(StatusCode::OK);
    }

    if let Some(label) = &payload.correct_answer
        && validate_option_label(label).is_err()
    {
        return Err(AppError::BadRequest("Invalid option label".to_string()));
    }

    if let Some(level) = &payload.difficulty_level
        && validate_difficulty(level).is_err()
    {
        return Err(AppError::BadRequest("Invalid difficulty level".to_string()));
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(question_text) = payload.question_text {
        separated.push("question_text = ");
        separated.push_bind_unseparated(question_text);
    }

    if let Some(option_a) = payload.option_a {
        separated.push("option_a = ");
        separated.push_bind_unseparated(option_a);
    }

    if let Some(option_b) = payload.option_b {
        separated.push("option_b = ");
        separated.push_bind_unseparated(option_b);
    }

    if let Some(option_c) = payload.option_c {
        separated.push("option_c = ");
        separated.push_bind_unseparated(option_c);
    }

    if let Some(option_d) = payload.option_d {
        separated.push("option_d = ");
        separated.push_bind_unseparated(option_d);
    }

    if let Some(correct_answer) = payload.correct_answer {
        separated.push("correct_answer = ");
        separated.push_bind_unseparated(correct_answer.to_ascii_lowercase());
    }

    if let Some(explanation) = payload.explanation {
        separated.push("explanation = ");
        separated.push_bind_unseparated(explanation);
    }

    if let Some(difficulty_level) = payload.difficulty_level {
        separated.push("difficulty_level = ");
        separated.push_bind_unseparated(difficulty_level);
    }

    if let Some(time_limit_minutes) = payload.time_limit_minutes {
        separated.push("time_limit_minutes = ");
        separated.push_bind_unseparated(time_limit_minutes);
    }

    separated.push("updated_at = datetime('now')");

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a question by ID. Faculty or admin.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
