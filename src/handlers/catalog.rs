// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        category::Category,
        topic::{DifficultyCount, Topic, TopicDetail},
    },
};

/// Lists all categories for the browse page.
pub async fn list_categories(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, description, created_by, created_at, updated_at
        FROM categories
        ORDER BY name
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(categories))
}

/// Lists the topics of one category.
pub async fn list_category_topics(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("SELECT id FROM categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Category not found".to_string()))?;

    let topics = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, category_id, name, description, created_by, created_at, updated_at
        FROM topics
        WHERE category_id = ?
        ORDER BY name
        "#,
    )
    .bind(category_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(topics))
}

/// Retrieves a topic along with its question counts grouped by difficulty.
/// The counts drive the easy/medium/hard selection cards.
pub async fn get_topic(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let topic = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, category_id, name, description, created_by, created_at, updated_at
        FROM topics
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Topic not found".to_string()))?;

    let difficulty_counts = sqlx::query_as::<_, DifficultyCount>(
        r#"
        SELECT difficulty_level, COUNT(*) AS question_count
        FROM questions
        WHERE topic_id = ?
        GROUP BY difficulty_level
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(TopicDetail {
        topic,
        difficulty_counts,
    }))
}
