// src/handlers/attempts.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::attempt::{AttemptHistoryItem, ProgressStats},
    utils::jwt::Claims,
};

/// Lists the caller's attempt history, newest first, joined with topic
/// names for display.
pub async fn list_my_attempts(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, AttemptHistoryItem>(
        r#"
        SELECT
            a.id, a.topic_id, t.name AS topic_name, a.difficulty,
            a.score, a.total_questions, a.time_taken_seconds, a.created_at
        FROM test_attempts a
        LEFT JOIN topics t ON a.topic_id = t.id
        WHERE a.user_id = ?
        ORDER BY a.created_at DESC, a.id DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list attempts: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(attempts))
}

/// Aggregate statistics for the progress page: total tests, average and
/// best score, total time spent.
pub async fn my_stats(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let stats = sqlx::query_as::<_, ProgressStats>(
        r#"
        SELECT
            COUNT(*) AS total_tests,
            CAST(COALESCE(ROUND(AVG(score)), 0) AS INTEGER) AS avg_score,
            COALESCE(MAX(score), 0) AS best_score,
            COALESCE(SUM(time_taken_seconds), 0) AS total_time_spent_seconds
        FROM test_attempts
        WHERE user_id = ?
        "#,
    )
    .bind(claims.user_id())
    .fetch_one(&pool)
    .await?;

    Ok(Json(stats))
}
