// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{MeResponse, UpdateProfileRequest},
    utils::jwt::Claims,
};

/// Get current user's profile and attempt statistics.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    // Subqueries keep this a single round trip; test_attempts is indexed
    // on user_id.
    let me = sqlx::query_as::<_, MeResponse>(
        r#"
        SELECT
            u.id, u.username, u.role, u.full_name, u.enrollment_number, u.branch, u.year,
            u.created_at,
            (SELECT COUNT(*) FROM test_attempts WHERE user_id = u.id) AS tests_taken,
            (SELECT COALESCE(MAX(score), 0) FROM test_attempts WHERE user_id = u.id) AS best_score
        FROM users u
        WHERE u.id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(me))
}

/// Updates the caller's profile fields.
pub async fn update_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id();

    // Perform updates sequentially if fields are present
    if let Some(full_name) = payload.full_name {
        sqlx::query("UPDATE users SET full_name = ? WHERE id = ?")
            .bind(full_name)
            .bind(user_id)
            .execute(&pool)
            .await?;
    }

    if let Some(enrollment_number) = payload.enrollment_number {
        sqlx::query("UPDATE users SET enrollment_number = ? WHERE id = ?")
            .bind(enrollment_number)
            .bind(user_id)
            .execute(&pool)
            .await?;
    }

    if let Some(branch) = payload.branch {
        sqlx::query("UPDATE users SET branch = ? WHERE id = ?")
            .bind(branch)
            .bind(user_id)
            .execute(&pool)
            .await?;
    }

    if let Some(year) = payload.year {
        sqlx::query("UPDATE users SET year = ? WHERE id = ?")
            .bind(year)
            .bind(user_id)
            .execute(&pool)
            .await?;
    }

    Ok(StatusCode::OK)
}
