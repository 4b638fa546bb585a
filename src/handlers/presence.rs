// src/handlers/presence.rs
//
// Live-visitor tracking behind the landing page's "students online"
// counter. Browsers send a heartbeat every ~30 seconds; sessions fall out
// of the live count once the heartbeat goes quiet.

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState, utils::jwt::Claims};

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    /// Browser-generated session id; stable for one tab session.
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PresenceStats {
    pub live_users: i64,
    pub total_users: i64,
}

/// Upserts the caller's presence row. Works for anonymous visitors too;
/// a valid token additionally ties the session to the user. Each heartbeat
/// also sweeps out sessions quiet for longer than the liveness window, so
/// the table tracks current visitors instead of growing forever.
pub async fn heartbeat(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(payload): Json<HeartbeatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.map(|Extension(c)| c.user_id());

    sqlx::query(
        r#"
        INSERT INTO live_users (session_id, user_id, last_seen)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(session_id) DO UPDATE SET
            last_seen = datetime('now'),
            user_id = excluded.user_id
        "#,
    )
    .bind(payload.session_id.to_string())
    .bind(user_id)
    .execute(&state.pool)
    .await?;

    let window = format!("-{} seconds", state.config.presence_window_seconds);
    sqlx::query("DELETE FROM live_users WHERE last_seen < datetime('now', ?)")
        .bind(window)
        .execute(&state.pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Live and total user counts for the landing page.
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let window = format!("-{} seconds", state.config.presence_window_seconds);

    let live_users: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM live_users WHERE last_seen >= datetime('now', ?)",
    )
    .bind(window)
    .fetch_one(&state.pool)
    .await?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(PresenceStats {
        live_users,
        total_users,
    }))
}
