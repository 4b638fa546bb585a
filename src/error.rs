// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level error shared by every handler.
///
/// Each variant maps to exactly one HTTP status; handlers return
/// `Result<_, AppError>` and the JSON `{"error": ...}` body is produced
/// here. Run-engine errors are translated into these variants at the
/// handler boundary.
#[derive(Debug)]
pub enum AppError {
    /// 500 — question fetch failures and broken stored data land here.
    /// The message is logged, never echoed to the client.
    InternalServerError(String),

    /// 400 — validation failures, bad option labels, unknown difficulties.
    BadRequest(String),

    /// 401 — missing or rejected credentials.
    AuthError(String),

    /// 404 — also covers another user's run id.
    NotFound(String),

    /// 409 — duplicate username, or acting on a run in the wrong phase.
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Lets database queries use the `?` operator. Anything the handlers want
/// to treat differently (unique violations, missing rows) is matched
/// before this conversion applies.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_expected_status_codes() {
        let cases = [
            (
                AppError::InternalServerError("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::AuthError("who".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::NotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (AppError::Conflict("dup".to_string()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_echoed() {
        let response =
            AppError::InternalServerError("secret connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
