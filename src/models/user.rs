// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
/// Profile fields (name, enrollment, branch, year) live on the user row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'student', 'faculty' or 'admin'.
    pub role: String,

    pub full_name: Option<String>,
    pub enrollment_number: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,

    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 30))]
    pub enrollment_number: Option<String>,
    #[validate(length(max = 50))]
    pub branch: Option<String>,
    #[validate(length(max = 10))]
    pub year: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Aggregated profile data for the current user.
#[derive(Debug, Serialize, FromRow)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub full_name: Option<String>,
    pub enrollment_number: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub tests_taken: i64,
    pub best_score: i64,
}

/// DTO for updating the caller's profile. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 30))]
    pub enrollment_number: Option<String>,
    #[validate(length(max = 50))]
    pub branch: Option<String>,
    #[validate(length(max = 10))]
    pub year: Option<String>,
}
