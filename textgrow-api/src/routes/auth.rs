/// Authentication endpoints
///
/// Credentials (passwords, token issuance) live entirely with the external
/// identity provider; these endpoints only manage the profile row keyed by
/// the provider's principal id.
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create a user profile
/// - `GET /api/auth/me` - Current user profile (bearer)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use textgrow_shared::auth::AuthContext;
use textgrow_shared::models::user::{CreateUser, User};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Optional avatar URL
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Confirmation message
    pub message: String,

    /// New user ID
    pub user_id: String,
}

/// Signup handler
///
/// Creates the profile row for a fresh email. A second signup with the same
/// email fails; nothing about the existing account leaks beyond that.
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<SignupResponse>> {
    req.validate()?;

    if state
        .store
        .find_user_by_email(&req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            name: req.name,
            avatar_url: req.avatar_url,
        })
        .await?;

    Ok(Json(SignupResponse {
        message: "User created successfully".to_string(),
        user_id: user.id.to_string(),
    }))
}

/// Current user profile handler
///
/// Returns the full profile row, preferences included, for the
/// authenticated principal.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or rejected credential
/// - `404 Not Found`: No profile row for the principal
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
