/// Shortcut endpoints
///
/// CRUD plus free-text search over the caller's shortcuts. Read endpoints
/// (list, search) enrich each shortcut with its folder and tag associations;
/// create returns the bare record since a fresh shortcut has none.
///
/// # Endpoints
///
/// - `GET /api/shortcuts` - List the caller's shortcuts, enriched
/// - `POST /api/shortcuts` - Create a shortcut
/// - `PUT /api/shortcuts/:id` - Update trigger and/or content
/// - `DELETE /api/shortcuts/:id` - Delete a shortcut and its associations
/// - `GET /api/search?q=` - Case-insensitive substring search, enriched

use crate::{
    app::AppState,
    error::ApiResult,
    routes::fetch_owned_shortcut,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use textgrow_shared::auth::AuthContext;
use textgrow_shared::models::shortcut::{
    CreateShortcut, Shortcut, ShortcutDetails, UpdateShortcut,
};
use uuid::Uuid;
use validator::Validate;

/// Create shortcut request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortcutRequest {
    /// Trigger string
    #[validate(length(min = 1, max = 255, message = "Trigger must be 1-255 characters"))]
    pub trigger: String,

    /// Expansion content
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Update shortcut request
///
/// Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShortcutRequest {
    /// New trigger string
    #[validate(length(min = 1, max = 255, message = "Trigger must be 1-255 characters"))]
    pub trigger: Option<String>,

    /// New expansion content
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query
    pub q: String,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,
}

/// Attaches folder and tag associations to each shortcut
async fn enrich(state: &AppState, shortcuts: Vec<Shortcut>) -> ApiResult<Vec<ShortcutDetails>> {
    let mut detailed = Vec::with_capacity(shortcuts.len());

    for shortcut in shortcuts {
        let folders = state.store.folders_for_shortcut(shortcut.id).await?;
        let tags = state.store.tags_for_shortcut(shortcut.id).await?;
        detailed.push(ShortcutDetails::new(shortcut, folders, tags));
    }

    Ok(detailed)
}

/// List shortcuts handler
///
/// Returns every shortcut the caller owns, each enriched with its folders
/// and tags, in creation order.
pub async fn list_shortcuts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ShortcutDetails>>> {
    let shortcuts = state.store.list_shortcuts(auth.user_id).await?;
    Ok(Json(enrich(&state, shortcuts).await?))
}

/// Create shortcut handler
///
/// # Errors
///
/// - `400 Bad Request`: The caller already owns the maximum of 500 shortcuts
/// - `422 Unprocessable Entity`: Missing or malformed trigger/content
pub async fn create_shortcut(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateShortcutRequest>,
) -> ApiResult<Json<Shortcut>> {
    req.validate()?;

    let shortcut = state
        .store
        .create_shortcut(CreateShortcut {
            user_id: auth.user_id,
            trigger: req.trigger,
            content: req.content,
        })
        .await?;

    Ok(Json(shortcut))
}

/// Update shortcut handler
///
/// Applies only the supplied fields; `updated_at` always advances.
///
/// # Errors
///
/// - `404 Not Found`: Shortcut absent or owned by someone else
pub async fn update_shortcut(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateShortcutRequest>,
) -> ApiResult<Json<Shortcut>> {
    req.validate()?;

    let owned = fetch_owned_shortcut(&state, id, auth.user_id).await?;

    let updated = state
        .store
        .update_shortcut(
            owned.id,
            UpdateShortcut {
                trigger: req.trigger,
                content: req.content,
            },
        )
        .await?
        // The row was just fetched; absence here means a concurrent delete
        .ok_or_else(|| crate::error::ApiError::NotFound("Shortcut not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete shortcut handler
///
/// Removes tag and folder association rows, then the shortcut itself.
///
/// # Errors
///
/// - `404 Not Found`: Shortcut absent or owned by someone else
pub async fn delete_shortcut(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let owned = fetch_owned_shortcut(&state, id, auth.user_id).await?;

    state.store.delete_shortcut(owned.id).await?;

    Ok(Json(DeleteResponse {
        message: "Shortcut deleted successfully".to_string(),
    }))
}

/// Search handler
///
/// Matches the query as a case-insensitive substring of trigger OR content,
/// scoped to the caller's shortcuts, enriched like the list endpoint.
pub async fn search_shortcuts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<ShortcutDetails>>> {
    let shortcuts = state.store.search_shortcuts(auth.user_id, &params.q).await?;
    Ok(Json(enrich(&state, shortcuts).await?))
}
