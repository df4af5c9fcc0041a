/// Folder endpoints
///
/// Folder CRUD, scoped to the authenticated principal. Folder membership of
/// shortcuts is managed at the store level and surfaced through shortcut
/// enrichment; there is no membership endpoint in this surface.
///
/// # Endpoints
///
/// - `GET /api/folders` - List the caller's folders
/// - `POST /api/folders` - Create a folder
/// - `PUT /api/folders/:id` - Rename a folder
/// - `DELETE /api/folders/:id` - Delete a folder and its membership rows

use crate::{
    app::AppState,
    error::ApiResult,
    routes::fetch_owned_folder,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use textgrow_shared::auth::AuthContext;
use textgrow_shared::models::folder::{CreateFolder, Folder};
use uuid::Uuid;
use validator::Validate;

/// Create folder request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Update folder request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// Replacement folder name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteFolderResponse {
    /// Confirmation message
    pub message: String,
}

/// List folders handler
pub async fn list_folders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Folder>>> {
    let folders = state.store.list_folders(auth.user_id).await?;
    Ok(Json(folders))
}

/// Create folder handler
pub async fn create_folder(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<Folder>> {
    req.validate()?;

    let folder = state
        .store
        .create_folder(CreateFolder {
            user_id: auth.user_id,
            name: req.name,
        })
        .await?;

    Ok(Json(folder))
}

/// Update folder handler
///
/// Replaces the name and refreshes `updated_at`.
///
/// # Errors
///
/// - `404 Not Found`: Folder absent or owned by someone else
pub async fn update_folder(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFolderRequest>,
) -> ApiResult<Json<Folder>> {
    req.validate()?;

    let owned = fetch_owned_folder(&state, id, auth.user_id).await?;

    let updated = state
        .store
        .update_folder(owned.id, &req.name)
        .await?
        .ok_or_else(|| crate::error::ApiError::NotFound("Folder not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete folder handler
///
/// Removes membership rows referencing the folder, then the folder itself.
/// Shortcuts that were in the folder are untouched.
///
/// # Errors
///
/// - `404 Not Found`: Folder absent or owned by someone else
pub async fn delete_folder(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteFolderResponse>> {
    let owned = fetch_owned_folder(&state, id, auth.user_id).await?;

    state.store.delete_folder(owned.id).await?;

    Ok(Json(DeleteFolderResponse {
        message: "Folder deleted successfully".to_string(),
    }))
}
