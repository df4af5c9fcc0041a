/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness and health check endpoints
/// - `auth`: Signup and current-user profile
/// - `shortcuts`: Shortcut CRUD and search
/// - `folders`: Folder CRUD
/// - `tags`: Global tag CRUD
/// - `snapshot`: Export/import of a user's data

pub mod auth;
pub mod folders;
pub mod health;
pub mod shortcuts;
pub mod snapshot;
pub mod tags;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use textgrow_shared::models::{folder::Folder, shortcut::Shortcut};
use uuid::Uuid;

/// Fetches a shortcut the caller owns, or fails with NotFound
///
/// Absent and not-owned are indistinguishable to the caller: every mutating
/// shortcut operation goes through this check.
pub(crate) async fn fetch_owned_shortcut(
    state: &AppState,
    id: Uuid,
    user_id: Uuid,
) -> ApiResult<Shortcut> {
    match state.store.find_shortcut(id).await? {
        Some(shortcut) if shortcut.user_id == user_id => Ok(shortcut),
        _ => Err(ApiError::NotFound("Shortcut not found".to_string())),
    }
}

/// Fetches a folder the caller owns, or fails with NotFound
pub(crate) async fn fetch_owned_folder(
    state: &AppState,
    id: Uuid,
    user_id: Uuid,
) -> ApiResult<Folder> {
    match state.store.find_folder(id).await? {
        Some(folder) if folder.user_id == user_id => Ok(folder),
        _ => Err(ApiError::NotFound("Folder not found".to_string())),
    }
}
