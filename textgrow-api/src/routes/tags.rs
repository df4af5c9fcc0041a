/// Tag endpoints
///
/// Tags are global: names are unique across all users and the endpoints are
/// deliberately unauthenticated, so any caller can list, create, rename, or
/// delete any tag. Creation is idempotent by name.
///
/// # Endpoints
///
/// - `GET /api/tags` - List all tags
/// - `POST /api/tags` - Create a tag (returns the existing one on name match)
/// - `PUT /api/tags/:id` - Rename a tag
/// - `DELETE /api/tags/:id` - Delete a tag and its assignments

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use textgrow_shared::models::tag::Tag;
use uuid::Uuid;
use validator::Validate;

/// Create tag request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Update tag request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    /// Replacement tag name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteTagResponse {
    /// Confirmation message
    pub message: String,
}

/// List tags handler
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    let tags = state.store.list_tags().await?;
    Ok(Json(tags))
}

/// Create tag handler
///
/// Idempotent by name: when a tag with the given name exists it is returned
/// unchanged, never duplicated. Two concurrent creates of a fresh name can
/// still collide on the unique index, in which case the loser gets 409.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<Json<Tag>> {
    req.validate()?;

    if let Some(existing) = state.store.find_tag_by_name(&req.name).await? {
        return Ok(Json(existing));
    }

    let tag = state.store.create_tag(&req.name).await?;
    Ok(Json(tag))
}

/// Update tag handler
///
/// # Errors
///
/// - `404 Not Found`: No tag with the given id
/// - `409 Conflict`: The new name is taken by another tag
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> ApiResult<Json<Tag>> {
    req.validate()?;

    let tag = state
        .store
        .update_tag(id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

    Ok(Json(tag))
}

/// Delete tag handler
///
/// Removes assignment rows referencing the tag, then the tag itself. The
/// deletion affects every user who had the tag assigned.
///
/// # Errors
///
/// - `404 Not Found`: No tag with the given id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTagResponse>> {
    let deleted = state.store.delete_tag(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Tag not found".to_string()));
    }

    Ok(Json(DeleteTagResponse {
        message: "Tag deleted successfully".to_string(),
    }))
}
