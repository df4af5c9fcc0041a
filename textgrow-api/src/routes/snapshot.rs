/// Export/import endpoints
///
/// Export produces a versioned snapshot of the caller's shortcuts and
/// folders. Import restores shortcuts from a snapshot-shaped payload as
/// brand-new records owned by the caller.
///
/// Known limitations, carried deliberately: the snapshot excludes tag and
/// folder associations, and import does not re-create folders — only
/// shortcuts come back.
///
/// # Endpoints
///
/// - `GET /api/export` - Snapshot of the caller's shortcuts and folders
/// - `POST /api/import` - Restore shortcuts from a snapshot

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use textgrow_shared::auth::AuthContext;
use textgrow_shared::models::{
    folder::Folder,
    shortcut::{CreateShortcut, Shortcut},
};

/// Snapshot format version emitted by export
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Export snapshot
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: String,

    /// When the snapshot was taken
    pub exported_at: DateTime<Utc>,

    /// The caller's shortcuts
    pub shortcuts: Vec<Shortcut>,

    /// The caller's folders
    pub folders: Vec<Folder>,
}

/// Import payload: a snapshot-shaped document
///
/// Entries are deserialized permissively so shape problems surface as a
/// descriptive validation error instead of a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Snapshot format version (accepted but not currently dispatched on)
    #[serde(default)]
    pub version: Option<String>,

    /// Shortcut entries to restore
    #[serde(default)]
    pub shortcuts: Vec<ImportShortcutEntry>,

    /// Folder entries; accepted but not re-created
    #[serde(default)]
    pub folders: Vec<JsonValue>,
}

/// One shortcut entry in an import payload
///
/// Extra fields (ids, timestamps from the exporting account) are ignored;
/// only trigger and content are copied.
#[derive(Debug, Deserialize)]
pub struct ImportShortcutEntry {
    /// Trigger string
    #[serde(default)]
    pub trigger: Option<String>,

    /// Expansion content
    #[serde(default)]
    pub content: Option<String>,
}

/// Import response
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Number of shortcuts created
    pub imported_count: usize,
}

/// Export handler
///
/// Associations and tags are not part of the snapshot.
pub async fn export_snapshot(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Snapshot>> {
    let shortcuts = state.store.list_shortcuts(auth.user_id).await?;
    let folders = state.store.list_folders(auth.user_id).await?;

    Ok(Json(Snapshot {
        version: SNAPSHOT_VERSION.to_string(),
        exported_at: Utc::now(),
        shortcuts,
        folders,
    }))
}

/// Import handler
///
/// Validates every entry before creating anything: a single entry missing
/// its trigger or content fails the whole import, so a bad snapshot never
/// half-applies silently. Each valid entry becomes a brand-new shortcut
/// (fresh id and timestamps) owned by the caller. Imported shortcuts count
/// against the 500-shortcut cap.
///
/// # Errors
///
/// - `400 Bad Request`: The cap would be exceeded
/// - `422 Unprocessable Entity`: An entry is missing trigger or content
pub async fn import_snapshot(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<Json<ImportResponse>> {
    let mut entries = Vec::with_capacity(req.shortcuts.len());
    let mut problems = Vec::new();

    for (index, entry) in req.shortcuts.into_iter().enumerate() {
        let trigger = entry.trigger.filter(|t| !t.is_empty());
        let content = entry.content.filter(|c| !c.is_empty());

        match (trigger, content) {
            (Some(trigger), Some(content)) => entries.push((trigger, content)),
            (trigger, content) => {
                if trigger.is_none() {
                    problems.push(ValidationErrorDetail {
                        field: format!("shortcuts[{}].trigger", index),
                        message: "Trigger is required".to_string(),
                    });
                }
                if content.is_none() {
                    problems.push(ValidationErrorDetail {
                        field: format!("shortcuts[{}].content", index),
                        message: "Content is required".to_string(),
                    });
                }
            }
        }
    }

    if !problems.is_empty() {
        return Err(ApiError::ValidationError(problems));
    }

    let mut imported_count = 0;
    for (trigger, content) in entries {
        state
            .store
            .create_shortcut(CreateShortcut {
                user_id: auth.user_id,
                trigger,
                content,
            })
            .await?;
        imported_count += 1;
    }

    Ok(Json(ImportResponse { imported_count }))
}
