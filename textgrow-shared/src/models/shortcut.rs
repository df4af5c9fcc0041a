/// Shortcut model
///
/// A shortcut maps a short trigger string (what the user types) to the
/// content it expands into. Shortcuts are owned by exactly one user; triggers
/// are not required to be unique, even within one account.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE shortcuts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     "trigger" TEXT NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use textgrow_shared::models::shortcut::CreateShortcut;
/// use textgrow_shared::store::{memory::MemoryStore, Store};
/// use uuid::Uuid;
///
/// # async fn example(user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
///
/// let shortcut = store
///     .create_shortcut(CreateShortcut {
///         user_id,
///         trigger: "@sig".to_string(),
///         content: "Best, Jane".to_string(),
///     })
///     .await?;
/// println!("Created shortcut: {}", shortcut.id);
/// # Ok(())
/// # }
/// ```

use crate::models::{folder::Folder, tag::Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on live shortcuts per user, enforced by the store at creation
pub const MAX_SHORTCUTS_PER_USER: usize = 500;

/// Shortcut row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shortcut {
    /// Unique shortcut ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// The short string the client expands
    pub trigger: String,

    /// The expansion text
    pub content: String,

    /// When the shortcut was created
    pub created_at: DateTime<Utc>,

    /// When the shortcut was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new shortcut
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShortcut {
    /// Owning user
    pub user_id: Uuid,

    /// Trigger string
    pub trigger: String,

    /// Expansion content
    pub content: String,
}

/// Input for updating an existing shortcut
///
/// Only non-None fields are applied; `updated_at` always advances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShortcut {
    /// New trigger string
    pub trigger: Option<String>,

    /// New expansion content
    pub content: Option<String>,
}

/// A shortcut enriched with its folder and tag associations
///
/// This is the read shape returned by the list and search endpoints. A
/// freshly created shortcut has empty `folders` and `tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutDetails {
    /// Unique shortcut ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Trigger string
    pub trigger: String,

    /// Expansion content
    pub content: String,

    /// When the shortcut was created
    pub created_at: DateTime<Utc>,

    /// When the shortcut was last updated
    pub updated_at: DateTime<Utc>,

    /// Folders containing this shortcut
    pub folders: Vec<Folder>,

    /// Tags assigned to this shortcut
    pub tags: Vec<Tag>,
}

impl ShortcutDetails {
    /// Combines a shortcut row with its enrichment lookups
    pub fn new(shortcut: Shortcut, folders: Vec<Folder>, tags: Vec<Tag>) -> Self {
        ShortcutDetails {
            id: shortcut.id,
            user_id: shortcut.user_id,
            trigger: shortcut.trigger,
            content: shortcut.content,
            created_at: shortcut.created_at,
            updated_at: shortcut.updated_at,
            folders,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_shortcut_default() {
        let update = UpdateShortcut::default();
        assert!(update.trigger.is_none());
        assert!(update.content.is_none());
    }

    #[test]
    fn test_details_from_parts() {
        let now = Utc::now();
        let shortcut = Shortcut {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            trigger: "@sig".to_string(),
            content: "Best, Jane".to_string(),
            created_at: now,
            updated_at: now,
        };

        let details = ShortcutDetails::new(shortcut.clone(), vec![], vec![]);
        assert_eq!(details.id, shortcut.id);
        assert_eq!(details.trigger, "@sig");
        assert!(details.folders.is_empty());
        assert!(details.tags.is_empty());
    }
}
