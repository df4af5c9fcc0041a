/// Folder model
///
/// Folders group shortcuts for one user. Membership is a many-to-many join:
/// a shortcut may sit in any number of folders and a folder holds any number
/// of shortcuts.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE folders (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE folder_shortcuts (
///     folder_id UUID NOT NULL REFERENCES folders(id) ON DELETE CASCADE,
///     shortcut_id UUID NOT NULL REFERENCES shortcuts(id) ON DELETE CASCADE,
///     PRIMARY KEY (folder_id, shortcut_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Folder row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Folder name
    pub name: String,

    /// When the folder was created
    pub created_at: DateTime<Utc>,

    /// When the folder was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Owning user
    pub user_id: Uuid,

    /// Folder name
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_folder_struct() {
        let create = CreateFolder {
            user_id: Uuid::new_v4(),
            name: "Work".to_string(),
        };
        assert_eq!(create.name, "Work");
    }
}
