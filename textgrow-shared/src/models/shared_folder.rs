/// Shared-folder model
///
/// A shared folder wraps a folder id in an opaque share-link token, optionally
/// expiring. The model and store operations exist for clients of this crate;
/// no HTTP endpoint exposes them in the current surface.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE shared_folders (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     folder_id UUID NOT NULL REFERENCES folders(id) ON DELETE CASCADE,
///     share_link VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of generated share-link tokens
const SHARE_LINK_LEN: usize = 32;

/// Shared-folder row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedFolder {
    /// Unique share ID
    pub id: Uuid,

    /// The folder being shared
    pub folder_id: Uuid,

    /// Opaque share-link token
    pub share_link: String,

    /// When the share was created
    pub created_at: DateTime<Utc>,

    /// Optional expiry instant
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for creating a shared folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSharedFolder {
    /// The folder to share
    pub folder_id: Uuid,

    /// Optional expiry instant
    pub expires_at: Option<DateTime<Utc>>,
}

/// Generates a new opaque share-link token
pub fn generate_share_link() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_LINK_LEN)
        .map(char::from)
        .collect()
}
