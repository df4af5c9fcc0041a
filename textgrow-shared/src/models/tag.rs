/// Tag model
///
/// Tags are shared across all users: tag names are globally unique and any
/// caller may create, rename, or delete them. Creation is idempotent by
/// name — creating an existing name returns the existing row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE shortcut_tags (
///     shortcut_id UUID NOT NULL REFERENCES shortcuts(id) ON DELETE CASCADE,
///     tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (shortcut_id, tag_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID
    pub id: Uuid,

    /// Tag name, globally unique
    pub name: String,

    /// When the tag was created
    pub created_at: DateTime<Utc>,

    /// When the tag was last updated
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_serialization() {
        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: "email".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&tag).unwrap();
        assert!(json.contains("\"name\":\"email\""));

        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, tag.id);
        assert_eq!(back.name, "email");
    }
}
