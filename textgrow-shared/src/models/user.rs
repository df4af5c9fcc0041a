/// User model
///
/// Users own shortcuts and folders. Account credentials live with the
/// external identity provider; this table holds the profile row keyed by the
/// provider's stable principal id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255),
///     avatar_url VARCHAR(512),
///     preferences JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use textgrow_shared::models::user::CreateUser;
/// use textgrow_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
///
/// let user = store
///     .create_user(CreateUser {
///         email: "jane@example.com".to_string(),
///         name: Some("Jane".to_string()),
///         avatar_url: None,
///     })
///     .await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// User profile row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (assigned by the identity provider at signup)
    pub id: Uuid,

    /// Email address
    ///
    /// Must be unique across all users
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Arbitrary preference keys and values (JSON object)
    pub preferences: JsonValue,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Optional avatar URL
    pub avatar_url: Option<String>,
}

/// Input for updating an existing user's profile
///
/// All fields are optional. Only non-None fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name (use Some(None) to clear)
    pub name: Option<Option<String>>,

    /// New avatar URL (use Some(None) to clear)
    pub avatar_url: Option<Option<String>>,

    /// Replacement preference object
    pub preferences: Option<JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            name: Some("Test User".to_string()),
            avatar_url: None,
        };

        assert_eq!(create_user.email, "test@example.com");
        assert!(create_user.avatar_url.is_none());
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.name.is_none());
        assert!(update.avatar_url.is_none());
        assert!(update.preferences.is_none());
    }
}
