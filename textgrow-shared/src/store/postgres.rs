/// PostgreSQL store backend
///
/// Production [`Store`] implementation over a sqlx connection pool. Each
/// trait method maps to one query, except the cascading deletes and the
/// cap-enforcing shortcut insert, which run in transactions.
///
/// # Shortcut cap
///
/// `create_shortcut` serializes concurrent creates for the same owner with a
/// per-user advisory transaction lock, then counts and inserts inside the
/// same transaction. Two simultaneous requests for an owner at 499 shortcuts
/// therefore cannot both pass the check.
///
/// # Example
///
/// ```no_run
/// use textgrow_shared::db::pool::{create_pool, DatabaseConfig};
/// use textgrow_shared::store::{postgres::PgStore, Store};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use crate::models::{
    folder::{CreateFolder, Folder},
    shared_folder::{generate_share_link, CreateSharedFolder, SharedFolder},
    shortcut::{CreateShortcut, Shortcut, UpdateShortcut, MAX_SHORTCUTS_PER_USER},
    tag::Tag,
    user::{CreateUser, UpdateUser, User},
};
use crate::store::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, avatar_url, preferences, created_at, updated_at";
const SHORTCUT_COLUMNS: &str = "id, user_id, \"trigger\", content, created_at, updated_at";
const FOLDER_COLUMNS: &str = "id, user_id, name, created_at, updated_at";
const TAG_COLUMNS: &str = "id, name, created_at, updated_at";

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps a connection pool
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return StoreError::Conflict("email already exists".to_string());
                    }
                    if constraint.contains("tags") {
                        return StoreError::Conflict("tag name already exists".to_string());
                    }
                    return StoreError::Conflict(format!("constraint violation: {}", constraint));
                }
                StoreError::Backend(format!("database error: {}", db_err))
            }
            other => StoreError::Backend(format!("database error: {}", other)),
        }
    }
}

/// Escapes LIKE wildcards so the query string matches literally
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, avatar_url, preferences)
            VALUES ($1, $2, $3, '{{}}')
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.name)
        .bind(data.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>> {
        // Build the update dynamically from the supplied fields
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }
        if data.preferences.is_some() {
            bind_count += 1;
            query.push_str(&format!(", preferences = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {USER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name_opt) = data.name {
            q = q.bind(name_opt);
        }
        if let Some(avatar_opt) = data.avatar_url {
            q = q.bind(avatar_opt);
        }
        if let Some(preferences) = data.preferences {
            q = q.bind(preferences);
        }

        let user = q.fetch_optional(&self.pool).await?;

        Ok(user)
    }

    async fn ensure_user(&self, id: Uuid, email: &str) -> StoreResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, preferences)
            VALUES ($1, $2, '{}')
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_shortcuts(&self, user_id: Uuid) -> StoreResult<Vec<Shortcut>> {
        let shortcuts = sqlx::query_as::<_, Shortcut>(&format!(
            "SELECT {SHORTCUT_COLUMNS} FROM shortcuts WHERE user_id = $1 ORDER BY created_at",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shortcuts)
    }

    async fn count_shortcuts(&self, user_id: Uuid) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortcuts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }

    async fn create_shortcut(&self, data: CreateShortcut) -> StoreResult<Shortcut> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent creates for this owner so the count below
        // cannot race past the cap. The lock is released on commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(data.user_id.to_string())
            .execute(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortcuts WHERE user_id = $1")
            .bind(data.user_id)
            .fetch_one(&mut *tx)
            .await?;

        if count as usize >= MAX_SHORTCUTS_PER_USER {
            return Err(StoreError::CapacityExceeded(MAX_SHORTCUTS_PER_USER));
        }

        let shortcut = sqlx::query_as::<_, Shortcut>(&format!(
            r#"
            INSERT INTO shortcuts (user_id, "trigger", content)
            VALUES ($1, $2, $3)
            RETURNING {SHORTCUT_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.trigger)
        .bind(data.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(shortcut)
    }

    async fn find_shortcut(&self, id: Uuid) -> StoreResult<Option<Shortcut>> {
        let shortcut = sqlx::query_as::<_, Shortcut>(&format!(
            "SELECT {SHORTCUT_COLUMNS} FROM shortcuts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shortcut)
    }

    async fn update_shortcut(
        &self,
        id: Uuid,
        data: UpdateShortcut,
    ) -> StoreResult<Option<Shortcut>> {
        let mut query = String::from("UPDATE shortcuts SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.trigger.is_some() {
            bind_count += 1;
            query.push_str(&format!(", \"trigger\" = ${}", bind_count));
        }
        if data.content.is_some() {
            bind_count += 1;
            query.push_str(&format!(", content = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {SHORTCUT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Shortcut>(&query).bind(id);

        if let Some(trigger) = data.trigger {
            q = q.bind(trigger);
        }
        if let Some(content) = data.content {
            q = q.bind(content);
        }

        let shortcut = q.fetch_optional(&self.pool).await?;

        Ok(shortcut)
    }

    async fn delete_shortcut(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Association rows go first so no join row ever dangles
        sqlx::query("DELETE FROM shortcut_tags WHERE shortcut_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM folder_shortcuts WHERE shortcut_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM shortcuts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_shortcuts(&self, user_id: Uuid, query: &str) -> StoreResult<Vec<Shortcut>> {
        let pattern = format!("%{}%", escape_like(query));

        let shortcuts = sqlx::query_as::<_, Shortcut>(&format!(
            r#"
            SELECT {SHORTCUT_COLUMNS}
            FROM shortcuts
            WHERE user_id = $1 AND ("trigger" ILIKE $2 OR content ILIKE $2)
            ORDER BY created_at
            "#,
        ))
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(shortcuts)
    }

    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = $1 ORDER BY created_at",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }

    async fn create_folder(&self, data: CreateFolder) -> StoreResult<Folder> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            r#"
            INSERT INTO folders (user_id, name)
            VALUES ($1, $2)
            RETURNING {FOLDER_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(folder)
    }

    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(folder)
    }

    async fn update_folder(&self, id: Uuid, name: &str) -> StoreResult<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            r#"
            UPDATE folders SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {FOLDER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(folder)
    }

    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM folder_shortcuts WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM shared_folders WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags ORDER BY created_at",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE name = $1",
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn create_tag(&self, name: &str) -> StoreResult<Tag> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING {TAG_COLUMNS}
            "#,
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn update_tag(&self, id: Uuid, name: &str) -> StoreResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            r#"
            UPDATE tags SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TAG_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn delete_tag(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shortcut_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_shortcut_to_folder(&self, folder_id: Uuid, shortcut_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO folder_shortcuts (folder_id, shortcut_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(folder_id)
        .bind(shortcut_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_shortcut_from_folder(
        &self,
        folder_id: Uuid,
        shortcut_id: Uuid,
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM folder_shortcuts WHERE folder_id = $1 AND shortcut_id = $2")
            .bind(folder_id)
            .bind(shortcut_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn tag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shortcut_tags (shortcut_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(shortcut_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn untag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM shortcut_tags WHERE shortcut_id = $1 AND tag_id = $2")
            .bind(shortcut_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn folders_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            r#"
            SELECT f.id, f.user_id, f.name, f.created_at, f.updated_at
            FROM folders f
            JOIN folder_shortcuts fs ON fs.folder_id = f.id
            WHERE fs.shortcut_id = $1
            ORDER BY f.created_at
            "#,
        )
        .bind(shortcut_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }

    async fn tags_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.created_at, t.updated_at
            FROM tags t
            JOIN shortcut_tags st ON st.tag_id = t.id
            WHERE st.shortcut_id = $1
            ORDER BY t.created_at
            "#,
        )
        .bind(shortcut_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn create_shared_folder(&self, data: CreateSharedFolder) -> StoreResult<SharedFolder> {
        let shared = sqlx::query_as::<_, SharedFolder>(
            r#"
            INSERT INTO shared_folders (folder_id, share_link, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, folder_id, share_link, created_at, expires_at
            "#,
        )
        .bind(data.folder_id)
        .bind(generate_share_link())
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(shared)
    }

    async fn find_shared_folder(&self, share_link: &str) -> StoreResult<Option<SharedFolder>> {
        let shared = sqlx::query_as::<_, SharedFolder>(
            r#"
            SELECT id, folder_id, share_link, created_at, expires_at
            FROM shared_folders
            WHERE share_link = $1
            "#,
        )
        .bind(share_link)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shared)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
