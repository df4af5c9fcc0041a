/// Store contract and implementations
///
/// The store is the system's single shared resource: a relational backend
/// holding users, shortcuts, folders, tags, and their associations. The API
/// server talks to it exclusively through the [`Store`] trait, acquired once
/// at startup and injected into the application state — never reached through
/// ambient global state.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: production backend over sqlx/PostgreSQL
/// - [`memory::MemoryStore`]: in-memory double with the same observable
///   semantics, used by tests and local development
///
/// # Ownership
///
/// Row-level ownership is NOT checked here. `find_shortcut`/`find_folder`
/// return the row regardless of owner; the API layer compares `user_id`
/// against the authenticated principal and treats a mismatch as not-found.
/// List and search operations are owner-scoped because they take a `user_id`.
///
/// # Example
///
/// ```no_run
/// use textgrow_shared::models::shortcut::CreateShortcut;
/// use textgrow_shared::store::{memory::MemoryStore, Store};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example(user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
///
/// let shortcut = store
///     .create_shortcut(CreateShortcut {
///         user_id,
///         trigger: "@addr".to_string(),
///         content: "12 Main St".to_string(),
///     })
///     .await?;
///
/// let mine = store.list_shortcuts(user_id).await?;
/// assert_eq!(mine.len(), 1);
/// assert_eq!(mine[0].id, shortcut.id);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use crate::models::{
    folder::{CreateFolder, Folder},
    shared_folder::{CreateSharedFolder, SharedFolder},
    shortcut::{CreateShortcut, Shortcut, UpdateShortcut},
    tag::Tag,
    user::{CreateUser, UpdateUser, User},
};
use async_trait::async_trait;
use uuid::Uuid;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate email or tag name)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The owner's live shortcut count is at the cap
    #[error("maximum shortcut limit ({0}) reached")]
    CapacityExceeded(usize),

    /// The backend failed or is unreachable
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// The store contract
///
/// Every method maps to one or a few backend calls; no method holds state
/// between calls. Cascading deletes (shortcut, folder, tag) remove dependent
/// association rows so no join row ever references a missing entity.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Users ---

    /// Creates a user profile row
    ///
    /// Fails with [`StoreError::Conflict`] if the email is already taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Finds a user by id
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Finds a user by email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Applies a profile update, refreshing `updated_at`
    ///
    /// Returns None if the user does not exist.
    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Fetches the user with the given id, provisioning an empty profile row
    /// with the given email if none exists
    ///
    /// Used to lazily provision well-known principals (the demo fallback).
    async fn ensure_user(&self, id: Uuid, email: &str) -> StoreResult<User>;

    // --- Shortcuts ---

    /// Lists all shortcuts owned by a user, in creation order
    async fn list_shortcuts(&self, user_id: Uuid) -> StoreResult<Vec<Shortcut>>;

    /// Counts live shortcuts owned by a user
    async fn count_shortcuts(&self, user_id: Uuid) -> StoreResult<usize>;

    /// Creates a shortcut, enforcing the per-user cap
    ///
    /// Fails with [`StoreError::CapacityExceeded`] when the owner already
    /// holds [`MAX_SHORTCUTS_PER_USER`](crate::models::shortcut::MAX_SHORTCUTS_PER_USER)
    /// live shortcuts. The check and insert are atomic with respect to
    /// concurrent creates for the same owner.
    async fn create_shortcut(&self, data: CreateShortcut) -> StoreResult<Shortcut>;

    /// Finds a shortcut by id, regardless of owner
    async fn find_shortcut(&self, id: Uuid) -> StoreResult<Option<Shortcut>>;

    /// Applies the supplied fields and refreshes `updated_at`
    ///
    /// Returns None if the shortcut does not exist.
    async fn update_shortcut(
        &self,
        id: Uuid,
        data: UpdateShortcut,
    ) -> StoreResult<Option<Shortcut>>;

    /// Deletes a shortcut and its folder/tag association rows
    ///
    /// Returns false if the shortcut did not exist.
    async fn delete_shortcut(&self, id: Uuid) -> StoreResult<bool>;

    /// Returns the user's shortcuts whose trigger or content contains the
    /// query as a case-insensitive substring, in creation order
    async fn search_shortcuts(&self, user_id: Uuid, query: &str) -> StoreResult<Vec<Shortcut>>;

    // --- Folders ---

    /// Lists all folders owned by a user, in creation order
    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>>;

    /// Creates a folder
    async fn create_folder(&self, data: CreateFolder) -> StoreResult<Folder>;

    /// Finds a folder by id, regardless of owner
    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>>;

    /// Replaces the folder name and refreshes `updated_at`
    ///
    /// Returns None if the folder does not exist.
    async fn update_folder(&self, id: Uuid, name: &str) -> StoreResult<Option<Folder>>;

    /// Deletes a folder and its membership rows
    ///
    /// Returns false if the folder did not exist.
    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool>;

    // --- Tags ---

    /// Lists all tags (global, unscoped)
    async fn list_tags(&self) -> StoreResult<Vec<Tag>>;

    /// Finds a tag by its globally unique name
    async fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>>;

    /// Creates a tag
    ///
    /// Fails with [`StoreError::Conflict`] if the name is already taken;
    /// callers wanting idempotent-by-name creation should look the name up
    /// first and fall back to this on absence.
    async fn create_tag(&self, name: &str) -> StoreResult<Tag>;

    /// Replaces the tag name and refreshes `updated_at`
    ///
    /// Returns None if the tag does not exist.
    async fn update_tag(&self, id: Uuid, name: &str) -> StoreResult<Option<Tag>>;

    /// Deletes a tag and its assignment rows
    ///
    /// Returns false if the tag did not exist.
    async fn delete_tag(&self, id: Uuid) -> StoreResult<bool>;

    // --- Associations ---

    /// Places a shortcut in a folder (no-op if already present)
    async fn add_shortcut_to_folder(&self, folder_id: Uuid, shortcut_id: Uuid) -> StoreResult<()>;

    /// Removes a shortcut from a folder (no-op if absent)
    async fn remove_shortcut_from_folder(
        &self,
        folder_id: Uuid,
        shortcut_id: Uuid,
    ) -> StoreResult<()>;

    /// Assigns a tag to a shortcut (no-op if already assigned)
    async fn tag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()>;

    /// Removes a tag from a shortcut (no-op if absent)
    async fn untag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()>;

    // --- Enrichment lookups ---

    /// Returns the folders containing a shortcut
    ///
    /// An empty result is normal for a shortcut with no folder membership.
    async fn folders_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Folder>>;

    /// Returns the tags assigned to a shortcut
    ///
    /// An empty result is normal for an untagged shortcut.
    async fn tags_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Tag>>;

    // --- Shared folders ---

    /// Creates a share record with a freshly generated link token
    async fn create_shared_folder(&self, data: CreateSharedFolder) -> StoreResult<SharedFolder>;

    /// Looks up a share record by its link token
    async fn find_shared_folder(&self, share_link: &str) -> StoreResult<Option<SharedFolder>>;

    // --- Health ---

    /// Probes backend connectivity
    async fn ping(&self) -> StoreResult<()>;
}
