/// In-memory store backend
///
/// A [`Store`] implementation over plain maps behind a single async mutex.
/// It mirrors the observable semantics of the PostgreSQL backend — cap
/// enforcement, cascade deletes, unique email and tag names, creation-order
/// listings — and backs the integration test suite and local development
/// without a database.
///
/// The single lock makes every operation atomic, so the shortcut cap needs
/// no further coordination here.

use crate::models::{
    folder::{CreateFolder, Folder},
    shared_folder::{generate_share_link, CreateSharedFolder, SharedFolder},
    shortcut::{CreateShortcut, Shortcut, UpdateShortcut, MAX_SHORTCUTS_PER_USER},
    tag::Tag,
    user::{CreateUser, UpdateUser, User},
};
use crate::store::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    shortcuts: HashMap<Uuid, Shortcut>,
    folders: HashMap<Uuid, Folder>,
    tags: HashMap<Uuid, Tag>,
    /// (folder_id, shortcut_id)
    folder_shortcuts: HashSet<(Uuid, Uuid)>,
    /// (shortcut_id, tag_id)
    shortcut_tags: HashSet<(Uuid, Uuid)>,
    shared_folders: HashMap<Uuid, SharedFolder>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

/// Sorts rows into creation order, ties broken by id for determinism
fn by_creation<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
{
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;

        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(StoreError::Conflict("email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            name: data.name,
            avatar_url: data.avatar_url,
            preferences: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(avatar_url) = data.avatar_url {
            user.avatar_url = avatar_url;
        }
        if let Some(preferences) = data.preferences {
            user.preferences = preferences;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn ensure_user(&self, id: Uuid, email: &str) -> StoreResult<User> {
        let mut state = self.state.lock().await;

        if let Some(user) = state.users.get(&id) {
            return Ok(user.clone());
        }

        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            name: None,
            avatar_url: None,
            preferences: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());

        Ok(user)
    }

    async fn list_shortcuts(&self, user_id: Uuid) -> StoreResult<Vec<Shortcut>> {
        let state = self.state.lock().await;
        let rows = state
            .shortcuts
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        Ok(by_creation(rows, |s: &Shortcut| (s.created_at, s.id)))
    }

    async fn count_shortcuts(&self, user_id: Uuid) -> StoreResult<usize> {
        let state = self.state.lock().await;
        Ok(state
            .shortcuts
            .values()
            .filter(|s| s.user_id == user_id)
            .count())
    }

    async fn create_shortcut(&self, data: CreateShortcut) -> StoreResult<Shortcut> {
        let mut state = self.state.lock().await;

        let owned = state
            .shortcuts
            .values()
            .filter(|s| s.user_id == data.user_id)
            .count();
        if owned >= MAX_SHORTCUTS_PER_USER {
            return Err(StoreError::CapacityExceeded(MAX_SHORTCUTS_PER_USER));
        }

        let now = Utc::now();
        let shortcut = Shortcut {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            trigger: data.trigger,
            content: data.content,
            created_at: now,
            updated_at: now,
        };
        state.shortcuts.insert(shortcut.id, shortcut.clone());

        Ok(shortcut)
    }

    async fn find_shortcut(&self, id: Uuid) -> StoreResult<Option<Shortcut>> {
        let state = self.state.lock().await;
        Ok(state.shortcuts.get(&id).cloned())
    }

    async fn update_shortcut(
        &self,
        id: Uuid,
        data: UpdateShortcut,
    ) -> StoreResult<Option<Shortcut>> {
        let mut state = self.state.lock().await;

        let Some(shortcut) = state.shortcuts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(trigger) = data.trigger {
            shortcut.trigger = trigger;
        }
        if let Some(content) = data.content {
            shortcut.content = content;
        }
        shortcut.updated_at = Utc::now();

        Ok(Some(shortcut.clone()))
    }

    async fn delete_shortcut(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;

        state.shortcut_tags.retain(|(sid, _)| *sid != id);
        state.folder_shortcuts.retain(|(_, sid)| *sid != id);

        Ok(state.shortcuts.remove(&id).is_some())
    }

    async fn search_shortcuts(&self, user_id: Uuid, query: &str) -> StoreResult<Vec<Shortcut>> {
        let needle = query.to_lowercase();
        let state = self.state.lock().await;

        let rows = state
            .shortcuts
            .values()
            .filter(|s| {
                s.user_id == user_id
                    && (s.trigger.to_lowercase().contains(&needle)
                        || s.content.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        Ok(by_creation(rows, |s: &Shortcut| (s.created_at, s.id)))
    }

    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>> {
        let state = self.state.lock().await;
        let rows = state
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        Ok(by_creation(rows, |f: &Folder| (f.created_at, f.id)))
    }

    async fn create_folder(&self, data: CreateFolder) -> StoreResult<Folder> {
        let mut state = self.state.lock().await;

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());

        Ok(folder)
    }

    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>> {
        let state = self.state.lock().await;
        Ok(state.folders.get(&id).cloned())
    }

    async fn update_folder(&self, id: Uuid, name: &str) -> StoreResult<Option<Folder>> {
        let mut state = self.state.lock().await;

        let Some(folder) = state.folders.get_mut(&id) else {
            return Ok(None);
        };

        folder.name = name.to_string();
        folder.updated_at = Utc::now();

        Ok(Some(folder.clone()))
    }

    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;

        state.folder_shortcuts.retain(|(fid, _)| *fid != id);
        state.shared_folders.retain(|_, sf| sf.folder_id != id);

        Ok(state.folders.remove(&id).is_some())
    }

    async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
        let state = self.state.lock().await;
        let rows = state.tags.values().cloned().collect();
        Ok(by_creation(rows, |t: &Tag| (t.created_at, t.id)))
    }

    async fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        let state = self.state.lock().await;
        Ok(state.tags.values().find(|t| t.name == name).cloned())
    }

    async fn create_tag(&self, name: &str) -> StoreResult<Tag> {
        let mut state = self.state.lock().await;

        if state.tags.values().any(|t| t.name == name) {
            return Err(StoreError::Conflict("tag name already exists".to_string()));
        }

        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.tags.insert(tag.id, tag.clone());

        Ok(tag)
    }

    async fn update_tag(&self, id: Uuid, name: &str) -> StoreResult<Option<Tag>> {
        let mut state = self.state.lock().await;

        if state.tags.values().any(|t| t.name == name && t.id != id) {
            return Err(StoreError::Conflict("tag name already exists".to_string()));
        }

        let Some(tag) = state.tags.get_mut(&id) else {
            return Ok(None);
        };

        tag.name = name.to_string();
        tag.updated_at = Utc::now();

        Ok(Some(tag.clone()))
    }

    async fn delete_tag(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;

        state.shortcut_tags.retain(|(_, tid)| *tid != id);

        Ok(state.tags.remove(&id).is_some())
    }

    async fn add_shortcut_to_folder(&self, folder_id: Uuid, shortcut_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.folder_shortcuts.insert((folder_id, shortcut_id));
        Ok(())
    }

    async fn remove_shortcut_from_folder(
        &self,
        folder_id: Uuid,
        shortcut_id: Uuid,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.folder_shortcuts.remove(&(folder_id, shortcut_id));
        Ok(())
    }

    async fn tag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.shortcut_tags.insert((shortcut_id, tag_id));
        Ok(())
    }

    async fn untag_shortcut(&self, shortcut_id: Uuid, tag_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.shortcut_tags.remove(&(shortcut_id, tag_id));
        Ok(())
    }

    async fn folders_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Folder>> {
        let state = self.state.lock().await;

        let rows = state
            .folder_shortcuts
            .iter()
            .filter(|(_, sid)| *sid == shortcut_id)
            .filter_map(|(fid, _)| state.folders.get(fid))
            .cloned()
            .collect();

        Ok(by_creation(rows, |f: &Folder| (f.created_at, f.id)))
    }

    async fn tags_for_shortcut(&self, shortcut_id: Uuid) -> StoreResult<Vec<Tag>> {
        let state = self.state.lock().await;

        let rows = state
            .shortcut_tags
            .iter()
            .filter(|(sid, _)| *sid == shortcut_id)
            .filter_map(|(_, tid)| state.tags.get(tid))
            .cloned()
            .collect();

        Ok(by_creation(rows, |t: &Tag| (t.created_at, t.id)))
    }

    async fn create_shared_folder(&self, data: CreateSharedFolder) -> StoreResult<SharedFolder> {
        let mut state = self.state.lock().await;

        let shared = SharedFolder {
            id: Uuid::new_v4(),
            folder_id: data.folder_id,
            share_link: generate_share_link(),
            created_at: Utc::now(),
            expires_at: data.expires_at,
        };
        state.shared_folders.insert(shared.id, shared.clone());

        Ok(shared)
    }

    async fn find_shared_folder(&self, share_link: &str) -> StoreResult<Option<SharedFolder>> {
        let state = self.state.lock().await;
        Ok(state
            .shared_folders
            .values()
            .find(|sf| sf.share_link == share_link)
            .cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(CreateUser {
                email: email.to_string(),
                name: None,
                avatar_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        seed_user(&store, "jane@example.com").await;

        let err = store
            .create_user(CreateUser {
                email: "Jane@Example.com".to_string(),
                name: None,
                avatar_url: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let store = MemoryStore::new();
        let id = Uuid::nil();

        let first = store.ensure_user(id, "demo@example.com").await.unwrap();
        let second = store.ensure_user(id, "demo@example.com").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_update_user_preferences() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;

        let updated = store
            .update_user(
                user.id,
                UpdateUser {
                    preferences: Some(serde_json::json!({"theme": "dark"})),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.preferences["theme"], "dark");
        assert_eq!(updated.email, user.email);
    }

    #[tokio::test]
    async fn test_shortcut_cap_enforced() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;

        for i in 0..MAX_SHORTCUTS_PER_USER {
            store
                .create_shortcut(CreateShortcut {
                    user_id: user.id,
                    trigger: format!("@t{}", i),
                    content: "x".to_string(),
                })
                .await
                .unwrap();
        }

        let err = store
            .create_shortcut(CreateShortcut {
                user_id: user.id,
                trigger: "@overflow".to_string(),
                content: "x".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::CapacityExceeded(_)));

        // Another user is unaffected by the first user's cap
        let other = seed_user(&store, "john@example.com").await;
        store
            .create_shortcut(CreateShortcut {
                user_id: other.id,
                trigger: "@ok".to_string(),
                content: "y".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_shortcut_cascades() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;

        let shortcut = store
            .create_shortcut(CreateShortcut {
                user_id: user.id,
                trigger: "@sig".to_string(),
                content: "Best, Jane".to_string(),
            })
            .await
            .unwrap();
        let folder = store
            .create_folder(CreateFolder {
                user_id: user.id,
                name: "Work".to_string(),
            })
            .await
            .unwrap();
        let tag = store.create_tag("email").await.unwrap();

        store
            .add_shortcut_to_folder(folder.id, shortcut.id)
            .await
            .unwrap();
        store.tag_shortcut(shortcut.id, tag.id).await.unwrap();

        assert!(store.delete_shortcut(shortcut.id).await.unwrap());

        // Enrichment lookups return empty sets, not errors
        assert!(store
            .folders_for_shortcut(shortcut.id)
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .tags_for_shortcut(shortcut.id)
            .await
            .unwrap()
            .is_empty());

        // Second delete reports absence
        assert!(!store.delete_shortcut(shortcut.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_tag_cascades_assignments() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;

        let shortcut = store
            .create_shortcut(CreateShortcut {
                user_id: user.id,
                trigger: "@sig".to_string(),
                content: "Best, Jane".to_string(),
            })
            .await
            .unwrap();
        let tag = store.create_tag("email").await.unwrap();
        store.tag_shortcut(shortcut.id, tag.id).await.unwrap();

        assert!(store.delete_tag(tag.id).await.unwrap());
        assert!(store
            .tags_for_shortcut(shortcut.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;

        store
            .create_shortcut(CreateShortcut {
                user_id: user.id,
                trigger: "@Email".to_string(),
                content: "jane@example.com".to_string(),
            })
            .await
            .unwrap();
        store
            .create_shortcut(CreateShortcut {
                user_id: user.id,
                trigger: "@addr".to_string(),
                content: "12 Main St".to_string(),
            })
            .await
            .unwrap();

        let hits = store.search_shortcuts(user.id, "email").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].trigger, "@Email");

        let hits = store.search_shortcuts(user.id, "MAIN").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].trigger, "@addr");
    }

    #[tokio::test]
    async fn test_tag_names_unique() {
        let store = MemoryStore::new();

        let tag = store.create_tag("email").await.unwrap();
        let err = store.create_tag("email").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let other = store.create_tag("work").await.unwrap();
        let err = store.update_tag(other.id, "email").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Renaming a tag to its own name is fine
        let same = store.update_tag(tag.id, "email").await.unwrap().unwrap();
        assert_eq!(same.id, tag.id);
    }

    #[tokio::test]
    async fn test_shared_folder_link_lookup() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "jane@example.com").await;
        let folder = store
            .create_folder(CreateFolder {
                user_id: user.id,
                name: "Work".to_string(),
            })
            .await
            .unwrap();

        let shared = store
            .create_shared_folder(CreateSharedFolder {
                folder_id: folder.id,
                expires_at: None,
            })
            .await
            .unwrap();

        let found = store
            .find_shared_folder(&shared.share_link)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.folder_id, folder.id);

        assert!(store
            .find_shared_folder("no-such-token")
            .await
            .unwrap()
            .is_none());

        // Deleting the folder removes its share records
        store.delete_folder(folder.id).await.unwrap();
        assert!(store
            .find_shared_folder(&shared.share_link)
            .await
            .unwrap()
            .is_none());
    }
}
