/// Data model for the TextGrow system
///
/// This module contains the entity structs persisted by the store,
/// organized by resource:
///
/// - `user`: User accounts and profile preferences
/// - `shortcut`: Text-expansion shortcuts (trigger → content)
/// - `folder`: Per-user folders grouping shortcuts
/// - `tag`: Globally shared tags
/// - `shared_folder`: Share links for folders (no public endpoint yet)

pub mod folder;
pub mod shared_folder;
pub mod shortcut;
pub mod tag;
pub mod user;
