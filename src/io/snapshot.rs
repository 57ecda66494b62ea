use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::import::migrate::{CURRENT_VERSION, Migrated, migrate};
use crate::io::kv::{KeyValueStore, StorageError};
use crate::model::list::{Folder, List, default_folders, default_lists};
use crate::model::tag_category::TagCategory;
use crate::model::task::Task;
use crate::model::workspace::Workspace;

pub const LISTS_KEY: &str = "fundo_lists";
pub const TASKS_KEY: &str = "fundo_todos";
pub const FOLDERS_KEY: &str = "fundo_folders";
pub const CATEGORIES_KEY: &str = "fundo_tag_categories";
pub const VERSION_KEY: &str = "fundo_version";
pub const LAST_FILENAME_KEY: &str = "fundo_last_filename";

/// A stored value that could not be used and was replaced by a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptValue {
    pub key: &'static str,
    pub raw: String,
    pub error: String,
}

/// Everything read from the key-value store at startup
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub workspace: Workspace,
    pub last_filename: Option<String>,
    pub migrated: Migrated,
    /// Values to copy into the recovery log before they get overwritten
    pub corrupt: Vec<CorruptValue>,
    /// Nothing was stored yet
    pub fresh: bool,
}

/// Serialized form of the four collections, compared to skip redundant writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotText {
    pub lists: String,
    pub tasks: String,
    pub folders: String,
    pub tag_categories: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read the persisted snapshot.
///
/// Never fails: missing or unreadable values fall back to the built-in
/// defaults, then stored data is migrated and repaired.
pub fn load_snapshot(kv: &dyn KeyValueStore) -> LoadedSnapshot {
    let mut corrupt = Vec::new();

    let lists: Option<Vec<List>> = read_array(kv, LISTS_KEY, &mut corrupt);
    let tasks: Option<Vec<Task>> = read_array(kv, TASKS_KEY, &mut corrupt);
    let folders: Option<Vec<Folder>> = read_array(kv, FOLDERS_KEY, &mut corrupt);
    let tag_categories: Option<Vec<TagCategory>> = read_array(kv, CATEGORIES_KEY, &mut corrupt);
    let version = read_string(kv, VERSION_KEY);
    let last_filename = read_string(kv, LAST_FILENAME_KEY);

    let fresh = lists.is_none()
        && tasks.is_none()
        && folders.is_none()
        && tag_categories.is_none()
        && version.is_none()
        && corrupt.is_empty();

    if fresh {
        tracing::info!("no stored data, starting from defaults");
        return LoadedSnapshot {
            workspace: Workspace::with_defaults(),
            last_filename,
            migrated: Migrated {
                version: Some(CURRENT_VERSION.to_string()),
                applied: Vec::new(),
            },
            corrupt,
            fresh,
        };
    }

    let lists = lists.filter(|l| !l.is_empty()).unwrap_or_else(|| {
        tracing::warn!("stored lists missing or empty, using defaults");
        default_lists()
    });
    let folders = folders.unwrap_or_else(|| {
        if version.is_none() {
            Vec::new()
        } else {
            default_folders()
        }
    });

    let mut workspace = Workspace {
        lists,
        tasks: tasks.unwrap_or_default(),
        folders,
        tag_categories: tag_categories.unwrap_or_default(),
    };
    let migrated = migrate(&mut workspace, version.as_deref());
    workspace.repair();

    LoadedSnapshot {
        workspace,
        last_filename,
        migrated,
        corrupt,
        fresh,
    }
}

/// `None` if the key is absent, unreadable or corrupt. Corrupt raw values
/// are collected so the caller can preserve them.
fn read_array<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &'static str,
    corrupt: &mut Vec<CorruptValue>,
) -> Option<Vec<T>> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored value");
            return None;
        }
    };
    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is corrupt, using defaults");
            corrupt.push(CorruptValue {
                key,
                raw,
                error: e.to_string(),
            });
            None
        }
    }
}

fn read_string(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored value");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

pub fn encode_snapshot(ws: &Workspace) -> Result<SnapshotText, StorageError> {
    Ok(SnapshotText {
        lists: encode(LISTS_KEY, &ws.lists)?,
        tasks: encode(TASKS_KEY, &ws.tasks)?,
        folders: encode(FOLDERS_KEY, &ws.folders)?,
        tag_categories: encode(CATEGORIES_KEY, &ws.tag_categories)?,
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_string(),
        source: e,
    })
}

/// Write all four collections and the current version.
/// Each key fully replaces its previous value.
pub fn write_snapshot(kv: &mut dyn KeyValueStore, text: &SnapshotText) -> Result<(), StorageError> {
    kv.set(LISTS_KEY, &text.lists)?;
    kv.set(TASKS_KEY, &text.tasks)?;
    kv.set(FOLDERS_KEY, &text.folders)?;
    kv.set(CATEGORIES_KEY, &text.tag_categories)?;
    kv.set(VERSION_KEY, CURRENT_VERSION)?;
    Ok(())
}

pub fn save_snapshot(kv: &mut dyn KeyValueStore, ws: &Workspace) -> Result<(), StorageError> {
    write_snapshot(kv, &encode_snapshot(ws)?)
}

pub fn save_last_filename(kv: &mut dyn KeyValueStore, name: &str) -> Result<(), StorageError> {
    kv.set(LAST_FILENAME_KEY, name)
}
