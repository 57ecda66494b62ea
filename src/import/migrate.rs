//! Schema migrations for persisted data.
//!
//! Each step upgrades a workspace from one stored version to the next. Steps
//! are pure functions over [`Workspace`] and run in order at load time until
//! no step matches the current version.

use crate::model::list::{DEFAULT_FOLDER_ID, default_folders, default_lists};
use crate::model::workspace::Workspace;

/// Version written alongside every saved snapshot
pub const CURRENT_VERSION: &str = "2";

/// Name list `5` had before folders existed
const LEGACY_HEALTH_NAME: &str = "Health & Fitness";
const LEGACY_HEALTH_ID: &str = "5";

struct Migration {
    /// `None` matches data saved before versions were recorded
    from: Option<&'static str>,
    to: &'static str,
    apply: fn(&mut Workspace),
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        from: None,
        to: "1",
        apply: split_legacy_tags,
    },
    Migration {
        from: Some("1"),
        to: "2",
        apply: introduce_default_folder,
    },
];

/// Outcome of running the migration chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated {
    /// Version after the last applied step (unchanged if none applied)
    pub version: Option<String>,
    /// Target versions of the steps that ran, in order
    pub applied: Vec<&'static str>,
}

impl Migrated {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Upgrade `ws` from `version` as far as the chain goes.
///
/// Unknown or newer versions are left alone.
pub fn migrate(ws: &mut Workspace, version: Option<&str>) -> Migrated {
    let mut current = version.map(str::to_string);
    let mut applied = Vec::new();
    while let Some(step) = MIGRATIONS.iter().find(|m| m.from == current.as_deref()) {
        (step.apply)(ws);
        tracing::info!(from = ?current, to = step.to, "migrated stored data");
        applied.push(step.to);
        current = Some(step.to.to_string());
    }
    Migrated {
        version: current,
        applied,
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// unversioned -> 1: singular `tag` becomes `tags`, tags are cleaned
fn split_legacy_tags(ws: &mut Workspace) {
    for task in &mut ws.tasks {
        task.normalize();
    }
}

/// 1 -> 2: add the Personal folder, move the legacy health list into it
/// under its new name, and append built-in lists the data lacks
fn introduce_default_folder(ws: &mut Workspace) {
    for folder in default_folders() {
        if ws.find_folder(&folder.id).is_none() {
            ws.folders.push(folder);
        }
    }

    if let Some(list) = ws.find_list_mut(LEGACY_HEALTH_ID)
        && list.name == LEGACY_HEALTH_NAME
    {
        list.name = "Health".to_string();
        list.folder_id = Some(DEFAULT_FOLDER_ID.to_string());
    }

    for list in default_lists() {
        if ws.find_list(&list.id).is_none() {
            ws.lists.push(list);
        }
    }
}
