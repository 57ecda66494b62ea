//! The exchanged JSON file: backups, single-list exports and archives.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::list::{Folder, List};
use crate::model::tag_category::TagCategory;
use crate::model::task::Task;
use crate::model::workspace::Workspace;
use crate::util::time::date_stamp;

/// Version of the file format (not of the stored schema)
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("file has no lists to restore")]
    MissingLists,
    #[error("expected an array of tasks")]
    NotTaskArray,
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("nothing is waiting to be imported")]
    NothingStaged,
    #[error("local changes must be saved before applying the import")]
    UnsavedChanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    #[serde(rename = "fundo-backup")]
    Backup,
    #[serde(rename = "fundo-list-export")]
    ListExport,
    #[serde(rename = "fundo-archive")]
    Archive,
    #[serde(other)]
    Unknown,
}

/// On-disk shape of an exchanged file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeFile {
    #[serde(default = "format_version")]
    pub version: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExportKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default, alias = "tasks")]
    pub todos: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<Folder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_categories: Option<Vec<TagCategory>>,
}

fn format_version() -> u32 {
    FORMAT_VERSION
}

impl ExchangeFile {
    fn new(kind: ExportKind) -> Self {
        ExchangeFile {
            version: FORMAT_VERSION,
            kind: Some(kind),
            timestamp: None,
            export_date: None,
            lists: Vec::new(),
            todos: Vec::new(),
            folders: None,
            tag_categories: None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Full restore
// ---------------------------------------------------------------------------

/// Parse and validate a file for a full restore.
///
/// The file must be a JSON object with a non-empty `lists` array. The
/// result is repaired (legacy tags, dangling references) but keeps ids.
pub fn parse_restore(text: &str) -> Result<Workspace, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let lists_present = value
        .get("lists")
        .and_then(|l| l.as_array())
        .is_some_and(|l| !l.is_empty());
    if !lists_present {
        return Err(ImportError::MissingLists);
    }
    let file: ExchangeFile = serde_json::from_value(value)?;

    let mut ws = Workspace {
        lists: file.lists,
        tasks: file.todos,
        folders: file.folders.unwrap_or_default(),
        tag_categories: file.tag_categories.unwrap_or_default(),
    };
    ws.repair();
    Ok(ws)
}

// ---------------------------------------------------------------------------
// Partial import
// ---------------------------------------------------------------------------

/// A task-like object from a single-list import. Ids and list ids in the
/// file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_my_day: bool,
    #[serde(default)]
    pub my_day_date: Option<NaiveDate>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

/// Parse task records from a bare array or from the `todos`/`tasks` field
/// of an exchanged file.
pub fn parse_task_records(text: &str) -> Result<Vec<TaskRecord>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let array = match value {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(mut map) => map
            .remove("todos")
            .or_else(|| map.remove("tasks"))
            .filter(|v| v.is_array())
            .ok_or(ImportError::NotTaskArray)?,
        _ => return Err(ImportError::NotTaskArray),
    };
    Ok(serde_json::from_value(array)?)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Everything, for a later full restore
pub fn backup(ws: &Workspace, now: DateTime<Local>) -> ExchangeFile {
    ExchangeFile {
        timestamp: Some(now.to_rfc3339()),
        lists: ws.lists.clone(),
        todos: ws.tasks.clone(),
        folders: Some(ws.folders.clone()),
        tag_categories: Some(ws.tag_categories.clone()),
        ..ExchangeFile::new(ExportKind::Backup)
    }
}

/// One list and the tasks on it
pub fn list_export(
    ws: &Workspace,
    list_id: &str,
    now: DateTime<Local>,
) -> Result<ExchangeFile, ImportError> {
    let list = ws
        .find_list(list_id)
        .ok_or_else(|| ImportError::ListNotFound(list_id.to_string()))?;
    Ok(ExchangeFile {
        export_date: Some(now.to_rfc3339()),
        lists: vec![list.clone()],
        todos: ws
            .tasks
            .iter()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect(),
        ..ExchangeFile::new(ExportKind::ListExport)
    })
}

/// Completed tasks and the lists they sit on
pub fn archive(ws: &Workspace, now: DateTime<Local>) -> ExchangeFile {
    let todos: Vec<Task> = ws.tasks.iter().filter(|t| t.completed).cloned().collect();
    let lists = ws
        .lists
        .iter()
        .filter(|l| todos.iter().any(|t| t.list_id == l.id))
        .cloned()
        .collect();
    ExchangeFile {
        timestamp: Some(now.to_rfc3339()),
        lists,
        todos,
        ..ExchangeFile::new(ExportKind::Archive)
    }
}

pub fn backup_filename(now: DateTime<Local>) -> String {
    format!("fundo-backup-{}.json", date_stamp(now))
}

pub fn archive_filename(now: DateTime<Local>) -> String {
    format!("fundo-archive-{}.json", date_stamp(now))
}

/// `<list name>.json` with path separators replaced
pub fn list_filename(list: &List) -> String {
    let name: String = list
        .name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    let name = name.trim();
    if name.is_empty() {
        "list.json".to_string()
    } else {
        format!("{name}.json")
    }
}
