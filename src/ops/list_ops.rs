use crate::model::list::{ColorId, Folder, List, MY_DAY_LIST_ID};
use crate::model::workspace::Workspace;
use crate::ops::task_ops::new_id;

/// Error type for list and folder operations
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("list not found: {0}")]
    NotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("name is empty")]
    EmptyName,
    #[error("the My Day list cannot be {0}")]
    MyDayProtected(&'static str),
    #[error("you need at least one list")]
    LastList,
}

/// Result of deleting a list
#[derive(Debug)]
pub struct DeletedList {
    pub list: List,
    /// Number of tasks removed with it
    pub removed_tasks: usize,
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Append a new list. Returns its id.
pub fn create_list(
    ws: &mut Workspace,
    name: &str,
    color: ColorId,
    icon: &str,
    folder_id: Option<&str>,
) -> Result<String, ListError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ListError::EmptyName);
    }
    if let Some(fid) = folder_id
        && ws.find_folder(fid).is_none()
    {
        return Err(ListError::FolderNotFound(fid.to_string()));
    }

    let id = new_id();
    let mut list = List::new(&id, name, color, icon);
    list.folder_id = folder_id.map(str::to_string);
    ws.lists.push(list);
    Ok(id)
}

/// Remove a list and every task on it.
///
/// My Day is permanent and the last remaining list can't go either.
pub fn delete_list(ws: &mut Workspace, id: &str) -> Result<DeletedList, ListError> {
    if id == MY_DAY_LIST_ID {
        return Err(ListError::MyDayProtected("deleted"));
    }
    let idx = ws
        .lists
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| ListError::NotFound(id.to_string()))?;
    if ws.lists.len() <= 1 {
        return Err(ListError::LastList);
    }

    let list = ws.lists.remove(idx);
    let before = ws.tasks.len();
    ws.tasks.retain(|t| t.list_id != id);
    Ok(DeletedList {
        list,
        removed_tasks: before - ws.tasks.len(),
    })
}

pub fn rename_list(ws: &mut Workspace, id: &str, new_name: &str) -> Result<(), ListError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ListError::EmptyName);
    }
    let list = ws
        .find_list_mut(id)
        .ok_or_else(|| ListError::NotFound(id.to_string()))?;
    list.name = new_name.to_string();
    Ok(())
}

/// Change a list's color and/or icon
pub fn update_list_style(
    ws: &mut Workspace,
    id: &str,
    color: Option<ColorId>,
    icon: Option<&str>,
) -> Result<(), ListError> {
    let list = ws
        .find_list_mut(id)
        .ok_or_else(|| ListError::NotFound(id.to_string()))?;
    if let Some(color) = color {
        list.color = color;
    }
    if let Some(icon) = icon {
        list.icon = icon.to_string();
    }
    Ok(())
}

/// Put a list into a folder, or back at the root with `None`
pub fn move_list_to_folder(
    ws: &mut Workspace,
    list_id: &str,
    folder_id: Option<&str>,
) -> Result<(), ListError> {
    if list_id == MY_DAY_LIST_ID && folder_id.is_some() {
        return Err(ListError::MyDayProtected("put in a folder"));
    }
    if let Some(fid) = folder_id
        && ws.find_folder(fid).is_none()
    {
        return Err(ListError::FolderNotFound(fid.to_string()));
    }
    let list = ws
        .find_list_mut(list_id)
        .ok_or_else(|| ListError::NotFound(list_id.to_string()))?;
    list.folder_id = folder_id.map(str::to_string);
    Ok(())
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

pub fn create_folder(
    ws: &mut Workspace,
    name: &str,
    color: ColorId,
    icon: &str,
) -> Result<String, ListError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ListError::EmptyName);
    }
    let id = new_id();
    ws.folders.push(Folder {
        id: id.clone(),
        name: name.to_string(),
        color,
        icon: icon.to_string(),
        is_expanded: true,
    });
    Ok(id)
}

/// Remove a folder. Member lists move to the root; no list is deleted.
/// Returns the number of lists released.
pub fn delete_folder(ws: &mut Workspace, id: &str) -> Result<usize, ListError> {
    let idx = ws
        .folders
        .iter()
        .position(|f| f.id == id)
        .ok_or_else(|| ListError::FolderNotFound(id.to_string()))?;
    ws.folders.remove(idx);

    let mut released = 0;
    for list in ws.lists.iter_mut() {
        if list.folder_id.as_deref() == Some(id) {
            list.folder_id = None;
            released += 1;
        }
    }
    Ok(released)
}

pub fn rename_folder(ws: &mut Workspace, id: &str, new_name: &str) -> Result<(), ListError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ListError::EmptyName);
    }
    let folder = ws
        .find_folder_mut(id)
        .ok_or_else(|| ListError::FolderNotFound(id.to_string()))?;
    folder.name = new_name.to_string();
    Ok(())
}

/// Returns the new expanded state
pub fn toggle_folder_expanded(ws: &mut Workspace, id: &str) -> Result<bool, ListError> {
    let folder = ws
        .find_folder_mut(id)
        .ok_or_else(|| ListError::FolderNotFound(id.to_string()))?;
    folder.is_expanded = !folder.is_expanded;
    Ok(folder.is_expanded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
