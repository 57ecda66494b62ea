use crate::model::list::MY_DAY_LIST_ID;
use crate::model::workspace::Workspace;
use crate::ops::tag_ops::{TagError, move_tag_to_category};

/// Error type for drag-style reorder and reparent operations
#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot reorder across folders; drop onto the folder instead")]
    CrossScope,
    #[error("reordering is disabled {0}")]
    Disabled(&'static str),
    #[error("tag error: {0}")]
    Tag(#[from] TagError),
}

/// Where a dragged list was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDropTarget {
    /// Another list in the same scope: take its position
    List(String),
    /// A folder header: move into that folder
    Folder(String),
    /// The root area outside any folder
    Root,
}

/// Where a dragged tag was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDropTarget {
    Category(String),
    Uncategorized,
}

/// Remove the element at `from` and reinsert it at `to`
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Move task `moved_id` to the position `target_id` holds in the global
/// task order.
pub fn reorder_tasks(ws: &mut Workspace, moved_id: &str, target_id: &str) -> Result<(), ReorderError> {
    let from = position(&ws.tasks, |t| t.id == moved_id, moved_id)?;
    let to = position(&ws.tasks, |t| t.id == target_id, target_id)?;
    array_move(&mut ws.tasks, from, to);
    Ok(())
}

/// Move list `moved_id` to the position of `target_id`; both must share
/// a folder (or both be at the root).
pub fn reorder_lists(ws: &mut Workspace, moved_id: &str, target_id: &str) -> Result<(), ReorderError> {
    let from = position(&ws.lists, |l| l.id == moved_id, moved_id)?;
    let to = position(&ws.lists, |l| l.id == target_id, target_id)?;
    if ws.lists[from].folder_id != ws.lists[to].folder_id {
        return Err(ReorderError::CrossScope);
    }
    array_move(&mut ws.lists, from, to);
    Ok(())
}

/// Apply a list drop. Dropping onto a folder reparents the list and
/// expands the folder instead of reordering.
pub fn drop_list(ws: &mut Workspace, moved_id: &str, target: &ListDropTarget) -> Result<(), ReorderError> {
    match target {
        ListDropTarget::List(target_id) => reorder_lists(ws, moved_id, target_id),
        ListDropTarget::Folder(folder_id) => {
            if moved_id == MY_DAY_LIST_ID {
                return Err(ReorderError::Disabled("for My Day"));
            }
            if ws.find_folder(folder_id).is_none() {
                return Err(ReorderError::NotFound(folder_id.clone()));
            }
            let list = ws
                .find_list_mut(moved_id)
                .ok_or_else(|| ReorderError::NotFound(moved_id.to_string()))?;
            list.folder_id = Some(folder_id.clone());
            if let Some(folder) = ws.find_folder_mut(folder_id) {
                folder.is_expanded = true;
            }
            Ok(())
        }
        ListDropTarget::Root => {
            let list = ws
                .find_list_mut(moved_id)
                .ok_or_else(|| ReorderError::NotFound(moved_id.to_string()))?;
            list.folder_id = None;
            Ok(())
        }
    }
}

/// Apply a tag drop onto a category or the uncategorized area
pub fn drop_tag(ws: &mut Workspace, tag: &str, target: &TagDropTarget) -> Result<(), ReorderError> {
    let category = match target {
        TagDropTarget::Category(id) => Some(id.as_str()),
        TagDropTarget::Uncategorized => None,
    };
    move_tag_to_category(ws, tag, category)?;
    Ok(())
}

fn position<T>(items: &[T], pred: impl Fn(&T) -> bool, id: &str) -> Result<usize, ReorderError> {
    items
        .iter()
        .position(pred)
        .ok_or_else(|| ReorderError::NotFound(id.to_string()))
}
