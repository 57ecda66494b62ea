use chrono::{DateTime, Local, NaiveDate};
use uuid::Uuid;

use crate::model::list::MY_DAY_LIST_ID;
use crate::model::task::Task;
use crate::model::workspace::Workspace;
use crate::parse::{TagMode, parse_text_and_tags};
use crate::util::time::millis;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("task text is empty")]
    EmptyText,
}

/// Fresh opaque id for any entity
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Create a task from entered text and prepend it to the task collection.
///
/// Hashtags are pulled out of the text into `tags`. A target list that no
/// longer exists falls back to the default list. Adding to My Day plans the
/// task for today. Returns the new task's id.
pub fn add_task(
    ws: &mut Workspace,
    input: &str,
    target_list_id: &str,
    mode: TagMode,
    now: DateTime<Local>,
) -> Result<String, TaskError> {
    if input.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }

    let (mut text, tags) = parse_text_and_tags(input, mode);
    if text.is_empty() {
        // Only hashtags were typed: keep them visible as the text too
        text = input.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let list_id = if ws.find_list(target_list_id).is_some() {
        target_list_id.to_string()
    } else {
        ws.default_list_id()
            .map(str::to_string)
            .ok_or_else(|| TaskError::ListNotFound(target_list_id.to_string()))?
    };

    let id = new_id();
    let mut task = Task::new(id.clone(), text, list_id, millis(now));
    task.set_tags(tags);
    if task.list_id == MY_DAY_LIST_ID {
        task.is_my_day = true;
        task.my_day_date = Some(now.date_naive());
    }

    ws.tasks.insert(0, task);
    Ok(id)
}

// ---------------------------------------------------------------------------
// Field mutations
// ---------------------------------------------------------------------------

/// Flip completion; stamps or clears `completedAt`. Returns the new state.
pub fn toggle_task(ws: &mut Workspace, id: &str, now: DateTime<Local>) -> Result<bool, TaskError> {
    let task = find_mut(ws, id)?;
    task.completed = !task.completed;
    task.completed_at = task.completed.then(|| millis(now));
    Ok(task.completed)
}

pub fn set_important(ws: &mut Workspace, id: &str, value: bool) -> Result<(), TaskError> {
    find_mut(ws, id)?.is_important = value;
    Ok(())
}

pub fn set_tags(ws: &mut Workspace, id: &str, tags: &[String]) -> Result<(), TaskError> {
    find_mut(ws, id)?.set_tags(tags);
    Ok(())
}

pub fn add_tag(ws: &mut Workspace, id: &str, tag: &str) -> Result<(), TaskError> {
    let task = find_mut(ws, id)?;
    let mut tags = task.tags.clone();
    tags.push(tag.to_string());
    task.set_tags(tags);
    Ok(())
}

pub fn remove_tag(ws: &mut Workspace, id: &str, tag: &str) -> Result<(), TaskError> {
    let task = find_mut(ws, id)?;
    let tag = tag.trim_start_matches('#');
    let tags: Vec<String> = task.tags.iter().filter(|t| *t != tag).cloned().collect();
    task.set_tags(tags);
    Ok(())
}

/// Replace the text. Newly typed hashtags merge into the tag set, or in
/// single-tag mode replace it.
pub fn edit_text(
    ws: &mut Workspace,
    id: &str,
    input: &str,
    mode: TagMode,
) -> Result<(), TaskError> {
    if input.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    let (text, new_tags) = parse_text_and_tags(input, mode);
    let task = find_mut(ws, id)?;
    if !text.is_empty() {
        task.text = text;
    }
    match mode {
        TagMode::Multi => {
            let mut tags = task.tags.clone();
            tags.extend(new_tags);
            task.set_tags(tags);
        }
        // single-tag schema: a new hashtag replaces the tag
        TagMode::LegacySingle if !new_tags.is_empty() => task.set_tags(new_tags),
        TagMode::LegacySingle => {}
    }
    Ok(())
}

/// Set or clear (blank text) the note
pub fn set_note(ws: &mut Workspace, id: &str, note: &str) -> Result<(), TaskError> {
    let task = find_mut(ws, id)?;
    task.notes = if note.trim().is_empty() {
        None
    } else {
        Some(note.to_string())
    };
    Ok(())
}

pub fn move_task_to_list(ws: &mut Workspace, id: &str, list_id: &str) -> Result<(), TaskError> {
    if ws.find_list(list_id).is_none() {
        return Err(TaskError::ListNotFound(list_id.to_string()));
    }
    find_mut(ws, id)?.list_id = list_id.to_string();
    Ok(())
}

pub fn delete_task(ws: &mut Workspace, id: &str) -> Result<Task, TaskError> {
    let idx = ws
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    Ok(ws.tasks.remove(idx))
}

// ---------------------------------------------------------------------------
// My Day
// ---------------------------------------------------------------------------

/// Pin to / unpin from My Day. Returns the new `isMyDay`.
pub fn toggle_my_day(ws: &mut Workspace, id: &str, today: NaiveDate) -> Result<bool, TaskError> {
    let task = find_mut(ws, id)?;
    task.is_my_day = !task.is_my_day;
    task.my_day_date = task.is_my_day.then_some(today);
    Ok(task.is_my_day)
}

/// Move every incomplete My Day task planned before `today` onto today.
/// Returns how many tasks changed.
pub fn reassign_overdue_to_today(ws: &mut Workspace, today: NaiveDate) -> usize {
    let mut moved = 0;
    for task in ws.tasks.iter_mut() {
        if task.is_my_day
            && !task.completed
            && let Some(date) = task.my_day_date
            && date < today
        {
            task.my_day_date = Some(today);
            moved += 1;
        }
    }
    moved
}

fn find_mut<'a>(ws: &'a mut Workspace, id: &str) -> Result<&'a mut Task, TaskError> {
    ws.find_task_mut(id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
