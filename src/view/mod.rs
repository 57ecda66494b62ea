//! Read-only derivations over a [`Workspace`]: what the main pane shows for
//! a selection, and what the sidebar shows.

pub mod sidebar;

pub use sidebar::*;

use chrono::NaiveDate;

use crate::model::list::{ColorId, MY_DAY_LIST_ID, display_icon};
use crate::model::task::Task;
use crate::model::workspace::{Selection, Workspace};

/// Which My Day group a task falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyDayBucket {
    Today,
    Overdue,
    History,
}

/// Completed first, then anything not planned before today counts as today
/// (including future dates), and the rest is overdue.
pub fn my_day_bucket(task: &Task, today: NaiveDate) -> MyDayBucket {
    if task.completed {
        return MyDayBucket::History;
    }
    match task.my_day_date {
        Some(date) if date < today => MyDayBucket::Overdue,
        _ => MyDayBucket::Today,
    }
}

/// My Day tasks split into disjoint groups, each in task order
#[derive(Debug, Default)]
pub struct MyDayGroups<'a> {
    pub today: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub history: Vec<&'a Task>,
}

/// Title bar information for the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHeader {
    pub title: String,
    pub icon: String,
    pub color: ColorId,
}

/// Everything the main pane needs for one selection
#[derive(Debug)]
pub struct ActiveView<'a> {
    /// The selection actually shown, after falling back from dangling ids
    pub selection: Selection,
    pub header: ViewHeader,
    pub tasks: Vec<&'a Task>,
    /// Present only for the My Day list
    pub my_day: Option<MyDayGroups<'a>>,
    pub completed_count: usize,
    pub total_count: usize,
    pub progress_percent: f64,
    /// Whether drag-reordering is allowed at all in this view
    pub sortable: bool,
}

/// Map a selection onto something that exists. A list id that is gone
/// falls back to the first list.
pub fn resolve_selection(ws: &Workspace, selection: &Selection) -> Selection {
    match selection {
        Selection::Tag(tag) => Selection::Tag(tag.clone()),
        Selection::List(id) if ws.find_list(id).is_some() => Selection::List(id.clone()),
        Selection::List(_) => ws
            .lists
            .first()
            .map(|l| Selection::List(l.id.clone()))
            .unwrap_or_else(Selection::my_day),
    }
}

/// Whether `task` belongs in the view for `selection`
pub fn task_matches(task: &Task, selection: &Selection) -> bool {
    match selection {
        Selection::Tag(tag) => task.has_tag(tag),
        Selection::List(id) if id == MY_DAY_LIST_ID => task.list_id == *id || task.is_my_day,
        Selection::List(id) => task.list_id == *id,
    }
}

/// Tasks visible for `selection`, in global task order
pub fn active_tasks<'a>(ws: &'a Workspace, selection: &Selection) -> Vec<&'a Task> {
    let selection = resolve_selection(ws, selection);
    ws.tasks
        .iter()
        .filter(|t| task_matches(t, &selection))
        .collect()
}

/// Derive the full view for `selection` as of `today`
pub fn resolve_view<'a>(ws: &'a Workspace, selection: &Selection, today: NaiveDate) -> ActiveView<'a> {
    let selection = resolve_selection(ws, selection);
    let tasks: Vec<&Task> = ws
        .tasks
        .iter()
        .filter(|t| task_matches(t, &selection))
        .collect();

    let header = match &selection {
        Selection::Tag(tag) => ViewHeader {
            title: format!("# {}", tag),
            icon: "Hash".to_string(),
            color: ColorId::Slate,
        },
        Selection::List(id) => match ws.find_list(id) {
            Some(list) => ViewHeader {
                title: list.name.clone(),
                icon: display_icon(&list.icon).to_string(),
                color: list.color,
            },
            None => ViewHeader {
                title: String::new(),
                icon: display_icon("").to_string(),
                color: ColorId::Blue,
            },
        },
    };

    let my_day = match &selection {
        Selection::List(id) if id == MY_DAY_LIST_ID => {
            let mut groups = MyDayGroups::default();
            for &task in &tasks {
                match my_day_bucket(task, today) {
                    MyDayBucket::Today => groups.today.push(task),
                    MyDayBucket::Overdue => groups.overdue.push(task),
                    MyDayBucket::History => groups.history.push(task),
                }
            }
            Some(groups)
        }
        _ => None,
    };

    let completed_count = tasks.iter().filter(|t| t.completed).count();
    let total_count = tasks.len();

    ActiveView {
        sortable: matches!(selection, Selection::List(_)),
        selection,
        header,
        tasks,
        my_day,
        completed_count,
        total_count,
        progress_percent: progress_percent(completed_count, total_count),
    }
}

pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Whether dragging `moved_id` onto `target_id` is allowed in the view for
/// `selection`. Tag views never reorder; in My Day only the Today group does.
pub fn can_reorder_task(
    ws: &Workspace,
    selection: &Selection,
    moved_id: &str,
    target_id: &str,
    today: NaiveDate,
) -> bool {
    let selection = resolve_selection(ws, selection);
    if matches!(selection, Selection::Tag(_)) {
        return false;
    }
    let (Some(moved), Some(target)) = (ws.find_task(moved_id), ws.find_task(target_id)) else {
        return false;
    };
    if !task_matches(moved, &selection) || !task_matches(target, &selection) {
        return false;
    }
    if selection.list_id() == Some(MY_DAY_LIST_ID) {
        return my_day_bucket(moved, today) == MyDayBucket::Today
            && my_day_bucket(target, today) == MyDayBucket::Today;
    }
    true
}
