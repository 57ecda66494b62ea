//! The entity store: owns the workspace, the current selection and the
//! dirty flag, and is the only thing that mutates them.

use chrono::NaiveDate;

use crate::import::payload::{ImportError, TaskRecord};
use crate::import::reconcile::{ImportSummary, import_into_list};
use crate::model::list::ColorId;
use crate::model::tag_category::TagCategory;
use crate::model::task::Task;
use crate::model::workspace::{Selection, Workspace};
use crate::ops::list_ops::{self, DeletedList, ListError};
use crate::ops::reorder::{self, ListDropTarget, ReorderError, TagDropTarget};
use crate::ops::tag_ops::{self, TagError, clean_tag};
use crate::ops::task_ops::{self, TaskError};
use crate::parse::TagMode;
use crate::util::time;
use crate::view::{self, ActiveView};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// What changed, queued for the host to drain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    TasksChanged,
    ListsChanged,
    FoldersChanged,
    CategoriesChanged,
    SelectionChanged,
    /// The whole workspace was swapped out by an import
    Replaced,
}

#[derive(Debug)]
pub struct EntityStore {
    ws: Workspace,
    selection: Selection,
    /// List that receives tasks added while a tag is selected
    last_list_id: String,
    dirty: bool,
    revision: u64,
    events: Vec<StoreEvent>,
    /// How hashtags in entered text are read
    tag_mode: TagMode,
}

impl EntityStore {
    pub fn new(ws: Workspace) -> Self {
        let selection = view::resolve_selection(&ws, &Selection::my_day());
        let last_list_id = selection.list_id().unwrap_or_default().to_string();
        EntityStore {
            ws,
            selection,
            last_list_id,
            dirty: false,
            revision: 0,
            events: Vec::new(),
            tag_mode: TagMode::default(),
        }
    }

    pub fn tag_mode(&self) -> TagMode {
        self.tag_mode
    }

    pub fn set_tag_mode(&mut self, mode: TagMode) {
        self.tag_mode = mode;
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Bumped by every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Take queued events, oldest first, with repeats collapsed
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.dedup();
        events
    }

    fn changed(&mut self, event: StoreEvent) {
        self.dirty = true;
        self.revision += 1;
        self.events.push(event);
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection == selection {
            return;
        }
        if let Selection::List(id) = &selection {
            self.last_list_id = id.clone();
        }
        self.selection = selection;
        self.events.push(StoreEvent::SelectionChanged);
    }

    /// Swap in a whole new workspace. Selection moves to the first list and
    /// the result counts as saved.
    pub fn replace_all(&mut self, ws: Workspace) {
        self.ws = ws;
        let first = self
            .ws
            .lists
            .first()
            .map(|l| Selection::List(l.id.clone()))
            .unwrap_or_else(Selection::my_day);
        self.set_selection(first);
        self.revision += 1;
        self.dirty = false;
        self.events.push(StoreEvent::Replaced);
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn view_on(&self, today: NaiveDate) -> ActiveView<'_> {
        view::resolve_view(&self.ws, &self.selection, today)
    }

    pub fn current_view(&self) -> ActiveView<'_> {
        self.view_on(time::today())
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select_list(&mut self, id: &str) -> Result<(), StoreError> {
        if self.ws.find_list(id).is_none() {
            return Err(ListError::NotFound(id.to_string()).into());
        }
        self.set_selection(Selection::List(id.to_string()));
        Ok(())
    }

    pub fn select_tag(&mut self, tag: &str) -> Result<(), StoreError> {
        let tag = clean_tag(tag);
        if tag.is_empty() {
            return Err(TagError::EmptyName.into());
        }
        self.set_selection(Selection::Tag(tag.to_string()));
        Ok(())
    }

    /// Move the selection off lists or tags that no longer exist
    fn fix_selection(&mut self) {
        let resolved = view::resolve_selection(&self.ws, &self.selection);
        self.set_selection(resolved);
        if self.ws.find_list(&self.last_list_id).is_none() {
            self.last_list_id = self
                .ws
                .default_list_id()
                .unwrap_or_default()
                .to_string();
        }
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn add_task(&mut self, text: &str, list_id: &str) -> Result<String, StoreError> {
        let id = task_ops::add_task(&mut self.ws, text, list_id, self.tag_mode, time::now())?;
        self.changed(StoreEvent::TasksChanged);
        Ok(id)
    }

    /// Add to whatever is shown. With a tag selected the task goes to the
    /// last selected list and carries that tag.
    pub fn add_task_to_selection(&mut self, text: &str) -> Result<String, StoreError> {
        match self.selection.clone() {
            Selection::List(list_id) => self.add_task(text, &list_id),
            Selection::Tag(tag) => {
                let list_id = self.last_list_id.clone();
                let id =
                    task_ops::add_task(&mut self.ws, text, &list_id, self.tag_mode, time::now())?;
                task_ops::add_tag(&mut self.ws, &id, &tag)?;
                self.changed(StoreEvent::TasksChanged);
                Ok(id)
            }
        }
    }

    /// Returns the new completed state
    pub fn toggle_task(&mut self, id: &str) -> Result<bool, StoreError> {
        let completed = task_ops::toggle_task(&mut self.ws, id, time::now())?;
        self.changed(StoreEvent::TasksChanged);
        Ok(completed)
    }

    pub fn set_important(&mut self, id: &str, value: bool) -> Result<(), StoreError> {
        task_ops::set_important(&mut self.ws, id, value)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn set_tags(&mut self, id: &str, tags: &[String]) -> Result<(), StoreError> {
        task_ops::set_tags(&mut self.ws, id, tags)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError> {
        task_ops::add_tag(&mut self.ws, id, tag)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn remove_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError> {
        task_ops::remove_tag(&mut self.ws, id, tag)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn edit_text(&mut self, id: &str, text: &str) -> Result<(), StoreError> {
        task_ops::edit_text(&mut self.ws, id, text, self.tag_mode)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn set_note(&mut self, id: &str, note: &str) -> Result<(), StoreError> {
        task_ops::set_note(&mut self.ws, id, note)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn move_task_to_list(&mut self, id: &str, list_id: &str) -> Result<(), StoreError> {
        task_ops::move_task_to_list(&mut self.ws, id, list_id)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task, StoreError> {
        let task = task_ops::delete_task(&mut self.ws, id)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(task)
    }

    /// Returns whether the task is now in My Day
    pub fn toggle_my_day(&mut self, id: &str) -> Result<bool, StoreError> {
        let on = task_ops::toggle_my_day(&mut self.ws, id, time::today())?;
        self.changed(StoreEvent::TasksChanged);
        Ok(on)
    }

    /// Returns how many overdue tasks were moved to today
    pub fn reassign_overdue_to_today(&mut self) -> usize {
        let moved = task_ops::reassign_overdue_to_today(&mut self.ws, time::today());
        if moved > 0 {
            self.changed(StoreEvent::TasksChanged);
        }
        moved
    }

    /// Merge task records into the selected list (or the last selected list
    /// while a tag is shown). New ids are always assigned.
    pub fn import_tasks(&mut self, records: Vec<TaskRecord>) -> Result<ImportSummary, StoreError> {
        let list_id = self
            .selection
            .list_id()
            .unwrap_or(self.last_list_id.as_str())
            .to_string();
        let summary = import_into_list(&mut self.ws, records, &list_id, time::now())?;
        if summary.imported > 0 {
            self.changed(StoreEvent::TasksChanged);
        }
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Lists and folders
    // -----------------------------------------------------------------------

    pub fn create_list(
        &mut self,
        name: &str,
        color: ColorId,
        icon: &str,
        folder_id: Option<&str>,
    ) -> Result<String, StoreError> {
        let id = list_ops::create_list(&mut self.ws, name, color, icon, folder_id)?;
        self.changed(StoreEvent::ListsChanged);
        Ok(id)
    }

    pub fn delete_list(&mut self, id: &str) -> Result<DeletedList, StoreError> {
        let deleted = list_ops::delete_list(&mut self.ws, id)?;
        self.changed(StoreEvent::ListsChanged);
        if deleted.removed_tasks > 0 {
            self.changed(StoreEvent::TasksChanged);
        }
        self.fix_selection();
        Ok(deleted)
    }

    pub fn rename_list(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        list_ops::rename_list(&mut self.ws, id, name)?;
        self.changed(StoreEvent::ListsChanged);
        Ok(())
    }

    pub fn update_list(
        &mut self,
        id: &str,
        color: Option<ColorId>,
        icon: Option<&str>,
    ) -> Result<(), StoreError> {
        list_ops::update_list_style(&mut self.ws, id, color, icon)?;
        self.changed(StoreEvent::ListsChanged);
        Ok(())
    }

    pub fn move_list_to_folder(
        &mut self,
        list_id: &str,
        folder_id: Option<&str>,
    ) -> Result<(), StoreError> {
        list_ops::move_list_to_folder(&mut self.ws, list_id, folder_id)?;
        self.changed(StoreEvent::ListsChanged);
        Ok(())
    }

    pub fn create_folder(&mut self, name: &str, color: ColorId, icon: &str) -> Result<String, StoreError> {
        let id = list_ops::create_folder(&mut self.ws, name, color, icon)?;
        self.changed(StoreEvent::FoldersChanged);
        Ok(id)
    }

    /// Returns the number of lists moved back to the root
    pub fn delete_folder(&mut self, id: &str) -> Result<usize, StoreError> {
        let released = list_ops::delete_folder(&mut self.ws, id)?;
        self.changed(StoreEvent::FoldersChanged);
        if released > 0 {
            self.changed(StoreEvent::ListsChanged);
        }
        Ok(released)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        list_ops::rename_folder(&mut self.ws, id, name)?;
        self.changed(StoreEvent::FoldersChanged);
        Ok(())
    }

    pub fn toggle_folder_expanded(&mut self, id: &str) -> Result<bool, StoreError> {
        let expanded = list_ops::toggle_folder_expanded(&mut self.ws, id)?;
        self.changed(StoreEvent::FoldersChanged);
        Ok(expanded)
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    pub fn create_tag_category(&mut self, name: &str) -> Result<String, StoreError> {
        let id = tag_ops::create_tag_category(&mut self.ws, name)?;
        self.changed(StoreEvent::CategoriesChanged);
        Ok(id)
    }

    pub fn delete_tag_category(&mut self, id: &str) -> Result<TagCategory, StoreError> {
        let removed = tag_ops::delete_tag_category(&mut self.ws, id)?;
        self.changed(StoreEvent::CategoriesChanged);
        Ok(removed)
    }

    pub fn rename_tag_category(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        tag_ops::rename_tag_category(&mut self.ws, id, name)?;
        self.changed(StoreEvent::CategoriesChanged);
        Ok(())
    }

    pub fn move_tag_to_category(&mut self, tag: &str, category_id: Option<&str>) -> Result<(), StoreError> {
        tag_ops::move_tag_to_category(&mut self.ws, tag, category_id)?;
        self.changed(StoreEvent::CategoriesChanged);
        Ok(())
    }

    fn tag_is_filed(&self, tag: &str) -> bool {
        let tag = clean_tag(tag);
        self.ws.tag_categories.iter().any(|c| c.contains(tag))
    }

    /// Only real edits count as changes; a tag nobody carries stays clean
    fn tag_edit_events(&mut self, tasks_changed: usize, categories_changed: bool) {
        if tasks_changed > 0 {
            self.changed(StoreEvent::TasksChanged);
        }
        if categories_changed {
            self.changed(StoreEvent::CategoriesChanged);
        }
    }

    /// Rename a tag everywhere. A selected tag stays selected under its new
    /// name. Returns how many tasks changed.
    pub fn rename_tag(&mut self, old: &str, new: &str) -> Result<usize, StoreError> {
        let filed = self.tag_is_filed(old);
        let changed = tag_ops::rename_tag(&mut self.ws, old, new)?;
        self.tag_edit_events(changed, filed && clean_tag(old) != clean_tag(new));
        if self.selection.tag() == Some(clean_tag(old)) {
            self.set_selection(Selection::Tag(clean_tag(new).to_string()));
        }
        Ok(changed)
    }

    /// Remove a tag from every task and category. A selected tag falls back
    /// to the last selected list.
    pub fn delete_tag(&mut self, tag: &str) -> usize {
        let filed = self.tag_is_filed(tag);
        let changed = tag_ops::delete_tag(&mut self.ws, tag);
        self.tag_edit_events(changed, filed);
        if self.selection.tag() == Some(clean_tag(tag)) {
            let fallback = Selection::List(self.last_list_id.clone());
            self.set_selection(view::resolve_selection(&self.ws, &fallback));
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Reordering
    // -----------------------------------------------------------------------

    /// Drag `moved_id` onto `target_id` in the current view
    pub fn reorder_task(&mut self, moved_id: &str, target_id: &str) -> Result<(), StoreError> {
        if !view::can_reorder_task(&self.ws, &self.selection, moved_id, target_id, time::today()) {
            return Err(ReorderError::Disabled("in this view").into());
        }
        reorder::reorder_tasks(&mut self.ws, moved_id, target_id)?;
        self.changed(StoreEvent::TasksChanged);
        Ok(())
    }

    pub fn drop_list(&mut self, moved_id: &str, target: &ListDropTarget) -> Result<(), StoreError> {
        reorder::drop_list(&mut self.ws, moved_id, target)?;
        self.changed(StoreEvent::ListsChanged);
        if matches!(target, ListDropTarget::Folder(_)) {
            self.changed(StoreEvent::FoldersChanged);
        }
        Ok(())
    }

    pub fn drop_tag(&mut self, tag: &str, target: &TagDropTarget) -> Result<(), StoreError> {
        reorder::drop_tag(&mut self.ws, tag, target)?;
        self.changed(StoreEvent::CategoriesChanged);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::list::MY_DAY_LIST_ID;
    use pretty_assertions::assert_eq;

    fn store() -> EntityStore {
        EntityStore::new(Workspace::with_defaults())
    }

    #[test]
    fn starts_on_my_day_clean() {
        let s = store();
        assert_eq!(s.selection(), &Selection::my_day());
        assert!(!s.is_dirty());
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn mutation_marks_dirty_and_queues_event() {
        let mut s = store();
        let id = s.add_task("Buy milk #errand #urgent", "2").unwrap();
        assert!(s.is_dirty());
        assert_eq!(s.revision(), 1);
        assert_eq!(s.drain_events(), vec![StoreEvent::TasksChanged]);
        assert!(s.drain_events().is_empty());

        let task = s.workspace().find_task(&id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.tags, vec!["errand", "urgent"]);

        s.mark_saved();
        assert!(!s.is_dirty());
    }

    #[test]
    fn failed_mutation_changes_nothing() {
        let mut s = store();
        assert!(matches!(
            s.add_task("   ", "2"),
            Err(StoreError::Task(TaskError::EmptyText))
        ));
        assert!(s.toggle_task("nope").is_err());
        assert!(!s.is_dirty());
        assert_eq!(s.revision(), 0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn toggle_twice_clears_completed_at() {
        let mut s = store();
        let id = s.add_task("Walk", "2").unwrap();
        assert!(s.toggle_task(&id).unwrap());
        assert!(s.workspace().find_task(&id).unwrap().completed_at.is_some());
        assert!(!s.toggle_task(&id).unwrap());
        let task = s.workspace().find_task(&id).unwrap();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn adding_in_tag_view_uses_last_list_and_tag() {
        let mut s = store();
        s.select_list("3").unwrap();
        s.select_tag("#errand").unwrap();
        let id = s.add_task_to_selection("Stamps").unwrap();
        let task = s.workspace().find_task(&id).unwrap();
        assert_eq!(task.list_id, "3");
        assert_eq!(task.tags, vec!["errand"]);
    }

    #[test]
    fn adding_to_my_day_selection_plans_for_today() {
        let mut s = store();
        let id = s.add_task_to_selection("Stretch").unwrap();
        let task = s.workspace().find_task(&id).unwrap();
        assert_eq!(task.list_id, MY_DAY_LIST_ID);
        assert!(task.is_my_day);
        assert_eq!(task.my_day_date, Some(time::today()));
    }

    #[test]
    fn deleting_selected_list_falls_back_to_first() {
        let mut s = store();
        s.add_task("a", "4").unwrap();
        s.select_list("4").unwrap();
        s.drain_events();

        let deleted = s.delete_list("4").unwrap();
        assert_eq!(deleted.removed_tasks, 1);
        assert_eq!(s.selection(), &Selection::List(MY_DAY_LIST_ID.into()));
        assert_eq!(
            s.drain_events(),
            vec![
                StoreEvent::ListsChanged,
                StoreEvent::TasksChanged,
                StoreEvent::SelectionChanged
            ]
        );
    }

    #[test]
    fn deleting_last_two_lists() {
        let mut ws = Workspace::with_defaults();
        ws.lists.retain(|l| l.id == "2" || l.id == "3");
        ws.folders.clear();
        let mut s = EntityStore::new(ws);
        assert_eq!(s.selection(), &Selection::List("2".into()));

        s.delete_list("2").unwrap();
        assert!(matches!(
            s.delete_list("3"),
            Err(StoreError::List(ListError::LastList))
        ));
        assert_eq!(s.workspace().lists.len(), 1);
        assert_eq!(s.selection(), &Selection::List("3".into()));
    }

    #[test]
    fn rename_selected_tag_follows() {
        let mut s = store();
        s.add_task("Call #phone", "2").unwrap();
        s.select_tag("phone").unwrap();
        assert_eq!(s.rename_tag("phone", "calls").unwrap(), 1);
        assert_eq!(s.selection(), &Selection::Tag("calls".into()));
        assert_eq!(crate::view::unique_tags(s.workspace()), vec!["calls"]);
    }

    #[test]
    fn delete_selected_tag_returns_to_list() {
        let mut s = store();
        s.select_list("2").unwrap();
        s.add_task("Call #phone", "2").unwrap();
        s.select_tag("phone").unwrap();
        assert_eq!(s.delete_tag("phone"), 1);
        assert_eq!(s.selection(), &Selection::List("2".into()));
    }

    #[test]
    fn selection_change_is_not_dirty() {
        let mut s = store();
        s.select_list("2").unwrap();
        assert!(!s.is_dirty());
        assert_eq!(s.drain_events(), vec![StoreEvent::SelectionChanged]);
        assert!(s.select_list("missing").is_err());
    }

    #[test]
    fn reorder_refused_in_tag_view() {
        let mut s = store();
        let a = s.add_task("a #x", "2").unwrap();
        let b = s.add_task("b #x", "2").unwrap();
        s.select_tag("x").unwrap();
        assert!(matches!(
            s.reorder_task(&a, &b),
            Err(StoreError::Reorder(ReorderError::Disabled(_)))
        ));

        s.select_list("2").unwrap();
        s.reorder_task(&a, &b).unwrap();
        let ids: Vec<&str> = s.workspace().tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn drop_list_on_folder_reparents() {
        let mut s = store();
        let fid = s.create_folder("Side", ColorId::Amber, "Star").unwrap();
        s.toggle_folder_expanded(&fid).unwrap();
        s.drop_list("4", &ListDropTarget::Folder(fid.clone())).unwrap();
        assert_eq!(s.workspace().find_list("4").unwrap().folder_id.as_deref(), Some(fid.as_str()));
        assert!(s.workspace().find_folder(&fid).unwrap().is_expanded);
    }

    #[test]
    fn replace_all_resets_selection_and_dirty() {
        let mut s = store();
        s.add_task("local", "2").unwrap();
        s.select_tag("x").unwrap();

        let mut incoming = Workspace::with_defaults();
        incoming.lists.rotate_left(1);
        s.replace_all(incoming);

        assert!(!s.is_dirty());
        assert_eq!(s.selection(), &Selection::List("2".into()));
        assert!(s.workspace().tasks.is_empty());
        assert_eq!(s.drain_events().last(), Some(&StoreEvent::Replaced));
    }

    #[test]
    fn overdue_reassignment_only_dirty_when_something_moved() {
        let mut s = store();
        assert_eq!(s.reassign_overdue_to_today(), 0);
        assert!(!s.is_dirty());

        let id = s.add_task("Old", MY_DAY_LIST_ID).unwrap();
        s.mark_saved();
        let yesterday = time::today().pred_opt().unwrap();
        s.ws.find_task_mut(&id).unwrap().my_day_date = Some(yesterday);
        assert_eq!(s.reassign_overdue_to_today(), 1);
        assert!(s.is_dirty());
    }

    #[test]
    fn unused_tag_edits_leave_store_clean() {
        let mut s = store();
        assert_eq!(s.rename_tag("nobody", "still-nobody").unwrap(), 0);
        assert_eq!(s.delete_tag("nobody"), 0);
        assert!(!s.is_dirty());
        assert_eq!(s.revision(), 0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn filed_tag_rename_counts_as_change() {
        let mut s = store();
        let cat = s.create_tag_category("Places").unwrap();
        s.move_tag_to_category("home", Some(&cat)).unwrap();
        s.mark_saved();
        s.drain_events();

        assert_eq!(s.rename_tag("home", "house").unwrap(), 0);
        assert!(s.is_dirty());
        assert_eq!(s.drain_events(), vec![StoreEvent::CategoriesChanged]);
    }

    #[test]
    fn legacy_tag_mode_takes_last_hashtag() {
        let mut s = store();
        s.set_tag_mode(TagMode::LegacySingle);
        let id = s.add_task("Pack #travel bags #urgent", "2").unwrap();
        let task = s.workspace().find_task(&id).unwrap();
        assert_eq!(task.text, "Pack #travel bags");
        assert_eq!(task.tags, vec!["urgent"]);
    }
}
