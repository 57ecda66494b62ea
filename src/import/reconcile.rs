//! Applying imported data without silently losing local edits.
//!
//! A full restore applies at once when the store is clean. With unsaved
//! changes the incoming workspace is staged until the user decides.

use chrono::{DateTime, Local};

use crate::import::payload::{ImportError, TaskRecord};
use crate::model::list::MY_DAY_LIST_ID;
use crate::model::task::Task;
use crate::model::workspace::Workspace;
use crate::ops::task_ops::new_id;
use crate::store::EntityStore;
use crate::util::time::millis;

/// The user's answer when an import meets unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Save local state first (the caller does the saving), then apply
    SaveThenApply,
    DiscardAndApply,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImport {
    /// Where the data came from, usually a file name
    pub source: String,
    pub workspace: Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Applied,
    NeedsDecision,
}

#[derive(Debug)]
pub enum Resolution {
    Applied {
        /// Unsaved local state that was thrown away, for the recovery log
        discarded: Option<Workspace>,
    },
    Cancelled,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    staged: Option<StagedImport>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> Option<&StagedImport> {
        self.staged.as_ref()
    }

    /// Apply `incoming` now if the store is clean, otherwise stage it.
    /// A newer offer replaces any earlier staged one.
    pub fn offer(&mut self, store: &mut EntityStore, source: &str, incoming: Workspace) -> Offer {
        if store.is_dirty() {
            tracing::info!(source, "unsaved changes, import staged");
            self.staged = Some(StagedImport {
                source: source.to_string(),
                workspace: incoming,
            });
            return Offer::NeedsDecision;
        }
        tracing::info!(source, "import applied");
        store.replace_all(incoming);
        self.staged = None;
        Offer::Applied
    }

    /// Act on the user's decision for the staged import.
    ///
    /// `SaveThenApply` expects the caller to have saved already; while the
    /// store is still dirty it fails and the import stays staged.
    pub fn resolve(
        &mut self,
        store: &mut EntityStore,
        decision: Decision,
    ) -> Result<Resolution, ImportError> {
        if self.staged.is_none() {
            return Err(ImportError::NothingStaged);
        }
        match decision {
            Decision::Cancel => {
                self.staged = None;
                tracing::info!("staged import cancelled");
                Ok(Resolution::Cancelled)
            }
            Decision::SaveThenApply if store.is_dirty() => Err(ImportError::UnsavedChanges),
            Decision::SaveThenApply => {
                let staged = self.staged.take().ok_or(ImportError::NothingStaged)?;
                store.replace_all(staged.workspace);
                tracing::info!(source = %staged.source, "staged import applied after save");
                Ok(Resolution::Applied { discarded: None })
            }
            Decision::DiscardAndApply => {
                let staged = self.staged.take().ok_or(ImportError::NothingStaged)?;
                let discarded = store.is_dirty().then(|| store.workspace().clone());
                store.replace_all(staged.workspace);
                tracing::warn!(source = %staged.source, "local changes discarded by import");
                Ok(Resolution::Applied { discarded })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Partial import
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Ids of the new tasks, in the order they now appear
    pub ids: Vec<String>,
    pub imported: usize,
    /// Records without text
    pub skipped: usize,
}

/// Merge task records into `list_id`, ahead of existing tasks and in file
/// order. Every task gets a fresh id; `createdAt` is filled in only where
/// the record lacks one. Other lists are untouched.
pub fn import_into_list(
    ws: &mut Workspace,
    records: Vec<TaskRecord>,
    list_id: &str,
    now: DateTime<Local>,
) -> Result<ImportSummary, ImportError> {
    if ws.find_list(list_id).is_none() {
        return Err(ImportError::ListNotFound(list_id.to_string()));
    }

    let mut skipped = 0;
    let mut tasks = Vec::with_capacity(records.len());
    for record in records {
        let text = record.text.trim();
        if text.is_empty() {
            skipped += 1;
            continue;
        }
        let mut task = Task::new(new_id(), text.to_string(), list_id.to_string(), millis(now));
        task.created_at = record.created_at.or(task.created_at);
        task.completed = record.completed;
        task.completed_at = record
            .completed
            .then(|| record.completed_at.unwrap_or_else(|| millis(now)));
        task.is_important = record.is_important;
        task.is_my_day = record.is_my_day || list_id == MY_DAY_LIST_ID;
        task.my_day_date = task
            .is_my_day
            .then(|| record.my_day_date.unwrap_or_else(|| now.date_naive()));
        task.notes = record.notes.filter(|n| !n.trim().is_empty());
        task.tag = record.tag;
        task.tags = record.tags;
        task.normalize();
        tasks.push(task);
    }

    let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
    let imported = tasks.len();
    ws.tasks.splice(0..0, tasks);
    tracing::info!(list_id, imported, skipped, "tasks imported into list");
    Ok(ImportSummary {
        ids,
        imported,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn incoming() -> Workspace {
        let mut ws = Workspace::with_defaults();
        ws.tasks = vec![Task::new("r1".into(), "From file".into(), "2".into(), 1)];
        ws
    }

    #[test]
    fn clean_store_applies_immediately() {
        let mut store = EntityStore::new(Workspace::with_defaults());
        let mut rec = Reconciler::new();
        assert_eq!(rec.offer(&mut store, "b.json", incoming()), Offer::Applied);
        assert_eq!(store.workspace(), &incoming());
        assert!(rec.staged().is_none());
    }

    #[test]
    fn dirty_store_stages_and_cancel_keeps_state() {
        let mut store = EntityStore::new(Workspace::with_defaults());
        store.add_task("local work", "2").unwrap();
        let before = store.workspace().clone();
        let mut rec = Reconciler::new();

        assert_eq!(rec.offer(&mut store, "b.json", incoming()), Offer::NeedsDecision);
        assert_eq!(store.workspace(), &before);
        assert_eq!(rec.staged().unwrap().source, "b.json");

        assert!(matches!(
            rec.resolve(&mut store, Decision::Cancel).unwrap(),
            Resolution::Cancelled
        ));
        assert_eq!(store.workspace(), &before);
        assert!(store.is_dirty());
        assert!(rec.staged().is_none());
    }

    #[test]
    fn discard_and_apply_returns_lost_state() {
        let mut store = EntityStore::new(Workspace::with_defaults());
        store.add_task("local work", "2").unwrap();
        let before = store.workspace().clone();
        let mut rec = Reconciler::new();
        rec.offer(&mut store, "b.json", incoming());

        match rec.resolve(&mut store, Decision::DiscardAndApply).unwrap() {
            Resolution::Applied { discarded } => assert_eq!(discarded, Some(before)),
            other => panic!("expected apply, got {:?}", other),
        }
        assert_eq!(store.workspace(), &incoming());
        assert!(!store.is_dirty());
    }

    #[test]
    fn save_then_apply_needs_a_save_first() {
        let mut store = EntityStore::new(Workspace::with_defaults());
        store.add_task("local work", "2").unwrap();
        let mut rec = Reconciler::new();
        rec.offer(&mut store, "b.json", incoming());

        assert!(matches!(
            rec.resolve(&mut store, Decision::SaveThenApply),
            Err(ImportError::UnsavedChanges)
        ));
        assert!(rec.staged().is_some());

        store.mark_saved();
        assert!(matches!(
            rec.resolve(&mut store, Decision::SaveThenApply).unwrap(),
            Resolution::Applied { discarded: None }
        ));
        assert_eq!(store.workspace(), &incoming());
    }

    #[test]
    fn resolve_without_staged_import_fails() {
        let mut store = EntityStore::new(Workspace::with_defaults());
        assert!(matches!(
            Reconciler::new().resolve(&mut store, Decision::Cancel),
            Err(ImportError::NothingStaged)
        ));
    }

    #[test]
    fn partial_import_assigns_fresh_ids() {
        let mut ws = Workspace::with_defaults();
        ws.tasks = vec![Task::new("existing".into(), "Keep".into(), "3".into(), 1)];
        let records = vec![
            TaskRecord {
                text: "First".into(),
                created_at: Some(42),
                tag: Some("legacy".into()),
                ..Default::default()
            },
            TaskRecord {
                text: "   ".into(),
                ..Default::default()
            },
            TaskRecord {
                text: "Second".into(),
                completed: true,
                tags: vec!["a".into(), "a".into(), "".into()],
                ..Default::default()
            },
        ];

        let summary = import_into_list(&mut ws, records, "2", now()).unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(ws.tasks.len(), 3);
        assert_eq!(ws.tasks[2].id, "existing");
        assert_eq!(ws.tasks[2].list_id, "3");

        let first = &ws.tasks[0];
        assert_eq!(first.id, summary.ids[0]);
        assert_eq!(first.text, "First");
        assert_eq!(first.list_id, "2");
        assert_eq!(first.created_at, Some(42));
        assert_eq!(first.tags, vec!["legacy"]);

        let second = &ws.tasks[1];
        assert_eq!(second.created_at, Some(millis(now())));
        assert_eq!(second.completed_at, Some(millis(now())));
        assert_eq!(second.tags, vec!["a"]);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn partial_import_into_my_day_plans_today() {
        let mut ws = Workspace::with_defaults();
        let records = vec![TaskRecord {
            text: "Stretch".into(),
            ..Default::default()
        }];
        import_into_list(&mut ws, records, MY_DAY_LIST_ID, now()).unwrap();
        assert!(ws.tasks[0].is_my_day);
        assert_eq!(ws.tasks[0].my_day_date, Some(now().date_naive()));
    }

    #[test]
    fn partial_import_into_missing_list_fails() {
        let mut ws = Workspace::with_defaults();
        assert!(matches!(
            import_into_list(&mut ws, Vec::new(), "nope", now()),
            Err(ImportError::ListNotFound(_))
        ));
    }
}
