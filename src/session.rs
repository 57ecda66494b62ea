//! Application session: the store plus everything that keeps it saved.
//!
//! The host owns the event loop. It forwards user actions to
//! [`Session::store_mut`], calls [`Session::tick`] regularly, and drains
//! store events to re-render.

use std::path::Path;
use std::time::Instant;

use crate::import::payload::{self, ImportError};
use crate::import::reconcile::{Decision, ImportSummary, Offer, Reconciler, Resolution};
use crate::io::autosave::{Autosaver, Persister};
use crate::io::exchange::{ExchangeError, FileExchange, LinkedFile, Permission};
use crate::io::kv::{KeyValueStore, StorageError};
use crate::io::recovery::{self, RecoveryEntry};
use crate::io::snapshot::{load_snapshot, save_last_filename};
use crate::model::config::FundoConfig;
use crate::store::{EntityStore, StoreError};
use crate::util::time;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error("could not encode file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of asking the user for a file to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The dialog was dismissed
    Cancelled,
    Applied,
    /// Unsaved changes: call [`Session::resolve_import`]
    AwaitingDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied,
    Cancelled,
    /// The save before applying was dismissed; the import is still staged
    StillPending,
}

/// What a tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub persisted: bool,
    pub autosaved: bool,
}

pub struct Session<K: KeyValueStore, F: FileExchange> {
    store: EntityStore,
    kv: K,
    exchange: F,
    config: FundoConfig,
    linked: Option<LinkedFile>,
    last_filename: Option<String>,
    reconciler: Reconciler,
    persister: Persister,
    autosaver: Autosaver,
    seen_revision: u64,
}

impl<K: KeyValueStore, F: FileExchange> Session<K, F> {
    /// Load the stored snapshot (or defaults) and start the timers at `now`.
    ///
    /// Corrupt stored values are copied to the recovery log first. The
    /// loaded state is written back once the debounce elapses, so migrated
    /// and repaired data is persisted.
    pub fn new(kv: K, exchange: F, config: FundoConfig, now: Instant) -> Self {
        let loaded = load_snapshot(&kv);
        if let Some(dir) = &config.storage.data_dir {
            for bad in &loaded.corrupt {
                recovery::log_corrupt_value(dir, bad.key, &bad.raw, &bad.error);
            }
        }
        tracing::info!(
            fresh = loaded.fresh,
            migrations = loaded.migrated.applied.len(),
            tasks = loaded.workspace.tasks.len(),
            "session loaded"
        );

        let mut persister = Persister::new(config.persist.debounce());
        persister.schedule(now);
        let autosaver = Autosaver::new(config.autosave.interval(), config.autosave.enabled, now);
        let mut store = EntityStore::new(loaded.workspace);
        store.set_tag_mode(config.input.tag_mode);
        let seen_revision = store.revision();

        Session {
            store,
            kv,
            exchange,
            config,
            linked: None,
            last_filename: loaded.last_filename,
            reconciler: Reconciler::new(),
            persister,
            autosaver,
            seen_revision,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn exchange_mut(&mut self) -> &mut F {
        &mut self.exchange
    }

    pub fn linked_file(&self) -> Option<&LinkedFile> {
        self.linked.as_ref()
    }

    pub fn last_filename(&self) -> Option<&str> {
        self.last_filename.as_deref()
    }

    /// Whether an opened file is waiting on the user's decision
    pub fn has_pending_import(&self) -> bool {
        self.reconciler.staged().is_some()
    }

    fn data_dir(&self) -> Option<&Path> {
        self.config.storage.data_dir.as_deref()
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Drive debounced persistence and periodic autosave
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if self.store.revision() != self.seen_revision {
            self.seen_revision = self.store.revision();
            self.persister.schedule(now);
        }
        match self.persister.poll(now, self.store.workspace(), &mut self.kv) {
            Ok(written) => report.persisted = written,
            Err(e) => tracing::warn!(error = %e, "could not persist snapshot"),
        }

        if self.autosaver.fire(now) {
            report.autosaved = self.autosave();
        }
        report
    }

    /// Write the snapshot now, skipping the debounce
    pub fn flush(&mut self) -> Result<bool, SessionError> {
        self.seen_revision = self.store.revision();
        Ok(self.persister.flush(self.store.workspace(), &mut self.kv)?)
    }

    /// Silent re-save to the linked file. Only runs when a file is linked,
    /// write access is currently granted and there are unsaved changes.
    /// Failures are logged and leave the dirty flag set.
    fn autosave(&mut self) -> bool {
        let Some(linked) = self.linked.clone() else {
            return false;
        };
        if !self.store.is_dirty() {
            return false;
        }
        if self.exchange.query_permission(&linked) != Permission::Granted {
            tracing::debug!(file = %linked.name, "autosave skipped, no write permission");
            return false;
        }
        let result = self.backup_json().and_then(|json| {
            self.exchange
                .write_linked(&linked, &json)
                .map_err(SessionError::from)
        });
        match result {
            Ok(()) => {
                self.store.mark_saved();
                tracing::debug!(file = %linked.name, "autosaved");
                true
            }
            Err(e) => {
                tracing::warn!(file = %linked.name, error = %e, "autosave failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Saving and exporting
    // -----------------------------------------------------------------------

    fn backup_json(&self) -> Result<String, SessionError> {
        Ok(payload::backup(self.store.workspace(), time::now()).to_json()?)
    }

    /// Manual save. Writes the linked file when possible (asking once for
    /// lapsed permission), otherwise falls back to a save dialog.
    /// Returns the file name, or `None` if the dialog was dismissed.
    pub fn save(&mut self) -> Result<Option<String>, SessionError> {
        let json = self.backup_json()?;

        if let Some(linked) = self.linked.clone() {
            let mut permission = self.exchange.query_permission(&linked);
            if permission == Permission::Prompt {
                permission = self.exchange.request_permission(&linked);
            }
            if permission == Permission::Granted {
                self.exchange.write_linked(&linked, &json)?;
                self.finish_save(linked);
                return Ok(self.last_filename.clone());
            }
            tracing::info!(file = %linked.name, "write permission lost, asking for a new file");
            self.linked = None;
        }

        self.save_as_json(&json)
    }

    /// Always ask where to save, then link that file
    pub fn save_as(&mut self) -> Result<Option<String>, SessionError> {
        let json = self.backup_json()?;
        self.save_as_json(&json)
    }

    fn save_as_json(&mut self, json: &str) -> Result<Option<String>, SessionError> {
        let suggested = self
            .last_filename
            .clone()
            .unwrap_or_else(|| self.config.export.default_filename.clone());
        match self.exchange.save_as(&suggested, json)? {
            Some(linked) => {
                self.finish_save(linked);
                Ok(self.last_filename.clone())
            }
            None => Ok(None),
        }
    }

    fn finish_save(&mut self, linked: LinkedFile) {
        self.store.mark_saved();
        if let Err(e) = save_last_filename(&mut self.kv, &linked.name) {
            tracing::warn!(error = %e, "could not remember last file name");
        }
        tracing::info!(file = %linked.name, "saved");
        self.last_filename = Some(linked.name.clone());
        self.linked = Some(linked);
    }

    /// Export a dated backup without linking it or clearing the dirty flag
    pub fn export_backup(&mut self) -> Result<Option<String>, SessionError> {
        let now = time::now();
        let json = payload::backup(self.store.workspace(), now).to_json()?;
        self.export(&payload::backup_filename(now), &json)
    }

    pub fn export_list(&mut self, list_id: &str) -> Result<Option<String>, SessionError> {
        let file = payload::list_export(self.store.workspace(), list_id, time::now())?;
        let name = file
            .lists
            .first()
            .map(payload::list_filename)
            .unwrap_or_else(|| "list.json".to_string());
        self.export(&name, &file.to_json()?)
    }

    /// Export completed tasks
    pub fn export_archive(&mut self) -> Result<Option<String>, SessionError> {
        let now = time::now();
        let json = payload::archive(self.store.workspace(), now).to_json()?;
        self.export(&payload::archive_filename(now), &json)
    }

    fn export(&mut self, suggested: &str, json: &str) -> Result<Option<String>, SessionError> {
        Ok(self.exchange.save_as(suggested, json)?.map(|f| {
            tracing::info!(file = %f.name, "exported");
            f.name
        }))
    }

    // -----------------------------------------------------------------------
    // Opening and importing
    // -----------------------------------------------------------------------

    /// Pick a backup file and restore it, staging it if there are unsaved
    /// changes. Invalid files change nothing.
    pub fn open_file(&mut self) -> Result<OpenOutcome, SessionError> {
        let Some(file) = self.exchange.open()? else {
            return Ok(OpenOutcome::Cancelled);
        };
        let incoming = payload::parse_restore(&file.contents)?;
        match self.reconciler.offer(&mut self.store, &file.name, incoming) {
            Offer::Applied => {
                self.opened(&file.name);
                Ok(OpenOutcome::Applied)
            }
            Offer::NeedsDecision => Ok(OpenOutcome::AwaitingDecision),
        }
    }

    fn opened(&mut self, name: &str) {
        self.linked = None;
        self.last_filename = Some(name.to_string());
        if let Err(e) = save_last_filename(&mut self.kv, name) {
            tracing::warn!(error = %e, "could not remember last file name");
        }
    }

    /// Finish a staged import with the user's decision
    pub fn resolve_import(&mut self, decision: Decision) -> Result<ImportOutcome, SessionError> {
        let source = match self.reconciler.staged() {
            Some(staged) => staged.source.clone(),
            None => return Err(ImportError::NothingStaged.into()),
        };

        if decision == Decision::SaveThenApply && self.save()?.is_none() {
            return Ok(ImportOutcome::StillPending);
        }

        match self.reconciler.resolve(&mut self.store, decision)? {
            Resolution::Cancelled => Ok(ImportOutcome::Cancelled),
            Resolution::Applied { discarded } => {
                if let Some(lost) = discarded
                    && let Some(dir) = self.data_dir()
                {
                    match serde_json::to_string_pretty(&lost) {
                        Ok(json) => recovery::log_discarded_state(dir, &source, &json),
                        Err(e) => tracing::warn!(error = %e, "could not encode discarded state"),
                    }
                }
                self.opened(&source);
                Ok(ImportOutcome::Applied)
            }
        }
    }

    /// Pick a file of task records and merge them into the current list.
    /// Returns `None` if the dialog was dismissed.
    pub fn import_into_current_list(&mut self) -> Result<Option<ImportSummary>, SessionError> {
        let Some(file) = self.exchange.open()? else {
            return Ok(None);
        };
        let records = payload::parse_task_records(&file.contents)?;
        Ok(Some(self.store.import_tasks(records)?))
    }

    /// Most recent recovery log entries, if a data directory is configured
    pub fn recovery_entries(&self, limit: Option<usize>) -> Vec<RecoveryEntry> {
        self.data_dir()
            .map(|dir| recovery::read_recovery_entries(dir, limit))
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::io::exchange::OpenedFile;
    use crate::io::kv::MemoryStore;
    use crate::io::snapshot::{LAST_FILENAME_KEY, TASKS_KEY};
    use crate::model::workspace::Workspace;
    use pretty_assertions::assert_eq;

    /// Exchange with scripted dialogs and a switchable permission
    #[derive(Default)]
    struct FakeExchange {
        save_replies: VecDeque<Option<&'static str>>,
        open_replies: VecDeque<Option<OpenedFile>>,
        permission: Option<Permission>,
        grant_on_request: bool,
        requests: usize,
        fail_writes: bool,
        written: Vec<(String, String)>,
    }

    impl FileExchange for FakeExchange {
        fn save_as(
            &mut self,
            _suggested: &str,
            contents: &str,
        ) -> Result<Option<LinkedFile>, ExchangeError> {
            match self.save_replies.pop_front().flatten() {
                Some(name) => {
                    self.written.push((name.to_string(), contents.to_string()));
                    Ok(Some(LinkedFile {
                        name: name.to_string(),
                        path: PathBuf::from(name),
                    }))
                }
                None => Ok(None),
            }
        }

        fn open(&mut self) -> Result<Option<OpenedFile>, ExchangeError> {
            Ok(self.open_replies.pop_front().flatten())
        }

        fn query_permission(&self, _file: &LinkedFile) -> Permission {
            self.permission.unwrap_or(Permission::Granted)
        }

        fn request_permission(&mut self, file: &LinkedFile) -> Permission {
            self.requests += 1;
            if self.grant_on_request {
                self.permission = Some(Permission::Granted);
            }
            self.query_permission(file)
        }

        fn write_linked(&mut self, file: &LinkedFile, contents: &str) -> Result<(), ExchangeError> {
            if self.fail_writes {
                return Err(ExchangeError::PermissionDenied(file.name.clone()));
            }
            self.written.push((file.name.clone(), contents.to_string()));
            Ok(())
        }
    }

    fn session(fx: FakeExchange, start: Instant) -> Session<MemoryStore, FakeExchange> {
        Session::new(MemoryStore::new(), fx, FundoConfig::default(), start)
    }

    fn linked_session(start: Instant) -> Session<MemoryStore, FakeExchange> {
        let mut fx = FakeExchange::default();
        fx.save_replies.push_back(Some("mine.json"));
        let mut s = session(fx, start);
        s.store_mut().add_task("first", "2").unwrap();
        assert_eq!(s.save().unwrap().as_deref(), Some("mine.json"));
        s
    }

    fn backup_text() -> String {
        let mut ws = Workspace::with_defaults();
        ws.tasks = vec![crate::model::task::Task::new(
            "r".into(),
            "Restored".into(),
            "3".into(),
            1,
        )];
        payload::backup(&ws, time::now()).to_json().unwrap()
    }

    #[test]
    fn changes_persist_after_debounce() {
        let start = Instant::now();
        let mut s = session(FakeExchange::default(), start);
        s.tick(start + Duration::from_secs(1));

        s.store_mut().add_task("Write report", "2").unwrap();
        let t1 = start + Duration::from_secs(2);
        assert!(!s.tick(t1).persisted);
        assert!(s.tick(t1 + Duration::from_millis(600)).persisted);
        assert!(s.kv().get(TASKS_KEY).unwrap().unwrap().contains("Write report"));
        assert!(!s.tick(t1 + Duration::from_secs(2)).persisted);
    }

    #[test]
    fn first_save_asks_for_file_and_links_it() {
        let s = linked_session(Instant::now());
        assert!(!s.store().is_dirty());
        assert_eq!(s.linked_file().unwrap().name, "mine.json");
        assert_eq!(s.last_filename(), Some("mine.json"));
        assert_eq!(
            s.kv().get(LAST_FILENAME_KEY).unwrap().as_deref(),
            Some("mine.json")
        );
    }

    #[test]
    fn dismissed_save_keeps_dirty() {
        let start = Instant::now();
        let mut fx = FakeExchange::default();
        fx.save_replies.push_back(None);
        let mut s = session(fx, start);
        s.store_mut().add_task("x", "2").unwrap();
        assert_eq!(s.save().unwrap(), None);
        assert!(s.store().is_dirty());
        assert!(s.linked_file().is_none());
    }

    #[test]
    fn save_with_linked_file_writes_silently() {
        let mut s = linked_session(Instant::now());
        s.store_mut().add_task("second", "2").unwrap();
        assert_eq!(s.save().unwrap().as_deref(), Some("mine.json"));
        assert_eq!(s.exchange_mut().written.len(), 2);
        assert!(!s.store().is_dirty());
    }

    #[test]
    fn lapsed_permission_is_requested_once() {
        let mut s = linked_session(Instant::now());
        s.exchange_mut().permission = Some(Permission::Prompt);
        s.exchange_mut().grant_on_request = true;
        s.store_mut().add_task("second", "2").unwrap();

        assert_eq!(s.save().unwrap().as_deref(), Some("mine.json"));
        assert_eq!(s.exchange_mut().requests, 1);
        assert!(!s.store().is_dirty());
    }

    #[test]
    fn refused_permission_falls_back_to_save_as() {
        let mut s = linked_session(Instant::now());
        s.exchange_mut().permission = Some(Permission::Prompt);
        s.exchange_mut().save_replies.push_back(Some("other.json"));
        s.store_mut().add_task("second", "2").unwrap();

        assert_eq!(s.save().unwrap().as_deref(), Some("other.json"));
        assert_eq!(s.exchange_mut().requests, 1);
        assert_eq!(s.linked_file().unwrap().name, "other.json");
    }

    #[test]
    fn autosave_only_when_linked_granted_and_dirty() {
        let start = Instant::now();
        let minute = Duration::from_secs(60);

        // not linked
        let mut s = session(FakeExchange::default(), start);
        s.store_mut().add_task("x", "2").unwrap();
        assert!(!s.tick(start + minute).autosaved);
        assert!(s.store().is_dirty());

        // linked but clean
        let mut s = linked_session(start);
        assert!(!s.tick(start + minute).autosaved);

        // linked and dirty
        s.store_mut().add_task("y", "2").unwrap();
        assert!(s.tick(start + minute * 2).autosaved);
        assert!(!s.store().is_dirty());

        // permission lapsed: skipped, dirty stays
        s.exchange_mut().permission = Some(Permission::Prompt);
        s.store_mut().add_task("z", "2").unwrap();
        assert!(!s.tick(start + minute * 3).autosaved);
        assert!(s.store().is_dirty());
        assert_eq!(s.exchange_mut().requests, 0);
    }

    #[test]
    fn autosave_failure_is_swallowed() {
        let start = Instant::now();
        let mut s = linked_session(start);
        s.exchange_mut().fail_writes = true;
        s.store_mut().add_task("y", "2").unwrap();
        assert!(!s.tick(start + Duration::from_secs(60)).autosaved);
        assert!(s.store().is_dirty());
    }

    #[test]
    fn open_on_clean_store_applies() {
        let mut fx = FakeExchange::default();
        fx.open_replies.push_back(Some(OpenedFile {
            name: "restore.json".into(),
            contents: backup_text(),
        }));
        let mut s = session(fx, Instant::now());
        assert_eq!(s.open_file().unwrap(), OpenOutcome::Applied);
        assert_eq!(s.store().workspace().tasks[0].id, "r");
        assert_eq!(s.last_filename(), Some("restore.json"));
    }

    #[test]
    fn open_cancelled_or_invalid_changes_nothing() {
        let mut fx = FakeExchange::default();
        fx.open_replies.push_back(None);
        fx.open_replies.push_back(Some(OpenedFile {
            name: "bad.json".into(),
            contents: "{\"todos\": []}".into(),
        }));
        let mut s = session(fx, Instant::now());
        let before = s.store().workspace().clone();

        assert_eq!(s.open_file().unwrap(), OpenOutcome::Cancelled);
        assert!(matches!(
            s.open_file(),
            Err(SessionError::Import(ImportError::MissingLists))
        ));
        assert_eq!(s.store().workspace(), &before);
    }

    #[test]
    fn open_with_unsaved_changes_waits_for_decision() {
        let mut fx = FakeExchange::default();
        fx.open_replies.push_back(Some(OpenedFile {
            name: "restore.json".into(),
            contents: backup_text(),
        }));
        let mut s = session(fx, Instant::now());
        s.store_mut().add_task("local", "2").unwrap();
        let before = s.store().workspace().clone();

        assert_eq!(s.open_file().unwrap(), OpenOutcome::AwaitingDecision);
        assert!(s.has_pending_import());
        assert_eq!(s.store().workspace(), &before);

        assert_eq!(s.resolve_import(Decision::Cancel).unwrap(), ImportOutcome::Cancelled);
        assert_eq!(s.store().workspace(), &before);
        assert!(!s.has_pending_import());
    }

    #[test]
    fn save_then_apply_dismissed_stays_pending() {
        let mut fx = FakeExchange::default();
        fx.open_replies.push_back(Some(OpenedFile {
            name: "restore.json".into(),
            contents: backup_text(),
        }));
        fx.save_replies.push_back(None);
        fx.save_replies.push_back(Some("kept.json"));
        let mut s = session(fx, Instant::now());
        s.store_mut().add_task("local", "2").unwrap();
        s.open_file().unwrap();

        assert_eq!(
            s.resolve_import(Decision::SaveThenApply).unwrap(),
            ImportOutcome::StillPending
        );
        assert!(s.has_pending_import());

        assert_eq!(
            s.resolve_import(Decision::SaveThenApply).unwrap(),
            ImportOutcome::Applied
        );
        assert!(s.exchange_mut().written[0].1.contains("local"));
        assert_eq!(s.store().workspace().tasks[0].id, "r");
    }

    #[test]
    fn import_into_current_list_merges() {
        let mut fx = FakeExchange::default();
        fx.open_replies.push_back(Some(OpenedFile {
            name: "tasks.json".into(),
            contents: r#"[{"text": "a"}, {"text": "b #x"}]"#.into(),
        }));
        let mut s = session(fx, Instant::now());
        s.store_mut().select_list("4").unwrap();

        let summary = s.import_into_current_list().unwrap().unwrap();
        assert_eq!(summary.imported, 2);
        let ws = s.store().workspace();
        assert!(ws.tasks.iter().all(|t| t.list_id == "4"));
        assert!(s.store().is_dirty());
    }

    #[test]
    fn extreme_config_values_do_not_crash() {
        let start = Instant::now();
        let mut config = FundoConfig::default();
        config.autosave.interval_secs = u64::MAX;
        config.persist.debounce_ms = u64::MAX;
        config.input.tag_mode = crate::parse::TagMode::LegacySingle;

        let mut s = Session::new(MemoryStore::new(), FakeExchange::default(), config, start);
        let id = s.store_mut().add_task("Pay rent #home #bills", "2").unwrap();
        assert_eq!(s.store().workspace().find_task(&id).unwrap().tags, vec!["bills"]);
        assert_eq!(s.tick(start + Duration::from_secs(3600)), TickReport::default());
    }
}
