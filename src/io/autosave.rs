use std::time::{Duration, Instant};

use crate::io::kv::{KeyValueStore, StorageError};
use crate::io::snapshot::{SnapshotText, encode_snapshot, write_snapshot};
use crate::model::workspace::Workspace;

/// `now + delay`, saturating far in the future instead of overflowing
fn after(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay)
        .or_else(|| now.checked_add(Duration::from_secs(u32::MAX as u64)))
        .unwrap_or(now)
}

// ---------------------------------------------------------------------------
// Debounced snapshot persistence
// ---------------------------------------------------------------------------

/// Mirrors the workspace into the key-value store after changes settle.
///
/// Every change re-arms the timer; the write happens once no change arrived
/// for `debounce`. A snapshot equal to the last one written is skipped.
#[derive(Debug)]
pub struct Persister {
    debounce: Duration,
    due: Option<Instant>,
    last_written: Option<SnapshotText>,
}

impl Persister {
    pub fn new(debounce: Duration) -> Self {
        Persister {
            debounce,
            due: None,
            last_written: None,
        }
    }

    /// Note a change at `now`
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(after(now, self.debounce));
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Treat `text` as already stored (e.g. just loaded)
    pub fn mark_written(&mut self, text: SnapshotText) {
        self.last_written = Some(text);
    }

    /// Write if the debounce has elapsed. Returns whether anything was written.
    ///
    /// A failed write re-arms the timer so the next poll retries.
    pub fn poll(
        &mut self,
        now: Instant,
        ws: &Workspace,
        kv: &mut dyn KeyValueStore,
    ) -> Result<bool, StorageError> {
        match self.due {
            Some(due) if now >= due => {}
            _ => return Ok(false),
        }
        self.due = None;
        self.flush(ws, kv).inspect_err(|_| {
            self.due = Some(after(now, self.debounce));
        })
    }

    /// Write now, regardless of the timer
    pub fn flush(
        &mut self,
        ws: &Workspace,
        kv: &mut dyn KeyValueStore,
    ) -> Result<bool, StorageError> {
        self.due = None;
        let text = encode_snapshot(ws)?;
        if self.last_written.as_ref() == Some(&text) {
            tracing::debug!("snapshot unchanged, skipping write");
            return Ok(false);
        }
        write_snapshot(kv, &text)?;
        tracing::debug!("snapshot written");
        self.last_written = Some(text);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Periodic linked-file autosave
// ---------------------------------------------------------------------------

/// Fixed-interval timer for silent re-saves to the linked file
#[derive(Debug)]
pub struct Autosaver {
    interval: Duration,
    enabled: bool,
    next: Instant,
}

impl Autosaver {
    pub fn new(interval: Duration, enabled: bool, now: Instant) -> Self {
        Autosaver {
            interval,
            enabled,
            next: after(now, interval),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once per elapsed interval. Missed intervals don't accumulate.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.enabled || now < self.next {
            return false;
        }
        self.next = after(now, self.interval);
        true
    }
}
