use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Size above which old entries are trimmed on the next append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this many days are dropped by trimming.
pub const PRUNE_AGE_DAYS: i64 = 30;

const FILE_HEADER: &str = "\
<!-- fundo recovery log, append-only
     Data fundo could not keep (corrupt saved values, discarded edits)
     is copied here before it is replaced.
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A persisted value that failed to parse and was replaced by a default
    Corrupt,
    /// Unsaved local state thrown away by an import
    Discard,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Corrupt => write!(f, "corrupt"),
            RecoveryCategory::Discard => write!(f, "discard"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "corrupt" => Some(RecoveryCategory::Corrupt),
            "discard" => Some(RecoveryCategory::Discard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} [{}] {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an entry to the log. Errors are swallowed with a warning.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, &entry) {
        tracing::warn!(error = %e, category = %entry.category, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        let content = std::fs::read_to_string(&path)?;
        atomic_write(&path, prune_entries_before(&content, &cutoff).as_bytes())?;
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Record a persisted value that could not be parsed
pub fn log_corrupt_value(data_dir: &Path, key: &str, raw: &str, error: &str) {
    log_recovery(
        data_dir,
        RecoveryEntry::new(RecoveryCategory::Corrupt, format!("{} replaced by defaults", key))
            .field("Key", key)
            .field("Error", error)
            .body(raw),
    );
}

/// Record local state that an import is about to replace
pub fn log_discarded_state(data_dir: &Path, source: &str, snapshot_json: &str) {
    log_recovery(
        data_dir,
        RecoveryEntry::new(RecoveryCategory::Discard, "unsaved changes discarded by import")
            .field("Source", source)
            .body(snapshot_json),
    );
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read entries, most recent first
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

/// Split the log into the leading file header and one chunk per entry.
/// Each chunk starts at its `## ` line.
fn split_entries(content: &str) -> (String, Vec<String>) {
    let mut preamble = String::new();
    let mut chunks: Vec<String> = Vec::new();
    for line in content.lines() {
        if line.starts_with("## ") {
            chunks.push(String::new());
        }
        let target = chunks.last_mut().unwrap_or(&mut preamble);
        target.push_str(line);
        target.push('\n');
    }
    (preamble, chunks)
}

fn parse_entry(chunk: &str) -> Option<RecoveryEntry> {
    let mut lines = chunk.lines();
    let (timestamp, category, description) =
        parse_entry_header(lines.next()?.strip_prefix("## ")?)?;

    let mut entry = RecoveryEntry {
        timestamp,
        category,
        description,
        fields: Vec::new(),
        body: String::new(),
    };
    let mut body: Option<Vec<&str>> = None;
    for line in lines {
        match body.as_mut() {
            Some(collected) if line == "```" => {
                entry.body = collected.join("\n");
                body = None;
            }
            Some(collected) => collected.push(line),
            None if line.starts_with("```") => body = Some(Vec::new()),
            None if line == "---" => break,
            None => {
                if let Some((key, value)) = line.trim().split_once(": ") {
                    entry.fields.push((key.to_string(), value.to_string()));
                }
            }
        }
    }
    Some(entry)
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    split_entries(content)
        .1
        .iter()
        .filter_map(|chunk| parse_entry(chunk))
        .collect()
}

/// Parse `<timestamp> [<category>] <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(" [")?;
    let (category_str, description) = rest.split_once("] ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Drop entries older than `before` (default: `PRUNE_AGE_DAYS` ago).
/// Returns the number of entries removed.
pub fn prune_recovery(data_dir: &Path, before: Option<DateTime<Utc>>) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let content = std::fs::read_to_string(&path)?;
    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let removed = parse_entries(&content).len() - parse_entries(&trimmed).len();
    atomic_write(&path, trimmed.as_bytes())?;
    Ok(removed)
}

/// Keep the file header and every entry stamped at or after `cutoff`
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let (mut kept, chunks) = split_entries(content);
    for chunk in chunks {
        let recent = chunk
            .lines()
            .next()
            .and_then(|l| l.strip_prefix("## "))
            .and_then(parse_entry_header)
            .is_some_and(|(ts, _, _)| ts >= *cutoff);
        if recent {
            kept.push_str(&chunk);
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn log_creates_file_with_header() {
        let tmp = TempDir::new().unwrap();
        log_corrupt_value(tmp.path(), "fundo_todos", "[{oops", "expected value");

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- fundo recovery log"));
        assert!(content.contains("[corrupt] fundo_todos replaced by defaults"));
        assert!(content.contains("Key: fundo_todos"));
        assert!(content.contains("```json\n[{oops\n```"));
    }

    #[test]
    fn header_written_once() {
        let tmp = TempDir::new().unwrap();
        log_corrupt_value(tmp.path(), "a", "x", "e");
        log_discarded_state(tmp.path(), "backup.json", "{}");

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(content.matches("<!-- fundo recovery log").count(), 1);
    }

    #[test]
    fn read_entries_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        log_corrupt_value(tmp.path(), "fundo_lists", "nope", "bad");
        log_discarded_state(tmp.path(), "backup.json", "{\n  \"lists\": []\n}");

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Discard);
        assert_eq!(entries[0].body, "{\n  \"lists\": []\n}");
        assert_eq!(
            entries[1].fields[0],
            ("Key".to_string(), "fundo_lists".to_string())
        );

        let latest = read_recovery_entries(tmp.path(), Some(1));
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].category, RecoveryCategory::Discard);
    }

    #[test]
    fn header_and_entries_split_by_line() {
        let log = format!(
            "{}## 2025-01-01T00:00:00Z [corrupt] a\n\nKey: a\n\n---\n## 2025-01-02T00:00:00Z [discard] b\n\n---\n",
            FILE_HEADER
        );
        let (header, chunks) = split_entries(&log);
        assert_eq!(header, FILE_HEADER);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "## 2025-01-01T00:00:00Z [corrupt] a\n\nKey: a\n\n---\n");
        assert_eq!(parse_entries(&log)[1].description, "b");
    }

    #[test]
    fn missing_log_reads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
        assert_eq!(prune_recovery(tmp.path(), None).unwrap(), 0);
    }

    #[test]
    fn prune_drops_old_entries_only() {
        let tmp = TempDir::new().unwrap();
        let mut old = RecoveryEntry::new(RecoveryCategory::Corrupt, "old value");
        old.timestamp = Utc::now() - chrono::Duration::days(90);
        log_recovery(tmp.path(), old);
        log_recovery(tmp.path(), RecoveryEntry::new(RecoveryCategory::Discard, "new state"));

        assert_eq!(prune_recovery(tmp.path(), None).unwrap(), 1);
        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new state");

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- fundo recovery log"));
    }

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }
}
