use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// Field names follow the exchanged JSON format (`listId`, `isMyDay`, ...).
/// `tag` is the legacy single-tag field; it mirrors `tags[0]` and is kept in
/// sync by [`Task::sync_legacy_tag`] after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub list_id: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_my_day: bool,
    /// Calendar date the task was planned for My Day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_day_date: Option<NaiveDate>,
    /// Legacy single tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Epoch milliseconds, present iff `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create a new incomplete task
    pub fn new(id: String, text: String, list_id: String, created_at: i64) -> Self {
        Task {
            id,
            text,
            completed: false,
            list_id,
            is_important: false,
            is_my_day: false,
            my_day_date: None,
            tag: None,
            tags: Vec::new(),
            notes: None,
            created_at: Some(created_at),
            completed_at: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Replace the tag set, dropping blanks and duplicates (first occurrence wins)
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = dedup_tags(tags);
        self.sync_legacy_tag();
    }

    /// Keep the legacy `tag` field equal to the first tag
    pub fn sync_legacy_tag(&mut self) {
        self.tag = self.tags.first().cloned();
    }

    /// Bring a task read from any schema version into the current shape:
    /// a lone legacy `tag` becomes `tags`, tags are cleaned, and the
    /// completed/completedAt pairing is repaired.
    pub fn normalize(&mut self) {
        if self.tags.is_empty()
            && let Some(tag) = self.tag.take()
        {
            self.tags.push(tag);
        }
        let tags = std::mem::take(&mut self.tags);
        self.set_tags(tags);

        if !self.completed {
            self.completed_at = None;
        } else if self.completed_at.is_none() {
            // Completion time unknown: the creation time stands in
            self.completed_at = Some(self.created_at.unwrap_or_default());
        }
        if !self.is_my_day {
            self.my_day_date = None;
        }
    }
}

/// Trim, drop empties and duplicates while keeping first-seen order
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().trim_start_matches('#');
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
