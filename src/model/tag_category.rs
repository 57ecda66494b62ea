use serde::{Deserialize, Serialize};

/// A user-defined bucket grouping tags in the sidebar.
/// Tags are kept sorted within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TagCategory {
    pub fn new(id: String, name: String) -> Self {
        TagCategory {
            id,
            name,
            tags: Vec::new(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Insert keeping sort order; no-op if already present
    pub fn insert_sorted(&mut self, tag: &str) {
        if self.contains(tag) {
            return;
        }
        self.tags.push(tag.to_string());
        self.tags.sort();
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}
