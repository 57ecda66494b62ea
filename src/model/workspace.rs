use serde::{Deserialize, Serialize};

use super::list::{Folder, List, MY_DAY_LIST_ID, default_folders, default_lists};
use super::tag_category::TagCategory;
use super::task::Task;

/// What the main pane is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Selection {
    List(String),
    Tag(String),
}

impl Selection {
    pub fn my_day() -> Self {
        Selection::List(MY_DAY_LIST_ID.to_string())
    }

    pub fn list_id(&self) -> Option<&str> {
        match self {
            Selection::List(id) => Some(id),
            Selection::Tag(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Selection::Tag(tag) => Some(tag),
            Selection::List(_) => None,
        }
    }
}

/// The four canonical collections.
///
/// Task order is display order: new tasks are prepended and only explicit
/// reorders change it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub lists: Vec<List>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub tag_categories: Vec<TagCategory>,
}

impl Workspace {
    /// Fresh-install state
    pub fn with_defaults() -> Self {
        Workspace {
            lists: default_lists(),
            folders: default_folders(),
            ..Default::default()
        }
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn find_list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn find_list_mut(&mut self, id: &str) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn find_folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    pub fn find_category_mut(&mut self, id: &str) -> Option<&mut TagCategory> {
        self.tag_categories.iter_mut().find(|c| c.id == id)
    }

    /// Category currently holding `tag`, if any
    pub fn category_of(&self, tag: &str) -> Option<&TagCategory> {
        self.tag_categories.iter().find(|c| c.contains(tag))
    }

    /// Fallback list for dangling references: My Day if present, else the first list
    pub fn default_list_id(&self) -> Option<&str> {
        self.find_list(MY_DAY_LIST_ID)
            .or_else(|| self.lists.first())
            .map(|l| l.id.as_str())
    }

    /// Repair referential problems in loaded or imported data.
    ///
    /// - the My Day list exists and has no folder
    /// - list folder ids point at existing folders
    /// - task list ids point at existing lists
    /// - tasks are normalized (tags, legacy tag, completedAt)
    /// - each tag belongs to at most one category
    pub fn repair(&mut self) {
        if self.find_list(MY_DAY_LIST_ID).is_none() {
            let my_day = default_lists().remove(0);
            self.lists.insert(0, my_day);
        }

        let folder_ids: Vec<String> = self.folders.iter().map(|f| f.id.clone()).collect();
        for list in &mut self.lists {
            if list.is_my_day() {
                list.folder_id = None;
            }
            if let Some(fid) = &list.folder_id
                && !folder_ids.contains(fid)
            {
                list.folder_id = None;
            }
        }

        let fallback = self.default_list_id().map(str::to_string);
        let list_ids: Vec<String> = self.lists.iter().map(|l| l.id.clone()).collect();
        for task in &mut self.tasks {
            task.normalize();
            if !list_ids.contains(&task.list_id)
                && let Some(fallback) = &fallback
            {
                task.list_id = fallback.clone();
            }
        }

        let mut seen: Vec<String> = Vec::new();
        for cat in &mut self.tag_categories {
            cat.tags.retain(|t| {
                if t.trim().is_empty() || seen.contains(t) {
                    false
                } else {
                    seen.push(t.clone());
                    true
                }
            });
            cat.tags.sort();
        }
    }
}
