use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::list::{Folder, List, MY_DAY_LIST_ID};
use crate::model::workspace::{Selection, Workspace};

use super::task_matches;

/// Every tag carried by at least one task, sorted
pub fn unique_tags(ws: &Workspace) -> Vec<String> {
    let tags: BTreeSet<&str> = ws
        .tasks
        .iter()
        .flat_map(|t| t.tags.iter().map(String::as_str))
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

/// A category with the live tags filed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
}

/// Live tags partitioned by category membership
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagGroups {
    /// One entry per category in category order, including empty ones
    pub categorized: Vec<CategoryGroup>,
    pub uncategorized: Vec<String>,
}

pub fn tag_groups(ws: &Workspace) -> TagGroups {
    let live = unique_tags(ws);
    let categorized = ws
        .tag_categories
        .iter()
        .map(|c| CategoryGroup {
            id: c.id.clone(),
            name: c.name.clone(),
            tags: c
                .tags
                .iter()
                .filter(|t| live.contains(t))
                .cloned()
                .collect(),
        })
        .collect();
    let uncategorized = live
        .iter()
        .filter(|t| ws.category_of(t).is_none())
        .cloned()
        .collect();
    TagGroups {
        categorized,
        uncategorized,
    }
}

/// Incomplete-task counts for sidebar badges
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarCounts {
    /// Per list id, in list order
    pub lists: IndexMap<String, usize>,
    /// Per live tag, sorted by tag
    pub tags: IndexMap<String, usize>,
}

pub fn sidebar_counts(ws: &Workspace) -> SidebarCounts {
    let lists = ws
        .lists
        .iter()
        .map(|l| (l.id.clone(), open_count(ws, &Selection::List(l.id.clone()))))
        .collect();
    let tags = unique_tags(ws)
        .into_iter()
        .map(|tag| {
            let count = open_count(ws, &Selection::Tag(tag.clone()));
            (tag, count)
        })
        .collect();
    SidebarCounts { lists, tags }
}

fn open_count(ws: &Workspace, selection: &Selection) -> usize {
    ws.tasks
        .iter()
        .filter(|t| !t.completed && task_matches(t, selection))
        .count()
}

/// One row group in the sidebar
#[derive(Debug)]
pub enum SidebarEntry<'a> {
    List(&'a List),
    /// Member lists are reported even when the folder is collapsed
    Folder {
        folder: &'a Folder,
        lists: Vec<&'a List>,
    },
}

/// My Day first, then folders in folder order with their lists, then the
/// remaining root lists. Lists keep their relative order everywhere.
pub fn sidebar_tree(ws: &Workspace) -> Vec<SidebarEntry<'_>> {
    let mut entries = Vec::new();
    if let Some(my_day) = ws.find_list(MY_DAY_LIST_ID) {
        entries.push(SidebarEntry::List(my_day));
    }
    for folder in &ws.folders {
        let lists = ws
            .lists
            .iter()
            .filter(|l| l.folder_id.as_deref() == Some(folder.id.as_str()))
            .collect();
        entries.push(SidebarEntry::Folder { folder, lists });
    }
    for list in &ws.lists {
        if list.is_my_day() {
            continue;
        }
        let in_known_folder = list
            .folder_id
            .as_deref()
            .is_some_and(|fid| ws.find_folder(fid).is_some());
        if !in_known_folder {
            entries.push(SidebarEntry::List(list));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::list::ColorId;
    use crate::model::tag_category::TagCategory;
    use crate::model::task::Task;
    use pretty_assertions::assert_eq;

    fn tagged(id: &str, list: &str, tags: &[&str], completed: bool) -> Task {
        let mut t = Task::new(id.into(), id.into(), list.into(), 0);
        t.set_tags(tags);
        t.completed = completed;
        t
    }

    fn ws() -> Workspace {
        let mut ws = Workspace::with_defaults();
        ws.tasks = vec![
            tagged("a", "2", &["work", "urgent"], false),
            tagged("b", "3", &["errand"], false),
            tagged("c", "2", &["work"], true),
        ];
        ws.tag_categories = vec![
            TagCategory {
                id: "c1".into(),
                name: "Context".into(),
                tags: vec!["errand".into(), "stale".into(), "work".into()],
            },
            TagCategory::new("c2".into(), "Empty".into()),
        ];
        ws
    }

    #[test]
    fn unique_tags_sorted_and_deduped() {
        assert_eq!(unique_tags(&ws()), vec!["errand", "urgent", "work"]);
    }

    #[test]
    fn tag_groups_only_show_live_tags() {
        let groups = tag_groups(&ws());
        assert_eq!(groups.categorized[0].tags, vec!["errand", "work"]);
        assert!(groups.categorized[1].tags.is_empty());
        assert_eq!(groups.uncategorized, vec!["urgent"]);
    }

    #[test]
    fn counts_skip_completed() {
        let mut ws = ws();
        let mut pinned = tagged("d", "3", &[], false);
        pinned.is_my_day = true;
        ws.tasks.push(pinned);

        let counts = sidebar_counts(&ws);
        assert_eq!(counts.lists["2"], 1);
        assert_eq!(counts.lists["3"], 2);
        assert_eq!(counts.lists[MY_DAY_LIST_ID], 1);
        assert_eq!(counts.tags["work"], 1);
        assert_eq!(counts.tags["errand"], 1);
        let order: Vec<&String> = counts.lists.keys().collect();
        assert_eq!(order, vec!["1", "2", "3", "5", "4"]);
    }

    #[test]
    fn tree_groups_lists_under_folders() {
        let mut ws = Workspace::with_defaults();
        ws.folders.clear();
        ws.folders.push(Folder {
            id: "f".into(),
            name: "Personal".into(),
            color: ColorId::Green,
            icon: "Home".into(),
            is_expanded: false,
        });
        ws.find_list_mut("3").unwrap().folder_id = Some("f".into());
        ws.find_list_mut("5").unwrap().folder_id = Some("f".into());

        let tree = sidebar_tree(&ws);
        assert_eq!(tree.len(), 4);
        assert!(matches!(tree[0], SidebarEntry::List(l) if l.id == MY_DAY_LIST_ID));
        match &tree[1] {
            SidebarEntry::Folder { folder, lists } => {
                assert_eq!(folder.id, "f");
                let ids: Vec<&str> = lists.iter().map(|l| l.id.as_str()).collect();
                assert_eq!(ids, vec!["3", "5"]);
            }
            other => panic!("expected folder, got {:?}", other),
        }
        assert!(matches!(tree[2], SidebarEntry::List(l) if l.id == "2"));
        assert!(matches!(tree[3], SidebarEntry::List(l) if l.id == "4"));
    }
}
