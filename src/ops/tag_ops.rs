use crate::model::tag_category::TagCategory;
use crate::model::workspace::Workspace;
use crate::ops::task_ops::new_id;

/// Error type for tag and tag-category operations
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("tag category not found: {0}")]
    CategoryNotFound(String),
    #[error("name is empty")]
    EmptyName,
}

/// Trimmed tag without a leading `#`
pub fn clean_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches('#')
}

pub fn create_tag_category(ws: &mut Workspace, name: &str) -> Result<String, TagError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TagError::EmptyName);
    }
    let id = new_id();
    ws.tag_categories
        .push(TagCategory::new(id.clone(), name.to_string()));
    Ok(id)
}

/// Drop the grouping; its tags become uncategorized. Tasks are untouched.
pub fn delete_tag_category(ws: &mut Workspace, id: &str) -> Result<TagCategory, TagError> {
    let idx = ws
        .tag_categories
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| TagError::CategoryNotFound(id.to_string()))?;
    Ok(ws.tag_categories.remove(idx))
}

pub fn rename_tag_category(ws: &mut Workspace, id: &str, new_name: &str) -> Result<(), TagError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(TagError::EmptyName);
    }
    let cat = ws
        .find_category_mut(id)
        .ok_or_else(|| TagError::CategoryNotFound(id.to_string()))?;
    cat.name = new_name.to_string();
    Ok(())
}

/// Take `tag` out of every category, then file it under `category_id`
/// (kept sorted), or leave it uncategorized with `None`.
pub fn move_tag_to_category(
    ws: &mut Workspace,
    tag: &str,
    category_id: Option<&str>,
) -> Result<(), TagError> {
    let tag = clean_tag(tag);
    if tag.is_empty() {
        return Err(TagError::EmptyName);
    }
    if let Some(cid) = category_id
        && !ws.tag_categories.iter().any(|c| c.id == cid)
    {
        return Err(TagError::CategoryNotFound(cid.to_string()));
    }

    for cat in ws.tag_categories.iter_mut() {
        cat.remove(tag);
    }
    if let Some(cid) = category_id
        && let Some(cat) = ws.find_category_mut(cid)
    {
        cat.insert_sorted(tag);
    }
    Ok(())
}

/// Rename a tag on every task carrying it and in the category records.
/// Returns the number of tasks rewritten.
pub fn rename_tag(ws: &mut Workspace, old: &str, new: &str) -> Result<usize, TagError> {
    let old = clean_tag(old);
    let new = clean_tag(new);
    if new.is_empty() {
        return Err(TagError::EmptyName);
    }
    if old == new {
        return Ok(0);
    }

    let mut changed = 0;
    for task in ws.tasks.iter_mut().filter(|t| t.has_tag(old)) {
        let tags: Vec<String> = task
            .tags
            .iter()
            .map(|t| if t == old { new.to_string() } else { t.clone() })
            .collect();
        task.set_tags(tags);
        changed += 1;
    }

    let new_is_filed = ws.tag_categories.iter().any(|c| c.contains(new));
    for cat in ws.tag_categories.iter_mut() {
        if cat.remove(old) && !new_is_filed {
            cat.insert_sorted(new);
        }
    }
    Ok(changed)
}

/// Remove a tag from every task and every category.
/// Returns the number of tasks touched.
pub fn delete_tag(ws: &mut Workspace, tag: &str) -> usize {
    let tag = clean_tag(tag);
    let mut changed = 0;
    for task in ws.tasks.iter_mut().filter(|t| t.has_tag(tag)) {
        let tags: Vec<String> = task.tags.iter().filter(|t| *t != tag).cloned().collect();
        task.set_tags(tags);
        changed += 1;
    }
    for cat in ws.tag_categories.iter_mut() {
        cat.remove(tag);
    }
    changed
}
