use serde::{Deserialize, Serialize};

/// Reserved id of the permanent "My Day" list
pub const MY_DAY_LIST_ID: &str = "1";

/// Icon used when a list or folder names an icon we don't know
pub const FALLBACK_ICON: &str = "Home";

pub const AVAILABLE_ICONS: &[&str] = &[
    "Sun",
    "Briefcase",
    "ShoppingBag",
    "Lightbulb",
    "Home",
    "Star",
    "Heart",
    "Zap",
    "Coffee",
    "Music",
    "Book",
    "Code",
];

/// Color identifier shared by lists and folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorId {
    Rose,
    Blue,
    Green,
    Amber,
    Violet,
    Cyan,
    #[serde(other)]
    Slate,
}

impl ColorId {
    pub const ALL: [ColorId; 7] = [
        ColorId::Rose,
        ColorId::Blue,
        ColorId::Green,
        ColorId::Amber,
        ColorId::Violet,
        ColorId::Cyan,
        ColorId::Slate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorId::Rose => "rose",
            ColorId::Blue => "blue",
            ColorId::Green => "green",
            ColorId::Amber => "amber",
            ColorId::Violet => "violet",
            ColorId::Cyan => "cyan",
            ColorId::Slate => "slate",
        }
    }
}

impl std::fmt::Display for ColorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(alias = "colorId")]
    pub color: ColorId,
    #[serde(alias = "iconId")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl List {
    pub fn new(id: &str, name: &str, color: ColorId, icon: &str) -> Self {
        List {
            id: id.to_string(),
            name: name.to_string(),
            color,
            icon: icon.to_string(),
            folder_id: None,
        }
    }

    pub fn is_my_day(&self) -> bool {
        self.id == MY_DAY_LIST_ID
    }
}

/// A grouping container for lists in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(alias = "colorId")]
    pub color: ColorId,
    #[serde(alias = "iconId")]
    pub icon: String,
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
}

fn default_expanded() -> bool {
    true
}

/// Id of the folder introduced with schema version 2
pub const DEFAULT_FOLDER_ID: &str = "personal";

/// The built-in lists a fresh install starts with
pub fn default_lists() -> Vec<List> {
    let mut health = List::new("5", "Health", ColorId::Cyan, "Heart");
    health.folder_id = Some(DEFAULT_FOLDER_ID.to_string());
    vec![
        List::new(MY_DAY_LIST_ID, "My Day", ColorId::Rose, "Sun"),
        List::new("2", "Work", ColorId::Blue, "Briefcase"),
        List::new("3", "Groceries", ColorId::Green, "ShoppingBag"),
        health,
        List::new("4", "Ideas", ColorId::Amber, "Lightbulb"),
    ]
}

/// The built-in folders a fresh install starts with
pub fn default_folders() -> Vec<Folder> {
    vec![Folder {
        id: DEFAULT_FOLDER_ID.to_string(),
        name: "Personal".to_string(),
        color: ColorId::Violet,
        icon: "Home".to_string(),
        is_expanded: true,
    }]
}

/// Resolve an icon name for display
pub fn display_icon(icon: &str) -> &str {
    if AVAILABLE_ICONS.contains(&icon) {
        icon
    } else {
        FALLBACK_ICON
    }
}
