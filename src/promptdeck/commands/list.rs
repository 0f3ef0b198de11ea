use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Category, Family};
use crate::store::{KeyValueStore, LibraryStore};

/// One category and the items under it, in display order. Empty categories
/// are omitted.
#[derive(Debug, Clone)]
pub struct ListedGroup {
    pub category: Category,
    pub items: Vec<ListedItem>,
}

#[derive(Debug, Clone)]
pub struct ListedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Present for checkpoints only.
    pub saved_at: Option<String>,
}

/// Group one kind of item under its categories, optionally restricted to a
/// single category and/or a case-insensitive substring match over title and
/// body. A filter naming a category that no longer exists falls back to all
/// categories, since the caller's selection may be stale.
pub fn run<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    family: Family,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<CmdResult> {
    let mut library = store.load();
    library.normalize();

    let mut result = CmdResult::default();

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let mut wanted = category.map(str::to_string);
    if let Some(id) = &wanted {
        if !library.family_categories(family).iter().any(|c| &c.id == id) {
            result.add_message(CmdMessage::warning(format!(
                "Unknown {} \"{}\"; showing all.",
                family.category_label(),
                id
            )));
            wanted = None;
        }
    }

    let matches = |title: &str, body: &str| match &needle {
        Some(needle) => {
            title.to_lowercase().contains(needle) || body.to_lowercase().contains(needle)
        }
        None => true,
    };

    let mut groups = Vec::new();
    for cat in library.family_categories(family) {
        if let Some(id) = &wanted {
            if &cat.id != id {
                continue;
            }
        }

        let items: Vec<ListedItem> = match family {
            Family::Prompt => library
                .prompts
                .iter()
                .filter(|p| p.category_id == cat.id)
                .filter(|p| matches(&p.title, &p.body))
                .map(|p| ListedItem {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    description: String::new(),
                    body: p.body.clone(),
                    saved_at: None,
                })
                .collect(),
            Family::Checkpoint => library
                .checkpoints
                .iter()
                .filter(|c| c.category_id == cat.id)
                .filter(|c| matches(&c.title, &c.body))
                .map(|c| ListedItem {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    description: c.description.clone(),
                    body: c.body.clone(),
                    saved_at: Some(c.saved_at.clone()),
                })
                .collect(),
        };
        if items.is_empty() {
            continue;
        }
        groups.push(ListedGroup {
            category: cat.clone(),
            items,
        });
    }

    Ok(result.with_groups(groups))
}
