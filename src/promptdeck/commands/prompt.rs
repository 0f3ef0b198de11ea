use super::helpers::swap_with_sibling;
use super::{CmdMessage, CmdResult, Direction};
use crate::error::{DeckError, Result};
use crate::model::Prompt;
use crate::store::{KeyValueStore, LibraryStore};

/// Partial update; `None` keeps the current value. Category reassignment is
/// the only way a prompt moves between categories.
#[derive(Debug, Clone, Default)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<String>,
}

pub fn create<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    category_id: &str,
    title: &str,
    body: &str,
) -> Result<CmdResult> {
    let category_id = category_id.trim();
    let title = title.trim();
    let body = body.trim();

    let mut library = store.load();
    if library.categories.is_empty() {
        return Err(DeckError::NoCategories);
    }
    if title.is_empty() {
        return Err(DeckError::EmptyField("title"));
    }
    if body.is_empty() {
        return Err(DeckError::EmptyField("body"));
    }
    if category_id.is_empty() {
        return Err(DeckError::EmptyField("category"));
    }
    if !library.categories.iter().any(|c| c.id == category_id) {
        return Err(DeckError::NotFound("category", category_id.to_string()));
    }

    let prompt = Prompt::new(category_id, title, body);
    let id = prompt.id.clone();
    library.prompts.push(prompt);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt created: {} ({})",
        title, id
    )));
    Ok(result)
}

/// Rejected with not-found when the id no longer exists; the entity may
/// have been deleted by another writer since the caller last rendered.
pub fn update<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    id: &str,
    update: PromptUpdate,
) -> Result<CmdResult> {
    let mut library = store.load();
    let index = library
        .prompts
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| DeckError::NotFound("prompt", id.to_string()))?;

    if let Some(category_id) = &update.category_id {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err(DeckError::EmptyField("category"));
        }
        if !library.categories.iter().any(|c| c.id == category_id) {
            return Err(DeckError::NotFound("category", category_id.to_string()));
        }
        library.prompts[index].category_id = category_id.to_string();
    }
    if let Some(title) = &update.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(DeckError::EmptyField("title"));
        }
        library.prompts[index].title = title.to_string();
    }
    if let Some(body) = &update.body {
        let body = body.trim();
        if body.is_empty() {
            return Err(DeckError::EmptyField("body"));
        }
        library.prompts[index].body = body.to_string();
    }

    let title = library.prompts[index].title.clone();
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Prompt updated: {}", title)));
    Ok(result)
}

/// Deleting a stale id is a no-op.
pub fn delete<S: KeyValueStore>(store: &mut LibraryStore<S>, id: &str) -> Result<CmdResult> {
    let mut library = store.load();
    let index = match library.prompts.iter().position(|p| p.id == id) {
        Some(index) => index,
        None => return Ok(CmdResult::default()),
    };
    let removed = library.prompts.remove(index);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt deleted: {}",
        removed.title
    )));
    Ok(result)
}

/// Reorder within same-category siblings only; boundary moves and stale
/// ids are no-ops.
pub fn reorder<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    id: &str,
    direction: Direction,
) -> Result<CmdResult> {
    let mut library = store.load();
    let moved = swap_with_sibling(
        &mut library.prompts,
        |p| &p.category_id,
        |p| &p.id,
        id,
        direction,
    );
    if !moved {
        return Ok(CmdResult::default());
    }
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Prompt moved {}",
        match direction {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    )));
    Ok(result)
}
