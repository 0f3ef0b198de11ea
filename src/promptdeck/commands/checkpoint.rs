use super::helpers::swap_with_sibling;
use super::{CmdMessage, CmdResult, Direction};
use crate::error::{DeckError, Result};
use crate::model::{now_iso, Checkpoint};
use crate::store::{KeyValueStore, LibraryStore};

/// Partial update; `None` keeps the current value. `savedAt` is not here on
/// purpose: it is stamped on every create and update, never user-set.
#[derive(Debug, Clone, Default)]
pub struct CheckpointUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<String>,
}

pub fn create<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    category_id: &str,
    title: &str,
    description: &str,
    body: &str,
) -> Result<CmdResult> {
    let category_id = category_id.trim();
    let title = title.trim();
    let description = description.trim();
    let body = body.trim();

    let mut library = store.load();
    if library.checkpoint_categories.is_empty() {
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
    if !library
        .checkpoint_categories
        .iter()
        .any(|c| c.id == category_id)
    {
        return Err(DeckError::NotFound(
            "checkpoint category",
            category_id.to_string(),
        ));
    }

    let checkpoint = Checkpoint::new(category_id, title, description, body);
    let id = checkpoint.id.clone();
    library.checkpoints.push(checkpoint);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Checkpoint saved: {} ({})",
        title, id
    )));
    Ok(result)
}

pub fn update<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    id: &str,
    update: CheckpointUpdate,
) -> Result<CmdResult> {
    let mut library = store.load();
    let index = library
        .checkpoints
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| DeckError::NotFound("checkpoint", id.to_string()))?;

    if let Some(category_id) = &update.category_id {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err(DeckError::EmptyField("category"));
        }
        if !library
            .checkpoint_categories
            .iter()
            .any(|c| c.id == category_id)
        {
            return Err(DeckError::NotFound(
                "checkpoint category",
                category_id.to_string(),
            ));
        }
        library.checkpoints[index].category_id = category_id.to_string();
    }
    if let Some(title) = &update.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(DeckError::EmptyField("title"));
        }
        library.checkpoints[index].title = title.to_string();
    }
    if let Some(description) = &update.description {
        library.checkpoints[index].description = description.trim().to_string();
    }
    if let Some(body) = &update.body {
        let body = body.trim();
        if body.is_empty() {
            return Err(DeckError::EmptyField("body"));
        }
        library.checkpoints[index].body = body.to_string();
    }
    library.checkpoints[index].saved_at = now_iso();

    let title = library.checkpoints[index].title.clone();
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Checkpoint updated: {}", title)));
    Ok(result)
}

pub fn delete<S: KeyValueStore>(store: &mut LibraryStore<S>, id: &str) -> Result<CmdResult> {
    let mut library = store.load();
    let index = match library.checkpoints.iter().position(|c| c.id == id) {
        Some(index) => index,
        None => return Ok(CmdResult::default()),
    };
    let removed = library.checkpoints.remove(index);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Checkpoint deleted: {}",
        removed.title
    )));
    Ok(result)
}

pub fn reorder<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    id: &str,
    direction: Direction,
) -> Result<CmdResult> {
    let mut library = store.load();
    let moved = swap_with_sibling(
        &mut library.checkpoints,
        |c| &c.category_id,
        |c| &c.id,
        id,
        direction,
    );
    if !moved {
        return Ok(CmdResult::default());
    }
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Checkpoint moved {}",
        match direction {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    )));
    Ok(result)
}
