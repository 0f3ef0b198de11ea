use super::{CmdMessage, CmdResult, Direction};
use crate::error::{DeckError, Result};
use crate::model::{Category, Family};
use crate::store::{KeyValueStore, LibraryStore};

pub fn add<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    family: Family,
    name: &str,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeckError::EmptyField("category name"));
    }

    let mut library = store.load();
    let category = Category::new(family, name);
    let id = category.id.clone();
    library.family_categories_mut(family).push(category);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created {} \"{}\" ({})",
        family.category_label(),
        name,
        id
    )));
    Ok(result)
}

/// Renaming to an empty name, or renaming a stale id, is a no-op.
pub fn rename<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    family: Family,
    id: &str,
    new_name: &str,
) -> Result<CmdResult> {
    let new_name = new_name.trim();
    let mut result = CmdResult::default();
    if new_name.is_empty() {
        return Ok(result);
    }

    let mut library = store.load();
    let renamed = match library
        .family_categories_mut(family)
        .iter_mut()
        .find(|c| c.id == id)
    {
        Some(category) => {
            category.name = new_name.to_string();
            true
        }
        None => false,
    };
    if !renamed {
        return Ok(result);
    }

    store.save(&library);
    result.add_message(CmdMessage::success(format!(
        "Renamed {} to \"{}\"",
        family.category_label(),
        new_name
    )));
    Ok(result)
}

/// Swap with the adjacent sibling in display order; no-op at the boundary
/// or on a stale id.
pub fn reorder<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    family: Family,
    id: &str,
    direction: Direction,
) -> Result<CmdResult> {
    let mut library = store.load();
    let categories = library.family_categories_mut(family);

    let index = match categories.iter().position(|c| c.id == id) {
        Some(index) => index,
        None => return Ok(CmdResult::default()),
    };
    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < categories.len() => index + 1,
        _ => return Ok(CmdResult::default()),
    };
    categories.swap(index, target);
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Moved {} {}",
        family.category_label(),
        match direction {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    )));
    Ok(result)
}

/// Remove the category, then every item referencing it, inside one
/// load-save cycle, so readers never observe the half-applied state.
pub fn delete<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    family: Family,
    id: &str,
) -> Result<CmdResult> {
    let mut library = store.load();

    let index = match library
        .family_categories(family)
        .iter()
        .position(|c| c.id == id)
    {
        Some(index) => index,
        None => return Ok(CmdResult::default()),
    };
    let removed = library.family_categories_mut(family).remove(index);

    let orphaned = match family {
        Family::Prompt => {
            let before = library.prompts.len();
            library.prompts.retain(|p| p.category_id != removed.id);
            before - library.prompts.len()
        }
        Family::Checkpoint => {
            let before = library.checkpoints.len();
            library.checkpoints.retain(|c| c.category_id != removed.id);
            before - library.checkpoints.len()
        }
    };
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted {} \"{}\" and {} {}(s)",
        family.category_label(),
        removed.name,
        orphaned,
        family.item_label()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_library;
    use crate::store::memory::MemoryKv;

    fn store() -> LibraryStore<MemoryKv> {
        LibraryStore::new(MemoryKv::new())
    }

    #[test]
    fn add_appends_to_the_end() {
        let mut store = store();
        add(&mut store, Family::Prompt, "Recipes").unwrap();
        let library = store.load();
        assert_eq!(library.categories.last().unwrap().name, "Recipes");
        assert_eq!(library.categories.len(), 4);
        // the checkpoint family is untouched
        assert_eq!(library.checkpoint_categories.len(), 3);
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut store = store();
        let err = add(&mut store, Family::Prompt, "   ").unwrap_err();
        assert!(matches!(err, DeckError::EmptyField("category name")));
    }

    #[test]
    fn rename_trims_and_applies() {
        let mut store = store();
        rename(&mut store, Family::Prompt, "cat_scratch", "  Drafts  ").unwrap();
        let library = store.load();
        let category = library.categories.iter().find(|c| c.id == "cat_scratch");
        assert_eq!(category.unwrap().name, "Drafts");
    }

    #[test]
    fn rename_to_blank_is_a_no_op() {
        let mut store = store();
        let result = rename(&mut store, Family::Prompt, "cat_scratch", "  ").unwrap();
        assert!(result.messages.is_empty());
        let library = store.load();
        let category = library.categories.iter().find(|c| c.id == "cat_scratch");
        assert_eq!(category.unwrap().name, "Scratch");
    }

    #[test]
    fn rename_of_stale_id_is_a_no_op() {
        let mut store = store();
        let result = rename(&mut store, Family::Prompt, "ghost", "Name").unwrap();
        assert!(result.messages.is_empty());
    }

    #[test]
    fn reorder_swaps_neighbors_and_stops_at_boundaries() {
        let mut store = store();
        reorder(&mut store, Family::Prompt, "cat_science", Direction::Up).unwrap();
        let ids: Vec<String> = store.load().categories.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["cat_science", "cat_work", "cat_scratch"]);

        // already first: no-op
        reorder(&mut store, Family::Prompt, "cat_science", Direction::Up).unwrap();
        let ids: Vec<String> = store.load().categories.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["cat_science", "cat_work", "cat_scratch"]);
    }

    #[test]
    fn reorder_pair_restores_original_order() {
        let mut store = store();
        let before = store.load();
        reorder(&mut store, Family::Prompt, "cat_science", Direction::Down).unwrap();
        reorder(&mut store, Family::Prompt, "cat_science", Direction::Up).unwrap();
        assert_eq!(store.load(), before);
    }

    #[test]
    fn delete_cascades_to_attached_prompts_only() {
        let mut store = store();
        assert_eq!(store.load(), sample_library());

        delete(&mut store, Family::Prompt, "cat_work").unwrap();
        let library = store.load();
        assert_eq!(library.categories.len(), 2);
        assert_eq!(library.prompts.len(), 2);
        let ids: Vec<&str> = library.prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p_first_principles", "p_blank_scaffold"]);
        // the checkpoint category family keeps its own cat_work entry
        assert!(library
            .checkpoint_categories
            .iter()
            .any(|c| c.id == "cat_work"));
    }

    #[test]
    fn delete_of_stale_id_is_a_no_op() {
        let mut store = store();
        let before = store.load();
        delete(&mut store, Family::Prompt, "ghost").unwrap();
        assert_eq!(store.load(), before);
    }

    #[test]
    fn checkpoint_family_cascade_removes_checkpoints() {
        let mut store = store();
        let mut library = store.load();
        library.checkpoints.push(crate::model::Checkpoint::new(
            "cat_work",
            "State",
            "",
            "body",
        ));
        store.save(&library);

        delete(&mut store, Family::Checkpoint, "cat_work").unwrap();
        let library = store.load();
        assert_eq!(library.checkpoint_categories.len(), 2);
        assert!(library.checkpoints.is_empty());
        // prompt-side cat_work and its prompts are untouched
        assert!(library.categories.iter().any(|c| c.id == "cat_work"));
        assert_eq!(library.prompts.len(), 4);
    }
}
