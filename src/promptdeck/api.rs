//! # API Facade
//!
//! `DeckApi` is a thin facade over the command layer: the single entry point
//! for any UI. It dispatches to commands, normalizes friendly references
//! (a category name or an item title in place of a generated id) and returns
//! structured `Result` types. No business logic, no terminal I/O.

use std::time::Duration;

use crate::commands;
use crate::composer::Composer;
use crate::error::{DeckError, Result};
use crate::model::{Family, Library};
use crate::store::{KeyValueStore, LibraryStore};

pub use crate::commands::checkpoint::CheckpointUpdate;
pub use crate::commands::export::Envelope;
pub use crate::commands::import::{ImportDiff, ImportPlan};
pub use crate::commands::list::{ListedGroup, ListedItem};
pub use crate::commands::prompt::PromptUpdate;
pub use crate::commands::reset::ResetMode;
pub use crate::commands::{CmdMessage, CmdResult, Direction, MessageLevel};

/// The main API facade. Generic over the persistence primitive so UIs and
/// tests can pick their backend.
pub struct DeckApi<S: KeyValueStore> {
    store: LibraryStore<S>,
}

impl<S: KeyValueStore> DeckApi<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: LibraryStore::new(kv),
        }
    }

    /// A normalized snapshot of the current document, for render
    /// reconciliation.
    pub fn library(&mut self) -> Library {
        let mut library = self.store.load();
        library.normalize();
        library
    }

    // --- Reference resolution ---

    /// Resolve a category reference, an id or an exact name (first match
    /// in display order), to its id.
    pub fn resolve_category(&mut self, family: Family, reference: &str) -> Result<String> {
        let library = self.store.load();
        let categories = library.family_categories(family);
        categories
            .iter()
            .find(|c| c.id == reference)
            .or_else(|| categories.iter().find(|c| c.name == reference))
            .map(|c| c.id.clone())
            .ok_or_else(|| DeckError::NotFound(family.category_label(), reference.to_string()))
    }

    /// Resolve an item reference, an id or an exact title (first match in
    /// display order), to its id.
    pub fn resolve_item(&mut self, family: Family, reference: &str) -> Result<String> {
        let library = self.store.load();
        let found = match family {
            Family::Prompt => library
                .prompts
                .iter()
                .find(|p| p.id == reference)
                .or_else(|| library.prompts.iter().find(|p| p.title == reference))
                .map(|p| p.id.clone()),
            Family::Checkpoint => library
                .checkpoints
                .iter()
                .find(|c| c.id == reference)
                .or_else(|| library.checkpoints.iter().find(|c| c.title == reference))
                .map(|c| c.id.clone()),
        };
        found.ok_or_else(|| DeckError::NotFound(family.item_label(), reference.to_string()))
    }

    // --- Categories (both families) ---

    pub fn add_category(&mut self, family: Family, name: &str) -> Result<CmdResult> {
        commands::category::add(&mut self.store, family, name)
    }

    pub fn rename_category(
        &mut self,
        family: Family,
        id: &str,
        new_name: &str,
    ) -> Result<CmdResult> {
        commands::category::rename(&mut self.store, family, id, new_name)
    }

    pub fn move_category(
        &mut self,
        family: Family,
        id: &str,
        direction: Direction,
    ) -> Result<CmdResult> {
        commands::category::reorder(&mut self.store, family, id, direction)
    }

    pub fn delete_category(&mut self, family: Family, id: &str) -> Result<CmdResult> {
        commands::category::delete(&mut self.store, family, id)
    }

    // --- Prompts ---

    pub fn create_prompt(
        &mut self,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<CmdResult> {
        commands::prompt::create(&mut self.store, category_id, title, body)
    }

    pub fn update_prompt(&mut self, id: &str, update: PromptUpdate) -> Result<CmdResult> {
        commands::prompt::update(&mut self.store, id, update)
    }

    pub fn delete_prompt(&mut self, id: &str) -> Result<CmdResult> {
        commands::prompt::delete(&mut self.store, id)
    }

    pub fn move_prompt(&mut self, id: &str, direction: Direction) -> Result<CmdResult> {
        commands::prompt::reorder(&mut self.store, id, direction)
    }

    // --- Checkpoints ---

    pub fn create_checkpoint(
        &mut self,
        category_id: &str,
        title: &str,
        description: &str,
        body: &str,
    ) -> Result<CmdResult> {
        commands::checkpoint::create(&mut self.store, category_id, title, description, body)
    }

    pub fn update_checkpoint(&mut self, id: &str, update: CheckpointUpdate) -> Result<CmdResult> {
        commands::checkpoint::update(&mut self.store, id, update)
    }

    pub fn delete_checkpoint(&mut self, id: &str) -> Result<CmdResult> {
        commands::checkpoint::delete(&mut self.store, id)
    }

    pub fn move_checkpoint(&mut self, id: &str, direction: Direction) -> Result<CmdResult> {
        commands::checkpoint::reorder(&mut self.store, id, direction)
    }

    // --- Listing, reset, exchange, insertion ---

    pub fn list(
        &mut self,
        family: Family,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<CmdResult> {
        commands::list::run(&mut self.store, family, category, search)
    }

    pub fn reset(&mut self, mode: ResetMode) -> Result<CmdResult> {
        commands::reset::run(&mut self.store, mode)
    }

    pub fn export(&mut self) -> Result<CmdResult> {
        commands::export::run(&mut self.store)
    }

    pub fn import_inspect(&mut self, text: &str) -> Result<ImportPlan> {
        commands::import::inspect(&mut self.store, text)
    }

    pub fn import_commit(&mut self, plan: ImportPlan) -> Result<CmdResult> {
        commands::import::commit(&mut self.store, plan)
    }

    pub fn insert<C: Composer>(
        &mut self,
        composer: &mut C,
        family: Family,
        id: &str,
        settle: Duration,
    ) -> Result<CmdResult> {
        commands::insert::run(&mut self.store, composer, family, id, settle)
    }

    pub fn auto_send(&self) -> bool {
        self.store.auto_send()
    }

    pub fn set_auto_send(&mut self, enabled: bool) {
        self.store.set_auto_send(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryKv;

    fn api() -> DeckApi<MemoryKv> {
        DeckApi::new(MemoryKv::new())
    }

    #[test]
    fn resolves_categories_by_id_or_name() {
        let mut api = api();
        assert_eq!(
            api.resolve_category(Family::Prompt, "cat_scratch").unwrap(),
            "cat_scratch"
        );
        assert_eq!(
            api.resolve_category(Family::Prompt, "Scratch").unwrap(),
            "cat_scratch"
        );
        assert!(api.resolve_category(Family::Prompt, "ghost").is_err());
    }

    #[test]
    fn resolves_items_by_id_or_title() {
        let mut api = api();
        assert_eq!(
            api.resolve_item(Family::Prompt, "Blank scaffold").unwrap(),
            "p_blank_scaffold"
        );
        assert!(api.resolve_item(Family::Checkpoint, "Blank scaffold").is_err());
    }

    #[test]
    fn library_snapshot_is_normalized() {
        let mut api = api();
        api.delete_category(Family::Prompt, "cat_work").unwrap();
        let library = api.library();
        assert_eq!(library.prompts.len(), 2);
    }
}
