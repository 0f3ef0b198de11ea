use std::thread;
use std::time::Duration;

use super::{CmdMessage, CmdResult};
use crate::composer::{Composer, SubmitOutcome};
use crate::error::{DeckError, Result};
use crate::model::Family;
use crate::store::{KeyValueStore, LibraryStore};

/// Settle time between inserting text and attempting auto-submit, so the
/// target can react to the insertion first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(60);

/// Hand an item's body to the composer. A missing target aborts with an
/// error and is not retried or queued; a skipped auto-submit is silent and
/// the text stays inserted either way.
pub fn run<S: KeyValueStore, C: Composer>(
    store: &mut LibraryStore<S>,
    composer: &mut C,
    family: Family,
    id: &str,
    settle: Duration,
) -> Result<CmdResult> {
    let mut library = store.load();
    library.normalize();

    let item = match family {
        Family::Prompt => library
            .prompts
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.title.clone(), p.body.clone())),
        Family::Checkpoint => library
            .checkpoints
            .iter()
            .find(|c| c.id == id)
            .map(|c| (c.title.clone(), c.body.clone())),
    };
    let (title, body) =
        item.ok_or_else(|| DeckError::NotFound(family.item_label(), id.to_string()))?;

    if !composer.insert_text(&body) {
        return Err(DeckError::ComposerUnavailable);
    }
    if !settle.is_zero() {
        thread::sleep(settle);
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Inserted: {}", title)));

    if store.auto_send() {
        if let SubmitOutcome::Attempted = composer.try_submit() {
            result.add_message(CmdMessage::info("Auto-send attempted."));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::BufferComposer;
    use crate::store::memory::MemoryKv;

    fn store() -> LibraryStore<MemoryKv> {
        LibraryStore::new(MemoryKv::new())
    }

    #[test]
    fn inserts_the_item_body() {
        let mut store = store();
        let mut composer = BufferComposer::new();
        run(
            &mut store,
            &mut composer,
            Family::Prompt,
            "p_blank_scaffold",
            Duration::ZERO,
        )
        .unwrap();
        assert!(composer.text.starts_with("Context:"));
        assert_eq!(composer.submits, 0);
    }

    #[test]
    fn appends_with_a_blank_line_separator() {
        let mut store = store();
        let mut composer = BufferComposer::new();
        composer.text = "draft".to_string();
        run(
            &mut store,
            &mut composer,
            Family::Prompt,
            "p_blank_scaffold",
            Duration::ZERO,
        )
        .unwrap();
        assert!(composer.text.starts_with("draft\n\nContext:"));
    }

    #[test]
    fn missing_target_aborts_with_composer_error() {
        let mut store = store();
        let mut composer = BufferComposer::unavailable();
        let err = run(
            &mut store,
            &mut composer,
            Family::Prompt,
            "p_blank_scaffold",
            Duration::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, DeckError::ComposerUnavailable));
        assert!(composer.text.is_empty());
    }

    #[test]
    fn unknown_item_reports_not_found() {
        let mut store = store();
        let mut composer = BufferComposer::new();
        let err = run(
            &mut store,
            &mut composer,
            Family::Checkpoint,
            "ghost",
            Duration::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, DeckError::NotFound("checkpoint", _)));
    }

    #[test]
    fn auto_send_submits_after_insertion() {
        let mut store = store();
        store.set_auto_send(true);
        let mut composer = BufferComposer::new();
        run(
            &mut store,
            &mut composer,
            Family::Prompt,
            "p_blank_scaffold",
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(composer.submits, 1);
    }

    #[test]
    fn auto_send_off_never_submits() {
        let mut store = store();
        let mut composer = BufferComposer::new();
        run(
            &mut store,
            &mut composer,
            Family::Prompt,
            "p_blank_scaffold",
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(composer.submits, 0);
    }
}
