//! Two-phase import: `inspect` validates and produces a diff for the caller
//! to confirm; `commit` snapshots the current document into the backup slot
//! and replaces the store. Nothing is mutated before `commit`.

use serde::Serialize;
use serde_json::Value;

use super::export::SCHEMA;
use super::{CmdMessage, CmdResult};
use crate::error::{DeckError, Result};
use crate::model::{now_iso, Library, LibraryCounts};
use crate::store::{library_from_value, KeyValueStore, LibraryStore};
use crate::validate;

/// Count summary surfaced for confirmation before a replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportDiff {
    pub current: LibraryCounts,
    pub incoming: LibraryCounts,
}

/// A validated, backfilled candidate waiting for confirmation.
#[derive(Debug)]
pub struct ImportPlan {
    pub incoming: Library,
    pub diff: ImportDiff,
}

/// Wrapper shape of an import file, resolved once at the boundary: an
/// object carrying both `meta` and `data` keys is an envelope, anything
/// else is a bare library document.
enum ImportInput {
    Envelope(Value),
    Bare(Value),
}

impl ImportInput {
    fn decode(mut root: Value) -> Self {
        if let Value::Object(map) = &mut root {
            if map.contains_key("meta") && map.contains_key("data") {
                if let Some(data) = map.remove("data") {
                    return ImportInput::Envelope(data);
                }
            }
        }
        ImportInput::Bare(root)
    }

    fn into_candidate(self) -> Value {
        match self {
            ImportInput::Envelope(data) => data,
            ImportInput::Bare(document) => document,
        }
    }
}

pub fn inspect<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    text: &str,
) -> Result<ImportPlan> {
    let root: Value = serde_json::from_str(text)
        .map_err(|_| DeckError::Validation("file was not valid JSON".to_string()))?;
    let candidate = ImportInput::decode(root).into_candidate();

    validate::validate(&candidate)?;

    // backfill optional collections exactly as load() does
    let incoming = library_from_value(&candidate).ok_or_else(|| {
        DeckError::Validation("document does not fit the library model".to_string())
    })?;

    let current = store.load();
    Ok(ImportPlan {
        diff: ImportDiff {
            current: current.counts(),
            incoming: incoming.counts(),
        },
        incoming,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupMeta {
    backed_up_at: String,
    schema: String,
    script_version: String,
}

#[derive(Serialize)]
struct BackupEnvelope<'a> {
    meta: BackupMeta,
    data: &'a Library,
}

pub fn commit<S: KeyValueStore>(
    store: &mut LibraryStore<S>,
    plan: ImportPlan,
) -> Result<CmdResult> {
    let current = store.load();
    let backup = BackupEnvelope {
        meta: BackupMeta {
            backed_up_at: now_iso(),
            schema: SCHEMA.to_string(),
            script_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        data: &current,
    };
    if let Ok(json) = serde_json::to_string(&backup) {
        store.write_backup(&json);
    }

    let mut incoming = plan.incoming;
    incoming.normalize();
    store.save(&incoming);

    let counts = incoming.counts();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Library replaced: {} categories, {} prompts, {} checkpoint categories, {} checkpoints",
        counts.categories, counts.prompts, counts.checkpoint_categories, counts.checkpoints
    )));
    Ok(result)
}
