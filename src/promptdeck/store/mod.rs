//! # Storage Layer
//!
//! Persistence is split in two:
//!
//! - [`KeyValueStore`] is the host persistence primitive: an opaque,
//!   string-keyed map of string values with no transactional guarantees
//!   across keys. [`fs::FileKv`] is the production implementation (one file
//!   per key under a data directory); [`memory::MemoryKv`] backs tests.
//! - [`LibraryStore`] owns the canonical document on top of it: load with
//!   self-healing and seed fallback, whole-document save, the single
//!   pre-import backup slot, and the auto-send preference.
//!
//! Every operation elsewhere in the crate follows the same load-mutate-save
//! shape against this store. Load-mutate-save is not atomic against
//! concurrent writers; last-writer-wins is the conflict policy.

use serde_json::Value;

use crate::error::Result;
use crate::model::{sample_library, Category, Checkpoint, Library, Prompt};

pub mod fs;
pub mod memory;

/// Key holding the JSON-serialized library document.
pub const KEY_LIBRARY: &str = "pf_library_v1";
/// Key holding the boolean auto-send preference.
pub const KEY_AUTOSEND: &str = "pf_autosend_v1";
/// Key holding the single most-recent pre-import backup envelope.
pub const KEY_BACKUP_LAST: &str = "pf_library_backup_last";

/// Opaque string-keyed persistence primitive.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Owner of the canonical persisted document.
///
/// Persistence failures stop here: a failed read behaves as "no stored
/// value" and a failed write is discarded, so callers never see a
/// `KeyValueStore` error surface through a library operation.
pub struct LibraryStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> LibraryStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Direct access to the underlying primitive, for adapters and tests.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    /// Read the persisted document. An absent, unparseable, or structurally
    /// wrong value (missing `categories`/`prompts` arrays) is replaced with
    /// the fixed seed library, which is persisted before being returned.
    /// Optional collections are always backfilled, never left undefined.
    pub fn load(&mut self) -> Library {
        if let Some(raw) = self.kv.get(KEY_LIBRARY).ok().flatten() {
            if let Ok(value) = serde_json::from_str::<Value>(&raw) {
                if let Some(library) = library_from_value(&value) {
                    return library;
                }
            }
        }

        let seed = sample_library();
        self.save(&seed);
        seed
    }

    /// Serialize and persist the whole document, overwriting prior state
    /// unconditionally. A failed write is discarded.
    pub fn save(&mut self, library: &Library) {
        if let Ok(json) = serde_json::to_string(library) {
            let _ = self.kv.set(KEY_LIBRARY, &json);
        }
    }

    pub fn auto_send(&self) -> bool {
        matches!(self.kv.get(KEY_AUTOSEND), Ok(Some(v)) if v == "true")
    }

    pub fn set_auto_send(&mut self, enabled: bool) {
        let _ = self
            .kv
            .set(KEY_AUTOSEND, if enabled { "true" } else { "false" });
    }

    /// Overwrite the single backup slot with a pre-serialized envelope.
    pub fn write_backup(&mut self, envelope_json: &str) {
        let _ = self.kv.set(KEY_BACKUP_LAST, envelope_json);
    }

    pub fn last_backup(&self) -> Option<String> {
        self.kv.get(KEY_BACKUP_LAST).ok().flatten()
    }
}

/// Deserialize a JSON value into a [`Library`], backfilling the optional
/// collections: an absent (or malformed) `checkpoints` becomes empty, an
/// absent `checkpointCategories` is cloned from `categories`. An explicitly
/// empty `checkpointCategories` array is honored as-is.
///
/// Returns `None` when the required `categories`/`prompts` arrays are
/// missing or do not fit the model; the caller decides whether that means
/// reseeding (load) or rejection (import).
pub(crate) fn library_from_value(value: &Value) -> Option<Library> {
    let root = value.as_object()?;

    let categories: Vec<Category> =
        serde_json::from_value(root.get("categories")?.clone()).ok()?;
    let prompts: Vec<Prompt> = serde_json::from_value(root.get("prompts")?.clone()).ok()?;

    let checkpoints: Vec<Checkpoint> = root
        .get("checkpoints")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    let checkpoint_categories: Vec<Category> = match root
        .get("checkpointCategories")
        .and_then(|v| serde_json::from_value::<Vec<Category>>(v.clone()).ok())
    {
        Some(entries) => entries,
        None => categories.clone(),
    };

    Some(Library {
        categories,
        prompts,
        checkpoint_categories,
        checkpoints,
    })
}
