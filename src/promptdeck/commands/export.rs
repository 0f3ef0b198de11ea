use serde::{Deserialize, Serialize};

use super::CmdResult;
use crate::error::Result;
use crate::model::{now_iso, Library};
use crate::store::{KeyValueStore, LibraryStore};

/// Schema tag carried by every exported envelope.
pub const SCHEMA: &str = "pf_library_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub exported_at: String,
    pub schema: String,
    pub script_version: String,
}

/// The portable export wrapper. Its `data` sub-object is itself a valid
/// import document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub meta: ExportMeta,
    pub data: Library,
}

pub fn run<S: KeyValueStore>(store: &mut LibraryStore<S>) -> Result<CmdResult> {
    let mut library = store.load();
    library.normalize();

    let envelope = Envelope {
        meta: ExportMeta {
            exported_at: now_iso(),
            schema: SCHEMA.to_string(),
            script_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        data: library,
    };
    Ok(CmdResult::default().with_export(envelope))
}
