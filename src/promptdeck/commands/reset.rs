use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{sample_library, Library};
use crate::store::{KeyValueStore, LibraryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Replace the document with all-empty collections.
    Clear,
    /// Replace the document with a deep copy of the fixed seed.
    Sample,
}

pub fn run<S: KeyValueStore>(store: &mut LibraryStore<S>, mode: ResetMode) -> Result<CmdResult> {
    let library = match mode {
        ResetMode::Clear => Library::default(),
        ResetMode::Sample => sample_library(),
    };
    store.save(&library);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(match mode {
        ResetMode::Clear => "Library cleared.",
        ResetMode::Sample => "Sample library restored.",
    }));
    Ok(result)
}
