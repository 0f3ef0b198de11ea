use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::{DeckError, Result};

/// File-backed key-value store: one file per key under a data directory.
///
/// Writes go through a sibling temp file and a rename so readers never see
/// a torn value.
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(DeckError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).map(Some).map_err(DeckError::Io)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_root()?;
        let path = self.key_path(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value).map_err(DeckError::Io)?;
        fs::rename(&tmp, &path).map_err(DeckError::Io)?;
        Ok(())
    }
}
