use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::{DeckError, Result};

/// In-memory key-value store for testing. Does NOT persist data.
#[derive(Default)]
pub struct MemoryKv {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, for discarded-write path tests.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(DeckError::Store("Simulated write error".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
