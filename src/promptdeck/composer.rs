//! The host text-input adapter seam.
//!
//! The core never probes for an editable target itself; it talks to a
//! [`Composer`] and treats it as best-effort. Insertion uses append
//! semantics (see [`append_separated`]); submitting is optional and never
//! fails loudly.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Outcome of a best-effort submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Attempted,
    Skipped,
}

pub trait Composer {
    /// Append text into the target. Returns `false` when no editable target
    /// is available; the caller surfaces that, there is no retry.
    fn insert_text(&mut self, text: &str) -> bool;

    /// Best-effort submit of whatever the target currently holds.
    fn try_submit(&mut self) -> SubmitOutcome;
}

/// Join new text onto existing content: a target already holding non-empty,
/// non-newline-terminated text gets a blank-line separator first.
pub fn append_separated(existing: &str, addition: &str) -> String {
    let separator = if !existing.is_empty() && !existing.ends_with('\n') {
        "\n\n"
    } else {
        ""
    };
    format!("{}{}{}", existing, separator, addition)
}

/// Composer writing into a plain text file, the CLI's insertion target.
/// Submit is not meaningful for a file and always reports `Skipped`.
pub struct FileComposer {
    path: PathBuf,
}

impl FileComposer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Composer for FileComposer {
    fn insert_text(&mut self, text: &str) -> bool {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(_) => return false,
        };
        fs::write(&self.path, append_separated(&existing, text)).is_ok()
    }

    fn try_submit(&mut self) -> SubmitOutcome {
        SubmitOutcome::Skipped
    }
}

/// In-memory composer for tests: an availability switch and a submit
/// counter.
#[derive(Default)]
pub struct BufferComposer {
    pub text: String,
    pub submits: usize,
    pub available: bool,
}

impl BufferComposer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            submits: 0,
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }
}

impl Composer for BufferComposer {
    fn insert_text(&mut self, text: &str) -> bool {
        if !self.available {
            return false;
        }
        self.text = append_separated(&self.text, text);
        true
    }

    fn try_submit(&mut self) -> SubmitOutcome {
        self.submits += 1;
        SubmitOutcome::Attempted
    }
}
