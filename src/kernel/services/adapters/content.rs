//! Content and edit adapters
//!
//! - FsContentSource / FsEditApplier: files on disk
//! - MemoryWorkspace: shared in-memory buffers implementing both sides

use crate::kernel::replace::splice_edits;
use crate::kernel::services::ports::{ContentError, ContentSource, EditApplier, EditError, TextEdit};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy)]
pub struct FsContentSource;

impl ContentSource for FsContentSource {
    fn read_full_text(&self, path: &Path) -> Result<String, ContentError> {
        std::fs::read_to_string(path).map_err(|e| ContentError::unavailable(path, e))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsEditApplier;

impl EditApplier for FsEditApplier {
    fn apply_edit(&mut self, path: &Path, source: &str, edits: &[TextEdit]) -> Result<(), EditError> {
        let text = splice_edits(source, edits).map_err(|range| EditError::OutOfRange {
            path: path.to_path_buf(),
            range,
        })?;
        std::fs::write(path, text).map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory file contents shared between clones. Serves reads and accepts
/// edits, so one workspace can back both ports of an engine.
#[derive(Debug, Default, Clone)]
pub struct MemoryWorkspace {
    files: Rc<RefCell<FxHashMap<PathBuf, String>>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), text.into());
    }

    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.borrow_mut().remove(path)
    }

    pub fn text(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }
}

impl ContentSource for MemoryWorkspace {
    fn read_full_text(&self, path: &Path) -> Result<String, ContentError> {
        self.text(path).ok_or_else(|| {
            ContentError::unavailable(path, io::Error::new(io::ErrorKind::NotFound, "no such buffer"))
        })
    }
}

impl EditApplier for MemoryWorkspace {
    fn apply_edit(&mut self, path: &Path, source: &str, edits: &[TextEdit]) -> Result<(), EditError> {
        let text = splice_edits(source, edits).map_err(|range| EditError::OutOfRange {
            path: path.to_path_buf(),
            range,
        })?;
        self.insert(path, text);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/content.rs"]
mod tests;
