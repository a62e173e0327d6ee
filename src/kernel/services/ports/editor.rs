use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// 1-based, end-exclusive character range on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextRange {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl TextRange {
    pub fn on_line(line: usize, start_col: usize, len: usize) -> Self {
        Self {
            start_line: line,
            start_col,
            end_line: line,
            end_col: start_col + len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecorationStyle {
    Match,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decoration {
    pub range: TextRange,
    pub style: DecorationStyle,
}

/// Opaque id handed back by the host for an applied decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationHandle(pub u64);

/// Stable identity of a decorated view: resolved file path plus the owner
/// discriminator the decorations are registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecorationTarget {
    pub path: PathBuf,
    pub owner: String,
}

pub trait DecorationHost {
    /// Files currently shown in an editor.
    fn visible_files(&self) -> Vec<PathBuf>;

    /// Atomically replaces `old` with `new` on `target` and returns the
    /// handles of the newly applied decorations.
    fn apply_decoration_delta(
        &mut self,
        target: &DecorationTarget,
        old: &[DecorationHandle],
        new: &[Decoration],
    ) -> Vec<DecorationHandle>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

#[derive(Debug)]
pub enum EditError {
    Io { path: PathBuf, source: io::Error },
    OutOfRange { path: PathBuf, range: TextRange },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            EditError::OutOfRange { path, range } => write!(
                f,
                "Edit {}:{}-{}:{} out of range in {}",
                range.start_line,
                range.start_col,
                range.end_line,
                range.end_col,
                path.display()
            ),
        }
    }
}

impl std::error::Error for EditError {}

pub trait EditApplier {
    /// Applies `edits` to `source` in order; each edit's range is expressed
    /// in the coordinates left by the edits before it.
    fn apply_edit(&mut self, path: &Path, source: &str, edits: &[TextEdit])
        -> Result<(), EditError>;
}
