//! Folds streamed provider events into the [`ResultIndex`].

use std::path::{Component, Path};

use crate::kernel::results::{NodeId, ResultIndex};
use crate::kernel::services::ports::MatchEvent;
use crate::kernel::session::{Generation, SessionController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Folded {
    pub file: NodeId,
    /// `None` when the event duplicated an existing match.
    pub line: Option<NodeId>,
    pub new_file: bool,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    auto_collapse_threshold: usize,
    multi_root: bool,
}

impl Aggregator {
    pub fn new(auto_collapse_threshold: usize, multi_root: bool) -> Self {
        Self {
            auto_collapse_threshold,
            multi_root,
        }
    }

    pub fn set_multi_root(&mut self, multi_root: bool) {
        self.multi_root = multi_root;
    }

    pub fn on_match(
        &self,
        index: &mut ResultIndex,
        sessions: &SessionController,
        generation: Generation,
        search_id: u64,
        event: &MatchEvent,
    ) -> Option<Folded> {
        if sessions.is_stale(generation, search_id) {
            tracing::debug!(
                generation = generation.0,
                search_id,
                file = %event.file.display(),
                "dropping stale match"
            );
            return None;
        }

        let (name, relative_dir) = describe_file(&event.root, &event.file);
        let root = index.find_or_insert_root(&event.root, &root_name(&event.root), self.multi_root);
        let (file, new_file) =
            index.find_or_insert_file(root, &event.file, &name, &relative_dir)?;

        let line = index.insert_line(
            file,
            event.line,
            event.character,
            event.length,
            &event.line_text,
        );
        if line.is_none() {
            tracing::trace!(
                file = %event.file.display(),
                line = event.line,
                character = event.character,
                "duplicate match ignored"
            );
        }

        let mut collapsed = false;
        if line.is_some() {
            if let Some(entry) = index.file_mut(file) {
                if entry.match_count() == self.auto_collapse_threshold && entry.expanded {
                    entry.expanded = false;
                    collapsed = true;
                }
            }
        }

        Some(Folded {
            file,
            line,
            new_file,
            collapsed,
        })
    }

    /// Returns whether the completion belongs to the live session, in which
    /// case the caller reconciles.
    pub fn on_done(
        &self,
        sessions: &mut SessionController,
        generation: Generation,
        search_id: u64,
    ) -> bool {
        if sessions.is_stale(generation, search_id) {
            tracing::debug!(generation = generation.0, search_id, "dropping stale completion");
            return false;
        }
        sessions.mark_done(generation);
        true
    }
}

pub fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned())
}

/// Display name and root-relative directory of `file`.
pub fn describe_file(root: &Path, file: &Path) -> (String, String) {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string_lossy().into_owned());

    let relative = file.strip_prefix(root).unwrap_or(file);
    let relative_dir = relative
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    (name, relative_dir)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/aggregator.rs"]
mod tests;
