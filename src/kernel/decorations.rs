//! Keeps editor highlight ranges in step with the result index.

use rustc_hash::FxHashMap;
use std::path::Path;

use crate::kernel::results::{NodeId, ResultIndex};
use crate::kernel::services::ports::{
    Decoration, DecorationHandle, DecorationHost, DecorationStyle, DecorationTarget, TextRange,
};

/// One decoration per line match of `file`, ordered by (line, character).
pub fn decorations_for(index: &ResultIndex, file: NodeId) -> Vec<Decoration> {
    index
        .sorted_lines(file)
        .into_iter()
        .filter_map(|id| index.line(id))
        .map(|line| Decoration {
            range: TextRange::on_line(line.line, line.character, line.length),
            style: if line.selected {
                DecorationStyle::Selected
            } else {
                DecorationStyle::Match
            },
        })
        .collect()
}

/// Decorations of every entry in `files`, deduped on range. A range that is
/// selected in any entry keeps the `Selected` style.
pub fn merged_decorations(index: &ResultIndex, files: &[NodeId]) -> Vec<Decoration> {
    let mut merged: Vec<Decoration> = files
        .iter()
        .flat_map(|&file| decorations_for(index, file))
        .collect();
    merged.sort_by_key(|d| d.range);
    merged.dedup_by(|next, kept| {
        if next.range != kept.range {
            return false;
        }
        if next.style == DecorationStyle::Selected {
            kept.style = DecorationStyle::Selected;
        }
        true
    });
    merged
}

#[derive(Debug, Default)]
pub struct DecorationSync {
    owner: String,
    applied: FxHashMap<DecorationTarget, Vec<DecorationHandle>>,
}

impl DecorationSync {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            applied: FxHashMap::default(),
        }
    }

    pub fn target(&self, path: &Path) -> DecorationTarget {
        DecorationTarget {
            path: path.to_path_buf(),
            owner: self.owner.clone(),
        }
    }

    pub fn applied(&self, path: &Path) -> &[DecorationHandle] {
        self.applied
            .get(&self.target(path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replaces whatever this synchronizer last applied to `path` with the
    /// ranges of `files`, or with nothing when `files` is empty.
    pub fn sync(
        &mut self,
        host: &mut dyn DecorationHost,
        path: &Path,
        index: &ResultIndex,
        files: &[NodeId],
    ) -> usize {
        let fresh = merged_decorations(index, files);
        let target = self.target(path);
        let old = self.applied.get(&target).cloned().unwrap_or_default();
        if old.is_empty() && fresh.is_empty() {
            return 0;
        }

        let handles = host.apply_decoration_delta(&target, &old, &fresh);
        let count = handles.len();
        if handles.is_empty() {
            self.applied.remove(&target);
        } else {
            self.applied.insert(target, handles);
        }
        count
    }

    /// Syncs every file the host shows against `index`.
    pub fn sync_visible(&mut self, host: &mut dyn DecorationHost, index: &ResultIndex) -> usize {
        let mut total = 0;
        for path in host.visible_files() {
            let files = index.files_for_path(&path);
            total += self.sync(host, &path, index, &files);
        }
        total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/decorations.rs"]
mod tests;
