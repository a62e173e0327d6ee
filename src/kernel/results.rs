//! Hierarchical search results: root → file → line match.
//!
//! All entries live in one arena; parents own the ordered list of their
//! children and children keep a non-owning `parent` key used for removal.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::path::{Path, PathBuf};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone)]
pub struct RootEntry {
    pub name: CompactString,
    pub path: PathBuf,
    pub visible: bool,
    children: Vec<NodeId>,
    files_by_path: FxHashMap<PathBuf, NodeId>,
}

impl RootEntry {
    pub fn files(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: CompactString,
    pub relative_dir: String,
    pub path: PathBuf,
    pub icon: Option<String>,
    pub expanded: bool,
    parent: NodeId,
    children: Vec<NodeId>,
}

impl FileEntry {
    pub fn root(&self) -> NodeId {
        self.parent
    }

    pub fn lines(&self) -> &[NodeId] {
        &self.children
    }

    pub fn match_count(&self) -> usize {
        self.children.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    pub line: usize,
    pub character: usize,
    pub length: usize,
    pub line_text: String,
    pub selected: bool,
    parent: NodeId,
}

impl LineEntry {
    pub fn file(&self) -> NodeId {
        self.parent
    }

    fn same_position(&self, line: usize, character: usize, line_text: &str) -> bool {
        self.line == line && self.character == character && self.line_text == line_text
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Root(RootEntry),
    File(FileEntry),
    Line(LineEntry),
}

impl Node {
    pub fn as_root(&self) -> Option<&RootEntry> {
        match self {
            Node::Root(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineEntry> {
        match self {
            Node::Line(line) => Some(line),
            _ => None,
        }
    }
}

/// What a `remove` call took out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removed {
    pub lines: usize,
    pub files: usize,
    pub roots: usize,
}

impl Removed {
    pub fn is_empty(&self) -> bool {
        self.lines == 0 && self.files == 0 && self.roots == 0
    }
}

impl std::ops::AddAssign for Removed {
    fn add_assign(&mut self, other: Removed) {
        self.lines += other.lines;
        self.files += other.files;
        self.roots += other.roots;
    }
}

#[derive(Debug, Default)]
pub struct ResultIndex {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    roots_by_path: FxHashMap<PathBuf, NodeId>,
    selected: Option<NodeId>,
}

impl ResultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.roots.clear();
        self.roots_by_path.clear();
        self.selected = None;
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Roots in discovery order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn root(&self, id: NodeId) -> Option<&RootEntry> {
        self.arena.get(id).and_then(Node::as_root)
    }

    pub fn file(&self, id: NodeId) -> Option<&FileEntry> {
        self.arena.get(id).and_then(Node::as_file)
    }

    pub fn line(&self, id: NodeId) -> Option<&LineEntry> {
        self.arena.get(id).and_then(Node::as_line)
    }

    pub fn file_mut(&mut self, id: NodeId) -> Option<&mut FileEntry> {
        match self.arena.get_mut(id) {
            Some(Node::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn line_mut(&mut self, id: NodeId) -> Option<&mut LineEntry> {
        match self.arena.get_mut(id) {
            Some(Node::Line(line)) => Some(line),
            _ => None,
        }
    }

    pub fn find_root(&self, path: &Path) -> Option<NodeId> {
        self.roots_by_path.get(path).copied()
    }

    pub fn find_file(&self, root: NodeId, path: &Path) -> Option<NodeId> {
        self.root(root)?.files_by_path.get(path).copied()
    }

    /// Every file entry recorded for `path`, in root order. Nested roots
    /// yield one entry per root that reached the file.
    pub fn files_for_path(&self, path: &Path) -> Vec<NodeId> {
        self.roots
            .iter()
            .filter_map(|&root| self.find_file(root, path))
            .collect()
    }

    pub fn find_or_insert_root(&mut self, path: &Path, name: &str, visible: bool) -> NodeId {
        if let Some(id) = self.find_root(path) {
            return id;
        }
        let id = self.arena.insert(Node::Root(RootEntry {
            name: CompactString::from(name),
            path: path.to_path_buf(),
            visible,
            children: Vec::new(),
            files_by_path: FxHashMap::default(),
        }));
        self.roots.push(id);
        self.roots_by_path.insert(path.to_path_buf(), id);
        id
    }

    /// Returns the file entry under `root` for `path`, creating it (expanded,
    /// no icon) when absent. The flag tells whether it was created.
    pub fn find_or_insert_file(
        &mut self,
        root: NodeId,
        path: &Path,
        name: &str,
        relative_dir: &str,
    ) -> Option<(NodeId, bool)> {
        if let Some(id) = self.find_file(root, path) {
            return Some((id, false));
        }
        self.root(root)?;

        let id = self.arena.insert(Node::File(FileEntry {
            name: CompactString::from(name),
            relative_dir: relative_dir.to_string(),
            path: path.to_path_buf(),
            icon: None,
            expanded: true,
            parent: root,
            children: Vec::new(),
        }));
        if let Some(Node::Root(entry)) = self.arena.get_mut(root) {
            entry.children.push(id);
            entry.files_by_path.insert(path.to_path_buf(), id);
        }
        Some((id, true))
    }

    /// Appends a line match unless a sibling already sits at the same
    /// (line, character, text). Returns `None` for duplicates.
    pub fn insert_line(
        &mut self,
        file: NodeId,
        line: usize,
        character: usize,
        length: usize,
        line_text: &str,
    ) -> Option<NodeId> {
        let entry = self.file(file)?;
        let duplicate = entry.children.iter().any(|&child| {
            self.line(child)
                .is_some_and(|l| l.same_position(line, character, line_text))
        });
        if duplicate {
            return None;
        }

        let id = self.arena.insert(Node::Line(LineEntry {
            line,
            character,
            length,
            line_text: line_text.to_string(),
            selected: false,
            parent: file,
        }));
        if let Some(entry) = self.file_mut(file) {
            entry.children.push(id);
        }
        Some(id)
    }

    /// Line ids of `file` ordered by (line, character).
    pub fn sorted_lines(&self, file: NodeId) -> Vec<NodeId> {
        let Some(entry) = self.file(file) else {
            return Vec::new();
        };
        let mut lines: Vec<(usize, usize, NodeId)> = entry
            .children
            .iter()
            .filter_map(|&id| self.line(id).map(|l| (l.line, l.character, id)))
            .collect();
        lines.sort_unstable_by_key(|&(line, character, _)| (line, character));
        lines.into_iter().map(|(_, _, id)| id).collect()
    }

    pub fn file_count(&self) -> usize {
        self.roots
            .iter()
            .filter_map(|&id| self.root(id))
            .map(|r| r.children.len())
            .sum()
    }

    pub fn match_count(&self) -> usize {
        self.arena
            .values()
            .filter(|n| matches!(n, Node::Line(_)))
            .count()
    }

    pub fn file_ids(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .filter_map(|&id| self.root(id))
            .flat_map(|r| r.children.iter().copied())
            .collect()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Moves the selection flag to `id`; `None` or a non-line id clears it.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        let id = id.filter(|&id| self.line(id).is_some());
        if self.selected == id {
            return false;
        }
        if let Some(prev) = self.selected.take() {
            if let Some(line) = self.line_mut(prev) {
                line.selected = false;
            }
        }
        if let Some(id) = id {
            if let Some(line) = self.line_mut(id) {
                line.selected = true;
            }
        }
        self.selected = id;
        true
    }

    /// Removes the line of `file` at exactly (`line`, `character`).
    pub fn remove_line_at(&mut self, file: NodeId, line: usize, character: usize) -> Removed {
        let target = self.file(file).and_then(|entry| {
            entry.children.iter().copied().find(|&child| {
                self.line(child)
                    .is_some_and(|l| l.line == line && l.character == character)
            })
        });
        match target {
            Some(id) => self.remove(id),
            None => Removed::default(),
        }
    }

    /// Removes a node and its subtree. A file left without lines goes with
    /// its last line; roots are kept even when their last file goes.
    pub fn remove(&mut self, id: NodeId) -> Removed {
        match self.arena.get(id) {
            Some(Node::Line(line)) => {
                let file = line.parent;
                self.detach_line(id);
                let mut removed = Removed {
                    lines: 1,
                    ..Removed::default()
                };
                if self.file(file).is_some_and(|f| f.children.is_empty()) {
                    removed.files += self.remove_file(file).files;
                }
                removed
            }
            Some(Node::File(_)) => self.remove_file(id),
            Some(Node::Root(_)) => self.remove_root(id),
            None => Removed::default(),
        }
    }

    fn detach_line(&mut self, id: NodeId) {
        let Some(Node::Line(line)) = self.arena.remove(id) else {
            return;
        };
        if self.selected == Some(id) {
            self.selected = None;
        }
        if let Some(file) = self.file_mut(line.parent) {
            file.children.retain(|&child| child != id);
        }
    }

    fn remove_file(&mut self, id: NodeId) -> Removed {
        let Some(Node::File(file)) = self.arena.remove(id) else {
            return Removed::default();
        };
        let mut removed = Removed {
            files: 1,
            ..Removed::default()
        };
        for child in file.children {
            if self.selected == Some(child) {
                self.selected = None;
            }
            if self.arena.remove(child).is_some() {
                removed.lines += 1;
            }
        }
        if let Some(Node::Root(root)) = self.arena.get_mut(file.parent) {
            root.children.retain(|&child| child != id);
            root.files_by_path.remove(&file.path);
        }
        removed
    }

    fn remove_root(&mut self, id: NodeId) -> Removed {
        let files = self.root(id).map(|r| r.children.clone()).unwrap_or_default();
        let mut removed = Removed::default();
        for file in files {
            removed += self.remove_file(file);
        }
        if let Some(Node::Root(root)) = self.arena.remove(id) {
            self.roots.retain(|&r| r != id);
            self.roots_by_path.remove(&root.path);
            removed.roots = 1;
        }
        removed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/results.rs"]
mod tests;
