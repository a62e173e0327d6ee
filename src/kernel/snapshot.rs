use serde::Serialize;
use std::path::PathBuf;

use crate::kernel::results::{NodeId, ResultIndex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSnapshot {
    #[serde(skip)]
    pub id: NodeId,
    pub line: usize,
    pub character: usize,
    pub length: usize,
    pub line_text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSnapshot {
    #[serde(skip)]
    pub id: NodeId,
    pub name: String,
    pub relative_dir: String,
    pub path: PathBuf,
    pub icon: Option<String>,
    pub expanded: bool,
    pub matches: Vec<LineSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootSnapshot {
    #[serde(skip)]
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub visible: bool,
    pub files: Vec<FileSnapshot>,
}

/// Published view of the result index, roots and files in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSnapshot {
    pub roots: Vec<RootSnapshot>,
}

impl ResultSnapshot {
    pub fn capture(index: &ResultIndex) -> Self {
        let roots = index
            .roots()
            .iter()
            .filter_map(|&root_id| {
                let root = index.root(root_id)?;
                let files = root
                    .files()
                    .iter()
                    .filter_map(|&file_id| {
                        let file = index.file(file_id)?;
                        let matches = index
                            .sorted_lines(file_id)
                            .into_iter()
                            .filter_map(|id| {
                                index.line(id).map(|l| LineSnapshot {
                                    id,
                                    line: l.line,
                                    character: l.character,
                                    length: l.length,
                                    line_text: l.line_text.clone(),
                                    selected: l.selected,
                                })
                            })
                            .collect();
                        Some(FileSnapshot {
                            id: file_id,
                            name: file.name.to_string(),
                            relative_dir: file.relative_dir.clone(),
                            path: file.path.clone(),
                            icon: file.icon.clone(),
                            expanded: file.expanded,
                            matches,
                        })
                    })
                    .collect();
                Some(RootSnapshot {
                    id: root_id,
                    name: root.name.to_string(),
                    path: root.path.clone(),
                    visible: root.visible,
                    files,
                })
            })
            .collect();
        Self { roots }
    }

    pub fn file_count(&self) -> usize {
        self.roots.iter().map(|r| r.files.len()).sum()
    }

    pub fn match_count(&self) -> usize {
        self.roots
            .iter()
            .flat_map(|r| &r.files)
            .map(|f| f.matches.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.match_count() == 0
    }
}
