//! In-place replacement of search matches.
//!
//! Several matches may share a line. After one of them is replaced, every
//! sibling further right on that line moves by the length difference, so the
//! stored `character` of those siblings is corrected before they are used.

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use crate::kernel::results::{NodeId, Removed, ResultIndex};
use crate::kernel::services::ports::{
    ContentError, ContentSource, EditApplier, EditError, TextEdit, TextRange,
};

pub type Result<T> = std::result::Result<T, ReplaceError>;

#[derive(Debug)]
pub enum ReplaceError {
    Content(ContentError),
    Edit(EditError),
    UnknownNode(NodeId),
    NotALine(NodeId),
    NotAFile(NodeId),
}

impl std::fmt::Display for ReplaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplaceError::Content(e) => write!(f, "{}", e),
            ReplaceError::Edit(e) => write!(f, "{}", e),
            ReplaceError::UnknownNode(id) => write!(f, "Unknown result node: {:?}", id),
            ReplaceError::NotALine(id) => write!(f, "Result node is not a line match: {:?}", id),
            ReplaceError::NotAFile(id) => write!(f, "Result node is not a file: {:?}", id),
        }
    }
}

impl std::error::Error for ReplaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplaceError::Content(e) => Some(e),
            ReplaceError::Edit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContentError> for ReplaceError {
    fn from(e: ContentError) -> Self {
        ReplaceError::Content(e)
    }
}

impl From<EditError> for ReplaceError {
    fn from(e: EditError) -> Self {
        ReplaceError::Edit(e)
    }
}

#[derive(Debug, Default)]
pub struct ReplaceSummary {
    pub files: usize,
    pub matches: usize,
    pub failures: Vec<(PathBuf, ReplaceError)>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Shifts matches on the same line as `replaced` that sit strictly to its
/// right by `delta` characters. Every entry recorded for the file counts,
/// including those found under another (nested) root.
pub fn shift_same_line(index: &mut ResultIndex, replaced: NodeId, delta: isize) {
    if delta == 0 {
        return;
    }
    let Some(entry) = index.line(replaced) else {
        return;
    };
    let (line, character, file) = (entry.line, entry.character, entry.file());
    let Some(path) = index.file(file).map(|f| f.path.clone()) else {
        return;
    };
    let siblings: Vec<NodeId> = index
        .files_for_path(&path)
        .into_iter()
        .filter_map(|f| index.file(f).map(|f| f.lines().to_vec()))
        .flatten()
        .collect();

    for id in siblings {
        if id == replaced {
            continue;
        }
        if let Some(sibling) = index.line_mut(id) {
            if sibling.line == line && sibling.character > character {
                sibling.character = sibling.character.saturating_add_signed(delta);
            }
        }
    }
}

/// (line, character, length) of every match recorded for `path`, merged
/// across entries, deduped on (line, character) and ordered by position.
fn merged_matches(index: &ResultIndex, path: &Path) -> Vec<(usize, usize, usize)> {
    let mut matches: Vec<(usize, usize, usize)> = index
        .files_for_path(path)
        .into_iter()
        .flat_map(|file| index.sorted_lines(file))
        .filter_map(|id| index.line(id).map(|l| (l.line, l.character, l.length)))
        .collect();
    matches.sort_by_key(|&(line, character, _)| (line, character));
    matches.dedup_by_key(|&mut (line, character, _)| (line, character));
    matches
}

/// Edits replacing `matches` one after another. Each replacement moves the
/// later matches on its line by the length difference before they are used.
fn sequential_edits(matches: &[(usize, usize, usize)], replacement: &str) -> Vec<TextEdit> {
    let replacement_len = char_len(replacement) as isize;
    let mut positions = matches.to_vec();
    let mut edits = Vec::with_capacity(positions.len());
    for i in 0..positions.len() {
        let (line, character, length) = positions[i];
        edits.push(TextEdit {
            range: TextRange::on_line(line, character, length),
            replacement: replacement.to_string(),
        });
        let delta = replacement_len - length as isize;
        for later in positions[i + 1..].iter_mut() {
            if later.0 == line && later.1 > character {
                later.1 = later.1.saturating_add_signed(delta);
            }
        }
    }
    edits
}

fn file_path(index: &ResultIndex, file: NodeId) -> Result<PathBuf> {
    match index.node(file) {
        Some(node) => node
            .as_file()
            .map(|f| f.path.clone())
            .ok_or(ReplaceError::NotAFile(file)),
        None => Err(ReplaceError::UnknownNode(file)),
    }
}

/// Replaces a single match, then drops it from the index together with any
/// copy of it recorded under another root.
pub fn replace_line(
    index: &mut ResultIndex,
    content: &dyn ContentSource,
    editor: &mut dyn EditApplier,
    line: NodeId,
    replacement: &str,
) -> Result<Removed> {
    let entry = match index.node(line) {
        Some(node) => node.as_line().ok_or(ReplaceError::NotALine(line))?,
        None => return Err(ReplaceError::UnknownNode(line)),
    };
    let (file, line_no, character, length) =
        (entry.file(), entry.line, entry.character, entry.length);
    let path = index
        .file(file)
        .map(|f| f.path.clone())
        .ok_or(ReplaceError::UnknownNode(file))?;

    let source = content.read_full_text(&path)?;
    let edit = TextEdit {
        range: TextRange::on_line(line_no, character, length),
        replacement: replacement.to_string(),
    };
    editor.apply_edit(&path, &source, std::slice::from_ref(&edit))?;

    let delta = char_len(replacement) as isize - length as isize;
    shift_same_line(index, line, delta);
    let twins: Vec<NodeId> = index
        .files_for_path(&path)
        .into_iter()
        .filter(|&f| f != file)
        .collect();
    let mut removed = index.remove(line);
    for twin in twins {
        removed += index.remove_line_at(twin, line_no, character);
    }
    Ok(removed)
}

/// Replaces every match recorded for the file of `file` in (line,
/// character) order with a single edit pass, then removes each entry of that
/// file. Returns how many matches were replaced.
pub fn replace_file(
    index: &mut ResultIndex,
    content: &dyn ContentSource,
    editor: &mut dyn EditApplier,
    file: NodeId,
    replacement: &str,
) -> Result<usize> {
    let path = file_path(index, file)?;
    let source = content.read_full_text(&path)?;

    let edits = sequential_edits(&merged_matches(index, &path), replacement);
    editor.apply_edit(&path, &source, &edits)?;

    for entry in index.files_for_path(&path) {
        index.remove(entry);
    }
    tracing::debug!(file = %path.display(), matches = edits.len(), "replaced file");
    Ok(edits.len())
}

/// Replaces every file in the index, once per path. Files that fail keep
/// their entries; when nothing failed the index ends up empty.
pub fn replace_all(
    index: &mut ResultIndex,
    content: &dyn ContentSource,
    editor: &mut dyn EditApplier,
    replacement: &str,
) -> ReplaceSummary {
    let mut summary = ReplaceSummary::default();
    let mut seen: FxHashSet<PathBuf> = FxHashSet::default();
    for file in index.file_ids() {
        let Some(path) = index.file(file).map(|f| f.path.clone()) else {
            continue;
        };
        if !seen.insert(path.clone()) {
            continue;
        }
        match replace_file(index, content, editor, file, replacement) {
            Ok(count) => {
                summary.files += 1;
                summary.matches += count;
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "replace failed");
                summary.failures.push((path, e));
            }
        }
    }
    if summary.failures.is_empty() {
        index.clear();
    }
    summary
}

/// Text of `file` with every recorded match replaced. Neither the index nor
/// the file is touched.
pub fn build_preview(
    index: &ResultIndex,
    content: &dyn ContentSource,
    file: NodeId,
    replacement: &str,
) -> Result<String> {
    let path = file_path(index, file)?;
    let source = content.read_full_text(&path)?;
    let edits = sequential_edits(&merged_matches(index, &path), replacement);
    splice_edits(&source, &edits)
        .map_err(|range| ReplaceError::Edit(EditError::OutOfRange { path, range }))
}

/// Applies single-line `edits` to `source` one after another. Line endings
/// are preserved. Fails with the first range that does not fit.
pub fn splice_edits(source: &str, edits: &[TextEdit]) -> std::result::Result<String, TextRange> {
    let mut lines: Vec<(String, &str)> = source
        .split_inclusive('\n')
        .map(|raw| {
            let body = raw
                .strip_suffix('\n')
                .map(|b| b.strip_suffix('\r').unwrap_or(b))
                .unwrap_or(raw);
            (body.to_string(), &raw[body.len()..])
        })
        .collect();

    for edit in edits {
        let range = edit.range;
        let Some((body, _)) = range
            .start_line
            .checked_sub(1)
            .and_then(|i| lines.get_mut(i))
        else {
            return Err(range);
        };
        let mut chars: Vec<char> = body.chars().collect();
        let (Some(start), Some(end)) = (range.start_col.checked_sub(1), range.end_col.checked_sub(1))
        else {
            return Err(range);
        };
        if range.start_line != range.end_line || start > end || end > chars.len() {
            return Err(range);
        }
        chars.splice(start..end, edit.replacement.chars());
        *body = chars.into_iter().collect();
    }

    let mut out = String::with_capacity(source.len());
    for (body, ending) in lines {
        out.push_str(&body);
        out.push_str(ending);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/replace.rs"]
mod tests;
