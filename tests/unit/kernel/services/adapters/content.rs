use super::*;
use crate::kernel::services::ports::TextRange;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_fs_content_source_reports_unavailable() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let err = FsContentSource.read_full_text(&missing).unwrap_err();
    assert_eq!(err.path(), missing.as_path());
}

#[test]
fn test_fs_edit_applier_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "foo foo\n").unwrap();

    let source = FsContentSource.read_full_text(&path).unwrap();
    let edits = vec![
        TextEdit {
            range: TextRange::on_line(1, 1, 3),
            replacement: "barbaz".to_string(),
        },
        TextEdit {
            range: TextRange::on_line(1, 8, 3),
            replacement: "barbaz".to_string(),
        },
    ];
    FsEditApplier.apply_edit(&path, &source, &edits).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "barbaz barbaz\n");
}

#[test]
fn test_fs_edit_applier_rejects_bad_range_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "foo").unwrap();

    let edits = vec![TextEdit {
        range: TextRange::on_line(1, 2, 9),
        replacement: "x".to_string(),
    }];
    let err = FsEditApplier.apply_edit(&path, "foo", &edits).unwrap_err();
    assert!(matches!(err, EditError::OutOfRange { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "foo");
}

#[test]
fn test_memory_workspace_shares_buffers() {
    let workspace = MemoryWorkspace::new();
    let mut writer = workspace.clone();
    workspace.insert("/ws/a.txt", "hello");

    let source = workspace.read_full_text(Path::new("/ws/a.txt")).unwrap();
    writer
        .apply_edit(
            Path::new("/ws/a.txt"),
            &source,
            &[TextEdit {
                range: TextRange::on_line(1, 1, 5),
                replacement: "bye".to_string(),
            }],
        )
        .unwrap();

    assert_eq!(workspace.text(Path::new("/ws/a.txt")).unwrap(), "bye");
    workspace.remove(Path::new("/ws/a.txt"));
    assert!(workspace.read_full_text(Path::new("/ws/a.txt")).is_err());
}
