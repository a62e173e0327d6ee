use super::*;

fn seeded() -> (ResultIndex, NodeId, NodeId) {
    let mut index = ResultIndex::new();
    let root = index.find_or_insert_root(Path::new("/ws"), "ws", false);
    let (file, created) = index
        .find_or_insert_file(root, Path::new("/ws/src/a.rs"), "a.rs", "src")
        .unwrap();
    assert!(created);
    (index, root, file)
}

#[test]
fn test_roots_keep_discovery_order() {
    let mut index = ResultIndex::new();
    let r2 = index.find_or_insert_root(Path::new("/r2"), "r2", true);
    let r1 = index.find_or_insert_root(Path::new("/r1"), "r1", true);
    assert_eq!(index.find_or_insert_root(Path::new("/r2"), "r2", true), r2);
    assert_eq!(index.roots(), &[r2, r1]);
}

#[test]
fn test_find_or_insert_file_reuses_entry() {
    let (mut index, root, file) = seeded();
    let (again, created) = index
        .find_or_insert_file(root, Path::new("/ws/src/a.rs"), "a.rs", "src")
        .unwrap();
    assert_eq!(again, file);
    assert!(!created);
    assert_eq!(index.files_for_path(Path::new("/ws/src/a.rs")), vec![file]);
    assert!(index.file(file).unwrap().expanded);
}

#[test]
fn test_files_for_path_spans_nested_roots() {
    let (mut index, outer, file) = seeded();
    let inner = index.find_or_insert_root(Path::new("/ws/src"), "src", true);
    let (nested, created) = index
        .find_or_insert_file(inner, Path::new("/ws/src/a.rs"), "a.rs", "")
        .unwrap();
    assert!(created);
    assert_ne!(nested, file);
    assert_eq!(index.find_file(outer, Path::new("/ws/src/a.rs")), Some(file));
    assert_eq!(
        index.files_for_path(Path::new("/ws/src/a.rs")),
        vec![file, nested]
    );
    assert!(index.files_for_path(Path::new("/ws/b.rs")).is_empty());
}

#[test]
fn test_insert_line_drops_duplicates() {
    let (mut index, _, file) = seeded();
    assert!(index.insert_line(file, 3, 5, 3, "let foo = 1;").is_some());
    assert!(index.insert_line(file, 3, 5, 3, "let foo = 1;").is_none());
    assert!(index.insert_line(file, 3, 9, 3, "let foo = 1;").is_some());
    assert_eq!(index.file(file).unwrap().match_count(), 2);
    assert_eq!(index.match_count(), 2);
}

#[test]
fn test_sorted_lines_orders_by_line_then_character() {
    let (mut index, _, file) = seeded();
    let c = index.insert_line(file, 4, 1, 3, "foo").unwrap();
    let b = index.insert_line(file, 2, 9, 3, "a foo b foo").unwrap();
    let a = index.insert_line(file, 2, 3, 3, "a foo b foo").unwrap();
    assert_eq!(index.sorted_lines(file), vec![a, b, c]);
}

#[test]
fn test_removing_last_line_removes_file_but_keeps_root() {
    let (mut index, root, file) = seeded();
    let line = index.insert_line(file, 1, 1, 3, "foo").unwrap();

    let removed = index.remove(line);
    assert_eq!(removed.lines, 1);
    assert_eq!(removed.files, 1);
    assert_eq!(removed.roots, 0);
    assert!(index.file(file).is_none());
    assert!(index.root(root).unwrap().files().is_empty());
    assert_eq!(index.roots(), &[root]);
    assert_eq!(index.file_count(), 0);
}

#[test]
fn test_remove_file_drops_all_lines() {
    let (mut index, _, file) = seeded();
    let first = index.insert_line(file, 1, 1, 3, "foo").unwrap();
    index.insert_line(file, 2, 1, 3, "foo").unwrap();
    index.select(Some(first));

    let removed = index.remove(file);
    assert_eq!(removed, Removed { lines: 2, files: 1, roots: 0 });
    assert_eq!(index.match_count(), 0);
    assert_eq!(index.selected(), None);
}

#[test]
fn test_remove_line_at_matches_position() {
    let (mut index, _, file) = seeded();
    index.insert_line(file, 1, 1, 3, "foo foo").unwrap();
    let keep = index.insert_line(file, 1, 5, 3, "foo foo").unwrap();

    assert!(index.remove_line_at(file, 1, 9).is_empty());
    assert_eq!(index.remove_line_at(file, 1, 1).lines, 1);
    assert_eq!(index.file(file).unwrap().lines(), &[keep]);
}

#[test]
fn test_select_moves_flag() {
    let (mut index, _, file) = seeded();
    let a = index.insert_line(file, 1, 1, 3, "foo").unwrap();
    let b = index.insert_line(file, 2, 1, 3, "foo").unwrap();

    assert!(index.select(Some(a)));
    assert!(index.line(a).unwrap().selected);
    assert!(index.select(Some(b)));
    assert!(!index.line(a).unwrap().selected);
    assert!(index.line(b).unwrap().selected);
    assert!(!index.select(Some(b)));
    assert!(index.select(Some(file)));
    assert_eq!(index.selected(), None);
}

#[test]
fn test_remove_root_and_clear() {
    let (mut index, root, file) = seeded();
    index.insert_line(file, 1, 1, 3, "foo").unwrap();
    let removed = index.remove(root);
    assert_eq!(removed, Removed { lines: 1, files: 1, roots: 1 });
    assert!(index.is_empty());

    let (mut index, _, file) = seeded();
    index.insert_line(file, 1, 1, 3, "foo").unwrap();
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.match_count(), 0);
}
