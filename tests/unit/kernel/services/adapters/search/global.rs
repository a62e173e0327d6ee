use super::*;
use crate::kernel::services::ports::search::{ProviderEvent, SessionEvent};
use crate::kernel::session::Generation;
use std::fs;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn run(provider: &LocalSearchProvider, term: &str, options: &SearchOptions) -> Vec<MatchEvent> {
    let (tx, rx) = mpsc::channel();
    let task = provider
        .search(term, options, EventSink::new(Generation(1), tx))
        .unwrap();

    let mut found = Vec::new();
    loop {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(SessionEvent::Provider {
                search_id,
                event: ProviderEvent::Match(m),
                ..
            }) => {
                assert_eq!(search_id, task.id());
                found.push(m);
            }
            Ok(SessionEvent::Provider {
                event: ProviderEvent::Done,
                ..
            }) => break,
            Ok(other) => panic!("unexpected event: {:?}", other),
            Err(_) => panic!("Timeout"),
        }
    }
    found.sort_by(|a, b| (&a.file, a.line, a.character).cmp(&(&b.file, b.line, b.character)));
    found
}

#[test]
fn test_local_search_literal() {
    let rt = create_runtime();
    let provider = LocalSearchProvider::new(rt.handle().clone());

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test1.txt"), "hello world\nsay hello hello").unwrap();
    fs::write(dir.path().join("test2.txt"), "hello rust").unwrap();
    fs::write(dir.path().join("other.txt"), "goodbye world").unwrap();
    fs::write(dir.path().join("blob.bin"), b"hello\0binary").unwrap();

    let options = SearchOptions {
        roots: vec![dir.path().to_path_buf()],
        ..SearchOptions::default()
    };
    let found = run(&provider, "hello", &options);

    assert_eq!(found.len(), 4);
    assert!(found.iter().all(|m| m.root == dir.path()));
    let first = &found[0];
    assert_eq!(first.file, dir.path().join("test1.txt"));
    assert_eq!((first.line, first.character, first.length), (1, 1, 5));
    assert_eq!((found[2].line, found[2].character), (2, 11));
}

#[test]
fn test_local_search_include_exclude_and_limit() {
    let rt = create_runtime();
    let provider = LocalSearchProvider::new(rt.handle().clone());

    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/a.rs"), "foo\nfoo\nfoo").unwrap();
    fs::write(dir.path().join("src/b.rs"), "foo").unwrap();
    fs::write(dir.path().join("notes.md"), "foo").unwrap();

    let options = SearchOptions {
        roots: vec![dir.path().to_path_buf()],
        include: vec!["*.rs".to_string()],
        exclude: vec!["b.rs".to_string()],
        ..SearchOptions::default()
    };
    let found = run(&provider, "foo", &options);
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|m| m.file.ends_with("src/a.rs")));

    let limited = SearchOptions {
        max_results: Some(2),
        ..options
    };
    assert_eq!(run(&provider, "foo", &limited).len(), 2);
}

#[test]
fn test_invalid_regex_fails_synchronously() {
    let rt = create_runtime();
    let provider = LocalSearchProvider::new(rt.handle().clone());
    let (tx, _rx) = mpsc::channel();
    let options = SearchOptions {
        use_regex: true,
        ..SearchOptions::default()
    };
    let err = provider
        .search("(", &options, EventSink::new(Generation(1), tx))
        .unwrap_err();
    assert!(matches!(
        err,
        crate::kernel::services::ports::SearchError::InvalidRegex(_)
    ));
}
