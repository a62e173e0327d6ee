use super::*;
use std::path::PathBuf;

fn event(root: &str, file: &str, line: usize, character: usize, text: &str) -> MatchEvent {
    MatchEvent {
        root: PathBuf::from(root),
        file: PathBuf::from(file),
        line,
        character,
        length: 3,
        line_text: text.to_string(),
    }
}

fn live_session() -> (SessionController, Generation) {
    let mut sessions = SessionController::new();
    let handle = sessions.start_session();
    sessions.bind_search_id(handle.generation(), 1);
    (sessions, handle.generation())
}

#[test]
fn test_describe_file() {
    let (name, dir) = describe_file(Path::new("/ws"), Path::new("/ws/src/kernel/a.rs"));
    assert_eq!(name, "a.rs");
    assert_eq!(dir, "src/kernel");

    let (name, dir) = describe_file(Path::new("/ws"), Path::new("/ws/a.rs"));
    assert_eq!(name, "a.rs");
    assert_eq!(dir, "");

    let (_, dir) = describe_file(Path::new("/ws"), Path::new("/other/b.rs"));
    assert_eq!(dir, "other");
}

#[test]
fn test_identical_event_twice_yields_one_line() {
    let (sessions, generation) = live_session();
    let aggregator = Aggregator::new(20, false);
    let mut index = ResultIndex::new();
    let ev = event("/ws", "/ws/a.rs", 1, 1, "foo");

    let first = aggregator
        .on_match(&mut index, &sessions, generation, 1, &ev)
        .unwrap();
    let second = aggregator
        .on_match(&mut index, &sessions, generation, 1, &ev)
        .unwrap();

    assert!(first.new_file);
    assert!(first.line.is_some());
    assert!(!second.new_file);
    assert!(second.line.is_none());
    assert_eq!(index.match_count(), 1);
}

#[test]
fn test_stale_events_do_not_mutate() {
    let (mut sessions, old) = live_session();
    let aggregator = Aggregator::new(20, false);
    let mut index = ResultIndex::new();

    let next = sessions.start_session();
    sessions.bind_search_id(next.generation(), 2);

    let ev = event("/ws", "/ws/a.rs", 1, 1, "foo");
    assert!(aggregator
        .on_match(&mut index, &sessions, old, 1, &ev)
        .is_none());
    assert!(aggregator
        .on_match(&mut index, &sessions, next.generation(), 1, &ev)
        .is_none());
    assert!(!aggregator.on_done(&mut sessions, old, 1));
    assert!(index.is_empty());
    assert!(sessions.is_running());
}

#[test]
fn test_roots_follow_discovery_order() {
    let (sessions, generation) = live_session();
    let aggregator = Aggregator::new(20, true);
    let mut index = ResultIndex::new();

    aggregator.on_match(&mut index, &sessions, generation, 1, &event("/r2", "/r2/x.rs", 1, 1, "foo"));
    aggregator.on_match(&mut index, &sessions, generation, 1, &event("/r1", "/r1/y.rs", 1, 1, "foo"));

    let names: Vec<_> = index
        .roots()
        .iter()
        .map(|&id| index.root(id).unwrap().name.to_string())
        .collect();
    assert_eq!(names, vec!["r2", "r1"]);
    assert!(index.root(index.roots()[0]).unwrap().visible);
}

#[test]
fn test_auto_collapse_at_threshold() {
    let (sessions, generation) = live_session();
    let aggregator = Aggregator::new(20, false);
    let mut index = ResultIndex::new();

    let mut file = None;
    for line in 1..=19 {
        let folded = aggregator
            .on_match(&mut index, &sessions, generation, 1, &event("/ws", "/ws/a.rs", line, 1, "foo"))
            .unwrap();
        assert!(!folded.collapsed);
        file = Some(folded.file);
    }
    let file = file.unwrap();
    assert!(index.file(file).unwrap().expanded);

    let folded = aggregator
        .on_match(&mut index, &sessions, generation, 1, &event("/ws", "/ws/a.rs", 20, 1, "foo"))
        .unwrap();
    assert!(folded.collapsed);
    assert!(!index.file(file).unwrap().expanded);

    let last = index.file(file).unwrap().lines()[19];
    index.remove(last);
    assert_eq!(index.file(file).unwrap().match_count(), 19);
    assert!(!index.file(file).unwrap().expanded);
}

#[test]
fn test_on_done_marks_session_done() {
    let (mut sessions, generation) = live_session();
    let aggregator = Aggregator::new(20, false);
    assert!(aggregator.on_done(&mut sessions, generation, 1));
    assert!(!sessions.is_running());
}
