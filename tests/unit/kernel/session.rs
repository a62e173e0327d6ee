use super::*;

#[test]
fn test_start_session_invalidates_previous_handle() {
    let mut sessions = SessionController::new();
    let first = sessions.start_session();
    assert!(!first.is_cancelled());

    let second = sessions.start_session();
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_ne!(first.generation(), second.generation());
}

#[test]
fn test_is_stale_checks_generation_and_search_id() {
    let mut sessions = SessionController::new();
    let handle = sessions.start_session();
    assert!(sessions.is_stale(handle.generation(), 7));

    assert!(sessions.bind_search_id(handle.generation(), 7));
    assert!(!sessions.is_stale(handle.generation(), 7));
    assert!(sessions.is_stale(handle.generation(), 8));

    let next = sessions.start_session();
    assert!(sessions.is_stale(handle.generation(), 7));
    assert!(!sessions.bind_search_id(handle.generation(), 9));
    assert!(sessions.bind_search_id(next.generation(), 9));
    assert!(!sessions.is_stale(next.generation(), 9));
}

#[test]
fn test_cancel_is_idempotent() {
    let mut sessions = SessionController::new();
    let handle = sessions.start_session();
    sessions.bind_search_id(handle.generation(), 1);

    sessions.cancel(&handle);
    sessions.cancel(&handle);

    assert!(handle.is_cancelled());
    assert!(sessions.is_stale(handle.generation(), 1));
    assert!(!sessions.is_running());
}

#[test]
fn test_cancel_of_old_handle_keeps_current_session() {
    let mut sessions = SessionController::new();
    let old = sessions.start_session();
    let current = sessions.start_session();
    sessions.bind_search_id(current.generation(), 2);

    sessions.cancel(&old);
    assert!(!sessions.is_stale(current.generation(), 2));
    assert!(sessions.is_current(current.generation()));
}

#[test]
fn test_mark_done_stops_running_but_stays_current() {
    let mut sessions = SessionController::new();
    let handle = sessions.start_session();
    assert!(sessions.is_running());
    sessions.mark_done(handle.generation());
    assert!(!sessions.is_running());
    assert!(sessions.is_current(handle.generation()));
}
