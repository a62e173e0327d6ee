use super::*;
use std::io::Cursor;

fn collect(text: &str, term: &str, options: &SearchOptions) -> Vec<LineMatch> {
    let regex = build_matcher(term, options).unwrap();
    let cancelled = AtomicBool::new(false);
    let mut out = Vec::new();
    search_lines(Cursor::new(text.as_bytes()), &regex, &cancelled, |m| {
        out.push(m);
        true
    })
    .unwrap();
    out
}

#[test]
fn test_literal_is_escaped_and_case_insensitive_by_default() {
    let matches = collect("a.b A.B axb\n", "a.b", &SearchOptions::default());
    let cols: Vec<usize> = matches.iter().map(|m| m.character).collect();
    assert_eq!(cols, vec![1, 5]);
    assert_eq!(matches[0].line_text, "a.b A.B axb");
}

#[test]
fn test_match_case_and_whole_word() {
    let options = SearchOptions {
        match_case: true,
        match_whole_word: true,
        ..SearchOptions::default()
    };
    let matches = collect("foo food Foo foo", "foo", &options);
    let cols: Vec<usize> = matches.iter().map(|m| m.character).collect();
    assert_eq!(cols, vec![1, 14]);
}

#[test]
fn test_regex_lines_and_char_columns() {
    let options = SearchOptions {
        use_regex: true,
        ..SearchOptions::default()
    };
    let matches = collect("héllo 42\r\nx 7\n", r"\d+", &options);
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].line, matches[0].character, matches[0].length), (1, 7, 2));
    assert_eq!(matches[0].line_text, "héllo 42");
    assert_eq!((matches[1].line, matches[1].character), (2, 3));
}

#[test]
fn test_invalid_regex_is_an_error() {
    let options = SearchOptions {
        use_regex: true,
        ..SearchOptions::default()
    };
    assert!(build_matcher("(", &options).is_err());
}

#[test]
fn test_stop_early() {
    let regex = build_matcher("a", &SearchOptions::default()).unwrap();
    let cancelled = AtomicBool::new(false);
    let mut seen = 0;
    search_lines(Cursor::new(b"a a a\na".as_slice()), &regex, &cancelled, |_| {
        seen += 1;
        seen < 2
    })
    .unwrap();
    assert_eq!(seen, 2);
}

#[test]
fn test_binary_detection() {
    assert!(is_likely_binary(b"abc\0def"));
    assert!(!is_likely_binary(b"plain text"));
}
