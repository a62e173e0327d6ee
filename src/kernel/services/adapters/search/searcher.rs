//! Line matcher
//!
//! - Literal and regex terms both compile to one `regex::Regex`
//! - Files are scanned line by line; columns are reported in chars

use crate::kernel::services::ports::search::{Result, SearchOptions};
use regex::{Regex, RegexBuilder};
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};

const BINARY_PROBE: usize = 8192;

/// A match inside one line. `line` and `character` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub line: usize,
    pub character: usize,
    pub length: usize,
    pub line_text: String,
}

pub fn build_matcher(term: &str, options: &SearchOptions) -> Result<Regex> {
    let pattern = if options.use_regex {
        term.to_string()
    } else {
        regex::escape(term)
    };
    let pattern = if options.match_whole_word {
        format!(r"\b(?:{})\b", pattern)
    } else {
        pattern
    };
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.match_case)
        .build()?;
    Ok(regex)
}

pub fn is_likely_binary(content: &[u8]) -> bool {
    memchr::memchr(0, &content[..content.len().min(BINARY_PROBE)]).is_some()
}

/// Scans `reader` line by line, calling `on_match` for every non-empty
/// match. Stops early when `on_match` returns `false`, when `cancelled` is
/// set, or at the first line that is not valid UTF-8.
pub fn search_lines<R: Read>(
    reader: R,
    regex: &Regex,
    cancelled: &AtomicBool,
    mut on_match: impl FnMut(LineMatch) -> bool,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        if cancelled.load(Ordering::Relaxed) {
            return Ok(());
        }

        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let mut trimmed: &[u8] = &buf;
        if let Some(rest) = trimmed.strip_suffix(b"\n") {
            trimmed = rest;
        }
        if let Some(rest) = trimmed.strip_suffix(b"\r") {
            trimmed = rest;
        }

        let line = match std::str::from_utf8(trimmed) {
            Ok(s) => s,
            Err(_) => return Ok(()),
        };

        for mat in regex.find_iter(line) {
            if mat.start() == mat.end() {
                continue;
            }
            let found = LineMatch {
                line: line_no,
                character: line[..mat.start()].chars().count() + 1,
                length: mat.as_str().chars().count(),
                line_text: line.to_string(),
            };
            if !on_match(found) {
                return Ok(());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/searcher.rs"]
mod tests;
