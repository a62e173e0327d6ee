//! Workspace search provider
//!
//! - Walks every root with the `ignore` crate's parallel walker
//! - Honors .gitignore unless `include_ignored`, plus include/exclude globs
//! - Runs on the tokio blocking pool; results stream through the session sink

use super::searcher::{build_matcher, is_likely_binary, search_lines};
use crate::kernel::services::ports::search::{
    EventSink, MatchEvent, Result, SearchOptions, SearchProvider, SearchTask,
};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::{WalkBuilder, WalkState};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

static SEARCH_ID: AtomicU64 = AtomicU64::new(1);

fn next_search_id() -> u64 {
    SEARCH_ID.fetch_add(1, Ordering::Relaxed)
}

pub struct LocalSearchProvider {
    runtime: tokio::runtime::Handle,
}

impl LocalSearchProvider {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

fn build_overrides(root: &Path, options: &SearchOptions) -> Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    for glob in &options.include {
        builder.add(glob)?;
    }
    for glob in &options.exclude {
        builder.add(&format!("!{}", glob))?;
    }
    Ok(builder.build()?)
}

impl SearchProvider for LocalSearchProvider {
    fn search(&self, term: &str, options: &SearchOptions, sink: EventSink) -> Result<SearchTask> {
        let regex = build_matcher(term, options)?;
        let roots: Vec<(PathBuf, Override)> = options
            .roots
            .iter()
            .map(|root| build_overrides(root, options).map(|o| (root.clone(), o)))
            .collect::<Result<_>>()?;

        let task = SearchTask::new(next_search_id());
        let search_id = task.id();
        let cancelled = task.cancelled_flag();
        let include_ignored = options.include_ignored;
        let limit = options.max_results.unwrap_or(usize::MAX);

        self.runtime.spawn(async move {
            let sink_for_blocking = sink.clone();
            let cancelled_for_blocking = cancelled.clone();
            let result = tokio::task::spawn_blocking(move || {
                let found = AtomicUsize::new(0);
                for (root, overrides) in &roots {
                    if cancelled_for_blocking.load(Ordering::Relaxed) {
                        break;
                    }
                    let scope = RootScope {
                        root,
                        regex: &regex,
                        search_id,
                        cancelled: &cancelled_for_blocking,
                        sink: &sink_for_blocking,
                        found: &found,
                        limit,
                    };
                    search_root(&scope, overrides.clone(), include_ignored);
                }
                found.load(Ordering::Relaxed)
            })
            .await;

            match result {
                Ok(total) => {
                    tracing::debug!(search_id, total, "workspace search finished");
                }
                Err(e) => {
                    tracing::error!(search_id, error = %e, "workspace search task failed");
                }
            }
            if !cancelled.load(Ordering::Relaxed) {
                sink.send_done(search_id);
            }
        });

        Ok(task)
    }
}

struct RootScope<'a> {
    root: &'a Path,
    regex: &'a Regex,
    search_id: u64,
    cancelled: &'a AtomicBool,
    sink: &'a EventSink,
    found: &'a AtomicUsize,
    limit: usize,
}

impl RootScope<'_> {
    fn should_stop(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.found.load(Ordering::Relaxed) >= self.limit
    }
}

fn search_root(scope: &RootScope<'_>, overrides: Override, include_ignored: bool) {
    let walker = WalkBuilder::new(scope.root)
        .hidden(true)
        .git_ignore(!include_ignored)
        .git_global(!include_ignored)
        .git_exclude(!include_ignored)
        .ignore(!include_ignored)
        .overrides(overrides)
        .build_parallel();

    walker.run(|| {
        let sink = scope.sink.clone();
        Box::new(move |entry| {
            if scope.should_stop() {
                return WalkState::Quit;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(_) => return WalkState::Continue,
            };
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                return WalkState::Continue;
            }

            if let Err(e) = search_file(scope, path, &sink) {
                tracing::trace!(file = %path.display(), error = %e, "skipping unreadable file");
            }

            if scope.should_stop() {
                WalkState::Quit
            } else {
                WalkState::Continue
            }
        })
    });
}

fn search_file(scope: &RootScope<'_>, path: &Path, sink: &EventSink) -> std::io::Result<()> {
    let mut file = File::open(path)?;
    let mut preview = [0u8; 8192];
    let preview_len = file.read(&mut preview)?;
    if preview_len == 0 || is_likely_binary(&preview[..preview_len]) {
        return Ok(());
    }

    let file = File::open(path)?;
    search_lines(file, scope.regex, scope.cancelled, |m| {
        let seen = scope.found.fetch_add(1, Ordering::Relaxed);
        if seen >= scope.limit {
            return false;
        }
        sink.send_match(
            scope.search_id,
            MatchEvent {
                root: scope.root.to_path_buf(),
                file: path.to_path_buf(),
                line: m.line,
                character: m.character,
                length: m.length,
                line_text: m.line_text,
            },
        )
    })
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/global.rs"]
mod tests;
