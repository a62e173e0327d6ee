use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::kernel::session::Generation;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    Io(io::Error),
    InvalidRegex(regex::Error),
    InvalidGlob(ignore::Error),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Io(e) => write!(f, "IO error: {}", e),
            SearchError::InvalidRegex(e) => write!(f, "Invalid regex: {}", e),
            SearchError::InvalidGlob(e) => write!(f, "Invalid glob: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<io::Error> for SearchError {
    fn from(e: io::Error) -> Self {
        SearchError::Io(e)
    }
}

impl From<regex::Error> for SearchError {
    fn from(e: regex::Error) -> Self {
        SearchError::InvalidRegex(e)
    }
}

impl From<ignore::Error> for SearchError {
    fn from(e: ignore::Error) -> Self {
        SearchError::InvalidGlob(e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub match_case: bool,
    pub match_whole_word: bool,
    pub use_regex: bool,
    pub include_ignored: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_results: Option<usize>,
    pub roots: Vec<PathBuf>,
}

/// One match as reported by a provider. `line` and `character` are 1-based,
/// `length` and `character` count chars of `line_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub root: PathBuf,
    pub file: PathBuf,
    pub line: usize,
    pub character: usize,
    pub length: usize,
    pub line_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Match(MatchEvent),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Provider {
        generation: Generation,
        search_id: u64,
        event: ProviderEvent,
    },
    Icon {
        generation: Generation,
        root: PathBuf,
        file: PathBuf,
        icon: String,
    },
}

/// Session-scoped push side of the provider channel.
///
/// Sends never fail loudly: once the engine has moved on to another session
/// the receiver is gone and events are discarded.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: Generation,
    tx: Sender<SessionEvent>,
}

impl EventSink {
    pub fn new(generation: Generation, tx: Sender<SessionEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn send_match(&self, search_id: u64, event: MatchEvent) -> bool {
        self.send(search_id, ProviderEvent::Match(event))
    }

    pub fn send_done(&self, search_id: u64) -> bool {
        self.send(search_id, ProviderEvent::Done)
    }

    fn send(&self, search_id: u64, event: ProviderEvent) -> bool {
        self.tx
            .send(SessionEvent::Provider {
                generation: self.generation,
                search_id,
                event,
            })
            .is_ok()
    }
}

/// Handle to in-flight provider work. Cancellation is best effort.
#[derive(Debug, Clone)]
pub struct SearchTask {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl SearchTask {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn cancelled_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }
}

pub trait SearchProvider {
    /// Starts a search and returns immediately. Matches and the final `Done`
    /// are pushed through `sink` tagged with the returned task id.
    fn search(&self, term: &str, options: &SearchOptions, sink: EventSink) -> Result<SearchTask>;
}
