//! Search engine façade.
//!
//! Owns the result index and the session lifecycle, drains provider events
//! from the per-session channel and publishes a [`ResultSnapshot`] after
//! every reconciliation.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use crate::kernel::aggregator::Aggregator;
use crate::kernel::decorations::DecorationSync;
use crate::kernel::replace::{self, ReplaceSummary, Result as ReplaceResult};
use crate::kernel::results::{NodeId, Removed, ResultIndex};
use crate::kernel::services::ports::{
    ContentSource, DecorationHost, EditApplier, EngineSettings, EventSink, IconReply,
    IconResolver, NoIcons, ProviderEvent, SearchOptions, SearchProvider, SearchTask, SessionEvent,
};
use crate::kernel::session::SessionController;
use crate::kernel::snapshot::ResultSnapshot;

pub struct SearchEngine {
    settings: EngineSettings,
    index: ResultIndex,
    sessions: SessionController,
    aggregator: Aggregator,
    decorations: DecorationSync,
    provider: Box<dyn SearchProvider>,
    content: Box<dyn ContentSource>,
    editor: Box<dyn EditApplier>,
    host: Box<dyn DecorationHost>,
    icons: Box<dyn IconResolver>,
    term: String,
    replace_term: String,
    options: SearchOptions,
    task: Option<SearchTask>,
    events_tx: Option<Sender<SessionEvent>>,
    events_rx: Option<Receiver<SessionEvent>>,
    subscribers: Vec<Sender<ResultSnapshot>>,
}

impl SearchEngine {
    pub fn new(
        settings: EngineSettings,
        provider: Box<dyn SearchProvider>,
        content: Box<dyn ContentSource>,
        editor: Box<dyn EditApplier>,
        host: Box<dyn DecorationHost>,
    ) -> Self {
        let aggregator = Aggregator::new(settings.auto_collapse_threshold, false);
        let decorations = DecorationSync::new(settings.decoration_owner.clone());
        let options = settings.default_options.clone();
        Self {
            settings,
            index: ResultIndex::new(),
            sessions: SessionController::new(),
            aggregator,
            decorations,
            provider,
            content,
            editor,
            host,
            icons: Box::new(NoIcons),
            term: String::new(),
            replace_term: String::new(),
            options,
            task: None,
            events_tx: None,
            events_rx: None,
            subscribers: Vec::new(),
        }
    }

    pub fn with_icon_resolver(mut self, icons: Box<dyn IconResolver>) -> Self {
        self.icons = icons;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn replace_term(&self) -> &str {
        &self.replace_term
    }

    pub fn set_replace_term(&mut self, term: impl Into<String>) {
        self.replace_term = term.into();
    }

    pub fn index(&self) -> &ResultIndex {
        &self.index
    }

    /// Fires with a fresh snapshot after every reconciliation.
    pub fn subscribe(&mut self) -> Receiver<ResultSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Starts a new session, superseding any running one. An empty term
    /// only clears the results.
    pub fn search(&mut self, term: &str, options: SearchOptions) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        let handle = self.sessions.start_session();
        let generation = handle.generation();
        self.events_tx = None;
        self.events_rx = None;
        self.index.clear();
        self.term = term.to_string();
        self.aggregator.set_multi_root(options.roots.len() > 1);
        self.options = options;

        if term.is_empty() {
            self.sessions.mark_done(generation);
            self.reconcile();
            return;
        }

        let (tx, rx) = mpsc::channel();
        let sink = EventSink::new(generation, tx.clone());
        self.events_tx = Some(tx);
        self.events_rx = Some(rx);

        match self.provider.search(term, &self.options, sink) {
            Ok(task) => {
                tracing::info!(
                    generation = generation.0,
                    search_id = task.id(),
                    term,
                    "search started"
                );
                self.sessions.bind_search_id(generation, task.id());
                self.task = Some(task);
            }
            Err(e) => {
                tracing::warn!(error = %e, term, "search provider failed, no results");
                self.sessions.mark_done(generation);
                self.events_tx = None;
                self.events_rx = None;
                self.reconcile();
            }
        }
    }

    /// Stops the running session. Results gathered so far stay published.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        if let Some(handle) = self.sessions.active_handle().cloned() {
            let was_running = self.sessions.is_running();
            self.sessions.cancel(&handle);
            self.events_tx = None;
            self.events_rx = None;
            if was_running {
                tracing::info!(generation = handle.generation().0, "search cancelled");
                self.reconcile();
            }
        }
    }

    pub fn is_searching(&self) -> bool {
        self.sessions.is_running()
    }

    /// Applies every queued event without blocking.
    pub fn pump(&mut self) -> usize {
        let mut events = Vec::new();
        if let Some(rx) = self.events_rx.as_ref() {
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        let count = events.len();
        for event in events {
            self.apply_event(event);
        }
        count
    }

    /// Blocks until the running session completes or `timeout` elapses.
    /// A timeout too large to express as a deadline waits without one.
    /// Returns whether the session is finished.
    pub fn pump_until_done(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.sessions.is_running() {
            let received = match (self.events_rx.as_ref(), deadline) {
                (Some(rx), Some(deadline)) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                (Some(rx), None) => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                (None, _) => break,
            };
            match received {
                Ok(event) => self.apply_event(event),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        self.pump();
        !self.sessions.is_running()
    }

    fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Provider {
                generation,
                search_id,
                event: ProviderEvent::Match(m),
            } => {
                let folded =
                    self.aggregator
                        .on_match(&mut self.index, &self.sessions, generation, search_id, &m);
                if let (Some(folded), Some(tx)) = (folded, self.events_tx.as_ref()) {
                    if folded.new_file {
                        self.icons
                            .resolve(IconReply::new(generation, m.root, m.file, tx.clone()));
                    }
                }
            }
            SessionEvent::Provider {
                generation,
                search_id,
                event: ProviderEvent::Done,
            } => {
                if self
                    .aggregator
                    .on_done(&mut self.sessions, generation, search_id)
                {
                    self.task = None;
                    tracing::info!(
                        generation = generation.0,
                        files = self.index.file_count(),
                        matches = self.index.match_count(),
                        "search finished"
                    );
                    self.reconcile();
                }
            }
            SessionEvent::Icon {
                generation,
                root,
                file,
                icon,
            } => {
                if !self.sessions.is_current(generation) {
                    return;
                }
                let Some(id) = self
                    .index
                    .find_root(&root)
                    .and_then(|r| self.index.find_file(r, &file))
                else {
                    return;
                };
                if let Some(entry) = self.index.file_mut(id) {
                    entry.icon = Some(icon);
                }
                if !self.sessions.is_running() {
                    self.reconcile();
                }
            }
        }
    }

    /// Publishes the index and re-syncs decorations of visible editors.
    fn reconcile(&mut self) {
        self.decorations
            .sync_visible(self.host.as_mut(), &self.index);
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = ResultSnapshot::capture(&self.index);
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    pub fn refresh_decorations(&mut self) {
        self.reconcile();
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot::capture(&self.index)
    }

    pub fn remove_node(&mut self, id: NodeId) -> Removed {
        let removed = self.index.remove(id);
        tracing::debug!(
            lines = removed.lines,
            files = removed.files,
            roots = removed.roots,
            "removed results"
        );
        self.reconcile();
        removed
    }

    pub fn replace_one(&mut self, line: NodeId) -> ReplaceResult<Removed> {
        let removed = replace::replace_line(
            &mut self.index,
            self.content.as_ref(),
            self.editor.as_mut(),
            line,
            &self.replace_term,
        )?;
        self.reconcile();
        Ok(removed)
    }

    pub fn replace_file(&mut self, file: NodeId) -> ReplaceResult<usize> {
        let count = replace::replace_file(
            &mut self.index,
            self.content.as_ref(),
            self.editor.as_mut(),
            file,
            &self.replace_term,
        )?;
        self.reconcile();
        Ok(count)
    }

    pub fn replace_all(&mut self) -> ReplaceSummary {
        let summary = replace::replace_all(
            &mut self.index,
            self.content.as_ref(),
            self.editor.as_mut(),
            &self.replace_term,
        );
        tracing::info!(
            files = summary.files,
            matches = summary.matches,
            failures = summary.failures.len(),
            "replace all finished"
        );
        self.reconcile();
        summary
    }

    pub fn preview(&self, file: NodeId) -> ReplaceResult<String> {
        replace::build_preview(&self.index, self.content.as_ref(), file, &self.replace_term)
    }

    pub fn set_expanded(&mut self, file: NodeId, expanded: bool) -> bool {
        let Some(entry) = self.index.file_mut(file) else {
            return false;
        };
        if entry.expanded == expanded {
            return false;
        }
        entry.expanded = expanded;
        self.reconcile();
        true
    }

    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    fn set_all_expanded(&mut self, expanded: bool) {
        for id in self.index.file_ids() {
            if let Some(entry) = self.index.file_mut(id) {
                entry.expanded = expanded;
            }
        }
        self.reconcile();
    }

    pub fn select(&mut self, line: Option<NodeId>) -> bool {
        if !self.index.select(line) {
            return false;
        }
        self.reconcile();
        true
    }

    pub fn select_next(&mut self) -> Option<NodeId> {
        self.step_selection(1)
    }

    pub fn select_previous(&mut self) -> Option<NodeId> {
        self.step_selection(-1)
    }

    /// Moves the selection through all matches in display order, wrapping
    /// at both ends.
    fn step_selection(&mut self, delta: isize) -> Option<NodeId> {
        let order: Vec<NodeId> = self
            .index
            .file_ids()
            .into_iter()
            .flat_map(|file| self.index.sorted_lines(file))
            .collect();
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let next = match self
            .index
            .selected()
            .and_then(|s| order.iter().position(|&id| id == s))
        {
            Some(pos) if delta < 0 => (pos + len - 1) % len,
            Some(pos) => (pos + 1) % len,
            None if delta < 0 => len - 1,
            None => 0,
        };
        let id = order[next];
        self.select(Some(id));
        Some(id)
    }

    pub fn file_count(&self) -> usize {
        self.index.file_count()
    }

    pub fn match_count(&self) -> usize {
        self.index.match_count()
    }

    pub fn match_count_in(&self, file: NodeId) -> usize {
        self.index.file(file).map_or(0, |f| f.match_count())
    }

    pub fn is_root_visible(&self, root: &Path) -> Option<bool> {
        self.index
            .find_root(root)
            .and_then(|id| self.index.root(id))
            .map(|r| r.visible)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/engine.rs"]
mod tests;
