//! Search session lifecycle.
//!
//! Each `start_session` bumps a generation counter. Every event coming back
//! from a provider carries the generation it was started under plus the
//! provider's search id; anything not matching the active pair is stale.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

#[derive(Debug, Clone)]
pub struct SessionHandle {
    generation: Generation,
    cancelled: Arc<AtomicBool>,
}

impl SessionHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct ActiveSession {
    handle: SessionHandle,
    search_id: Option<u64>,
    done: bool,
}

#[derive(Debug, Default)]
pub struct SessionController {
    next_generation: u64,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates the current handle (if any) and returns a fresh one.
    pub fn start_session(&mut self) -> SessionHandle {
        if let Some(prev) = self.active.take() {
            prev.handle.cancelled.store(true, Ordering::Relaxed);
        }

        self.next_generation += 1;
        let handle = SessionHandle {
            generation: Generation(self.next_generation),
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.active = Some(ActiveSession {
            handle: handle.clone(),
            search_id: None,
            done: false,
        });
        tracing::debug!(generation = handle.generation.0, "search session started");
        handle
    }

    /// Records the provider-assigned id for `generation`. Ignored when that
    /// generation is no longer current.
    pub fn bind_search_id(&mut self, generation: Generation, search_id: u64) -> bool {
        match self.active.as_mut() {
            Some(active) if active.handle.generation == generation => {
                active.search_id = Some(search_id);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, handle: &SessionHandle) {
        handle.cancelled.store(true, Ordering::Relaxed);
        if self
            .active
            .as_ref()
            .is_some_and(|a| a.handle.generation == handle.generation)
        {
            self.active = None;
        }
    }

    pub fn is_stale(&self, generation: Generation, search_id: u64) -> bool {
        match &self.active {
            Some(active) => {
                active.handle.is_cancelled()
                    || active.handle.generation != generation
                    || active.search_id != Some(search_id)
            }
            None => true,
        }
    }

    /// Staleness for events that carry no search id (icon replies).
    pub fn is_current(&self, generation: Generation) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.handle.generation == generation && !a.handle.is_cancelled())
    }

    pub fn active_handle(&self) -> Option<&SessionHandle> {
        self.active.as_ref().map(|a| &a.handle)
    }

    pub fn mark_done(&mut self, generation: Generation) {
        if let Some(active) = self.active.as_mut() {
            if active.handle.generation == generation {
                active.done = true;
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.done)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
