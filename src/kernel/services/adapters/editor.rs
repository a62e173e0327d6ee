//! In-memory decoration host
//!
//! Stands in for an editor view: tracks which files are open and which
//! decorations are applied to each, and records every delta it receives.

use crate::kernel::services::ports::{Decoration, DecorationHandle, DecorationHost, DecorationTarget};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationDelta {
    pub target: DecorationTarget,
    pub old: Vec<DecorationHandle>,
    pub new: Vec<DecorationHandle>,
}

#[derive(Debug, Default)]
struct HostState {
    next_handle: u64,
    open: Vec<PathBuf>,
    applied: FxHashMap<DecorationTarget, Vec<(DecorationHandle, Decoration)>>,
    deltas: Vec<DecorationDelta>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryEditorHost {
    state: Rc<RefCell<HostState>>,
}

impl MemoryEditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state.borrow_mut();
        if !state.open.contains(&path) {
            state.open.push(path);
        }
    }

    pub fn close(&self, path: &Path) {
        self.state.borrow_mut().open.retain(|p| p != path);
    }

    /// Decorations on `path` across all owners, in application order.
    pub fn decorations(&self, path: &Path) -> Vec<Decoration> {
        self.state
            .borrow()
            .applied
            .iter()
            .filter(|(target, _)| target.path == path)
            .flat_map(|(_, applied)| applied.iter().map(|(_, d)| *d))
            .collect()
    }

    pub fn total_decorations(&self) -> usize {
        self.state.borrow().applied.values().map(Vec::len).sum()
    }

    pub fn deltas(&self) -> Vec<DecorationDelta> {
        self.state.borrow().deltas.clone()
    }
}

impl DecorationHost for MemoryEditorHost {
    fn visible_files(&self) -> Vec<PathBuf> {
        self.state.borrow().open.clone()
    }

    fn apply_decoration_delta(
        &mut self,
        target: &DecorationTarget,
        old: &[DecorationHandle],
        new: &[Decoration],
    ) -> Vec<DecorationHandle> {
        let mut state = self.state.borrow_mut();
        let mut handles = Vec::with_capacity(new.len());
        let mut fresh = Vec::with_capacity(new.len());
        for decoration in new {
            state.next_handle += 1;
            let handle = DecorationHandle(state.next_handle);
            handles.push(handle);
            fresh.push((handle, *decoration));
        }

        let entry = state.applied.entry(target.clone()).or_default();
        entry.retain(|(handle, _)| !old.contains(handle));
        entry.extend(fresh);
        if entry.is_empty() {
            state.applied.remove(target);
        }

        state.deltas.push(DecorationDelta {
            target: target.clone(),
            old: old.to_vec(),
            new: handles.clone(),
        });
        handles
    }
}
