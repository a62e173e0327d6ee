use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::search::SessionEvent;
use crate::kernel::session::Generation;

/// Reply slot handed to an [`IconResolver`]. Answering is optional.
#[derive(Debug, Clone)]
pub struct IconReply {
    generation: Generation,
    root: PathBuf,
    file: PathBuf,
    tx: Sender<SessionEvent>,
}

impl IconReply {
    pub(crate) fn new(
        generation: Generation,
        root: PathBuf,
        file: PathBuf,
        tx: Sender<SessionEvent>,
    ) -> Self {
        Self {
            generation,
            root,
            file,
            tx,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn send(self, icon: impl Into<String>) {
        let _ = self.tx.send(SessionEvent::Icon {
            generation: self.generation,
            root: self.root,
            file: self.file,
            icon: icon.into(),
        });
    }
}

pub trait IconResolver {
    fn resolve(&self, reply: IconReply);
}

/// Resolver that never answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn resolve(&self, _reply: IconReply) {}
}
