use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ContentError {
    Unavailable { path: PathBuf, source: io::Error },
}

impl ContentError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ContentError::Unavailable {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ContentError::Unavailable { path, .. } => path,
        }
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::Unavailable { path, source } => {
                write!(f, "Content unavailable for {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Unavailable { source, .. } => Some(source),
        }
    }
}

pub trait ContentSource {
    fn read_full_text(&self, path: &Path) -> Result<String, ContentError>;
}
