//! Headless search core: result store, session lifecycle, aggregation,
//! replacement and decoration sync.

pub mod aggregator;
pub mod decorations;
pub mod engine;
pub mod replace;
pub mod results;
pub mod services;
pub mod session;
pub mod snapshot;

pub use aggregator::{Aggregator, Folded};
pub use decorations::{decorations_for, merged_decorations, DecorationSync};
pub use engine::SearchEngine;
pub use replace::{ReplaceError, ReplaceSummary};
pub use results::{FileEntry, LineEntry, Node, NodeId, Removed, ResultIndex, RootEntry};
pub use session::{Generation, SessionController, SessionHandle};
pub use snapshot::{FileSnapshot, LineSnapshot, ResultSnapshot, RootSnapshot};
