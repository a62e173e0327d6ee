//! Service ports: traits + data contracts.

pub mod content;
pub mod editor;
pub mod icon;
pub mod search;
pub mod settings;

pub use content::{ContentError, ContentSource};
pub use editor::{
    Decoration, DecorationHandle, DecorationHost, DecorationStyle, DecorationTarget, EditApplier,
    EditError, TextEdit, TextRange,
};
pub use icon::{IconReply, IconResolver, NoIcons};
pub use search::{
    EventSink, MatchEvent, ProviderEvent, SearchError, SearchOptions, SearchProvider, SearchTask,
    SessionEvent,
};
pub use settings::EngineSettings;
