//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod content;
pub mod editor;
pub mod icon;
pub mod paths;
pub mod runtime;
pub mod search;
pub mod settings;

pub use content::{FsContentSource, FsEditApplier, MemoryWorkspace};
pub use editor::{DecorationDelta, MemoryEditorHost};
pub use icon::ExtensionIconResolver;
pub use paths::{ensure_log_dir, get_log_dir, get_settings_path};
pub use runtime::build_runtime;
pub use search::LocalSearchProvider;
pub use settings::{load_settings, write_default_settings, SettingsError};
