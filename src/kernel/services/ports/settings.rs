use serde::{Deserialize, Serialize};

use super::search::SearchOptions;

pub const DEFAULT_AUTO_COLLAPSE_THRESHOLD: usize = 20;
pub const DEFAULT_DECORATION_OWNER: &str = "search-in-workspace";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// A file entry collapses when its match count reaches this value.
    #[serde(default = "default_auto_collapse_threshold")]
    pub auto_collapse_threshold: usize,
    #[serde(default = "default_decoration_owner")]
    pub decoration_owner: String,
    #[serde(default)]
    pub default_options: SearchOptions,
}

fn default_auto_collapse_threshold() -> usize {
    DEFAULT_AUTO_COLLAPSE_THRESHOLD
}

fn default_decoration_owner() -> String {
    DEFAULT_DECORATION_OWNER.to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_collapse_threshold: DEFAULT_AUTO_COLLAPSE_THRESHOLD,
            decoration_owner: DEFAULT_DECORATION_OWNER.to_string(),
            default_options: SearchOptions::default(),
        }
    }
}
