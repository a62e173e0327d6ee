//! Local search provider
//!
//! - searcher: term → regex, line-by-line scanning
//! - global: parallel workspace walk feeding the session sink

mod global;
mod searcher;

pub use global::LocalSearchProvider;
pub use searcher::{build_matcher, is_likely_binary, search_lines, LineMatch};
