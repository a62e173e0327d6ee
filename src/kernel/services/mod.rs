//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts and the types crossing them.
//! - `adapters`: OS/runtime specific implementations (IO/async).

pub mod adapters;
pub mod ports;
