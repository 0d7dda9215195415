//! Services layer (ports + adapters).
//!
//! - `ports`: contracts and data types the engine consumes.
//! - `adapters`: OS/runtime specific implementations (file watching, settings files, tokio).

pub mod adapters;
pub mod ports;
