//! Service ports: traits + data contracts.

pub mod config;
pub mod runtime;
pub mod settings;
pub mod source;

pub use config::EngineConfig;
pub use runtime::BoxFuture;
pub use settings::{KeybindingRule, PresetSettings, Settings};
pub use source::{ChangeKind, ChangeSubscription, PaneSource, SourceChange, StaticSource};
