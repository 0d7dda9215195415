//! Layout engine: pane geometry from terminal size and the active preset.

pub mod engine;
pub mod geom;
pub mod preset;

pub use engine::{compute_regions, Layout, LayoutEngine, PaneRegion, PresetChange, PresetSummary};
pub use geom::{Rect, TerminalDimensions};
pub use preset::{LayoutShape, Preset, PresetCatalog};
