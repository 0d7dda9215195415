//! Headless dashboard engine.
//!
//! - `layout`: terminal size + preset → pane geometry
//! - `panes`: pane lifecycle and buffered data
//! - `keyboard`: key combos → actions
//! - `updates`: change notifications → prioritized pane updates
//! - `dashboard`: facade tying the four together for a host

pub mod dashboard;
pub mod keyboard;
pub mod layout;
pub mod panes;
pub mod services;
pub mod updates;

mod util;

pub use dashboard::{Dashboard, DashboardMetrics, DashboardSnapshot, KeyOutcome};
pub use keyboard::{KeyboardDispatcher, KeyboardMetrics};
pub use layout::{Layout, LayoutEngine, PresetCatalog, TerminalDimensions};
pub use panes::{PaneId, PaneKind, PaneRegistry, PaneState};
pub use updates::{UpdateCoordinator, UpdateEvent};
