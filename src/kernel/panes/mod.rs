//! Pane registry: lifecycle and buffered data for every registered pane.

pub mod debounce;
pub mod kind;
pub mod registry;
pub mod state;

pub use debounce::{DebounceQueue, QueueOutcome};
pub use kind::{PaneId, PaneKind};
pub use registry::{FlushReport, PaneRegistry, PaneRegistryBuilder, RegistryMetrics};
pub use state::{PanePhase, PaneState, UpdateCounters};
