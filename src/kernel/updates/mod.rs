//! Real-time updates: change notifications → prioritized, batched pane updates.

pub mod coordinator;
pub mod event;
pub mod priority;
pub mod watch_table;

pub use coordinator::{CoordinatorHealth, CoordinatorMetrics, UpdateCoordinator};
pub use event::{path_key, ChangeNotice, Priority, UpdateEvent, WatchTargets};
pub use priority::PriorityRules;
pub use watch_table::{WatchRule, WatchTable};
