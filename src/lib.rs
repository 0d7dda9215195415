//! zdash - terminal dashboard coordination engine
//!
//! Module layout:
//! - core: shared vocabulary (Action, KeyInput, DashboardError)
//! - kernel: layout engine, pane registry, keyboard dispatcher, update coordinator, dashboard facade
//! - tui: crossterm/ratatui host glue (feature `tui`)

pub mod core;
pub mod kernel;
#[cfg(feature = "tui")]
pub mod tui;
