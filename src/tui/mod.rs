//! Terminal frontend (crossterm + ratatui).
//!
//! Kept apart from `kernel` so the dashboard engine builds without terminal crates.

pub mod crossterm;
pub mod terminal_guard;
pub mod view;
