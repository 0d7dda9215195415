//! Core vocabulary shared by every engine component.
//!
//! - Action: what a key press asks for
//! - KeyInput: raw key plus modifiers and its canonical combination string
//! - DashboardError: error taxonomy

pub mod action;
pub mod error;
pub mod key;

pub use action::Action;
pub use error::{DashboardError, Result};
pub use key::{parse_key, KeyInput, KeyModifiers};
