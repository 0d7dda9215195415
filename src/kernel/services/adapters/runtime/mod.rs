//! Async runtime adapter: owns the tokio runtime that pane initialization and updates run on.

mod async_runtime;

pub use async_runtime::AsyncRuntime;
