// src/exec/mod.rs

//! Execution layer.
//!
//! - [`executor_loop`] owns the background loop that runs the pipeline for
//!   one build task at a time and reports back via `RuntimeEvent`s.
//! - [`backend`] provides the `ExecutorBackend` trait and the
//!   `RealExecutorBackend` the runtime uses in production.

pub mod backend;
pub mod executor_loop;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::spawn_executor;
