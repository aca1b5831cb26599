// src/watch/mod.rs

//! File watching and change detection.
//!
//! - Watch bindings: one source glob per build task, relative to the `src`
//!   directory.
//! - A cross-platform filesystem watcher (`notify`).
//! - Content hashing so repeated events for an unchanged file do not rebuild.
//!
//! It knows nothing about composite tasks or the runtime queue; it only turns
//! filesystem changes into task triggers.

pub mod cache;
pub mod event_handler;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{WatchBinding, bound_tasks, build_watch_bindings};
pub use watcher::{WatcherHandle, spawn_watcher};
