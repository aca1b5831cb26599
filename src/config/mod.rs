// src/config/mod.rs

//! Configuration loading and validation for sitepipe.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: read a config file from disk.
//! - `validate.rs`: globs, browser queries, ports, alias graph.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_base_dir, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, ImageSection, Layout, PathsSection, ProjectSection, RawConfigFile,
    ScriptSection, ServeSection, StyleSection, TemplateSection,
};
