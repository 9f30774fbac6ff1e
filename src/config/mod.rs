// src/config/mod.rs

//! Configuration loading and validation for filewatcher.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI overrides on top (`loader.rs`).
//! - Validate values and fill defaults (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{RawConfigFile, RawWatchSection, WatchConfig};
pub use validate::{parse_duration, validate_root};
