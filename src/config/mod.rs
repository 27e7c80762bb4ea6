// src/config/mod.rs

//! Staging configuration for stagedag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate semantic invariants on the raw model (`validate.rs`).
//!
//! The configuration only selects *where* artifacts live (one staging root
//! per named environment); which tasks exist is declared in code, per graph.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, selected_env};
pub use model::{ConfigFile, EnvSection, RawConfigFile};
