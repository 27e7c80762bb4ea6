// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point for pipeline binaries:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that at least one environment exists, staging roots are
///   non-empty, and `default_env` (if set) names a known environment.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Stagedag.toml` in the current working
/// directory, but this function exists so you can later:
///
/// - Respect an env var (e.g. `STAGEDAG_CONFIG`).
/// - Look for multiple default locations.
/// - Support project-local config discovery.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Stagedag.toml")
}

/// Environment-name selection: the CLI flag beats `STAGEDAG_ENV`.
///
/// Returns `None` when neither is set, in which case the configured
/// `default_env` applies (see [`ConfigFile::staging_root`]).
pub fn selected_env(cli: Option<&str>) -> Option<String> {
    cli.map(str::to_string).or_else(|| {
        std::env::var("STAGEDAG_ENV")
            .ok()
            .filter(|value| !value.is_empty())
    })
}
