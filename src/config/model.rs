// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::{Result, StagedagError};

/// Top-level configuration as read from a TOML file.
///
/// This is a direct mapping of the expected layout:
///
/// ```toml
/// default_env = "local"
///
/// [env.local]
/// staging_root = "/data/staging"
///
/// [env.cloud]
/// staging_root = "gs://genomics-etl/staging"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Environment used when neither `--env` nor `STAGEDAG_ENV` is given.
    #[serde(default)]
    pub default_env: Option<String>,

    /// All staging environments from `[env.<name>]`.
    ///
    /// Keys are the *environment names* (e.g. `"local"`, `"cloud"`).
    #[serde(default)]
    pub env: BTreeMap<String, EnvSection>,
}

/// `[env.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSection {
    /// Base path or object-store prefix under which all task output paths
    /// are resolved.
    pub staging_root: String,
}

/// Validated configuration.
///
/// Constructed from [`RawConfigFile`] via `TryFrom`, which enforces the
/// semantic invariants (at least one environment, non-empty staging roots,
/// a known `default_env`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    default_env: Option<String>,
    env: BTreeMap<String, EnvSection>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        default_env: Option<String>,
        env: BTreeMap<String, EnvSection>,
    ) -> Self {
        Self { default_env, env }
    }

    /// Names of all configured environments.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.env.keys().map(String::as_str)
    }

    /// Staging root for the selected environment.
    ///
    /// `selected` falls back to the configured `default_env`; selecting no
    /// environment at all, or an unknown one, is a configuration error.
    pub fn staging_root(&self, selected: Option<&str>) -> Result<&str> {
        let name = selected.or(self.default_env.as_deref()).ok_or_else(|| {
            StagedagError::ConfigError(
                "no environment selected and no default_env configured".to_string(),
            )
        })?;

        self.env
            .get(name)
            .map(|section| section.staging_root.as_str())
            .ok_or_else(|| StagedagError::ConfigError(format!("unknown environment '{name}'")))
    }
}
