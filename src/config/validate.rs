// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StagedagError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StagedagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.default_env, raw.env))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_environments(cfg)?;
    validate_staging_roots(cfg)?;
    validate_default_env(cfg)?;
    Ok(())
}

fn ensure_has_environments(cfg: &RawConfigFile) -> Result<()> {
    if cfg.env.is_empty() {
        return Err(StagedagError::ConfigError(
            "config must contain at least one [env.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_staging_roots(cfg: &RawConfigFile) -> Result<()> {
    for (name, section) in cfg.env.iter() {
        if section.staging_root.trim().is_empty() {
            return Err(StagedagError::ConfigError(format!(
                "[env.{name}].staging_root must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_default_env(cfg: &RawConfigFile) -> Result<()> {
    if let Some(default_env) = &cfg.default_env {
        if !cfg.env.contains_key(default_env) {
            return Err(StagedagError::ConfigError(format!(
                "default_env '{default_env}' does not name a configured [env.<name>] section"
            )));
        }
    }
    Ok(())
}
