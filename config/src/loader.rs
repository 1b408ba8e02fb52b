//! Layered configuration loading: defaults, then an optional TOML file,
//! then environment variables, in that order of increasing precedence.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::pipeline::PipelineConfig;

/// Where a loaded configuration came from, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(String),
    Environment,
}

/// Loads a `PipelineConfig` by layering defaults, an optional TOML file
/// and environment-variable overrides (prefixed `CLAIMGUARD_`).
pub struct ConfigLoader {
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: "CLAIMGUARD".to_string(),
        }
    }
}

impl ConfigLoader {
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Load configuration, optionally reading `path` as a TOML overlay
    /// before applying environment overrides. Missing files are treated
    /// as "no overlay," not an error.
    pub fn load(&self, path: Option<&Path>) -> Result<(PipelineConfig, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Defaults];
        let mut builder = config_rs::Config::builder()
            .add_source(config_rs::Config::try_from(&PipelineConfig::default())?);

        if let Some(path) = path {
            if path.exists() {
                info!(path = %path.display(), "loading pipeline config overlay");
                builder = builder.add_source(config_rs::File::from(path));
                sources.push(ConfigSource::File(path.display().to_string()));
            } else {
                warn!(path = %path.display(), "config overlay not found, using defaults");
            }
        }

        builder = builder.add_source(
            config_rs::Environment::with_prefix(&self.env_prefix).separator("__"),
        );
        sources.push(ConfigSource::Environment);

        let built = builder.build().context("failed to assemble configuration layers")?;
        let config: PipelineConfig = built
            .try_deserialize()
            .context("failed to deserialize pipeline configuration")?;

        Ok((config, sources))
    }
}
