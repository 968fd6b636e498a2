//! Sweep configuration.
//!
//! Configuration is loaded from an optional YAML file merged over built-in
//! defaults. The CLI uses it to seed flags; every value can still be
//! overridden per invocation.

use crate::client::ClientConfig;
use crate::error::{Result, SweepError};
use crate::policy::RetentionPolicy;
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Root configuration structure.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub retention: Retention,
    #[serde(default)]
    pub clean: Clean,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder()
            .add_source(ConfigRs::try_from(&Config::default())?)
            .add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// With no path, the built-in defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigRs::builder().add_source(ConfigRs::try_from(&Config::default())?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }

        Self::from_builder(builder)
    }

    /// Builds the [`ClientConfig`] described by this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_page_size(self.pagination.page_size)
    }

    /// Builds the [`RetentionPolicy`] described by this configuration.
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::with_separator(self.retention.separator)
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                SweepError::config_with_source(
                    "Failed to deserialize configuration",
                    None::<&str>,
                    e,
                )
            })
    }
}

impl From<config::ConfigError> for SweepError {
    fn from(e: config::ConfigError) -> Self {
        SweepError::config_with_source("Invalid configuration", None::<&str>, e)
    }
}

/// Network settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

/// Pagination settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Page-size hint passed as the `n` query parameter.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    100
}

/// Retention policy settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Retention {
    /// Separator character for the tag ordering key.
    #[serde(default = "default_separator")]
    pub separator: char,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            separator: default_separator(),
        }
    }
}

fn default_separator() -> char {
    crate::policy::DEFAULT_SEPARATOR
}

/// Clean-run settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Clean {
    /// Repository name prefix selecting which repositories to process.
    /// The empty prefix matches everything.
    #[serde(default)]
    pub prefix: String,
}
