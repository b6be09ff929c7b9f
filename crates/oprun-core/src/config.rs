//! oprun configuration
//!
//! Configuration files (first one found wins):
//! - $OPRUN_CONFIG - explicit path, must exist
//! - ./oprun.yaml - project config
//! - ~/.config/oprun/config.yaml - global config
//!
//! Environment overrides applied on top:
//! - OPRUN_REFERENCE_FILE - reference file path
//! - OPRUN_INJECTOR - injection tool executable

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::injector::InjectorConfig;
use crate::paths::Paths;
use crate::target::Targets;

pub const ENV_CONFIG: &str = "OPRUN_CONFIG";
pub const ENV_REFERENCE_FILE: &str = "OPRUN_REFERENCE_FILE";
pub const ENV_INJECTOR: &str = "OPRUN_INJECTOR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {} (from $OPRUN_CONFIG) does not exist", .0.display())]
    Missing(PathBuf),

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// oprun configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reference file whose presence switches on injection
    #[serde(default = "default_reference_file")]
    pub reference_file: PathBuf,

    /// Injection tool invocation
    #[serde(default)]
    pub injector: InjectorConfig,

    /// Commands run by each wrapper
    #[serde(default)]
    pub targets: Targets,
}

fn default_reference_file() -> PathBuf {
    PathBuf::from(".env.op")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_file: default_reference_file(),
            injector: InjectorConfig::default(),
            targets: Targets::default(),
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    Global(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (${})", p.display(), ENV_CONFIG),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

impl Config {
    /// Load configuration for the current process environment
    pub fn load(paths: &Paths) -> Result<LoadedConfig, ConfigError> {
        Self::load_with(paths, |key| std::env::var_os(key))
    }

    /// Load configuration, reading environment variables through `env`
    pub fn load_with<F>(paths: &Paths, env: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let source = match env(ENV_CONFIG).filter(|v| !v.is_empty()) {
            Some(explicit) => {
                let path = paths.resolve(Path::new(&explicit));
                if !path.exists() {
                    return Err(ConfigError::Missing(path));
                }
                ConfigSource::Explicit(path)
            }
            None => {
                let project = paths.project_config();
                let global = paths.global_config();
                if project.exists() {
                    ConfigSource::Project(project)
                } else if global.exists() {
                    ConfigSource::Global(global)
                } else {
                    ConfigSource::Defaults
                }
            }
        };

        let mut config = match &source {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) | ConfigSource::Global(p) => {
                Self::load_from(p)?
            }
            ConfigSource::Defaults => Self::default(),
        };

        config.apply_env(env);
        debug!(source = %source, "loaded config");

        Ok(LoadedConfig { config, source })
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file is a valid config: all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(reference) = env(ENV_REFERENCE_FILE).filter(|v| !v.is_empty()) {
            self.reference_file = PathBuf::from(reference);
        }
        if let Some(injector) = env(ENV_INJECTOR).filter(|v| !v.is_empty()) {
            self.injector.program = PathBuf::from(injector);
        }
    }
}
