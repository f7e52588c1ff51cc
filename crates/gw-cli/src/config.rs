//! Gateway layout configuration.
//!
//! The CLI operates on a gateway installation rooted at `GATEWAY_HOME`
//! (current directory when unset). The standard layout can be
//! overridden per directory from `conf/gateway.toml` under the home.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// Relative location of the optional configuration file.
const CONFIG_RELATIVE_PATH: &str = "conf/gateway.toml";

/// Resolved gateway directory layout.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    home: PathBuf,
    topologies_dir: PathBuf,
    security_dir: PathBuf,
    deployments_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    topologies_dir: Option<PathBuf>,
    security_dir: Option<PathBuf>,
    deployments_dir: Option<PathBuf>,
}

impl GatewayConfig {
    /// Standard layout under the given home directory.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            topologies_dir: home.join("conf").join("topologies"),
            security_dir: home.join("data").join("security"),
            deployments_dir: home.join("data").join("deployments"),
            home,
        }
    }

    /// Resolves the layout from `GATEWAY_HOME` and the optional
    /// configuration file beneath it.
    pub fn load() -> CliResult<Self> {
        let home = env::var_os("GATEWAY_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::load_from(home)
    }

    /// Resolves the layout for an explicit home directory.
    pub fn load_from(home: impl Into<PathBuf>) -> CliResult<Self> {
        let mut config = Self::new(home);
        let file = config.home.join(CONFIG_RELATIVE_PATH);
        if file.is_file() {
            let content = fs::read_to_string(&file)?;
            let overrides: ConfigOverrides = toml::from_str(&content)
                .map_err(|e| CliError::config(format!("{}: {e}", file.display())))?;
            if let Some(dir) = overrides.topologies_dir {
                config.topologies_dir = config.home.join(dir);
            }
            if let Some(dir) = overrides.security_dir {
                config.security_dir = config.home.join(dir);
            }
            if let Some(dir) = overrides.deployments_dir {
                config.deployments_dir = config.home.join(dir);
            }
        }
        Ok(config)
    }

    /// Gateway home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding topology descriptors.
    #[must_use]
    pub fn topologies_dir(&self) -> &Path {
        &self.topologies_dir
    }

    /// Directory holding the master secret and credential stores.
    #[must_use]
    pub fn security_dir(&self) -> &Path {
        &self.security_dir
    }

    /// Directory holding deployment artifacts.
    #[must_use]
    pub fn deployments_dir(&self) -> &Path {
        &self.deployments_dir
    }
}
