//! Configuration loading and management.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use avg_core::DEFAULT_DESCRIPTION;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one file per tracker.
    pub trackers_dir: PathBuf,

    /// Description written by `create` when none is given.
    pub default_description: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("trackers_dir", &self.trackers_dir)
            .field("default_description", &self.default_description)
            .finish()
    }
}

impl Config {
    /// Default configuration rooted at a config home (normally `$HOME/.config`).
    pub fn defaults_in(config_home: &Path) -> Self {
        Self {
            trackers_dir: avg_dir(config_home).join("trackers"),
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }

    /// Loads configuration, optionally from a specific file.
    ///
    /// Requires `$HOME` to be set and `$HOME/.config` to exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_home(std::env::var_os("HOME"), config_path)
    }

    /// Loads configuration against an explicit home directory.
    pub(crate) fn load_with_home(
        home: Option<OsString>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let Some(home) = home.filter(|h| !h.is_empty()) else {
            bail!("The environment variable $HOME is not set.");
        };

        let config_home = PathBuf::from(home).join(".config");
        if !config_home.is_dir() {
            bail!(
                "The config directory that is set ({}) does not exist.",
                config_home.display()
            );
        }

        let mut figment = Figment::from(Serialized::defaults(Self::defaults_in(&config_home)));

        // Load from default config location
        figment = figment.merge(Toml::file(avg_dir(&config_home).join("config.toml")));

        // Load from specified config file
        if let Some(path) = config_path {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (AVG_*)
        figment = figment.merge(Env::prefixed("AVG_"));

        Ok(figment.extract()?)
    }
}

/// Returns the avg directory inside a config home.
fn avg_dir(config_home: &Path) -> PathBuf {
    config_home.join("avg")
}
