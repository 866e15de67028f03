//! Configuration file support.
//!
//! The file is TOML with one table per section. Every option can be overridden from
//! the environment as `SOTAGENTS_<SECTION>__<OPTION>`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [general]
//! debug = true
//! format = "text"
//!
//! [server]
//! url = "https://sotagents.com"
//! api_version = 1
//!
//! [auth]
//! token_access = "..."
//! token_refresh = "..."
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConsoleFormat, DEFAULT_SERVER_URL};
use crate::error::{ConfigOp, InvalidConfiguration};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "SOTAGENTS";

/// Configuration file structure
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub auth: AuthSection,
}

/// `[general]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default = "default_true")]
    pub debug: bool,

    #[serde(default)]
    pub format: ConsoleFormat,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            debug: true,
            format: ConsoleFormat::default(),
        }
    }
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default = "default_api_version")]
    pub api_version: u32,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            api_version: default_api_version(),
        }
    }
}

/// `[auth]`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_access: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_refresh: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_api_version() -> u32 {
    1
}

impl ConfigFile {
    /// Load the file at `path`, layered under environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InvalidConfiguration> {
        Self::read(path, true)
    }

    /// Load the file at `path` alone, ignoring the environment.
    pub fn load_file(path: &Path) -> Result<Self, InvalidConfiguration> {
        Self::read(path, false)
    }

    fn read(path: &Path, with_env: bool) -> Result<Self, InvalidConfiguration> {
        let cannot_read = |e: config::ConfigError| {
            InvalidConfiguration::with_message(
                ConfigOp::Load,
                format!(
                    "Cannot read the config file '{}'. Error: {}",
                    path.display(),
                    e
                ),
            )
        };

        let mut builder = config::Config::builder().add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let settings = builder.build().map_err(cannot_read)?;
        settings.try_deserialize().map_err(cannot_read)
    }

    /// Save to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), InvalidConfiguration> {
        let saving = |e: Box<dyn std::error::Error + Send + Sync>| {
            InvalidConfiguration::new(ConfigOp::Save, None, None, Some(e))
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| saving(e.into()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| saving(e.into()))?;
        std::fs::write(path, content).map_err(|e| saving(e.into()))
    }
}
