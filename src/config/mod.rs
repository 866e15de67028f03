//! Configuration management.
//!
//! [`Config`] is a flat, typed view of the configuration file. Each key is known
//! both by its field name (`debug`) and by its file location (`general.debug`), see
//! [`ENTRIES`]. Values are read and written as JSON text so that the CLI can pass
//! them through unchanged.

mod file;

pub use file::{AuthSection, ConfigFile, GeneralSection, ServerSection, ENV_PREFIX};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigOp, InvalidConfiguration, Result};
use crate::transport::Authorization;

/// Server used when none is configured
pub const DEFAULT_SERVER_URL: &str = "https://sotagents.com";

/// Output format of the command line
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    #[default]
    Text,
    Json,
}

impl ConsoleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleFormat::Text => "text",
            ConsoleFormat::Json => "json",
        }
    }
}

impl fmt::Display for ConsoleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(ConsoleFormat::Text),
            "json" => Ok(ConsoleFormat::Json),
            other => Err(format!("'{}' is not a valid ConsoleFormat", other)),
        }
    }
}

/// JSON type accepted by a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Str,
}

impl ValueType {
    fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Str => "str",
        }
    }
}

/// A configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigField {
    /// Field name
    pub key: &'static str,
    pub section: &'static str,
    pub option: &'static str,
    pub value_type: ValueType,
    /// Whether `null` is accepted
    pub optional: bool,
}

impl ConfigField {
    /// `section.option` form of the key
    pub fn path(&self) -> String {
        format!("{}.{}", self.section, self.option)
    }

    fn matches(&self, key: &str) -> bool {
        key == self.key
            || key
                .split_once('.')
                .is_some_and(|(section, option)| section == self.section && option == self.option)
    }
}

const fn field(
    key: &'static str,
    section: &'static str,
    option: &'static str,
    value_type: ValueType,
    optional: bool,
) -> ConfigField {
    ConfigField {
        key,
        section,
        option,
        value_type,
        optional,
    }
}

/// Every configuration key, in listing order.
#[rustfmt::skip]
pub const ENTRIES: &[ConfigField] = &[
    field("debug", "general", "debug", ValueType::Bool, false),
    field("format", "general", "format", ValueType::Str, false),
    field("server_url", "server", "url", ValueType::Str, false),
    field("api_version", "server", "api_version", ValueType::Int, false),
    field("token_access", "auth", "token_access", ValueType::Str, true),
    field("token_refresh", "auth", "token_refresh", ValueType::Str, true),
];

/// One `option: value` line of a section listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: &'static str,
    /// JSON text of the value
    pub value: String,
}

/// Application configuration
///
/// Saving writes back the file's own values. A value that came from an
/// environment override is only written once it has been changed.
#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    pub format: ConsoleFormat,
    pub server_url: String,
    pub api_version: u32,
    pub token_access: Option<String>,
    pub token_refresh: Option<String>,
    path: Option<PathBuf>,
    /// Values as loaded, environment included
    loaded: ConfigFile,
    /// Values as found in the file
    stored: ConfigFile,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(
            ConfigFile::default(),
            ConfigFile::default(),
            default_config_path(),
        )
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.to_file() == other.to_file() && self.path == other.path
    }
}

impl Eq for Config {}

/// `<config dir>/sotagents/config.toml`, when the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sotagents").join("config.toml"))
}

impl Config {
    fn from_file(loaded: ConfigFile, stored: ConfigFile, path: Option<PathBuf>) -> Self {
        let file = loaded.clone();
        Self {
            debug: file.general.debug,
            format: file.general.format,
            server_url: file.server.url,
            api_version: file.server.api_version,
            token_access: file.auth.token_access,
            token_refresh: file.auth.token_refresh,
            path,
            loaded,
            stored,
        }
    }

    /// Section view used for saving.
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            general: GeneralSection {
                debug: self.debug,
                format: self.format,
            },
            server: ServerSection {
                url: self.server_url.clone(),
                api_version: self.api_version,
            },
            auth: AuthSection {
                token_access: self.token_access.clone(),
                token_refresh: self.token_refresh.clone(),
            },
        }
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded = ConfigFile::load(path)?;
        let stored = ConfigFile::load_file(path)?;
        Ok(Self::from_file(loaded, stored, Some(path.to_path_buf())))
    }

    /// Load from [`default_config_path`].
    pub fn load_default() -> Result<Self> {
        let path = default_config_path().ok_or_else(|| {
            InvalidConfiguration::with_message(
                ConfigOp::Load,
                "Cannot locate the config directory.",
            )
        })?;
        Self::load(path)
    }

    /// File this configuration is saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            InvalidConfiguration::with_message(ConfigOp::Save, "No configuration file path.")
        })?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.persisted().save(path)?;
        Ok(())
    }

    /// File values with every change made since loading applied on top.
    fn persisted(&self) -> ConfigFile {
        let current = self.to_file();
        let loaded = &self.loaded;
        let mut file = self.stored.clone();
        keep(
            &mut file.general.debug,
            current.general.debug,
            &loaded.general.debug,
        );
        keep(
            &mut file.general.format,
            current.general.format,
            &loaded.general.format,
        );
        keep(
            &mut file.server.url,
            current.server.url,
            &loaded.server.url,
        );
        keep(
            &mut file.server.api_version,
            current.server.api_version,
            &loaded.server.api_version,
        );
        keep(
            &mut file.auth.token_access,
            current.auth.token_access,
            &loaded.auth.token_access,
        );
        keep(
            &mut file.auth.token_refresh,
            current.auth.token_refresh,
            &loaded.auth.token_refresh,
        );
        file
    }

    /// API root for the configured server and version.
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/v{}",
            self.server_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Credentials to use: an explicit `token` wins over the stored token pair.
    pub fn authorization(&self, token: Option<String>) -> Authorization {
        match (token, &self.token_access, &self.token_refresh) {
            (Some(token), _, _) => Authorization::Token(token),
            (None, Some(access), Some(refresh)) => Authorization::Jwt {
                access: access.clone(),
                refresh: refresh.clone(),
            },
            _ => Authorization::Anonymous,
        }
    }

    /// Keep a refreshed token pair; other credentials are not stored.
    pub fn store_authorization(&mut self, auth: &Authorization) {
        if let Authorization::Jwt { access, refresh } = auth {
            self.token_access = Some(access.clone());
            self.token_refresh = Some(refresh.clone());
        }
    }

    /// Look up a key by field name or by `section.option`.
    pub fn field(key: &str) -> Option<&'static ConfigField> {
        ENTRIES.iter().find(|field| field.matches(key))
    }

    /// JSON text of a value.
    pub fn get(&self, key: &str) -> Result<String> {
        let field = Self::field(key).ok_or_else(|| {
            InvalidConfiguration::new(
                ConfigOp::Get,
                Some(key.to_string()),
                None,
                Some(format!("Invalid configuration key: {}", key).into()),
            )
        })?;

        let value = match field.key {
            "debug" => Value::from(self.debug),
            "format" => Value::from(self.format.as_str()),
            "server_url" => Value::from(self.server_url.as_str()),
            "api_version" => Value::from(self.api_version),
            "token_access" => self.token_access.clone().map_or(Value::Null, Value::from),
            _ => self.token_refresh.clone().map_or(Value::Null, Value::from),
        };
        Ok(value.to_string())
    }

    /// Set a value from its text form.
    ///
    /// String keys accept unquoted text; everything else must be JSON of the key's
    /// type. On failure the previous value is kept.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let failure = |cause: String| {
            InvalidConfiguration::new(
                ConfigOp::Set,
                Some(key.to_string()),
                Some(value.to_string()),
                Some(cause.into()),
            )
        };

        let field =
            Self::field(key).ok_or_else(|| failure(format!("Invalid configuration key: {}", key)))?;

        let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
        let text = if field.value_type == ValueType::Str
            && !quoted
            && !value.trim().eq_ignore_ascii_case("null")
        {
            Value::from(value).to_string()
        } else {
            value.to_string()
        };

        let parsed: Value = serde_json::from_str(&text).map_err(|_| {
            failure(format!(
                "Cannot parse '{}' as '{}'.",
                text,
                field.value_type.name()
            ))
        })?;

        let mismatch = |parsed: &Value| {
            failure(format!(
                "Type mismatch. {} != {}",
                field.value_type.name(),
                json_type(parsed)
            ))
        };

        match (field.key, parsed) {
            ("debug", Value::Bool(flag)) => self.debug = flag,
            ("format", Value::String(text)) => {
                self.format = text.parse().map_err(failure)?;
            }
            ("server_url", Value::String(url)) => self.server_url = url,
            ("api_version", Value::Number(number)) => {
                self.api_version = number
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| failure(format!("'{}' is not a valid API version", number)))?;
            }
            ("token_access", Value::String(token)) => self.token_access = Some(token),
            ("token_access", Value::Null) => self.token_access = None,
            ("token_refresh", Value::String(token)) => self.token_refresh = Some(token),
            ("token_refresh", Value::Null) => self.token_refresh = None,
            (_, other) => return Err(mismatch(&other).into()),
        }
        Ok(())
    }

    /// Values grouped by section, in [`ENTRIES`] order.
    pub fn entries(&self) -> Vec<(&'static str, Vec<ConfigEntry>)> {
        let mut sections: Vec<(&'static str, Vec<ConfigEntry>)> = Vec::new();
        for field in ENTRIES {
            let entry = ConfigEntry {
                key: field.option,
                value: self.get(field.key).unwrap_or_else(|_| Value::Null.to_string()),
            };
            match sections.iter_mut().find(|(section, _)| *section == field.section) {
                Some((_, entries)) => entries.push(entry),
                None => sections.push((field.section, vec![entry])),
            }
        }
        sections
    }
}

fn keep<T: PartialEq>(target: &mut T, current: T, loaded: &T) {
    if current != *loaded {
        *target = current;
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
