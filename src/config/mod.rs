//! Configuration management for jirakit.
//!
//! Connection details are resolved once at startup from, in order of
//! precedence, environment variables, the TOML config file and (for the API
//! token only) the OS keyring. The result is validated before any command runs.

mod profile;
mod settings;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub use profile::Profile;
pub use settings::{Settings, DEFAULT_TIMEOUT_SECS};

/// Environment variable holding the JIRA base URL.
pub const ENV_BASE_URL: &str = "JIRA_BASE_URL";
/// Environment variable holding the account email.
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "JIRAKIT_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is present but invalid.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// Required values are absent from every source.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// On-disk layout of `config.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    profile: FileProfile,
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
struct FileProfile {
    url: Option<String>,
    email: Option<String>,
}

/// Fully resolved configuration.
#[derive(Clone)]
pub struct Config {
    /// Connection details.
    pub profile: Profile,
    /// Client behavior settings.
    pub settings: Settings,
    api_token: String,
}

impl Config {
    /// Build a configuration from explicit values and validate it.
    pub fn new(profile: Profile, settings: Settings, api_token: impl Into<String>) -> Result<Self> {
        let config = Self {
            profile,
            settings,
            api_token: api_token.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the environment, the config file and the keyring.
    ///
    /// When `path` is `None` the default config file is used if it exists.
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => read_config_file(p)?,
            None => match Self::default_path() {
                Ok(p) if p.exists() => read_config_file(&p)?,
                _ => ConfigFile::default(),
            },
        };

        let config = resolve(
            file,
            |name| std::env::var(name).ok(),
            |email| crate::api::get_token(email).ok(),
        )?;

        info!(base_url = %config.profile.url, "Configuration loaded");
        Ok(config)
    }

    /// The default config file location (`<config_dir>/jirakit/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("jirakit").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// The API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        self.settings.validate()?;
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Missing(vec![ENV_API_TOKEN]));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("profile", &self.profile)
            .field("settings", &self.settings)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    debug!(path = %path.display(), "Reading config file");
    let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    Ok(toml::from_str(&text)?)
}

/// Merge the sources into a validated [`Config`].
///
/// `env` looks up environment variables; `keyring` looks up a stored token by
/// account email. Empty values count as absent.
fn resolve(
    file: ConfigFile,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let url = non_empty(env(ENV_BASE_URL)).or(non_empty(file.profile.url));
    let email = non_empty(env(ENV_EMAIL)).or(non_empty(file.profile.email));
    let token = non_empty(env(ENV_API_TOKEN))
        .or_else(|| email.as_deref().and_then(|e| non_empty(keyring(e))));

    let mut missing = Vec::new();
    if url.is_none() {
        missing.push(ENV_BASE_URL);
    }
    if email.is_none() {
        missing.push(ENV_EMAIL);
    }
    if token.is_none() {
        missing.push(ENV_API_TOKEN);
    }

    let (Some(url), Some(email), Some(token)) = (url, email, token) else {
        return Err(ConfigError::Missing(missing));
    };

    let mut settings = file.settings;
    if let Some(raw) = non_empty(env(ENV_TIMEOUT_SECS)) {
        settings.timeout_secs = raw.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!("{} must be a whole number, got '{}'", ENV_TIMEOUT_SECS, raw))
        })?;
    }

    Config::new(Profile::new(url, email), settings, token)
}
