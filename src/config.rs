use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{RefCrawlError, Result};
use crate::types::{EntryRef, DEFAULT_LOCALE};

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the directory holding the configuration file under the user's
/// config directory.
pub const APP_DIR: &str = "refcrawl";

/// Host serving the Content Management API when none is configured.
pub const DEFAULT_API_HOST: &str = "api.contentstack.io";

/// Environment variables read by `apply_env_overrides`.
pub const ENV_ENTRY_UID: &str = "ENTRY_UID";
pub const ENV_CONTENT_TYPE_UID: &str = "CONTENT_TYPE_UID";
pub const ENV_LOCALE_CODE: &str = "LOCALE_CODE";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_AUTHORIZATION_TOKEN: &str = "AUTHORIZATION_TOKEN";
pub const ENV_API_HOST: &str = "CONTENTSTACK_API_HOST";

/// Configuration for one crawl.
///
/// Built once before the crawl starts and never changed while it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Uid of the root entry.
    pub entry_uid: String,
    /// Content type of the root entry.
    pub content_type_uid: String,
    /// Locale every entry is resolved under.
    pub locale: String,
    /// Host of the Content Management API, without scheme.
    pub api_host: String,
    /// Stack API key.
    pub api_key: String,
    /// Management token sent as the `authorization` header.
    pub authorization_token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            entry_uid: String::new(),
            content_type_uid: String::new(),
            locale: DEFAULT_LOCALE.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: String::new(),
            authorization_token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl CrawlConfig {
    /// The root entry this configuration points at.
    pub fn root(&self) -> EntryRef {
        EntryRef::new(self.entry_uid.clone(), self.content_type_uid.clone())
    }

    /// Checks that the root entry and locale are set.
    pub fn validate_root(&self) -> Result<()> {
        let missing = missing_fields(&[
            ("entry_uid", &self.entry_uid),
            ("content_type_uid", &self.content_type_uid),
            ("locale", &self.locale),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RefCrawlError::Config {
                message: format!("missing root settings: {}", missing.join(", ")),
            })
        }
    }

    /// Checks that the settings needed to reach the API are set.
    pub fn validate_credentials(&self) -> Result<()> {
        let missing = missing_fields(&[
            ("api_host", &self.api_host),
            ("api_key", &self.api_key),
            ("authorization_token", &self.authorization_token),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RefCrawlError::Config {
                message: format!("missing API credentials: {}", missing.join(", ")),
            })
        }
    }
}

fn missing_fields<'a>(fields: &[(&'a str, &String)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

/// Returns the default configuration path, `<config dir>/refcrawl/config.toml`.
///
/// Falls back to the current directory when the platform has no config
/// directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

/// Loads the configuration from `config_path`.
///
/// If the file does not exist, returns the default configuration.
pub fn load_config(config_path: &Path) -> Result<CrawlConfig> {
    if !config_path.exists() {
        return Ok(CrawlConfig::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| RefCrawlError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: CrawlConfig = toml::from_str(&contents).map_err(|e| RefCrawlError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    Ok(config)
}

/// Saves the configuration to `config_path` using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// so a partial write never corrupts the configuration.
pub fn save_config(config_path: &Path, config: &CrawlConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| RefCrawlError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = config_path.with_extension("tmp");

    let contents = toml::to_string_pretty(config).map_err(|e| RefCrawlError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &contents).map_err(|e| RefCrawlError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, config_path).map_err(|e| RefCrawlError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Overlays environment settings onto `config`.
///
/// `lookup` resolves a variable name to its value; the CLI passes the process
/// environment. Unset and empty variables leave the field untouched.
pub fn apply_env_overrides<F>(mut config: CrawlConfig, lookup: F) -> CrawlConfig
where
    F: Fn(&str) -> Option<String>,
{
    let overlay = |field: &mut String, var: &str| {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            *field = value;
        }
    };

    overlay(&mut config.entry_uid, ENV_ENTRY_UID);
    overlay(&mut config.content_type_uid, ENV_CONTENT_TYPE_UID);
    overlay(&mut config.locale, ENV_LOCALE_CODE);
    overlay(&mut config.api_key, ENV_API_KEY);
    overlay(&mut config.authorization_token, ENV_AUTHORIZATION_TOKEN);
    overlay(&mut config.api_host, ENV_API_HOST);

    config
}
