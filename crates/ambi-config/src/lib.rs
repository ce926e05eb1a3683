//! Configuration for the Ambi Climate bridge.
//!
//! TOML file plus `AMBI_`-prefixed environment overrides, password
//! resolution (env var, system keyring, plaintext), and translation into
//! `ambi_core::PlatformConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ambi_core::{DeviceConfig, FanSpeedProfile, PlatformConfig, ReadMode};

/// Keyring service under which account passwords are stored.
pub const KEYRING_SERVICE: &str = "ambi";

/// Environment variable checked for the password when the file names none.
pub const DEFAULT_PASSWORD_ENV: &str = "AMBI_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for '{email}'")]
    NoCredentials { email: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub account: Account,

    #[serde(default)]
    pub bridge: Bridge,

    /// Devices to expose, one `[[devices]]` table each.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Cloud account and transport settings.
#[derive(Debug, Deserialize, Serialize)]
pub struct Account {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub email: String,

    /// Plaintext password. Prefer the keyring or an env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of the environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: String::new(),
            password: None,
            password_env: None,
            timeout: default_timeout(),
        }
    }
}

/// Bridge behaviour. Intervals are in seconds.
#[derive(Debug, Deserialize, Serialize)]
pub struct Bridge {
    #[serde(default)]
    pub read_mode: ReadMode,

    #[serde(default)]
    pub fan_speed_profile: FanSpeedProfile,

    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    #[serde(default = "default_login_refresh_interval")]
    pub login_refresh_interval: u64,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window: u64,

    /// Defaults to `thresholds.json` in the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_file: Option<PathBuf>,

    #[serde(default = "default_heating_threshold")]
    pub heating_threshold: f64,

    #[serde(default = "default_cooling_threshold")]
    pub cooling_threshold: f64,
}

impl Default for Bridge {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::default(),
            fan_speed_profile: FanSpeedProfile::default(),
            poll_interval: default_poll_interval(),
            login_refresh_interval: default_login_refresh_interval(),
            rate_limit_window: default_rate_limit_window(),
            threshold_file: None,
            heating_threshold: default_heating_threshold(),
            cooling_threshold: default_cooling_threshold(),
        }
    }
}

fn default_base_url() -> String {
    ambi_core::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    300
}
fn default_login_refresh_interval() -> u64 {
    3 * 24 * 60 * 60
}
fn default_rate_limit_window() -> u64 {
    270
}
fn default_heating_threshold() -> f64 {
    15.0
}
fn default_cooling_threshold() -> f64 {
    25.0
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ambibridge", "ambi")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the threshold file.
pub fn default_threshold_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("thresholds.json"),
        |dirs| dirs.data_dir().join("thresholds.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ambi");
    p
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment.
///
/// Nested keys use a double underscore: `AMBI_ACCOUNT__EMAIL`,
/// `AMBI_BRIDGE__READ_MODE`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AMBI_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the account password.
///
/// Order: the configured (or default) env var, the system keyring, then
/// the plaintext value in the file.
pub fn resolve_password(account: &Account) -> Result<SecretString, ConfigError> {
    let env_name = account
        .password_env
        .as_deref()
        .unwrap_or(DEFAULT_PASSWORD_ENV);
    if let Ok(val) = std::env::var(env_name) {
        return Ok(SecretString::from(val));
    }

    if !account.email.is_empty() {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &account.email) {
            if let Ok(secret) = entry.get_password() {
                return Ok(SecretString::from(secret));
            }
        }
    }

    if let Some(ref pw) = account.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        email: account.email.clone(),
    })
}

/// Store a password in the system keyring for `email`.
pub fn store_password(email: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, email)?;
    entry.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `PlatformConfig`, resolving the password.
pub fn to_platform_config(cfg: &Config) -> Result<PlatformConfig, ConfigError> {
    let password = resolve_password(&cfg.account)?;
    platform_config_with_password(cfg, password)
}

/// Build a `PlatformConfig` around an already-resolved password.
pub fn platform_config_with_password(
    cfg: &Config,
    password: SecretString,
) -> Result<PlatformConfig, ConfigError> {
    let base_url: url::Url =
        cfg.account
            .base_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "account.base_url".into(),
                reason: format!("invalid URL: {}", cfg.account.base_url),
            })?;

    if cfg.account.email.is_empty() {
        return Err(ConfigError::Validation {
            field: "account.email".into(),
            reason: "must not be empty".into(),
        });
    }

    if let Some(dup) = duplicate_device(&cfg.devices) {
        return Err(ConfigError::Validation {
            field: "devices".into(),
            reason: format!("'{dup}' is listed more than once"),
        });
    }

    let bridge = &cfg.bridge;
    Ok(PlatformConfig {
        base_url,
        email: cfg.account.email.clone(),
        password,
        timeout: Duration::from_secs(cfg.account.timeout),
        read_mode: bridge.read_mode,
        fan_speed_profile: bridge.fan_speed_profile,
        poll_interval: Duration::from_secs(bridge.poll_interval),
        login_refresh_interval: Duration::from_secs(bridge.login_refresh_interval),
        rate_limit_window: Duration::from_secs(bridge.rate_limit_window),
        threshold_file: bridge
            .threshold_file
            .clone()
            .unwrap_or_else(default_threshold_path),
        default_heating_threshold: bridge.heating_threshold,
        default_cooling_threshold: bridge.cooling_threshold,
        devices: cfg.devices.clone(),
    })
}

fn duplicate_device(devices: &[DeviceConfig]) -> Option<String> {
    let mut seen = std::collections::HashSet::new();
    devices
        .iter()
        .map(DeviceConfig::device_name)
        .find(|name| !seen.insert(name.clone()))
}
