//! CLI configuration: thin wrapper around `ambi_config` that honours
//! `--config` and `--timeout`.

use std::path::PathBuf;
use std::time::Duration;

use ambi_core::PlatformConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use ambi_config::Config;

/// The config file this invocation uses.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(ambi_config::config_path)
}

/// Load the config file plus environment overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(ambi_config::load_config_from(&config_path(global))?)
}

/// Resolve a `PlatformConfig`, applying global flag overrides.
pub fn platform_config(global: &GlobalOpts) -> Result<PlatformConfig, CliError> {
    let path = config_path(global);
    let cfg = load(global)?;
    if cfg.account.email.is_empty() {
        return Err(CliError::Config {
            message: format!("no account configured in {}", path.display()),
        });
    }

    let mut platform = ambi_config::to_platform_config(&cfg)?;
    if let Some(secs) = global.timeout {
        platform.timeout = Duration::from_secs(secs);
    }
    Ok(platform)
}
