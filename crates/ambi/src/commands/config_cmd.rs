//! Config subcommand handlers.

use std::io::BufRead;
use std::str::FromStr;

use ambi_core::DeviceConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    ambi_config::save_config_to(cfg, &config::config_path(global))?;
    Ok(())
}

fn parse<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected {expected}, got '{value}'"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { email, force } => {
            let path = config::config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            cfg.account.email = email;
            save(&cfg, global)?;

            output::print_success(
                &format!("Configuration written to {}", path.display()),
                global.quiet,
                &global.color,
            );
            if !global.quiet {
                eprintln!("  Next: ambi config set-password");
                eprintln!("        ambi config add-device <LOCATION> <ROOM>");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load(global)?;
            if cfg.account.password.is_some() {
                cfg.account.password = Some(REDACTED.into());
            }
            let out = match global.output {
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
                        message: e.to_string(),
                    })?
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(
                &config::config_path(global).display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;
            set_key(&mut cfg, &key, value)?;
            save(&cfg, global)?;
            output::print_success(&format!("Set {key}"), global.quiet, &global.color);
            Ok(())
        }

        // ── AddDevice ───────────────────────────────────────────────
        ConfigCommand::AddDevice {
            location,
            room,
            heater_cooler,
            feedback,
        } => {
            let mut cfg = config::load(global)?;
            let device = DeviceConfig {
                heater_cooler_mode: heater_cooler,
                show_feedbacks: feedback,
                ..DeviceConfig::new(location, room)
            };
            let name = device.device_name();

            if cfg.devices.iter().any(|d| d.device_name() == name) {
                return Err(CliError::Validation {
                    field: "device".into(),
                    reason: format!("'{name}' is already configured"),
                });
            }
            cfg.devices.push(device);
            save(&cfg, global)?;
            output::print_success(&format!("Added {name}"), global.quiet, &global.color);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            if cfg.account.email.is_empty() {
                return Err(CliError::Config {
                    message: "account.email is not set".into(),
                });
            }

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let password = line.trim_end_matches(['\r', '\n']);
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            ambi_config::store_password(&cfg.account.email, password)?;
            output::print_success(
                &format!("Password stored in system keyring for '{}'", cfg.account.email),
                global.quiet,
                &global.color,
            );
            Ok(())
        }
    }
}

fn set_key(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    let account = &mut cfg.account;
    let bridge = &mut cfg.bridge;
    match key {
        "account.email" => account.email = value,
        "account.base_url" => {
            let _: url::Url = parse(key, &value, "a URL")?;
            account.base_url = value;
        }
        "account.password_env" => account.password_env = Some(value),
        "account.timeout" => account.timeout = parse(key, &value, "seconds")?,
        "bridge.read_mode" => bridge.read_mode = parse(key, &value, "'cached' or 'direct'")?,
        "bridge.fan_speed_profile" => {
            bridge.fan_speed_profile =
                parse(key, &value, "'quiet-slowest' or 'low-slowest'")?;
        }
        "bridge.poll_interval" => bridge.poll_interval = parse(key, &value, "seconds")?,
        "bridge.login_refresh_interval" => {
            bridge.login_refresh_interval = parse(key, &value, "seconds")?;
        }
        "bridge.rate_limit_window" => bridge.rate_limit_window = parse(key, &value, "seconds")?,
        "bridge.threshold_file" => bridge.threshold_file = Some(value.into()),
        "bridge.heating_threshold" => {
            bridge.heating_threshold = parse(key, &value, "a temperature")?;
        }
        "bridge.cooling_threshold" => {
            bridge.cooling_threshold = parse(key, &value, "a temperature")?;
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: account.email, \
                     account.base_url, account.password_env, account.timeout, \
                     bridge.read_mode, bridge.fan_speed_profile, bridge.poll_interval, \
                     bridge.login_refresh_interval, bridge.rate_limit_window, \
                     bridge.threshold_file, bridge.heating_threshold, bridge.cooling_threshold"
                ),
            });
        }
    }
    Ok(())
}
