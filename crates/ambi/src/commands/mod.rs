//! Command dispatch: bridges CLI args -> platform operations -> output.

pub mod config_cmd;
pub mod control;
pub mod run;
pub mod status;

use ambi_core::{FetchOutcome, Platform, ThresholdStore, Thresholds};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a command that talks to the service.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(args, global).await,
        Command::Status => status::handle(global).await,
        Command::Switch { device, state } => control::switch(&device, state, global).await,
        Command::Temperature { device, value } => {
            control::temperature(&device, value, global).await
        }
        Command::Feedback { device, value } => control::feedback(&device, &value, global).await,
        // Config is handled before dispatch
        Command::Config(args) => config_cmd::handle(args, global),
    }
}

/// Log in and load every device once, for one-shot commands.
///
/// Thresholds are kept in memory; only `run` touches the threshold file.
async fn connect(global: &GlobalOpts) -> Result<Platform, CliError> {
    let cfg = config::platform_config(global)?;
    let thresholds = ThresholdStore::in_memory(Thresholds::new(
        cfg.default_heating_threshold,
        cfg.default_cooling_threshold,
    ));
    let platform = Platform::with_thresholds(cfg, thresholds)?;

    platform.sessions().login().await?;
    match platform.cache().fetch_status(true).await {
        FetchOutcome::Failed => Err(CliError::ApiError {
            status: None,
            message: "could not load devices (run with -v for details)".into(),
        }),
        _ => Ok(platform),
    }
}
