// ── Command dispatch ──
//
// State-changing requests against one device. Commands are neither
// coalesced nor serialised: two overlapping writes both go out, and
// whichever response lands last determines the cached mode.

use std::sync::Arc;

use ambi_api::ControlQuantity;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{ControlMode, FeedbackValue};
use crate::session::SessionManager;
use crate::store::PollingCache;

/// A state-changing request, addressed by device name.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Power on in comfort mode, or power off.
    SetSwitch { device: String, on: bool },
    /// Hold a target temperature.
    SetTemperature { device: String, temperature: f64 },
    /// Report how the room feels.
    SubmitFeedback {
        device: String,
        feedback: FeedbackValue,
    },
}

impl Command {
    pub fn device(&self) -> &str {
        match self {
            Self::SetSwitch { device, .. }
            | Self::SetTemperature { device, .. }
            | Self::SubmitFeedback { device, .. } => device,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::SetSwitch { on: true, .. } => "switch on",
            Self::SetSwitch { on: false, .. } => "switch off",
            Self::SetTemperature { .. } => "set temperature",
            Self::SubmitFeedback { .. } => "submit feedback",
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Mode the service reported, if it echoed one.
    pub mode: Option<ControlMode>,
}

/// Sends commands and records their effect in the cache.
#[derive(Clone)]
pub struct CommandDispatcher {
    sessions: Arc<SessionManager>,
    cache: Arc<PollingCache>,
}

impl CommandDispatcher {
    pub fn new(sessions: Arc<SessionManager>, cache: Arc<PollingCache>) -> Self {
        Self { sessions, cache }
    }

    /// Send a command and wait for the response.
    ///
    /// On success the snapshot's mode is replaced with the reported one. On
    /// failure the error is logged and the snapshot is left as it was.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let result = self.send(&cmd).await;
        match &result {
            Ok(outcome) => debug!(
                device = cmd.device(),
                mode = ?outcome.mode,
                "{} succeeded",
                cmd.describe()
            ),
            Err(e) if e.is_busy() => warn!(
                device = cmd.device(),
                "{} failed: Ambi Climate is busy",
                cmd.describe()
            ),
            Err(e) => warn!(device = cmd.device(), error = %e, "{} failed", cmd.describe()),
        }
        result
    }

    /// Fire and forget. Errors are logged.
    pub fn dispatch(&self, cmd: Command) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.execute(cmd).await;
        })
    }

    /// Send a command, then force a cache refresh if it succeeded.
    pub async fn execute_and_refresh(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let result = self.execute(cmd).await?;
        self.cache.fetch_status(true).await;
        Ok(result)
    }

    async fn send(&self, cmd: &Command) -> Result<CommandResult, CoreError> {
        let name = cmd.device();
        let snapshot = self.cache.get_device_info(name);
        if !snapshot.is_known() {
            return Err(CoreError::DeviceNotFound {
                identifier: name.to_owned(),
            });
        }

        let session = self.sessions.session();
        if session.is_empty() {
            return Err(CoreError::NotAuthenticated);
        }

        let client = self.sessions.client();
        let device_id = snapshot.device_id.as_str();
        let response = match cmd {
            Command::SetSwitch { on, .. } => {
                let quantity = if *on {
                    ControlQuantity::Climate
                } else {
                    ControlQuantity::Off
                };
                client
                    .set_control_target(&session, device_id, quantity, 1.0)
                    .await?
            }
            Command::SetTemperature { temperature, .. } => {
                client
                    .set_control_target(
                        &session,
                        device_id,
                        ControlQuantity::Temperature,
                        *temperature,
                    )
                    .await?
            }
            Command::SubmitFeedback { feedback, .. } => {
                client
                    .submit_feedback(&session, device_id, feedback.score())
                    .await?
            }
        };

        let mode = response.quantity.as_deref().map(ControlMode::parse);
        if let Some(mode) = mode {
            self.cache.update_mode(name, mode);
        }
        Ok(CommandResult { mode })
    }
}
