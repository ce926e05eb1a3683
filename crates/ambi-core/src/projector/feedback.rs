// ── Comfort feedback facet ──
//
// Seven momentary switches, one per comfort level. Turning one on sends
// that feedback; all seven fall back to off shortly after.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{CharacteristicSink, ProjectorContext};
use crate::command::Command;
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{Characteristic, CharacteristicValue, DeviceKey, FeedbackValue};

const RESET_DELAY: Duration = Duration::from_secs(1);

pub struct FeedbackProjector {
    name: String,
    key: DeviceKey,
    ctx: ProjectorContext,
    sink: Arc<dyn CharacteristicSink>,
}

impl FeedbackProjector {
    pub fn new(
        device: &DeviceConfig,
        ctx: ProjectorContext,
        sink: Arc<dyn CharacteristicSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: device.device_name(),
            key: device.key().derive("feedback"),
            ctx,
            sink,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> DeviceKey {
        self.key
    }

    /// Switches are momentary and always read as off.
    pub fn is_on(&self, _value: FeedbackValue) -> bool {
        false
    }

    /// Handle a write to one of the seven switches.
    ///
    /// Only turning a switch on does anything. The reset to off is scheduled
    /// whether or not the feedback was accepted.
    pub async fn set_on(&self, value: FeedbackValue, on: bool) -> Result<(), CoreError> {
        if !on {
            return Ok(());
        }

        let result = self
            .ctx
            .commands
            .execute(Command::SubmitFeedback {
                device: self.name.clone(),
                feedback: value,
            })
            .await
            .map(|_| ());

        self.schedule_reset();
        result
    }

    fn schedule_reset(&self) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::time::sleep(RESET_DELAY).await;
            for value in FeedbackValue::all() {
                sink.update(
                    Characteristic::FeedbackSwitch(value),
                    CharacteristicValue::Bool(false),
                );
            }
        });
    }
}

impl fmt::Debug for FeedbackProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackProjector")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
