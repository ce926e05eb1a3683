// ── Air conditioner facet ──
//
// Temperature sensor, humidity sensor, fan and power switch of one device.
// Registered under the `switch` role.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tracing::debug;

use super::mapping::{POWER_ON_ROTATION, displayed_rotation, power_state};
use super::{CharacteristicSink, Observe, ProjectorContext, observe};
use crate::command::Command;
use crate::config::{DeviceConfig, FanSpeedProfile, ReadMode};
use crate::error::CoreError;
use crate::model::{Characteristic, CharacteristicValue, DeviceKey, DeviceSnapshot};

/// How long an unsupported fan write stays visible before it is reverted.
const REVERT_DELAY: Duration = Duration::from_secs(1);

/// Values the air conditioner facet displays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirConditionerState {
    pub temperature: f64,
    pub humidity: f64,
    pub fan_on: bool,
    pub rotation_speed: f64,
    pub switch_on: bool,
}

impl AirConditionerState {
    fn from_snapshot(snapshot: &DeviceSnapshot, profile: FanSpeedProfile) -> Self {
        let (fan_on, switch_on) = power_state(snapshot.mode);
        Self {
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            fan_on,
            rotation_speed: displayed_rotation(profile, snapshot),
            switch_on,
        }
    }
}

pub struct AirConditionerProjector {
    name: String,
    key: DeviceKey,
    ctx: ProjectorContext,
    sink: Arc<dyn CharacteristicSink>,
    state: ArcSwap<AirConditionerState>,
}

impl AirConditionerProjector {
    pub fn new(
        device: &DeviceConfig,
        ctx: ProjectorContext,
        sink: Arc<dyn CharacteristicSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: device.device_name(),
            key: device.key(),
            ctx,
            sink,
            state: ArcSwap::from_pointee(AirConditionerState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> DeviceKey {
        self.key
    }

    /// Currently displayed values, without triggering a read.
    pub fn displayed(&self) -> AirConditionerState {
        **self.state.load()
    }

    // ── Read handlers ────────────────────────────────────────────────

    pub fn current_temperature(self: &Arc<Self>) -> f64 {
        self.read().temperature
    }

    pub fn current_relative_humidity(self: &Arc<Self>) -> f64 {
        self.read().humidity
    }

    pub fn fan_on(self: &Arc<Self>) -> bool {
        self.read().fan_on
    }

    pub fn rotation_speed(self: &Arc<Self>) -> f64 {
        self.read().rotation_speed
    }

    pub fn switch_on(self: &Arc<Self>) -> bool {
        self.read().switch_on
    }

    fn read(self: &Arc<Self>) -> AirConditionerState {
        observe(self, self.ctx.source.as_ref(), &self.name);
        self.displayed()
    }

    // ── Write handlers ───────────────────────────────────────────────

    /// Power the device on or off.
    ///
    /// On success both facets are updated before any refresh completes,
    /// then (in cached mode) a forced refresh re-derives the fan speed.
    pub async fn set_switch(&self, on: bool) -> Result<(), CoreError> {
        self.ctx
            .commands
            .execute(Command::SetSwitch {
                device: self.name.clone(),
                on,
            })
            .await?;

        self.reflect_power(on);
        if let Some(sibling) = self.ctx.registry.heater_cooler(&self.key) {
            sibling.reflect_power(on);
        }

        if self.ctx.read_mode == ReadMode::Cached {
            self.ctx.cache.fetch_status(true).await;
            let snapshot = self.ctx.cache.get_device_info(&self.name);
            let rotation = displayed_rotation(self.ctx.fan_profile, &snapshot);
            self.state.rcu(|s| AirConditionerState {
                rotation_speed: rotation,
                ..**s
            });
            self.sink.update(
                Characteristic::RotationSpeed,
                CharacteristicValue::Float(rotation),
            );
        }
        Ok(())
    }

    /// The service cannot toggle the fan on its own; revert after a moment.
    pub fn set_fan_on(self: &Arc<Self>, requested: bool) {
        debug!(device = %self.name, requested, "fan toggle not supported");
        self.schedule_revert();
    }

    /// The service cannot set fan speed directly; revert after a moment.
    pub fn set_rotation_speed(self: &Arc<Self>, requested: f64) {
        debug!(device = %self.name, requested, "fan speed not supported");
        self.schedule_revert();
    }

    fn schedule_revert(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(REVERT_DELAY).await;
            let state = this.displayed();
            this.sink
                .update(Characteristic::FanOn, CharacteristicValue::Bool(state.fan_on));
            this.sink.update(
                Characteristic::RotationSpeed,
                CharacteristicValue::Float(state.rotation_speed),
            );
        });
    }

    /// Show a power change made through a sibling facet.
    pub(crate) fn reflect_power(&self, on: bool) {
        let rotation = if on { POWER_ON_ROTATION } else { 0.0 };
        self.state.rcu(|s| AirConditionerState {
            fan_on: on,
            switch_on: on,
            rotation_speed: rotation,
            ..**s
        });
        self.sink
            .update(Characteristic::SwitchOn, CharacteristicValue::Bool(on));
        self.sink
            .update(Characteristic::FanOn, CharacteristicValue::Bool(on));
        self.sink.update(
            Characteristic::RotationSpeed,
            CharacteristicValue::Float(rotation),
        );
    }

    fn publish(&self, state: &AirConditionerState) {
        let updates = [
            (
                Characteristic::CurrentTemperature,
                CharacteristicValue::Float(state.temperature),
            ),
            (
                Characteristic::CurrentRelativeHumidity,
                CharacteristicValue::Float(state.humidity),
            ),
            (Characteristic::FanOn, CharacteristicValue::Bool(state.fan_on)),
            (
                Characteristic::RotationSpeed,
                CharacteristicValue::Float(state.rotation_speed),
            ),
            (
                Characteristic::SwitchOn,
                CharacteristicValue::Bool(state.switch_on),
            ),
        ];
        for (characteristic, value) in updates {
            self.sink.update(characteristic, value);
        }
    }
}

impl Observe for AirConditionerProjector {
    fn apply(&self, snapshot: &DeviceSnapshot, push: bool) {
        let next = AirConditionerState::from_snapshot(snapshot, self.ctx.fan_profile);
        self.state.store(Arc::new(next));
        if push {
            self.publish(&next);
        }
    }
}

impl fmt::Debug for AirConditionerProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirConditionerProjector")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("state", &self.displayed())
            .finish_non_exhaustive()
    }
}
