// ── Heater/cooler facet ──
//
// Exposes a device as a heater/cooler with heating and cooling thresholds.
// Registered under the `heaterCooler` role.
//
// The service cannot be told to heat or cool, only to hold a temperature.
// The target state is therefore latched locally, and the heat/cool mapping
// from the appliance mode only applies while the device is running; when
// it stops the last target and current states stay on display.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use tracing::debug;

use super::mapping::{
    COOLING_THRESHOLD_RANGE, HEATING_THRESHOLD_RANGE, POWER_ON_ROTATION, clamp,
    displayed_rotation, heater_cooler_state,
};
use super::{CharacteristicSink, Observe, ProjectorContext, observe};
use crate::command::Command;
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{
    Active, Characteristic, CharacteristicValue, CurrentHeaterCoolerState, DeviceKey,
    DeviceSnapshot, TargetHeaterCoolerState,
};
use crate::thresholds::ThresholdStore;

/// Values the heater/cooler facet displays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaterCoolerState {
    pub active: Active,
    pub temperature: f64,
    pub current_state: CurrentHeaterCoolerState,
    pub target_state: TargetHeaterCoolerState,
    pub rotation_speed: f64,
    pub heating_threshold: f64,
    pub cooling_threshold: f64,
}

pub struct HeaterCoolerProjector {
    name: String,
    key: DeviceKey,
    /// Key in the threshold store.
    accessory_id: String,
    ctx: ProjectorContext,
    sink: Arc<dyn CharacteristicSink>,
    thresholds: Arc<ThresholdStore>,
    state: ArcSwap<HeaterCoolerState>,
    /// Set once a snapshot has been applied to `state`.
    observed: AtomicBool,
}

impl HeaterCoolerProjector {
    pub fn new(
        device: &DeviceConfig,
        ctx: ProjectorContext,
        sink: Arc<dyn CharacteristicSink>,
        thresholds: Arc<ThresholdStore>,
    ) -> Arc<Self> {
        let key = device.key();
        let accessory_id = key.to_string();
        let stored = thresholds.get(&accessory_id);

        Arc::new(Self {
            name: device.device_name(),
            key,
            accessory_id,
            ctx,
            sink,
            thresholds,
            state: ArcSwap::from_pointee(HeaterCoolerState {
                heating_threshold: stored.heating,
                cooling_threshold: stored.cooling,
                ..HeaterCoolerState::default()
            }),
            observed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> DeviceKey {
        self.key
    }

    /// Currently displayed values, without triggering a read.
    pub fn displayed(&self) -> HeaterCoolerState {
        **self.state.load()
    }

    // ── Read handlers ────────────────────────────────────────────────

    pub fn active(self: &Arc<Self>) -> Active {
        self.read().active
    }

    pub fn current_temperature(self: &Arc<Self>) -> f64 {
        self.read().temperature
    }

    pub fn current_heater_cooler_state(self: &Arc<Self>) -> CurrentHeaterCoolerState {
        self.read().current_state
    }

    pub fn target_heater_cooler_state(self: &Arc<Self>) -> TargetHeaterCoolerState {
        self.read().target_state
    }

    pub fn rotation_speed(self: &Arc<Self>) -> f64 {
        self.read().rotation_speed
    }

    pub fn heating_threshold(&self) -> f64 {
        self.displayed().heating_threshold
    }

    pub fn cooling_threshold(&self) -> f64 {
        self.displayed().cooling_threshold
    }

    /// Room temperature as shown by this facet, or the cached one before
    /// anything has been shown.
    fn room_temperature(&self) -> f64 {
        if self.observed.load(Ordering::Acquire) {
            self.displayed().temperature
        } else {
            self.ctx.cache.get_device_info(&self.name).temperature
        }
    }

    fn read(self: &Arc<Self>) -> HeaterCoolerState {
        observe(self, self.ctx.source.as_ref(), &self.name);
        self.displayed()
    }

    // ── Write handlers ───────────────────────────────────────────────

    /// Turn the device on (hold the current temperature) or off.
    ///
    /// On success the `switch` sibling is updated right away.
    pub async fn set_active(&self, active: Active) -> Result<(), CoreError> {
        let on = active == Active::Active;
        let cmd = if on {
            let temperature = self.room_temperature();
            Command::SetTemperature {
                device: self.name.clone(),
                temperature,
            }
        } else {
            Command::SetSwitch {
                device: self.name.clone(),
                on: false,
            }
        };
        self.ctx.commands.execute(cmd).await?;

        self.reflect_power(on);
        if let Some(sibling) = self.ctx.registry.switch(&self.key) {
            sibling.reflect_power(on);
        }
        Ok(())
    }

    /// Latch the requested target state. Nothing is sent to the service.
    pub fn set_target_state(&self, target: TargetHeaterCoolerState) {
        debug!(device = %self.name, %target, "latching target state");
        self.state.rcu(|s| HeaterCoolerState {
            target_state: target,
            ..**s
        });
        self.sink.update(
            Characteristic::TargetHeaterCoolerState,
            CharacteristicValue::TargetState(target),
        );
    }

    /// Set the heating threshold (clamped to 0–25 °C).
    ///
    /// When the room is colder than the new threshold the device is told to
    /// hold it. The threshold is stored either way.
    pub async fn set_heating_threshold(&self, value: f64) -> Result<(), CoreError> {
        let threshold = clamp(value, &HEATING_THRESHOLD_RANGE);
        let current = self.room_temperature();

        let result = if current < threshold {
            self.hold(threshold).await
        } else {
            Ok(())
        };

        self.thresholds.set_heating(&self.accessory_id, threshold);
        self.state.rcu(|s| HeaterCoolerState {
            heating_threshold: threshold,
            ..**s
        });
        self.sink.update(
            Characteristic::HeatingThresholdTemperature,
            CharacteristicValue::Float(threshold),
        );
        result
    }

    /// Set the cooling threshold (clamped to 10–35 °C).
    ///
    /// When the room is warmer than the new threshold the device is told to
    /// hold it. The threshold is stored either way.
    pub async fn set_cooling_threshold(&self, value: f64) -> Result<(), CoreError> {
        let threshold = clamp(value, &COOLING_THRESHOLD_RANGE);
        let current = self.room_temperature();

        let result = if current > threshold {
            self.hold(threshold).await
        } else {
            Ok(())
        };

        self.thresholds.set_cooling(&self.accessory_id, threshold);
        self.state.rcu(|s| HeaterCoolerState {
            cooling_threshold: threshold,
            ..**s
        });
        self.sink.update(
            Characteristic::CoolingThresholdTemperature,
            CharacteristicValue::Float(threshold),
        );
        result
    }

    async fn hold(&self, temperature: f64) -> Result<(), CoreError> {
        self.ctx
            .commands
            .execute(Command::SetTemperature {
                device: self.name.clone(),
                temperature,
            })
            .await
            .map(|_| ())
    }

    /// Show a power change made through a sibling facet.
    pub(crate) fn reflect_power(&self, on: bool) {
        self.state.rcu(|s| {
            if on {
                HeaterCoolerState {
                    active: Active::Active,
                    target_state: TargetHeaterCoolerState::Auto,
                    current_state: CurrentHeaterCoolerState::Idle,
                    rotation_speed: POWER_ON_ROTATION,
                    ..**s
                }
            } else {
                HeaterCoolerState {
                    active: Active::Inactive,
                    current_state: CurrentHeaterCoolerState::Idle,
                    rotation_speed: 0.0,
                    ..**s
                }
            }
        });
        let state = self.displayed();

        self.sink.update(
            Characteristic::Active,
            CharacteristicValue::Active(state.active),
        );
        self.sink.update(
            Characteristic::CurrentHeaterCoolerState,
            CharacteristicValue::CurrentState(state.current_state),
        );
        if on {
            self.sink.update(
                Characteristic::TargetHeaterCoolerState,
                CharacteristicValue::TargetState(state.target_state),
            );
        }
        self.sink.update(
            Characteristic::RotationSpeed,
            CharacteristicValue::Float(state.rotation_speed),
        );
    }

    fn publish(&self, state: &HeaterCoolerState) {
        let updates = [
            (
                Characteristic::Active,
                CharacteristicValue::Active(state.active),
            ),
            (
                Characteristic::CurrentTemperature,
                CharacteristicValue::Float(state.temperature),
            ),
            (
                Characteristic::CurrentHeaterCoolerState,
                CharacteristicValue::CurrentState(state.current_state),
            ),
            (
                Characteristic::TargetHeaterCoolerState,
                CharacteristicValue::TargetState(state.target_state),
            ),
            (
                Characteristic::RotationSpeed,
                CharacteristicValue::Float(state.rotation_speed),
            ),
        ];
        for (characteristic, value) in updates {
            self.sink.update(characteristic, value);
        }
    }
}

impl Observe for HeaterCoolerProjector {
    fn apply(&self, snapshot: &DeviceSnapshot, push: bool) {
        let running = snapshot.is_active();
        let rotation = displayed_rotation(self.ctx.fan_profile, snapshot);
        self.state.rcu(|s| {
            let (target_state, current_state) = if running {
                heater_cooler_state(snapshot.appliance_mode)
            } else {
                (s.target_state, s.current_state)
            };
            HeaterCoolerState {
                active: Active::from(running),
                temperature: snapshot.temperature,
                current_state,
                target_state,
                rotation_speed: rotation,
                ..**s
            }
        });
        self.observed.store(true, Ordering::Release);
        if push {
            self.publish(&self.displayed());
        }
    }
}

impl fmt::Debug for HeaterCoolerProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaterCoolerProjector")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("state", &self.displayed())
            .finish_non_exhaustive()
    }
}
