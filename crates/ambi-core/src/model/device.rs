// ── Device domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Fan setting reported by the appliance.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum FanLevel {
    High,
    #[strum(serialize = "Med-High")]
    #[serde(rename = "Med-High")]
    MedHigh,
    Auto,
    Med,
    #[strum(serialize = "Med-Low")]
    #[serde(rename = "Med-Low")]
    MedLow,
    Low,
    #[default]
    Quiet,
    Unknown,
}

impl FanLevel {
    /// Parse a vendor string; anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

/// Heating/cooling mode the appliance is running in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
pub enum ApplianceMode {
    Heat,
    Cool,
    #[default]
    Default,
}

impl ApplianceMode {
    /// Parse a vendor string; anything unrecognised is `Default`.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Default)
    }
}

/// The service's control target (`control_target.quantity`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize,
)]
pub enum ControlMode {
    #[default]
    Off,
    Manual,
    Climate,
    Temperature,
    /// Any of the `Away_*` targets.
    Away,
    Unknown,
}

impl ControlMode {
    /// Parse a vendor quantity. The `Away_*` family collapses to `Away`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Off" => Self::Off,
            "Manual" => Self::Manual,
            "Climate" => Self::Climate,
            "Temperature" => Self::Temperature,
            s if s.starts_with("Away") => Self::Away,
            _ => Self::Unknown,
        }
    }

    /// `Off` and `Manual` mean the bridge is not driving the appliance.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Off | Self::Manual)
    }
}

// ── DeviceKey ────────────────────────────────────────────────────────

/// Stable identity of a physical device, shared by all of its facets.
///
/// UUID v5 over `location_name + room_name`, so it survives restarts and
/// does not depend on the vendor's device id being known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceKey(Uuid);

impl DeviceKey {
    pub fn new(location_name: &str, room_name: &str) -> Self {
        let seed = format!("{location_name}{room_name}");
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()))
    }

    /// Derived key for a per-device auxiliary accessory (e.g. `"feedback"`).
    pub fn derive(&self, suffix: &str) -> Self {
        Self(Uuid::new_v5(&self.0, suffix.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── DeviceSnapshot ───────────────────────────────────────────────────

/// Last known state of one device, as cached by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Vendor device id. Empty until the device has been seen online.
    pub device_id: String,
    pub location_name: String,
    pub room_name: String,
    pub temperature: f64,
    pub humidity: f64,
    pub fan: FanLevel,
    pub appliance_mode: ApplianceMode,
    pub mode: ControlMode,
    /// `None` for placeholders that never came from the service.
    pub last_update_time: Option<DateTime<Utc>>,
}

impl DeviceSnapshot {
    /// Stand-in for a device that has not been fetched yet.
    pub fn placeholder() -> Self {
        Self {
            device_id: String::new(),
            location_name: String::new(),
            room_name: String::new(),
            temperature: 0.0,
            humidity: 0.0,
            fan: FanLevel::Quiet,
            appliance_mode: ApplianceMode::Default,
            mode: ControlMode::Off,
            last_update_time: None,
        }
    }

    /// `"{location} {room}"`.
    pub fn name(&self) -> String {
        format!("{} {}", self.location_name, self.room_name)
    }

    pub fn is_known(&self) -> bool {
        !self.device_id.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Copy with a new control mode.
    pub fn with_mode(&self, mode: ControlMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self::placeholder()
    }
}
