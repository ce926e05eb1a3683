// Vendor API response types
//
// Models for the Ambi Climate REST API. Only the fields the bridge reads are
// modelled; nested sensor/appliance structures use `#[serde(default)]`
// because offline devices routinely omit them. Presence of those fields is
// checked later, and only for devices that are online and operational.

use serde::{Deserialize, Serialize};

// ── Authentication ───────────────────────────────────────────────────

/// Body of a successful `POST UserCredential`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub token_id: String,
}

// ── Device listing ───────────────────────────────────────────────────

/// Body of `GET User?expand=appliance,device,location`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub devices: Vec<RemoteDevice>,
}

/// One entry of `devices[]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDevice {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub sensors: Option<Sensors>,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
    #[serde(default)]
    pub control_target: Option<ControlTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensors {
    #[serde(default)]
    pub temperature: Option<SensorSeries>,
    #[serde(default)]
    pub humidity: Option<SensorSeries>,
}

/// A sensor time series; the newest reading comes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSeries {
    #[serde(default)]
    pub data: Vec<SensorReading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appliance {
    #[serde(default)]
    pub appliance_state: Option<ApplianceStateSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplianceStateSeries {
    #[serde(default)]
    pub data: Vec<ApplianceState>,
}

/// Raw appliance state. `fan` and `mode` are free-form vendor strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplianceState {
    #[serde(default)]
    pub fan: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlTarget {
    pub quantity: String,
}

impl RemoteDevice {
    /// `"{location} {room}"`, the key the bridge files snapshots under.
    pub fn display_name(&self) -> String {
        let location = self.location.as_ref().map_or("", |l| l.name.as_str());
        format!("{location} {}", self.room_name)
    }

    /// Whether the bridge should trust this entry's readings.
    pub fn is_reporting(&self) -> bool {
        self.operational && self.is_online
    }

    pub fn temperature(&self) -> Option<f64> {
        latest(self.sensors.as_ref()?.temperature.as_ref()?)
    }

    pub fn humidity(&self) -> Option<f64> {
        latest(self.sensors.as_ref()?.humidity.as_ref()?)
    }

    /// Newest state of the first appliance.
    pub fn appliance_state(&self) -> Option<&ApplianceState> {
        self.appliances
            .first()?
            .appliance_state
            .as_ref()?
            .data
            .first()
    }

    pub fn control_quantity(&self) -> Option<&str> {
        self.control_target.as_ref().map(|t| t.quantity.as_str())
    }
}

fn latest(series: &SensorSeries) -> Option<f64> {
    series.data.first().map(|r| r.value)
}

// ── Commands ─────────────────────────────────────────────────────────

/// The `quantity` field of an `AbsoluteApplianceControlTarget` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlQuantity {
    Climate,
    Off,
    Temperature,
}

impl ControlQuantity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Climate => "Climate",
            Self::Off => "Off",
            Self::Temperature => "Temperature",
        }
    }
}

/// Body returned by the two `PUT` endpoints.
///
/// `UserFeedback` does not always echo a quantity, hence the `Option`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub quantity: Option<String>,
}
