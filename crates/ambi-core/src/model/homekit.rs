// ── Accessory characteristic types ──
//
// The subset of HomeKit service state the projectors publish. Values are
// plain enums here; the host framework maps them onto its own numeric
// constants.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::feedback::FeedbackValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Active {
    #[default]
    Inactive,
    Active,
}

impl From<bool> for Active {
    fn from(on: bool) -> Self {
        if on { Self::Active } else { Self::Inactive }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TargetHeaterCoolerState {
    #[default]
    Auto,
    Heat,
    Cool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum CurrentHeaterCoolerState {
    #[default]
    Inactive,
    Idle,
    Heating,
    Cooling,
}

/// A facet attribute a projector can push to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    CurrentTemperature,
    CurrentRelativeHumidity,
    FanOn,
    RotationSpeed,
    SwitchOn,
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    HeatingThresholdTemperature,
    CoolingThresholdTemperature,
    FeedbackSwitch(FeedbackValue),
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedbackSwitch(value) => write!(f, "Feedback({value})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    Bool(bool),
    Float(f64),
    Active(Active),
    TargetState(TargetHeaterCoolerState),
    CurrentState(CurrentHeaterCoolerState),
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.1}"),
            Self::Active(v) => write!(f, "{v}"),
            Self::TargetState(v) => write!(f, "{v}"),
            Self::CurrentState(v) => write!(f, "{v}"),
        }
    }
}
