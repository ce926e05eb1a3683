// ── Translation tables ──
//
// One exhaustive match per translation from vendor state to accessory
// state.

use std::ops::RangeInclusive;

use crate::config::FanSpeedProfile;
use crate::model::{
    ApplianceMode, ControlMode, CurrentHeaterCoolerState, DeviceSnapshot, FanLevel,
    TargetHeaterCoolerState,
};

/// Rotation speed shown right after a successful power-on.
pub const POWER_ON_ROTATION: f64 = 50.0;

/// Accepted heating threshold, °C.
pub const HEATING_THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=25.0;

/// Accepted cooling threshold, °C.
pub const COOLING_THRESHOLD_RANGE: RangeInclusive<f64> = 10.0..=35.0;

/// `(fan_on, switch_on)` for a control mode.
pub fn power_state(mode: ControlMode) -> (bool, bool) {
    match mode {
        ControlMode::Off | ControlMode::Manual => (false, false),
        ControlMode::Climate
        | ControlMode::Temperature
        | ControlMode::Away
        | ControlMode::Unknown => (true, true),
    }
}

/// Fan rotation percentage for a fan level.
pub fn rotation_speed(profile: FanSpeedProfile, fan: FanLevel) -> f64 {
    match (profile, fan) {
        (_, FanLevel::High) => 100.0,
        (_, FanLevel::MedHigh) => 75.0,
        (_, FanLevel::Auto | FanLevel::Med) => 50.0,
        (_, FanLevel::MedLow)
        | (FanSpeedProfile::QuietSlowest, FanLevel::Low)
        | (FanSpeedProfile::LowSlowest, FanLevel::Quiet) => 38.0,
        (FanSpeedProfile::QuietSlowest, FanLevel::Quiet)
        | (FanSpeedProfile::LowSlowest, FanLevel::Low) => 25.0,
        (_, FanLevel::Unknown) => 0.0,
    }
}

/// Rotation percentage to display for a snapshot; zero while inactive.
pub fn displayed_rotation(profile: FanSpeedProfile, snapshot: &DeviceSnapshot) -> f64 {
    if snapshot.is_active() {
        rotation_speed(profile, snapshot.fan)
    } else {
        0.0
    }
}

/// Heater/cooler `(target, current)` for an appliance mode.
pub fn heater_cooler_state(
    mode: ApplianceMode,
) -> (TargetHeaterCoolerState, CurrentHeaterCoolerState) {
    match mode {
        ApplianceMode::Heat => (
            TargetHeaterCoolerState::Heat,
            CurrentHeaterCoolerState::Heating,
        ),
        ApplianceMode::Cool => (
            TargetHeaterCoolerState::Cool,
            CurrentHeaterCoolerState::Cooling,
        ),
        ApplianceMode::Default => (
            TargetHeaterCoolerState::Auto,
            CurrentHeaterCoolerState::Idle,
        ),
    }
}

pub fn clamp(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn quiet_slowest_table() {
        let p = FanSpeedProfile::QuietSlowest;
        let table: Vec<(FanLevel, f64)> = FanLevel::iter()
            .map(|f| (f, rotation_speed(p, f)))
            .collect();
        assert_eq!(
            table,
            vec![
                (FanLevel::High, 100.0),
                (FanLevel::MedHigh, 75.0),
                (FanLevel::Auto, 50.0),
                (FanLevel::Med, 50.0),
                (FanLevel::MedLow, 38.0),
                (FanLevel::Low, 38.0),
                (FanLevel::Quiet, 25.0),
                (FanLevel::Unknown, 0.0),
            ]
        );
    }

    #[test]
    fn low_slowest_table_swaps_quiet_and_low() {
        let p = FanSpeedProfile::LowSlowest;
        assert!((rotation_speed(p, FanLevel::Quiet) - 38.0).abs() < f64::EPSILON);
        assert!((rotation_speed(p, FanLevel::MedLow) - 38.0).abs() < f64::EPSILON);
        assert!((rotation_speed(p, FanLevel::Low) - 25.0).abs() < f64::EPSILON);
        assert!((rotation_speed(p, FanLevel::High) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inactive_devices_show_no_rotation() {
        let snapshot = DeviceSnapshot {
            fan: FanLevel::High,
            ..DeviceSnapshot::placeholder()
        };
        assert!(displayed_rotation(FanSpeedProfile::QuietSlowest, &snapshot).abs() < f64::EPSILON);

        let running = snapshot.with_mode(ControlMode::Climate);
        assert!(
            (displayed_rotation(FanSpeedProfile::QuietSlowest, &running) - 100.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn power_follows_activity() {
        assert_eq!(power_state(ControlMode::Off), (false, false));
        assert_eq!(power_state(ControlMode::Manual), (false, false));
        assert_eq!(power_state(ControlMode::Away), (true, true));
        assert_eq!(power_state(ControlMode::Temperature), (true, true));
    }

    #[test]
    fn appliance_modes_map_to_heater_cooler_states() {
        assert_eq!(
            heater_cooler_state(ApplianceMode::Heat),
            (
                TargetHeaterCoolerState::Heat,
                CurrentHeaterCoolerState::Heating
            )
        );
        assert_eq!(
            heater_cooler_state(ApplianceMode::Default),
            (TargetHeaterCoolerState::Auto, CurrentHeaterCoolerState::Idle)
        );
    }

    #[test]
    fn thresholds_clamp_to_their_ranges() {
        assert!((clamp(30.0, &HEATING_THRESHOLD_RANGE) - 25.0).abs() < f64::EPSILON);
        assert!((clamp(-4.0, &HEATING_THRESHOLD_RANGE)).abs() < f64::EPSILON);
        assert!((clamp(5.0, &COOLING_THRESHOLD_RANGE) - 10.0).abs() < f64::EPSILON);
        assert!((clamp(40.0, &COOLING_THRESHOLD_RANGE) - 35.0).abs() < f64::EPSILON);
    }
}
