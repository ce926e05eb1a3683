// ── API-to-domain type conversions ──
//
// Bridges raw `ambi_api` response types into canonical `ambi_core::model`
// types. Only devices that are online and operational are converted; for
// those, every field the bridge relies on must be present.

use ambi_api::Error as ApiError;
use ambi_api::RemoteDevice;
use chrono::Utc;

use crate::model::{ApplianceMode, ControlMode, DeviceSnapshot, FanLevel};

fn missing(device: &RemoteDevice, field: &'static str) -> ApiError {
    ApiError::MalformedDevice {
        device_id: device.device_id.clone(),
        field,
    }
}

impl TryFrom<&RemoteDevice> for DeviceSnapshot {
    type Error = ApiError;

    fn try_from(d: &RemoteDevice) -> Result<Self, Self::Error> {
        let location = d.location.as_ref().ok_or_else(|| missing(d, "location"))?;
        let temperature = d
            .temperature()
            .ok_or_else(|| missing(d, "sensors.temperature"))?;
        let humidity = d.humidity().ok_or_else(|| missing(d, "sensors.humidity"))?;
        let state = d
            .appliance_state()
            .ok_or_else(|| missing(d, "appliances[0].appliance_state"))?;
        let quantity = d
            .control_quantity()
            .ok_or_else(|| missing(d, "control_target"))?;

        Ok(DeviceSnapshot {
            device_id: d.device_id.clone(),
            location_name: location.name.clone(),
            room_name: d.room_name.clone(),
            temperature,
            humidity,
            fan: state.fan.as_deref().map_or(FanLevel::Unknown, FanLevel::parse),
            appliance_mode: state
                .mode
                .as_deref()
                .map_or(ApplianceMode::Default, ApplianceMode::parse),
            mode: ControlMode::parse(quantity),
            last_update_time: Some(Utc::now()),
        })
    }
}

/// Convert every reporting device in a listing, all or nothing.
///
/// Devices that are offline or not operational are skipped. A single
/// malformed reporting device fails the whole batch.
pub(crate) fn reporting_snapshots(
    devices: &[RemoteDevice],
) -> Result<Vec<DeviceSnapshot>, ApiError> {
    devices
        .iter()
        .filter(|d| d.is_reporting())
        .map(DeviceSnapshot::try_from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(value: serde_json::Value) -> RemoteDevice {
        serde_json::from_value(value).unwrap()
    }

    fn full_device(room: &str, online: bool) -> serde_json::Value {
        json!({
            "device_id": format!("id-{room}"),
            "operational": true,
            "is_online": online,
            "room_name": room,
            "location": { "name": "Home" },
            "sensors": {
                "temperature": { "data": [{ "value": 21.5 }] },
                "humidity": { "data": [{ "value": 40.0 }] }
            },
            "appliances": [{ "appliance_state": { "data": [{ "fan": "Auto", "mode": "Heat" }] } }],
            "control_target": { "quantity": "Temperature" }
        })
    }

    #[test]
    fn converts_a_reporting_device() {
        let snap = DeviceSnapshot::try_from(&device(full_device("Study", true))).unwrap();
        assert_eq!(snap.name(), "Home Study");
        assert_eq!(snap.device_id, "id-Study");
        assert_eq!(snap.fan, FanLevel::Auto);
        assert_eq!(snap.appliance_mode, ApplianceMode::Heat);
        assert_eq!(snap.mode, ControlMode::Temperature);
        assert!((snap.temperature - 21.5).abs() < f64::EPSILON);
        assert!(snap.last_update_time.is_some());
    }

    #[test]
    fn offline_devices_are_skipped() {
        let devices = vec![
            device(full_device("Study", true)),
            device(full_device("Attic", false)),
        ];
        let snaps = reporting_snapshots(&devices).unwrap();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].room_name, "Study");
    }

    #[test]
    fn offline_devices_may_be_incomplete() {
        let devices = vec![device(json!({
            "device_id": "ghost",
            "operational": false,
            "is_online": false,
            "room_name": "Shed"
        }))];
        assert!(reporting_snapshots(&devices).unwrap().is_empty());
    }

    #[test]
    fn one_malformed_device_fails_the_batch() {
        let mut broken = full_device("Kitchen", true);
        broken["sensors"] = json!({});
        let devices = vec![device(full_device("Study", true)), device(broken)];

        let err = reporting_snapshots(&devices).unwrap_err();
        assert!(
            matches!(err, ApiError::MalformedDevice { ref device_id, field: "sensors.temperature" } if device_id == "id-Kitchen")
        );
    }
}
