// ── Domain model ──
//
// Bridge-side types, normalized from the vendor's free-form strings into
// closed enums.

pub mod device;
pub mod feedback;
pub mod homekit;

pub use device::{ApplianceMode, ControlMode, DeviceKey, DeviceSnapshot, FanLevel};
pub use feedback::FeedbackValue;
pub use homekit::{
    Active, Characteristic, CharacteristicValue, CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
};
