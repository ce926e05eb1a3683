// ambi-core: Device-state synchronization between ambi-api and accessory hosts.

pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod platform;
pub mod projector;
pub mod registry;
pub mod session;
pub mod store;
pub mod thresholds;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandDispatcher, CommandResult};
pub use config::{DeviceConfig, FanSpeedProfile, PlatformConfig, ReadMode};
pub use error::CoreError;
pub use platform::{AttachedDevice, Platform};
pub use projector::{
    AirConditionerProjector, AirConditionerState, CharacteristicSink, FacetKind,
    FeedbackProjector, HeaterCoolerProjector, HeaterCoolerState, NullSink, SnapshotSource,
};
pub use registry::{DevicePairRegistry, Facet, FacetRef, Role};
pub use session::SessionManager;
pub use store::{FetchOutcome, PollingCache};
pub use thresholds::{ThresholdStore, Thresholds};

pub use ambi_api::DEFAULT_BASE_URL;

pub use model::{
    // Device state
    ApplianceMode, ControlMode, DeviceKey, DeviceSnapshot, FanLevel,
    // Feedback
    FeedbackValue,
    // Accessory characteristics
    Active, Characteristic, CharacteristicValue, CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
};
