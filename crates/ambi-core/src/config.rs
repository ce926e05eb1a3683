// ── Runtime platform configuration ──
//
// These types describe *how* the bridge talks to the cloud service and
// which devices it exposes. They carry credential data and tuning, but
// never touch disk. The CLI (via ambi-config) builds a `PlatformConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::model::DeviceKey;

/// How projectors answer read requests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Serve reads from the polling cache.
    #[default]
    Cached,
    /// Answer with the last displayed value and fetch from the service.
    Direct,
}

/// Which fan level maps to the slowest rotation speed.
///
/// Two firmware generations disagree on whether `Quiet` or `Low` is the
/// slowest setting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FanSpeedProfile {
    /// `Quiet` 25%, `Low`/`Med-Low` 38%.
    #[default]
    QuietSlowest,
    /// `Low` 25%, `Quiet`/`Med-Low` 38%.
    LowSlowest,
}

/// One physical device the bridge should expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub location_name: String,
    pub room_name: String,
    /// Also expose a heater/cooler facet.
    #[serde(default)]
    pub heater_cooler_mode: bool,
    /// Also expose the seven comfort-feedback switches.
    #[serde(default)]
    pub show_feedbacks: bool,
}

impl DeviceConfig {
    pub fn new(location_name: impl Into<String>, room_name: impl Into<String>) -> Self {
        Self {
            location_name: location_name.into(),
            room_name: room_name.into(),
            heater_cooler_mode: false,
            show_feedbacks: false,
        }
    }

    /// Cache key: `"{location} {room}"`.
    pub fn device_name(&self) -> String {
        format!("{} {}", self.location_name, self.room_name)
    }

    pub fn key(&self) -> DeviceKey {
        DeviceKey::new(&self.location_name, &self.room_name)
    }
}

/// Everything the platform needs to run.
///
/// Built by the CLI; core never reads config files.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API root (normally `https://rest.ambiclimate.com/`).
    pub base_url: Url,
    pub email: String,
    pub password: SecretString,
    /// Per-request transport timeout.
    pub timeout: Duration,
    pub read_mode: ReadMode,
    pub fan_speed_profile: FanSpeedProfile,
    /// Background poll period. Zero disables polling.
    pub poll_interval: Duration,
    /// Background re-login period. Zero disables re-login.
    pub login_refresh_interval: Duration,
    /// Minimum spacing between two non-forced fetches.
    pub rate_limit_window: Duration,
    /// JSON file holding heater/cooler thresholds.
    pub threshold_file: PathBuf,
    pub default_heating_threshold: f64,
    pub default_cooling_threshold: f64,
    pub devices: Vec<DeviceConfig>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            #[allow(clippy::unwrap_used)]
            base_url: ambi_api::DEFAULT_BASE_URL.parse().unwrap(),
            email: String::new(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(30),
            read_mode: ReadMode::default(),
            fan_speed_profile: FanSpeedProfile::default(),
            poll_interval: Duration::from_secs(5 * 60),
            login_refresh_interval: Duration::from_secs(3 * 24 * 60 * 60),
            rate_limit_window: Duration::from_secs(4 * 60 + 30),
            threshold_file: PathBuf::from("ambi_thresholds.json"),
            default_heating_threshold: 15.0,
            default_cooling_threshold: 25.0,
            devices: Vec::new(),
        }
    }
}
