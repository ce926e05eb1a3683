//! Status command: one table row per reporting device.

use serde::Serialize;
use tabled::Tabled;

use ambi_core::DeviceSnapshot;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Temp (°C)")]
    temperature: f64,
    #[tabled(rename = "Humidity (%)")]
    humidity: f64,
    #[tabled(rename = "Fan")]
    fan: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Appliance")]
    appliance: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&DeviceSnapshot> for StatusRow {
    fn from(s: &DeviceSnapshot) -> Self {
        Self {
            device: s.name(),
            temperature: s.temperature,
            humidity: s.humidity,
            fan: s.fan.to_string(),
            mode: s.mode.to_string(),
            appliance: s.appliance_mode.to_string(),
            updated: s.last_update_time.map_or_else(
                || "-".into(),
                |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        }
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let platform = super::connect(global).await?;

    let rows: Vec<StatusRow> = platform
        .cache()
        .snapshots()
        .iter()
        .map(|(_, snapshot)| StatusRow::from(snapshot.as_ref()))
        .collect();

    let out = output::render_list(&global.output, &rows, |r| r.device.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
