//! Run the bridge in the foreground.
//!
//! Every configured device is attached with a [`LogSink`] per facet. Each
//! time the cache changes the facets are read the way an accessory host
//! would, so pushed values show up in the log.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use ambi_core::{AttachedDevice, CharacteristicSink, Platform};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;
use crate::sink::LogSink;

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::platform_config(global)?;
    if let Some(mode) = args.read_mode {
        cfg.read_mode = mode;
    }
    if let Some(profile) = args.fan_speed_profile {
        cfg.fan_speed_profile = profile;
    }
    if let Some(secs) = args.poll_interval {
        cfg.poll_interval = Duration::from_secs(secs);
    }

    let platform = Platform::new(cfg)?;
    let outcome = platform.start().await;
    if platform.sessions().is_authenticated() {
        info!(?outcome, "initial refresh finished");
    } else {
        warn!(
            retry_secs = platform.config().login_refresh_interval.as_secs(),
            "not logged in yet; devices show defaults until a login succeeds"
        );
    }

    let attached = attach_all(&platform);
    if attached.is_empty() {
        warn!("no devices configured; add one with `ambi config add-device`");
    }
    read_all(&attached);

    let mut updates = platform.cache().subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                read_all(&attached);
            }
        }
    }

    platform.shutdown().await;
    Ok(())
}

fn attach_all(platform: &Platform) -> Vec<AttachedDevice> {
    platform
        .config()
        .devices
        .iter()
        .map(|device| {
            let name = device.device_name();
            platform.attach_device(device, |kind| {
                Arc::new(LogSink::new(name.clone(), kind)) as Arc<dyn CharacteristicSink>
            })
        })
        .collect()
}

/// Exercise the read handlers of every facet.
fn read_all(attached: &[AttachedDevice]) {
    for device in attached {
        let ac = &device.air_conditioner;
        info!(
            device = ac.name(),
            temperature = ac.current_temperature(),
            humidity = ac.current_relative_humidity(),
            on = ac.switch_on(),
            rotation = ac.rotation_speed(),
            "device state"
        );

        if let Some(hc) = &device.heater_cooler {
            debug!(
                device = hc.name(),
                active = %hc.active(),
                target = %hc.target_heater_cooler_state(),
                current = %hc.current_heater_cooler_state(),
                heating = hc.heating_threshold(),
                cooling = hc.cooling_threshold(),
                "heater/cooler state"
            );
        }
    }
}
