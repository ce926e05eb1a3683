// ── Accessory state projectors ──
//
// Projectors turn device snapshots into the characteristic values an
// accessory host displays, and turn host writes into commands. Reads are
// synchronous and never block; where a read needs the network the value is
// pushed through the sink once it arrives.

mod air_conditioner;
mod feedback;
mod heater_cooler;
pub mod mapping;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use strum::Display;
use tracing::warn;

pub use air_conditioner::{AirConditionerProjector, AirConditionerState};
pub use feedback::FeedbackProjector;
pub use heater_cooler::{HeaterCoolerProjector, HeaterCoolerState};

use crate::command::CommandDispatcher;
use crate::config::{FanSpeedProfile, ReadMode};
use crate::model::{Characteristic, CharacteristicValue, DeviceSnapshot};
use crate::registry::DevicePairRegistry;
use crate::store::PollingCache;

// ── Host interface ───────────────────────────────────────────────────

/// Where projectors push characteristic changes.
///
/// Implemented by the accessory host. Called from whichever task produced
/// the change, so implementations must not block.
pub trait CharacteristicSink: Send + Sync {
    fn update(&self, characteristic: Characteristic, value: CharacteristicValue);
}

/// Sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CharacteristicSink for NullSink {
    fn update(&self, _characteristic: Characteristic, _value: CharacteristicValue) {}
}

/// The kind of accessory a sink is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FacetKind {
    AirConditioner,
    HeaterCooler,
    Feedback,
}

// ── Read strategies ──────────────────────────────────────────────────

/// Result of asking a [`SnapshotSource`] for a device.
pub enum Lookup {
    /// Available now.
    Ready(Arc<DeviceSnapshot>),
    /// Will resolve later; `None` if the device could not be read.
    Pending(BoxFuture<'static, Option<DeviceSnapshot>>),
}

/// Where projectors get device state from.
pub trait SnapshotSource: Send + Sync {
    fn lookup(&self, name: &str) -> Lookup;
}

/// Reads from the polling cache only.
pub struct CachedSource {
    cache: Arc<PollingCache>,
}

impl CachedSource {
    pub fn new(cache: Arc<PollingCache>) -> Self {
        Self { cache }
    }
}

impl SnapshotSource for CachedSource {
    fn lookup(&self, name: &str) -> Lookup {
        Lookup::Ready(self.cache.get_device_info(name))
    }
}

/// Starts a remote fetch for every read.
pub struct DirectSource {
    cache: Arc<PollingCache>,
}

impl DirectSource {
    pub fn new(cache: Arc<PollingCache>) -> Self {
        Self { cache }
    }
}

impl SnapshotSource for DirectSource {
    fn lookup(&self, name: &str) -> Lookup {
        let cache = Arc::clone(&self.cache);
        let name = name.to_owned();
        Lookup::Pending(Box::pin(async move {
            match cache.fetch_live(&name).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(device = %name, error = %e, "live read failed");
                    None
                }
            }
        }))
    }
}

/// The source matching a configured read mode.
pub fn source_for(mode: ReadMode, cache: Arc<PollingCache>) -> Arc<dyn SnapshotSource> {
    match mode {
        ReadMode::Cached => Arc::new(CachedSource::new(cache)),
        ReadMode::Direct => Arc::new(DirectSource::new(cache)),
    }
}

// ── Shared projector plumbing ────────────────────────────────────────

/// Collaborators every projector needs.
#[derive(Clone)]
pub struct ProjectorContext {
    pub(crate) cache: Arc<PollingCache>,
    pub(crate) commands: CommandDispatcher,
    pub(crate) registry: Arc<DevicePairRegistry>,
    pub(crate) source: Arc<dyn SnapshotSource>,
    pub(crate) read_mode: ReadMode,
    pub(crate) fan_profile: FanSpeedProfile,
}

impl ProjectorContext {
    pub fn new(
        cache: Arc<PollingCache>,
        commands: CommandDispatcher,
        registry: Arc<DevicePairRegistry>,
        read_mode: ReadMode,
        fan_profile: FanSpeedProfile,
    ) -> Self {
        let source = source_for(read_mode, Arc::clone(&cache));
        Self {
            cache,
            commands,
            registry,
            source,
            read_mode,
            fan_profile,
        }
    }
}

/// A projector that can absorb a snapshot into its displayed state.
pub(crate) trait Observe: Send + Sync + 'static {
    /// Replace displayed state from `snapshot`; publish it if `push`.
    fn apply(&self, snapshot: &DeviceSnapshot, push: bool);
}

/// Run one read through `source`.
///
/// A ready snapshot is applied before returning. A pending one is applied
/// and pushed from a spawned task; the caller shows the previous value.
pub(crate) fn observe<P: Observe>(projector: &Arc<P>, source: &dyn SnapshotSource, name: &str) {
    match source.lookup(name) {
        Lookup::Ready(snapshot) => projector.apply(&snapshot, false),
        Lookup::Pending(fetch) => {
            let projector = Arc::clone(projector);
            tokio::spawn(async move {
                if let Some(snapshot) = fetch.await {
                    projector.apply(&snapshot, true);
                }
            });
        }
    }
}
