// ── Platform facade ──
//
// Owns the session, cache, dispatcher, registry and threshold store for a
// configured account, runs the background login-refresh and polling tasks,
// and builds projectors for the host.

use std::sync::Arc;
use std::time::Duration;

use ambi_api::{AmbiClient, TransportConfig};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::CommandDispatcher;
use crate::config::{DeviceConfig, PlatformConfig};
use crate::error::CoreError;
use crate::projector::{
    AirConditionerProjector, CharacteristicSink, FacetKind, FeedbackProjector,
    HeaterCoolerProjector, ProjectorContext,
};
use crate::registry::{DevicePairRegistry, FacetRef};
use crate::session::SessionManager;
use crate::store::{FetchOutcome, PollingCache};
use crate::thresholds::{ThresholdStore, Thresholds};

/// Every facet built for one configured device.
#[derive(Debug, Clone)]
pub struct AttachedDevice {
    pub air_conditioner: Arc<AirConditionerProjector>,
    pub heater_cooler: Option<Arc<HeaterCoolerProjector>>,
    pub feedback: Option<Arc<FeedbackProjector>>,
}

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<PlatformInner>`.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    sessions: Arc<SessionManager>,
    cache: Arc<PollingCache>,
    commands: CommandDispatcher,
    registry: Arc<DevicePairRegistry>,
    thresholds: Arc<ThresholdStore>,
    projectors: ProjectorContext,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Platform {
    /// Build a platform with a file-backed threshold store. Does not log
    /// in; call [`start()`](Self::start).
    pub fn new(config: PlatformConfig) -> Result<Self, CoreError> {
        let defaults = Thresholds::new(
            config.default_heating_threshold,
            config.default_cooling_threshold,
        );
        let thresholds = ThresholdStore::open(&config.threshold_file, defaults);
        Self::with_thresholds(config, thresholds)
    }

    /// Build a platform around an existing threshold store.
    pub fn with_thresholds(
        config: PlatformConfig,
        thresholds: ThresholdStore,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = AmbiClient::new(config.base_url.clone(), &transport)?;

        let sessions = Arc::new(SessionManager::new(
            client,
            config.email.clone(),
            config.password.clone(),
        ));
        let cache = Arc::new(PollingCache::new(
            Arc::clone(&sessions),
            config.rate_limit_window,
        ));
        let commands = CommandDispatcher::new(Arc::clone(&sessions), Arc::clone(&cache));
        let registry = Arc::new(DevicePairRegistry::new());
        let projectors = ProjectorContext::new(
            Arc::clone(&cache),
            commands.clone(),
            Arc::clone(&registry),
            config.read_mode,
            config.fan_speed_profile,
        );

        Ok(Self {
            inner: Arc::new(PlatformInner {
                config,
                sessions,
                cache,
                commands,
                registry,
                thresholds: Arc::new(thresholds),
                projectors,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.inner.sessions
    }

    pub fn cache(&self) -> &Arc<PollingCache> {
        &self.inner.cache
    }

    pub fn commands(&self) -> &CommandDispatcher {
        &self.inner.commands
    }

    pub fn registry(&self) -> &Arc<DevicePairRegistry> {
        &self.inner.registry
    }

    pub fn thresholds(&self) -> &Arc<ThresholdStore> {
        &self.inner.thresholds
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Log in, fetch every device once, and spawn the background tasks.
    ///
    /// A failed login is logged, not returned: the tasks are spawned either
    /// way and the re-login task retries on its next tick. Callers that need
    /// to know can check [`SessionManager::is_authenticated`].
    pub async fn start(&self) -> FetchOutcome {
        if self.inner.sessions.login().await.is_err() {
            debug!("starting without a session; re-login task will retry");
        }
        let outcome = self.inner.cache.fetch_status(true).await;

        let mut handles = self.inner.task_handles.lock().await;
        let cancel = &self.inner.cancel;

        let relogin = self.inner.config.login_refresh_interval;
        if !relogin.is_zero() {
            handles.push(tokio::spawn(login_refresh_task(
                Arc::clone(&self.inner.sessions),
                relogin,
                cancel.clone(),
            )));
        }

        let poll = self.inner.config.poll_interval;
        if !poll.is_zero() {
            handles.push(tokio::spawn(poll_task(
                Arc::clone(&self.inner.cache),
                poll,
                cancel.clone(),
            )));
        }

        info!(
            devices = self.inner.config.devices.len(),
            read_mode = %self.inner.config.read_mode,
            "platform started"
        );
        outcome
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let handles: Vec<_> = self.inner.task_handles.lock().await.drain(..).collect();
        for result in futures_util::future::join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "background task ended abnormally");
            }
        }
        debug!("platform stopped");
    }

    // ── Projector factories ──────────────────────────────────────────

    /// Build and register the `switch` facet of a device.
    pub fn air_conditioner(
        &self,
        device: &DeviceConfig,
        sink: Arc<dyn CharacteristicSink>,
    ) -> Arc<AirConditionerProjector> {
        let projector = AirConditionerProjector::new(device, self.inner.projectors.clone(), sink);
        self.inner
            .registry
            .register(device.key(), FacetRef::switch(&projector));
        projector
    }

    /// Build and register the `heaterCooler` facet of a device.
    pub fn heater_cooler(
        &self,
        device: &DeviceConfig,
        sink: Arc<dyn CharacteristicSink>,
    ) -> Arc<HeaterCoolerProjector> {
        let projector = HeaterCoolerProjector::new(
            device,
            self.inner.projectors.clone(),
            sink,
            Arc::clone(&self.inner.thresholds),
        );
        self.inner
            .registry
            .register(device.key(), FacetRef::heater_cooler(&projector));
        projector
    }

    /// Build the comfort-feedback panel of a device.
    pub fn feedback(
        &self,
        device: &DeviceConfig,
        sink: Arc<dyn CharacteristicSink>,
    ) -> Arc<FeedbackProjector> {
        FeedbackProjector::new(device, self.inner.projectors.clone(), sink)
    }

    /// Build every facet the device configuration enables.
    pub fn attach_device(
        &self,
        device: &DeviceConfig,
        mut sink_for: impl FnMut(FacetKind) -> Arc<dyn CharacteristicSink>,
    ) -> AttachedDevice {
        let air_conditioner = self.air_conditioner(device, sink_for(FacetKind::AirConditioner));
        let heater_cooler = device
            .heater_cooler_mode
            .then(|| self.heater_cooler(device, sink_for(FacetKind::HeaterCooler)));
        let feedback = device
            .show_feedbacks
            .then(|| self.feedback(device, sink_for(FacetKind::Feedback)));

        debug!(
            device = %device.device_name(),
            heater_cooler = heater_cooler.is_some(),
            feedback = feedback.is_some(),
            "attached device"
        );
        AttachedDevice {
            air_conditioner,
            heater_cooler,
            feedback,
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Log in again on a fixed period, regardless of earlier outcomes.
async fn login_refresh_task(
    sessions: Arc<SessionManager>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are logged by the session manager.
                let _ = sessions.login().await;
            }
        }
    }
}

/// Poll device status on a fixed period, subject to the rate limiter.
async fn poll_task(cache: Arc<PollingCache>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                cache.fetch_status(false).await;
            }
        }
    }
}
