// ── Device snapshot cache ──
//
// Thread-safe, lock-free storage for device snapshots keyed by
// `"{location} {room}"`. Every mutation bumps a version counter that
// subscribers observe through a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::model::{ControlMode, DeviceSnapshot};
use crate::session::SessionManager;

/// Snapshot cache in front of the device listing endpoint.
///
/// Snapshots are handed out as `Arc`s: a reader keeps a consistent view even
/// if a fetch replaces the entry underneath it. Entries are never removed.
pub struct PollingCache {
    pub(crate) sessions: Arc<SessionManager>,
    pub(crate) rate_limit_window: Duration,
    pub(crate) snapshots: DashMap<String, Arc<DeviceSnapshot>>,
    /// Monotonic time of the last successful fetch; drives the rate limiter.
    pub(crate) last_fetch: watch::Sender<Option<Instant>>,
    /// Wall-clock time of the last successful fetch, for display.
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) version: watch::Sender<u64>,
}

impl PollingCache {
    pub fn new(sessions: Arc<SessionManager>, rate_limit_window: Duration) -> Self {
        let (last_fetch, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);
        let (version, _) = watch::channel(0u64);

        Self {
            sessions,
            rate_limit_window,
            snapshots: DashMap::new(),
            last_fetch,
            last_refresh,
            version,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// The cached snapshot for `name`, creating a placeholder on first use.
    ///
    /// The placeholder is stored, so repeated lookups of an unseen device
    /// return the same `Arc` until a fetch or command replaces it.
    pub fn get_device_info(&self, name: &str) -> Arc<DeviceSnapshot> {
        let entry = self
            .snapshots
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(DeviceSnapshot::placeholder()));
        Arc::clone(entry.value())
    }

    /// The cached snapshot for `name`, without creating one.
    pub fn peek(&self, name: &str) -> Option<Arc<DeviceSnapshot>> {
        self.snapshots.get(name).map(|e| Arc::clone(e.value()))
    }

    /// Every cached snapshot, sorted by device name.
    pub fn snapshots(&self) -> Vec<(String, Arc<DeviceSnapshot>)> {
        let mut all: Vec<_> = self
            .snapshots
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub(crate) fn insert(&self, name: String, snapshot: DeviceSnapshot) {
        self.snapshots.insert(name, Arc::new(snapshot));
    }

    /// Record the control mode a command response reported.
    pub(crate) fn update_mode(&self, name: &str, mode: ControlMode) {
        {
            let mut entry = self
                .snapshots
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(DeviceSnapshot::placeholder()));
            let updated = entry.value().with_mode(mode);
            *entry.value_mut() = Arc::new(updated);
        }
        self.bump_version();
    }

    pub(crate) fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    // ── Subscriptions & metadata ─────────────────────────────────────

    /// Version counter bumped on every cache mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Time of the last successful fetch.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How old the cached data is.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ambi_api::{AmbiClient, TransportConfig};
    use secrecy::SecretString;
    use url::Url;

    fn cache() -> PollingCache {
        let client = AmbiClient::new(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        let sessions = Arc::new(SessionManager::new(
            client,
            "me@example.com",
            SecretString::from("pw".to_string()),
        ));
        PollingCache::new(sessions, Duration::from_secs(270))
    }

    #[test]
    fn unseen_device_gets_a_stable_placeholder() {
        let cache = cache();
        let first = cache.get_device_info("Home Office");
        let second = cache.get_device_info("Home Office");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.mode, ControlMode::Off);
        assert_eq!(first.fan, crate::model::FanLevel::Quiet);
        assert!(first.humidity.abs() < f64::EPSILON);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn peek_does_not_create_entries() {
        let cache = cache();
        assert!(cache.peek("Home Office").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn update_mode_replaces_the_snapshot_and_notifies() {
        let cache = cache();
        let rx = cache.subscribe();
        let before = cache.get_device_info("Home Office");

        cache.update_mode("Home Office", ControlMode::Climate);

        let after = cache.get_device_info("Home Office");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.mode, ControlMode::Off);
        assert_eq!(after.mode, ControlMode::Climate);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn no_refresh_yet() {
        let cache = cache();
        assert!(cache.last_refresh().is_none());
        assert!(cache.data_age().is_none());
    }
}
