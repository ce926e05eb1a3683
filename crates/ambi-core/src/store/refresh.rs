// ── Fetch and refresh logic ──
//
// Pulls the device listing from the service and applies it to the cache.
// Errors stop here: they are logged and reported as an outcome, never
// propagated to read handlers.

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::PollingCache;
use crate::convert::reporting_snapshots;
use crate::error::CoreError;
use crate::model::DeviceSnapshot;

/// Result of a [`PollingCache::fetch_status`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Inside the rate-limit window; no request was made.
    Skipped,
    /// The listing was applied; `devices` snapshots were written.
    Updated { devices: usize },
    /// The request or the parse failed; the cache is unchanged.
    Failed,
}

impl FetchOutcome {
    pub fn is_updated(self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

impl PollingCache {
    /// Refresh every reporting device from the service.
    ///
    /// A non-forced call inside the rate-limit window is skipped. The batch
    /// is applied all or nothing, and the rate limiter only advances after
    /// a successful parse.
    pub async fn fetch_status(&self, force: bool) -> FetchOutcome {
        if !force && self.within_rate_limit() {
            debug!("skipping device refresh: inside rate-limit window");
            return FetchOutcome::Skipped;
        }

        let session = self.sessions.session();
        if session.is_empty() {
            warn!("cannot refresh devices: not logged in");
            return FetchOutcome::Failed;
        }

        let devices = match self.sessions.client().list_devices(&session).await {
            Ok(devices) => devices,
            Err(e) if e.is_busy() => {
                warn!("device refresh failed: Ambi Climate is busy");
                return FetchOutcome::Failed;
            }
            Err(e) => {
                error!(error = %e, "device refresh failed");
                return FetchOutcome::Failed;
            }
        };

        let snapshots = match reporting_snapshots(&devices) {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(error = %e, "discarding device listing");
                return FetchOutcome::Failed;
            }
        };

        let count = snapshots.len();
        for snapshot in snapshots {
            self.insert(snapshot.name(), snapshot);
        }

        self.last_fetch.send_replace(Some(Instant::now()));
        self.last_refresh.send_replace(Some(Utc::now()));
        self.bump_version();

        info!(devices = count, listed = devices.len(), "device status refreshed");
        FetchOutcome::Updated { devices: count }
    }

    /// Fetch one device straight from the service, bypassing the cache.
    ///
    /// Returns `Ok(None)` when the device is not currently reporting. The
    /// cache is not written.
    pub async fn fetch_live(&self, name: &str) -> Result<Option<DeviceSnapshot>, CoreError> {
        let session = self.sessions.session();
        if session.is_empty() {
            return Err(CoreError::NotAuthenticated);
        }

        let devices = self.sessions.client().list_devices(&session).await?;
        let Some(device) = devices
            .iter()
            .find(|d| d.is_reporting() && d.display_name() == name)
        else {
            debug!(device = name, "device not reporting");
            return Ok(None);
        };

        Ok(Some(DeviceSnapshot::try_from(device)?))
    }

    fn within_rate_limit(&self) -> bool {
        let last = *self.last_fetch.borrow();
        last.is_some_and(|at| at.elapsed() < self.rate_limit_window)
    }
}
