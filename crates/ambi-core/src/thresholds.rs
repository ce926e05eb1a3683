// ── Heater/cooler threshold persistence ──
//
// A small JSON file mapping accessory identifiers to their heating and
// cooling thresholds. The key spelling matches files written by earlier
// versions of the bridge.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "heatingThresholdTempature")]
    pub heating: f64,
    #[serde(rename = "coolingThresholdTempature")]
    pub cooling: f64,
}

impl Thresholds {
    pub fn new(heating: f64, cooling: f64) -> Self {
        Self { heating, cooling }
    }
}

/// Threshold storage, optionally backed by a file.
///
/// Every change is written through synchronously. Read and write failures
/// are logged and the in-memory values kept.
#[derive(Debug)]
pub struct ThresholdStore {
    path: Option<PathBuf>,
    defaults: Thresholds,
    entries: DashMap<String, Thresholds>,
}

impl ThresholdStore {
    /// Open (or create) the threshold file at `path`.
    ///
    /// A file that exists but cannot be read is left untouched; the store
    /// then runs on defaults without writing until restarted.
    pub fn open(path: impl Into<PathBuf>, defaults: Thresholds) -> Self {
        let path = path.into();
        let (entries, path) = match load(&path) {
            Ok(Some(entries)) => (entries, Some(path)),
            Ok(None) => {
                debug!(path = %path.display(), "creating threshold file");
                (BTreeMap::new(), Some(path))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "cannot read threshold file; remove it to create a new one. Using defaults"
                );
                (BTreeMap::new(), None)
            }
        };

        let store = Self {
            path,
            defaults,
            entries: entries.into_iter().collect(),
        };
        store.persist();
        store
    }

    /// A store that is never written to disk.
    pub fn in_memory(defaults: Thresholds) -> Self {
        Self {
            path: None,
            defaults,
            entries: DashMap::new(),
        }
    }

    /// Thresholds for an accessory, seeding defaults on first use.
    pub fn get(&self, accessory_id: &str) -> Thresholds {
        if let Some(existing) = self.entries.get(accessory_id) {
            return *existing;
        }
        self.entries
            .insert(accessory_id.to_owned(), self.defaults);
        self.persist();
        self.defaults
    }

    pub fn set_heating(&self, accessory_id: &str, value: f64) {
        self.entries
            .entry(accessory_id.to_owned())
            .or_insert(self.defaults)
            .heating = value;
        self.persist();
    }

    pub fn set_cooling(&self, accessory_id: &str, value: f64) {
        self.entries
            .entry(accessory_id.to_owned())
            .or_insert(self.defaults)
            .cooling = value;
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let snapshot: BTreeMap<String, Thresholds> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        if let Err(e) = save(path, &snapshot) {
            warn!(error = %e, "could not save thresholds");
        }
    }
}

fn load(path: &Path) -> Result<Option<BTreeMap<String, Thresholds>>, CoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CoreError::Io {
                path: path.to_owned(),
                source,
            });
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| CoreError::Config {
            message: format!("{}: {e}", path.display()),
        })
}

fn save(path: &Path, entries: &BTreeMap<String, Thresholds>) -> Result<(), CoreError> {
    let io_err = |source| CoreError::Io {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(entries).map_err(|e| CoreError::Config {
        message: format!("serialize thresholds: {e}"),
    })?;
    std::fs::write(path, json).map_err(io_err)
}
