//! Characteristic sink that writes every pushed value to the log.
//!
//! Stands in for an accessory framework when the bridge runs from the
//! command line.

use ambi_core::{Characteristic, CharacteristicSink, CharacteristicValue, FacetKind};
use tracing::info;

#[derive(Debug)]
pub struct LogSink {
    device: String,
    facet: FacetKind,
}

impl LogSink {
    pub fn new(device: impl Into<String>, facet: FacetKind) -> Self {
        Self {
            device: device.into(),
            facet,
        }
    }
}

impl CharacteristicSink for LogSink {
    fn update(&self, characteristic: Characteristic, value: CharacteristicValue) {
        info!(
            device = %self.device,
            facet = %self.facet,
            %characteristic,
            %value,
            "characteristic updated"
        );
    }
}
