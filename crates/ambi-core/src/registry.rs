// ── Device pair registry ──
//
// Links the facets of one physical device so a write through one facet can
// update the others right away. The registry never owns a projector: it
// holds `Weak` references and the host decides their lifetime.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use strum::Display;

use crate::model::DeviceKey;
use crate::projector::{AirConditionerProjector, HeaterCoolerProjector};

/// Which facet of a device a projector represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "camelCase")]
pub enum Role {
    Switch,
    HeaterCooler,
}

/// Non-owning handle registered for a role.
#[derive(Debug, Clone)]
pub enum FacetRef {
    Switch(Weak<AirConditionerProjector>),
    HeaterCooler(Weak<HeaterCoolerProjector>),
}

impl FacetRef {
    pub fn switch(projector: &Arc<AirConditionerProjector>) -> Self {
        Self::Switch(Arc::downgrade(projector))
    }

    pub fn heater_cooler(projector: &Arc<HeaterCoolerProjector>) -> Self {
        Self::HeaterCooler(Arc::downgrade(projector))
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Switch(_) => Role::Switch,
            Self::HeaterCooler(_) => Role::HeaterCooler,
        }
    }
}

/// A live projector looked up from the registry.
#[derive(Debug, Clone)]
pub enum Facet {
    Switch(Arc<AirConditionerProjector>),
    HeaterCooler(Arc<HeaterCoolerProjector>),
}

#[derive(Debug, Default)]
struct DevicePairEntry {
    switch: Option<Weak<AirConditionerProjector>>,
    heater_cooler: Option<Weak<HeaterCoolerProjector>>,
}

/// Registry of facets per physical device.
#[derive(Debug, Default)]
pub struct DevicePairRegistry {
    entries: DashMap<DeviceKey, DevicePairEntry>,
}

impl DevicePairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a facet. A second registration for the same role replaces
    /// the first.
    pub fn register(&self, key: DeviceKey, facet: FacetRef) {
        let mut entry = self.entries.entry(key).or_default();
        match facet {
            FacetRef::Switch(weak) => entry.switch = Some(weak),
            FacetRef::HeaterCooler(weak) => entry.heater_cooler = Some(weak),
        }
    }

    /// The live facet registered for `role`, if any.
    pub fn get(&self, key: &DeviceKey, role: Role) -> Option<Facet> {
        match role {
            Role::Switch => self.switch(key).map(Facet::Switch),
            Role::HeaterCooler => self.heater_cooler(key).map(Facet::HeaterCooler),
        }
    }

    pub fn switch(&self, key: &DeviceKey) -> Option<Arc<AirConditionerProjector>> {
        self.entries.get(key)?.switch.as_ref()?.upgrade()
    }

    pub fn heater_cooler(&self, key: &DeviceKey) -> Option<Arc<HeaterCoolerProjector>> {
        self.entries.get(key)?.heater_cooler.as_ref()?.upgrade()
    }

    /// Number of devices with at least one registration.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::projector::test_support::{context, heater_cooler, sink};

    #[test]
    fn role_names() {
        assert_eq!(Role::Switch.to_string(), "switch");
        assert_eq!(Role::HeaterCooler.to_string(), "heaterCooler");
    }

    #[tokio::test]
    async fn both_roles_share_one_entry() {
        let ctx = context();
        let device = DeviceConfig::new("Home", "Room A");
        let key = device.key();

        let ac = AirConditionerProjector::new(&device, ctx.clone(), sink());
        let hc = heater_cooler(&device, &ctx);

        ctx.registry.register(key, FacetRef::switch(&ac));
        ctx.registry.register(key, FacetRef::heater_cooler(&hc));

        assert_eq!(ctx.registry.len(), 1);
        assert!(Arc::ptr_eq(&ctx.registry.switch(&key).unwrap(), &ac));
        assert!(Arc::ptr_eq(&ctx.registry.heater_cooler(&key).unwrap(), &hc));
        assert!(matches!(
            ctx.registry.get(&key, Role::HeaterCooler),
            Some(Facet::HeaterCooler(_))
        ));
    }

    #[tokio::test]
    async fn re_registering_a_role_replaces_it() {
        let ctx = context();
        let device = DeviceConfig::new("Home", "Room A");
        let key = device.key();

        let first = AirConditionerProjector::new(&device, ctx.clone(), sink());
        let second = AirConditionerProjector::new(&device, ctx.clone(), sink());
        ctx.registry.register(key, FacetRef::switch(&first));
        ctx.registry.register(key, FacetRef::switch(&second));

        assert_eq!(ctx.registry.len(), 1);
        assert!(Arc::ptr_eq(&ctx.registry.switch(&key).unwrap(), &second));
        assert!(ctx.registry.heater_cooler(&key).is_none());
    }

    #[tokio::test]
    async fn dropped_projectors_are_absent() {
        let ctx = context();
        let device = DeviceConfig::new("Home", "Room A");
        let key = device.key();

        let ac = AirConditionerProjector::new(&device, ctx.clone(), sink());
        ctx.registry.register(key, FacetRef::switch(&ac));
        drop(ac);

        assert!(ctx.registry.switch(&key).is_none());
        assert!(ctx.registry.get(&key, Role::Switch).is_none());
    }

    #[test]
    fn unknown_key_is_absent() {
        let registry = DevicePairRegistry::new();
        let key = DeviceKey::new("Nowhere", "Nothing");
        assert!(registry.get(&key, Role::Switch).is_none());
        assert!(registry.is_empty());
    }
}
