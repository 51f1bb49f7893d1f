//! Auth-provider adapter: installs contributed strategies into the host's
//! identity subsystem.

use std::collections::HashMap;

use tracing::{debug, warn};

use ferrule_registry::{
    AuthStrategySpec, CapabilityKind, CapabilityPayload, PluginRegistry,
};

use crate::adapter::DispatcherAdapter;

/// Boundary to the session/identity subsystem. Receives each strategy once,
/// in priority order.
pub trait StrategySink {
    fn install(&mut self, plugin_id: &str, spec: &AuthStrategySpec);
}

/// Installs every enabled auth strategy at identity-subsystem init.
///
/// Strategy-identifier collision across distinct plugin ids is resolved
/// first-configured-wins: the earlier (higher-precedence) plugin keeps the
/// identifier and the later one is skipped with a warning.
pub struct AuthMounter<S: StrategySink> {
    sink: S,
    installed: HashMap<String, String>,
}

impl<S: StrategySink> AuthMounter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            installed: HashMap::new(),
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: StrategySink> DispatcherAdapter for AuthMounter<S> {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::AuthProvider
    }

    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()> {
        for descriptor in registry.get_by_kind(CapabilityKind::AuthProvider) {
            if let CapabilityPayload::AuthProvider(spec) = descriptor.payload() {
                if let Some(owner) = self.installed.get(&spec.strategy) {
                    warn!(
                        strategy = %spec.strategy,
                        winner = %owner,
                        loser = descriptor.id(),
                        "auth strategy identifier already installed, skipping"
                    );
                    continue;
                }
                self.installed
                    .insert(spec.strategy.clone(), descriptor.id().to_string());
                self.sink.install(descriptor.id(), spec);
                debug!(
                    plugin = descriptor.id(),
                    strategy = %spec.strategy,
                    "installed auth strategy"
                );
            }
        }
        Ok(())
    }
}
