//! Route-contribution adapter: hands registered route tables to the
//! routing subsystem.

use tracing::debug;

use ferrule_registry::{CapabilityKind, CapabilityPayload, PluginRegistry, RouteTable};

use crate::adapter::DispatcherAdapter;

/// Boundary to the routing subsystem. Receives each plugin's whole route
/// table once, in priority order; table contents are opaque to this crate.
pub trait RouteSink {
    fn mount(&mut self, plugin_id: &str, table: &RouteTable);
}

/// Mounts every enabled route contribution at router initialization.
pub struct RouteMounter<S: RouteSink> {
    sink: S,
}

impl<S: RouteSink> RouteMounter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: RouteSink> DispatcherAdapter for RouteMounter<S> {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::RouteContribution
    }

    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()> {
        for descriptor in registry.get_by_kind(CapabilityKind::RouteContribution) {
            if let CapabilityPayload::RouteContribution(table) = descriptor.payload() {
                self.sink.mount(descriptor.id(), table);
                debug!(
                    plugin = descriptor.id(),
                    routes = table.routes.len(),
                    "mounted plugin routes"
                );
            }
        }
        Ok(())
    }
}
