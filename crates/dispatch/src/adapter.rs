//! The per-kind adapter contract.

use ferrule_registry::{CapabilityKind, PluginRegistry};

/// Wires one capability kind's registered payloads into a host subsystem.
///
/// `wire` reads the registry once, at subsystem-initialization time, and
/// performs its side effects in the returned (priority) order. Plugins that
/// register after `wire` has run are not picked up — restart is the update
/// path. Adapters must not mutate descriptor payloads.
pub trait DispatcherAdapter {
    /// The capability kind this adapter consumes.
    fn kind(&self) -> CapabilityKind;

    /// Pull the kind's ordered snapshot and perform the side effects.
    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()>;
}
