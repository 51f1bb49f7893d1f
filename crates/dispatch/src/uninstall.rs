//! Uninstall hooks: teardown work run when plugins are removed.

use std::sync::Arc;

use ferrule_registry::{CapabilityKind, CapabilityPayload, PluginDescriptor, PluginRegistry};

use crate::drive::{DispatchOutcome, fan_out};

/// Run every enabled uninstall hook, independently. Used when the host
/// tears down its whole extension surface.
pub async fn run_uninstall_hooks(registry: &PluginRegistry) -> Vec<DispatchOutcome> {
    let descriptors = registry.get_by_kind(CapabilityKind::UninstallHook);
    run_hooks(&descriptors).await
}

/// Run the uninstall hook registered under one plugin id, if any. Ids are
/// globally unique, so at most one hook matches.
pub async fn run_uninstall_hook(
    registry: &PluginRegistry,
    plugin_id: &str,
) -> Option<DispatchOutcome> {
    let descriptors: Vec<_> = registry
        .get_by_kind(CapabilityKind::UninstallHook)
        .into_iter()
        .filter(|descriptor| descriptor.id() == plugin_id)
        .collect();
    run_hooks(&descriptors).await.into_iter().next()
}

async fn run_hooks(descriptors: &[Arc<PluginDescriptor>]) -> Vec<DispatchOutcome> {
    fan_out(descriptors, |descriptor| {
        let descriptor = Arc::clone(descriptor);
        async move {
            match descriptor.payload() {
                CapabilityPayload::UninstallHook(hook) => hook.on_uninstall().await,
                _ => Ok(()),
            }
        }
    })
    .await
}
