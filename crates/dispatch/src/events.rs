//! Runtime fan-out over registered event processors.

use std::sync::Arc;

use tracing::debug;

use ferrule_registry::{CapabilityKind, CapabilityPayload, HostEvent, PluginRegistry};

use crate::drive::{DispatchOutcome, fan_out};

/// Hand the event to every enabled processor independently. One failing
/// processor never affects the others; per-plugin outcomes are returned for
/// the caller to aggregate. An empty result is normal for a host with no
/// processors registered.
pub async fn dispatch_event(registry: &PluginRegistry, event: &HostEvent) -> Vec<DispatchOutcome> {
    let descriptors = registry.get_by_kind(CapabilityKind::EventProcessor);
    if descriptors.is_empty() {
        return Vec::new();
    }
    debug!(event = %event.kind, count = descriptors.len(), "dispatching host event");

    fan_out(&descriptors, |descriptor| {
        let descriptor = Arc::clone(descriptor);
        let event = event.clone();
        async move {
            match descriptor.payload() {
                CapabilityPayload::EventProcessor(processor) => processor.process(&event).await,
                _ => Ok(()),
            }
        }
    })
    .await
}
