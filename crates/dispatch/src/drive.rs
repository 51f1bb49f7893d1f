//! Generic dispatch shapes shared by the per-kind adapters.

use std::{future::Future, sync::Arc};

use {
    futures::future::join_all,
    tracing::{debug, warn},
};

use ferrule_registry::PluginDescriptor;

/// Result of one plugin's unit of work in a fan-out dispatch.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub plugin_id: String,
    pub result: anyhow::Result<()>,
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// First-match-wins: try candidates in order, stop at the first that
/// produces a value. A candidate error is logged and skipped, never
/// propagated.
pub async fn first_match<T, F, Fut>(descriptors: &[Arc<PluginDescriptor>], mut f: F) -> Option<T>
where
    F: FnMut(&Arc<PluginDescriptor>) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<T>>>,
{
    for descriptor in descriptors {
        match f(descriptor).await {
            Ok(Some(value)) => {
                debug!(plugin = descriptor.id(), "first-match dispatch resolved");
                return Some(value);
            },
            Ok(None) => {},
            Err(e) => {
                warn!(plugin = descriptor.id(), error = %e, "first-match candidate failed");
            },
        }
    }
    None
}

/// Fan-out: run every candidate concurrently and collect per-plugin
/// outcomes. One failure never affects the others.
pub async fn fan_out<F, Fut>(descriptors: &[Arc<PluginDescriptor>], f: F) -> Vec<DispatchOutcome>
where
    F: Fn(&Arc<PluginDescriptor>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let results = join_all(descriptors.iter().map(|descriptor| {
        let plugin_id = descriptor.id().to_string();
        let fut = f(descriptor);
        async move { (plugin_id, fut.await) }
    }))
    .await;

    results
        .into_iter()
        .map(|(plugin_id, result)| {
            if let Err(e) = &result {
                warn!(plugin = %plugin_id, error = %e, "fan-out unit failed");
            }
            DispatchOutcome { plugin_id, result }
        })
        .collect()
}
