//! Plugins bundled with the host and registered at every startup.

pub mod event_audit;
pub mod heartbeat;

use std::sync::Arc;

use crate::source::{PluginSource, StaticSource};

/// The static source list a host loads at startup.
pub fn bundled_sources() -> Vec<Arc<dyn PluginSource>> {
    vec![
        Arc::new(StaticSource::new("bundled:event-audit", || {
            vec![event_audit::descriptor(event_audit::default_log_path())]
        })),
        Arc::new(StaticSource::new("bundled:heartbeat", || {
            vec![heartbeat::descriptor()]
        })),
    ]
}
