//! `event-audit` plugin: appends every dispatched host event to a JSONL
//! file.

use std::{
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use {anyhow::Result, async_trait::async_trait, tracing::warn};

use ferrule_registry::{
    CapabilityPayload, EventProcessor, HostEvent, PluginDescriptor,
};

use crate::paths;

/// Appends a JSONL entry for every received host event.
pub struct EventAuditProcessor {
    log_path: PathBuf,
    /// Buffer writes through a mutex to keep appends atomic.
    file: Mutex<Option<std::fs::File>>,
}

impl EventAuditProcessor {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            file: Mutex::new(None),
        }
    }

    fn ensure_file(&self) -> Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            if let Some(parent) = self.log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)?;
            *guard = Some(file);
        }
        Ok(())
    }
}

#[async_trait]
impl EventProcessor for EventAuditProcessor {
    async fn process(&self, event: &HostEvent) -> Result<()> {
        if let Err(e) = self.ensure_file() {
            warn!(error = %e, "event-audit: failed to open log file");
            return Ok(());
        }

        let entry = serde_json::json!({
            "ts": std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            "event": event.kind,
            "data": event.data,
        });

        use std::io::Write;
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref mut f) = *guard
            && let Err(e) = writeln!(f, "{entry}")
        {
            warn!(error = %e, "event-audit: failed to write log entry");
        }
        Ok(())
    }
}

/// Default log path: `<data dir>/logs/events.log`.
pub fn default_log_path() -> PathBuf {
    paths::data_dir().join("logs/events.log")
}

/// Descriptor for the bundled audit processor. High priority value so other
/// processors are consulted first.
pub fn descriptor(log_path: PathBuf) -> PluginDescriptor {
    PluginDescriptor::new(
        "event-audit",
        "Event audit log",
        CapabilityPayload::EventProcessor(std::sync::Arc::new(EventAuditProcessor::new(log_path))),
    )
    .with_description("Appends every dispatched host event to a JSONL log")
    .with_priority(100)
}
