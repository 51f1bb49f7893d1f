//! `heartbeat` plugin: a scheduled task that logs a liveness line.

use std::sync::Arc;

use {anyhow::Result, async_trait::async_trait, tracing::info};

use ferrule_registry::{CapabilityPayload, PluginDescriptor, TaskRunner, TaskSpec};

pub struct HeartbeatTask;

#[async_trait]
impl TaskRunner for HeartbeatTask {
    async fn run(&self) -> Result<()> {
        info!("heartbeat");
        Ok(())
    }
}

pub fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(
        "heartbeat",
        "Heartbeat",
        CapabilityPayload::ScheduledTask(TaskSpec {
            schedule: "*/5 * * * *".into(),
            runner: Arc::new(HeartbeatTask),
        }),
    )
    .with_description("Logs a liveness line on a fixed schedule")
}
