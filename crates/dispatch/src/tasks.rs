//! Scheduled-task adapter: hands each enabled task to the execution
//! engine. The engine owns scheduling and retry policy.

use tracing::debug;

use ferrule_registry::{CapabilityKind, CapabilityPayload, PluginRegistry, TaskSpec};

use crate::adapter::DispatcherAdapter;

/// Boundary to the background-task execution engine.
pub trait TaskExecutor {
    fn schedule(&mut self, plugin_id: &str, spec: &TaskSpec);
}

/// Schedules every enabled task at engine initialization, independently.
pub struct TaskMounter<E: TaskExecutor> {
    executor: E,
}

impl<E: TaskExecutor> TaskMounter<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}

impl<E: TaskExecutor> DispatcherAdapter for TaskMounter<E> {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ScheduledTask
    }

    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()> {
        for descriptor in registry.get_by_kind(CapabilityKind::ScheduledTask) {
            if let CapabilityPayload::ScheduledTask(spec) = descriptor.payload() {
                self.executor.schedule(descriptor.id(), spec);
                debug!(
                    plugin = descriptor.id(),
                    schedule = %spec.schedule,
                    "scheduled plugin task"
                );
            }
        }
        Ok(())
    }
}
