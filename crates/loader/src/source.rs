//! Plugin sources — the registration entry points the loader drives.
//!
//! The set of sources is assembled statically at startup (built-in list or
//! explicit manifest); there is no runtime code loading. Each source's
//! `register` body may perform I/O or suspend, which is why the loader
//! bounds it with a timeout.

use async_trait::async_trait;

use ferrule_registry::{PluginDescriptor, PluginRegistry};

/// One plugin's registration entry point. Run exactly once per process
/// lifetime, by the loader.
#[async_trait]
pub trait PluginSource: Send + Sync {
    /// Stable name used in load reports and logs.
    fn name(&self) -> &str;

    /// Run this source's registration calls against the registry.
    async fn register(&self, registry: &PluginRegistry) -> anyhow::Result<()>;
}

/// A source wrapping a fixed descriptor factory.
///
/// Registration goes through `register_many`, so one source's descriptors
/// commit atomically: a single malformed or colliding descriptor rejects
/// the whole source without polluting the registry.
pub struct StaticSource {
    source_name: String,
    build: Box<dyn Fn() -> Vec<PluginDescriptor> + Send + Sync>,
}

impl StaticSource {
    pub fn new(
        name: impl Into<String>,
        build: impl Fn() -> Vec<PluginDescriptor> + Send + Sync + 'static,
    ) -> Self {
        Self {
            source_name: name.into(),
            build: Box::new(build),
        }
    }
}

#[async_trait]
impl PluginSource for StaticSource {
    fn name(&self) -> &str {
        &self.source_name
    }

    async fn register(&self, registry: &PluginRegistry) -> anyhow::Result<()> {
        registry.register_many((self.build)())?;
        Ok(())
    }
}
