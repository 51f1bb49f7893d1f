//! Issue-provider adapter: builds the slug-keyed directory the host's data
//! layer uses to address external trackers.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, warn};

use ferrule_registry::{CapabilityKind, CapabilityPayload, IssueProvider, PluginRegistry};

use crate::adapter::DispatcherAdapter;

/// Slug-keyed directory of wired issue providers.
///
/// Slug collision across distinct plugin ids resolves first-configured-wins
/// in priority order, same as auth strategies.
#[derive(Default)]
pub struct IssueProviderDirectory {
    providers: HashMap<String, (String, Arc<dyn IssueProvider>)>,
}

impl IssueProviderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<dyn IssueProvider>> {
        self.providers.get(slug).map(|(_, provider)| provider)
    }

    /// The plugin id that claimed a slug.
    pub fn owner(&self, slug: &str) -> Option<&str> {
        self.providers.get(slug).map(|(id, _)| id.as_str())
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl DispatcherAdapter for IssueProviderDirectory {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::IssueProvider
    }

    fn wire(&mut self, registry: &PluginRegistry) -> anyhow::Result<()> {
        for descriptor in registry.get_by_kind(CapabilityKind::IssueProvider) {
            if let CapabilityPayload::IssueProvider(provider) = descriptor.payload() {
                let slug = provider.slug().to_string();
                if let Some((owner, _)) = self.providers.get(&slug) {
                    warn!(
                        slug = %slug,
                        winner = %owner,
                        loser = descriptor.id(),
                        "issue provider slug already claimed, skipping"
                    );
                    continue;
                }
                debug!(plugin = descriptor.id(), slug = %slug, "wired issue provider");
                self.providers
                    .insert(slug, (descriptor.id().to_string(), Arc::clone(provider)));
            }
        }
        Ok(())
    }
}
