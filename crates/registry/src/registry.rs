//! The central plugin registry: accepts descriptors, groups them by
//! capability kind, enforces global id uniqueness, and exposes
//! priority-ordered lookup.
//!
//! Registration happens during single-threaded startup; lookups happen
//! concurrently during steady-state dispatch. The interior `RwLock` gives
//! many concurrent readers and mutually exclusive writers; a reader observes
//! the store strictly before or strictly after a write, never a torn state.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::info;

use crate::{
    descriptor::PluginDescriptor,
    error::{Error, Result},
    kind::CapabilityKind,
};

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, Arc<PluginDescriptor>>,
    by_kind: HashMap<CapabilityKind, Vec<Arc<PluginDescriptor>>>,
}

impl Inner {
    fn insert(&mut self, descriptor: PluginDescriptor) -> Arc<PluginDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.by_id
            .insert(descriptor.id().to_string(), Arc::clone(&descriptor));
        let sequence = self.by_kind.entry(descriptor.kind()).or_default();
        sequence.push(Arc::clone(&descriptor));
        // Stable sort: equal priorities keep their registration order.
        sequence.sort_by_key(|d| d.priority());
        descriptor
    }
}

/// Single source of truth for which capabilities exist and in what order
/// they must be consulted.
pub struct PluginRegistry {
    inner: RwLock<Inner>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one descriptor. Fails with [`Error::DuplicateIdentity`] if
    /// the id is already present anywhere in the registry (case-sensitive),
    /// leaving the store unchanged.
    pub fn register(&self, descriptor: PluginDescriptor) -> Result<()> {
        descriptor.validate()?;
        let mut inner = self.write();
        if inner.by_id.contains_key(descriptor.id()) {
            return Err(Error::duplicate(descriptor.id()));
        }
        let registered = inner.insert(descriptor);
        info!(
            id = registered.id(),
            kind = %registered.kind(),
            priority = registered.priority(),
            "plugin capability registered"
        );
        Ok(())
    }

    /// Register a batch all-or-nothing: if any descriptor is malformed or
    /// collides (with the store or within the batch), nothing is committed
    /// and the error names the first offending id.
    pub fn register_many(&self, descriptors: Vec<PluginDescriptor>) -> Result<()> {
        let mut inner = self.write();
        let mut batch_ids = HashSet::new();
        for descriptor in &descriptors {
            if let Err(e) = descriptor.validate() {
                return Err(Error::batch(descriptor.id(), e));
            }
            if inner.by_id.contains_key(descriptor.id())
                || !batch_ids.insert(descriptor.id().to_string())
            {
                return Err(Error::batch(
                    descriptor.id(),
                    Error::duplicate(descriptor.id()),
                ));
            }
        }
        for descriptor in descriptors {
            let registered = inner.insert(descriptor);
            info!(
                id = registered.id(),
                kind = %registered.kind(),
                priority = registered.priority(),
                "plugin capability registered"
            );
        }
        Ok(())
    }

    /// Snapshot of the enabled descriptors for a kind, lowest priority
    /// first, ties in registration order. Empty (never an error) for a kind
    /// with no registrations.
    pub fn get_by_kind(&self, kind: CapabilityKind) -> Vec<Arc<PluginDescriptor>> {
        let inner = self.read();
        inner
            .by_kind
            .get(&kind)
            .map(|sequence| {
                sequence
                    .iter()
                    .filter(|d| d.enabled())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Arc<PluginDescriptor>> {
        let inner = self.read();
        inner
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    /// Toggle a descriptor's enabled flag. Ordering position is unaffected.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let inner = self.write();
        let descriptor = inner.by_id.get(id).ok_or_else(|| Error::not_found(id))?;
        descriptor.set_enabled(enabled);
        info!(id, enabled, "plugin enabled flag changed");
        Ok(())
    }

    /// Every descriptor across all kinds — enabled and disabled — for
    /// introspection and admin listings. Kinds in [`CapabilityKind::ALL`]
    /// order, then sequence order within each kind.
    pub fn all(&self) -> Vec<Arc<PluginDescriptor>> {
        let inner = self.read();
        let mut descriptors = Vec::with_capacity(inner.by_id.len());
        for kind in CapabilityKind::ALL {
            if let Some(sequence) = inner.by_kind.get(kind) {
                descriptors.extend(sequence.iter().cloned());
            }
        }
        descriptors
    }

    /// Returns true if any enabled descriptor exists for the kind.
    pub fn has_kind(&self, kind: CapabilityKind) -> bool {
        let inner = self.read();
        inner
            .by_kind
            .get(&kind)
            .is_some_and(|sequence| sequence.iter().any(|d| d.enabled()))
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {anyhow::Result as AnyResult, async_trait::async_trait};

    use super::*;
    use crate::payload::{
        CapabilityPayload, LinkUnfurler, RouteTable, TemplateSet, Unfurl,
    };

    struct NullUnfurler;

    #[async_trait]
    impl LinkUnfurler for NullUnfurler {
        async fn unfurl(&self, _url: &str) -> AnyResult<Option<Unfurl>> {
            Ok(None)
        }
    }

    fn route_descriptor(id: &str, priority: i32) -> PluginDescriptor {
        PluginDescriptor::new(
            id,
            id,
            CapabilityPayload::RouteContribution(RouteTable::default()),
        )
        .with_priority(priority)
    }

    fn unfurl_descriptor(id: &str) -> PluginDescriptor {
        PluginDescriptor::new(id, id, CapabilityPayload::LinkUnfurler(Arc::new(NullUnfurler)))
    }

    fn template_descriptor(id: &str) -> PluginDescriptor {
        PluginDescriptor::new(
            id,
            id,
            CapabilityPayload::EmailTemplate(TemplateSet::default()),
        )
    }

    fn ids(descriptors: &[Arc<PluginDescriptor>]) -> Vec<&str> {
        descriptors.iter().map(|d| d.id()).collect()
    }

    #[test]
    fn duplicate_id_rejected_across_kinds() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("gh", 0)).unwrap();

        // Same id, different kind — still a duplicate.
        let err = registry.register(unfurl_descriptor("gh")).unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentity { ref id } if id == "gh"));

        // The store still contains only the first descriptor.
        assert_eq!(registry.len(), 1);
        let kept = registry.get_by_id("gh").unwrap();
        assert_eq!(kept.kind(), CapabilityKind::RouteContribution);
    }

    #[test]
    fn priority_ascending_with_stable_ties() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("a", 10)).unwrap();
        registry.register(route_descriptor("b", 5)).unwrap();
        registry.register(route_descriptor("c", 5)).unwrap();

        let sequence = registry.get_by_kind(CapabilityKind::RouteContribution);
        // Priority 5 before 10; b before c because b registered first.
        assert_eq!(ids(&sequence), vec!["b", "c", "a"]);
    }

    #[test]
    fn negative_priority_runs_first() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("late", 100)).unwrap();
        registry.register(route_descriptor("early", -100)).unwrap();
        registry.register(route_descriptor("neutral", 0)).unwrap();

        let sequence = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&sequence), vec!["early", "neutral", "late"]);
    }

    #[test]
    fn kinds_are_isolated() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("routes", 0)).unwrap();
        registry.register(template_descriptor("mail")).unwrap();

        let routes = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&routes), vec!["routes"]);
        let templates = registry.get_by_kind(CapabilityKind::EmailTemplate);
        assert_eq!(ids(&templates), vec!["mail"]);
        assert!(registry.get_by_kind(CapabilityKind::IssueProvider).is_empty());
    }

    #[test]
    fn disabled_descriptor_excluded_from_dispatch_only() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("a", 0)).unwrap();
        registry.register(route_descriptor("b", 1)).unwrap();

        registry.set_enabled("a", false).unwrap();

        let sequence = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&sequence), vec!["b"]);

        // Still retrievable via get_by_id and all(), with the flag visible.
        let disabled = registry.get_by_id("a").unwrap();
        assert!(!disabled.enabled());
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn reenabling_preserves_ordering_position() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("a", 0)).unwrap();
        registry.register(route_descriptor("b", 0)).unwrap();

        registry.set_enabled("a", false).unwrap();
        registry.set_enabled("a", true).unwrap();

        let sequence = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&sequence), vec!["a", "b"]);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("existing", 0)).unwrap();

        let err = registry
            .register_many(vec![
                route_descriptor("d1", 0),
                route_descriptor("existing", 0),
                route_descriptor("d3", 0),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::BatchRegistrationFailed { ref id, .. } if id == "existing"));

        // Neither d1 nor d3 was committed.
        assert_eq!(registry.len(), 1);
        assert!(registry.get_by_id("d1").is_err());
        assert!(registry.get_by_id("d3").is_err());
    }

    #[test]
    fn batch_rejects_internal_duplicates() {
        let registry = PluginRegistry::new();
        let err = registry
            .register_many(vec![route_descriptor("dup", 0), route_descriptor("dup", 1)])
            .unwrap_err();
        assert!(matches!(err, Error::BatchRegistrationFailed { ref id, .. } if id == "dup"));
        assert!(registry.is_empty());
    }

    #[test]
    fn batch_rejects_malformed_descriptor() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("keep", 0)).unwrap();
        let before = registry.all().len();

        let err = registry
            .register_many(vec![
                route_descriptor("d1", 0),
                route_descriptor("  ", 0),
                route_descriptor("d3", 0),
            ])
            .unwrap_err();
        match err {
            Error::BatchRegistrationFailed { source, .. } => {
                assert!(matches!(*source, Error::MalformedDescriptor { .. }));
            },
            other => panic!("expected batch failure, got {other:?}"),
        }
        assert_eq!(registry.all().len(), before);
    }

    #[test]
    fn batch_commits_when_all_valid() {
        let registry = PluginRegistry::new();
        registry
            .register_many(vec![
                route_descriptor("a", 2),
                route_descriptor("b", 1),
                template_descriptor("mail"),
            ])
            .unwrap();
        assert_eq!(registry.len(), 3);
        let routes = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&routes), vec!["b", "a"]);
    }

    #[test]
    fn snapshot_is_idempotent_without_writes() {
        let registry = PluginRegistry::new();
        registry.register(route_descriptor("a", 3)).unwrap();
        registry.register(route_descriptor("b", 1)).unwrap();

        let first = registry.get_by_kind(CapabilityKind::RouteContribution);
        let second = registry.get_by_kind(CapabilityKind::RouteContribution);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn lookup_misses_are_not_found() {
        let registry = PluginRegistry::new();
        assert!(matches!(
            registry.get_by_id("nope"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            registry.set_enabled("nope", false),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn has_kind_tracks_enabled_descriptors() {
        let registry = PluginRegistry::new();
        assert!(!registry.has_kind(CapabilityKind::RouteContribution));
        registry.register(route_descriptor("a", 0)).unwrap();
        assert!(registry.has_kind(CapabilityKind::RouteContribution));
        registry.set_enabled("a", false).unwrap();
        assert!(!registry.has_kind(CapabilityKind::RouteContribution));
    }

    #[test]
    fn concurrent_readers_see_consistent_state() {
        let registry = Arc::new(PluginRegistry::new());
        for i in 0..16 {
            registry
                .register(route_descriptor(&format!("p{i}"), i))
                .unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let sequence = registry.get_by_kind(CapabilityKind::RouteContribution);
                        assert_eq!(sequence.len(), 16);
                        // Ordering invariant holds on every snapshot.
                        for pair in sequence.windows(2) {
                            assert!(pair[0].priority() <= pair[1].priority());
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
