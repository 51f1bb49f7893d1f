//! First-match-wins URL unfurl resolution.

use std::sync::Arc;

use ferrule_registry::{CapabilityKind, CapabilityPayload, PluginRegistry, Unfurl};

use crate::drive::first_match;

/// Try every enabled unfurler in priority order; the first non-empty result
/// wins. `None` means no unfurler matched the URL — a normal outcome, not
/// an error.
pub async fn resolve_unfurl(registry: &PluginRegistry, url: &str) -> Option<Unfurl> {
    let descriptors = registry.get_by_kind(CapabilityKind::LinkUnfurler);

    first_match(&descriptors, |descriptor| {
        let descriptor = Arc::clone(descriptor);
        let url = url.to_string();
        async move {
            match descriptor.payload() {
                CapabilityPayload::LinkUnfurler(unfurler) => unfurler.unfurl(&url).await,
                _ => Ok(None),
            }
        }
    })
    .await
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        anyhow::{Result as AnyResult, bail},
        async_trait::async_trait,
    };

    use super::*;
    use ferrule_registry::{LinkUnfurler, PluginDescriptor};

    struct PrefixUnfurler {
        prefix: String,
        title: String,
    }

    #[async_trait]
    impl LinkUnfurler for PrefixUnfurler {
        async fn unfurl(&self, url: &str) -> AnyResult<Option<Unfurl>> {
            Ok(url.starts_with(&self.prefix).then(|| Unfurl {
                title: self.title.clone(),
                description: None,
                image_url: None,
            }))
        }
    }

    struct BrokenUnfurler;

    #[async_trait]
    impl LinkUnfurler for BrokenUnfurler {
        async fn unfurl(&self, _url: &str) -> AnyResult<Option<Unfurl>> {
            bail!("unfurler exploded")
        }
    }

    fn unfurler_descriptor(id: &str, prefix: &str, priority: i32) -> PluginDescriptor {
        PluginDescriptor::new(
            id,
            id,
            CapabilityPayload::LinkUnfurler(Arc::new(PrefixUnfurler {
                prefix: prefix.into(),
                title: id.to_string(),
            })),
        )
        .with_priority(priority)
    }

    #[tokio::test]
    async fn first_matching_unfurler_in_priority_order_wins() {
        let registry = PluginRegistry::new();
        // Both match the URL; the lower-priority value is consulted first.
        registry
            .register(unfurler_descriptor("generic", "https://", 10))
            .unwrap();
        registry
            .register(unfurler_descriptor("github", "https://github.com/", 1))
            .unwrap();

        let unfurl = resolve_unfurl(&registry, "https://github.com/org/repo")
            .await
            .unwrap();
        assert_eq!(unfurl.title, "github");

        // A URL only the generic unfurler matches falls through to it.
        let unfurl = resolve_unfurl(&registry, "https://example.com/page")
            .await
            .unwrap();
        assert_eq!(unfurl.title, "generic");
    }

    #[tokio::test]
    async fn no_match_returns_none() {
        let registry = PluginRegistry::new();
        registry
            .register(unfurler_descriptor("github", "https://github.com/", 0))
            .unwrap();

        let unfurl = resolve_unfurl(&registry, "ftp://old.example.com").await;
        assert!(unfurl.is_none());
    }

    #[tokio::test]
    async fn broken_unfurler_is_skipped() {
        let registry = PluginRegistry::new();
        registry
            .register(
                PluginDescriptor::new(
                    "broken",
                    "broken",
                    CapabilityPayload::LinkUnfurler(Arc::new(BrokenUnfurler)),
                )
                .with_priority(1),
            )
            .unwrap();
        registry
            .register(unfurler_descriptor("fallback", "https://", 2))
            .unwrap();

        let unfurl = resolve_unfurl(&registry, "https://example.com").await.unwrap();
        assert_eq!(unfurl.title, "fallback");
    }

    #[tokio::test]
    async fn disabled_unfurler_is_not_consulted() {
        let registry = PluginRegistry::new();
        registry
            .register(unfurler_descriptor("only", "https://", 0))
            .unwrap();
        registry.set_enabled("only", false).unwrap();

        assert!(resolve_unfurl(&registry, "https://example.com").await.is_none());
    }
}
